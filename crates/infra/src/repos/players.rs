use crate::models::{PlayerRow, Qualification};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreatePlayer {
    pub name: String,
    pub email: Option<String>,
    pub qualification: Qualification,
    pub is_active: bool,
}

/// Mutable player fields. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePlayer {
    pub name: Option<String>,
    pub email: Option<String>,
    pub qualification: Option<Qualification>,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub struct PlayerFilter {
    pub is_active: Option<bool>,
    pub qualification: Option<Qualification>,
    pub search: Option<String>,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreatePlayer,
) -> SqlxResult<PlayerRow> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        INSERT INTO players (name, email, qualification, is_active)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, qualification, is_active, court_id, court_assigned_at,
                  team_id, created_at, updated_at
        "#,
    )
    .bind(data.name)
    .bind(data.email)
    .bind(data.qualification)
    .bind(data.is_active)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        SELECT id, name, email, qualification, is_active, court_id, court_assigned_at,
               team_id, created_at, updated_at
        FROM players
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Same as `get_by_id` but takes a row lock for the rest of the transaction.
pub async fn lock_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        SELECT id, name, email, qualification, is_active, court_id, court_assigned_at,
               team_id, created_at, updated_at
        FROM players
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_email<'e>(
    executor: impl PgExecutor<'e>,
    email: &str,
) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        SELECT id, name, email, qualification, is_active, court_id, court_assigned_at,
               team_id, created_at, updated_at
        FROM players
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_name<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        SELECT id, name, email, qualification, is_active, court_id, court_assigned_at,
               team_id, created_at, updated_at
        FROM players
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(executor)
    .await
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    filter: PlayerFilter,
) -> SqlxResult<Vec<PlayerRow>> {
    let mut query = sqlx::QueryBuilder::new(
        "SELECT id, name, email, qualification, is_active, court_id, court_assigned_at, team_id, created_at, updated_at FROM players WHERE 1=1",
    );

    if let Some(search) = &filter.search {
        let search_pattern = format!("%{}%", search.to_lowercase());
        query.push(" AND (LOWER(name) LIKE ");
        query.push_bind(search_pattern.clone());
        query.push(" OR LOWER(COALESCE(email, '')) LIKE ");
        query.push_bind(search_pattern);
        query.push(")");
    }

    if let Some(is_active) = filter.is_active {
        query.push(" AND is_active = ");
        query.push_bind(is_active);
    }

    if let Some(qualification) = filter.qualification {
        query.push(" AND qualification = ");
        query.push_bind(qualification);
    }

    query.push(" ORDER BY name ASC");

    query.build_query_as::<PlayerRow>().fetch_all(executor).await
}

pub async fn list_by_court<'e>(
    executor: impl PgExecutor<'e>,
    court_id: Uuid,
) -> SqlxResult<Vec<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        SELECT id, name, email, qualification, is_active, court_id, court_assigned_at,
               team_id, created_at, updated_at
        FROM players
        WHERE court_id = $1
        ORDER BY court_assigned_at ASC NULLS LAST, name ASC
        "#,
    )
    .bind(court_id)
    .fetch_all(executor)
    .await
}

pub async fn list_on_courts<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<Vec<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        SELECT id, name, email, qualification, is_active, court_id, court_assigned_at,
               team_id, created_at, updated_at
        FROM players
        WHERE court_id IS NOT NULL
        ORDER BY court_assigned_at ASC NULLS LAST, name ASC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn count_on_court<'e>(executor: impl PgExecutor<'e>, court_id: Uuid) -> SqlxResult<i64> {
    let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM players WHERE court_id = $1")
        .bind(court_id)
        .fetch_one(executor)
        .await?;

    Ok(result.0)
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdatePlayer,
) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        UPDATE players
        SET name = COALESCE($2, name),
            email = COALESCE($3, email),
            qualification = COALESCE($4, qualification),
            team_id = COALESCE($5, team_id),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, email, qualification, is_active, court_id, court_assigned_at,
                  team_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(data.name)
    .bind(data.email)
    .bind(data.qualification)
    .bind(data.team_id)
    .fetch_optional(executor)
    .await
}

pub async fn set_active<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    is_active: bool,
) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        UPDATE players
        SET is_active = $2,
            court_id = CASE WHEN $2 THEN court_id ELSE NULL END,
            court_assigned_at = CASE WHEN $2 THEN court_assigned_at ELSE NULL END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, email, qualification, is_active, court_id, court_assigned_at,
                  team_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(is_active)
    .fetch_optional(executor)
    .await
}

/// Point the player at a court, or clear the court with `None`.
pub async fn set_court<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    court_id: Option<Uuid>,
) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        UPDATE players
        SET court_id = $2,
            court_assigned_at = CASE WHEN $2::uuid IS NULL THEN NULL ELSE NOW() END,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, email, qualification, is_active, court_id, court_assigned_at,
                  team_id, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(court_id)
    .fetch_optional(executor)
    .await
}

/// Clear the court of every occupant and return them in placement order.
pub async fn evict_court<'e>(
    executor: impl PgExecutor<'e>,
    court_id: Uuid,
) -> SqlxResult<Vec<PlayerRow>> {
    let mut rows = sqlx::query_as::<_, PlayerRow>(
        r#"
        WITH evicted AS (
            SELECT id, court_assigned_at AS placed_at
            FROM players
            WHERE court_id = $1
            FOR UPDATE
        )
        UPDATE players p
        SET court_id = NULL,
            court_assigned_at = NULL,
            updated_at = NOW()
        FROM evicted
        WHERE p.id = evicted.id
        RETURNING p.id, p.name, p.email, p.qualification, p.is_active, p.court_id,
                  evicted.placed_at AS court_assigned_at, p.team_id, p.created_at, p.updated_at
        "#,
    )
    .bind(court_id)
    .fetch_all(executor)
    .await?;

    rows.sort_by(|a, b| a.court_assigned_at.cmp(&b.court_assigned_at));
    for row in &mut rows {
        row.court_assigned_at = None;
    }
    Ok(rows)
}

pub async fn deactivate_all<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE players
        SET is_active = false,
            court_id = NULL,
            court_assigned_at = NULL,
            updated_at = NOW()
        WHERE is_active = true OR court_id IS NOT NULL
        "#,
    )
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM players WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
