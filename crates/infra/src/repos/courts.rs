use crate::models::{CourtRole, CourtRow, CourtType};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateCourt {
    pub name: String,
    pub court_type: CourtType,
    pub role: CourtRole,
    pub pair_number: Option<i32>,
}

/// Mutable court fields. The court type is changed through a dedicated
/// transition because it may evict occupants.
#[derive(Debug, Clone, Default)]
pub struct UpdateCourt {
    pub name: Option<String>,
    pub role: Option<CourtRole>,
    pub pair_number: Option<i32>,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateCourt) -> SqlxResult<CourtRow> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        INSERT INTO courts (name, court_type, role, pair_number)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, court_type, role, pair_number, created_at, updated_at
        "#,
    )
    .bind(data.name)
    .bind(data.court_type)
    .bind(data.role)
    .bind(data.pair_number)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        SELECT id, name, court_type, role, pair_number, created_at, updated_at
        FROM courts
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Lock the court row; placements on the same court serialize behind it.
pub async fn lock_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        SELECT id, name, court_type, role, pair_number, created_at, updated_at
        FROM courts
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_name<'e>(
    executor: impl PgExecutor<'e>,
    name: &str,
) -> SqlxResult<Option<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        SELECT id, name, court_type, role, pair_number, created_at, updated_at
        FROM courts
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(executor)
    .await
}

pub async fn list<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<Vec<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        SELECT id, name, court_type, role, pair_number, created_at, updated_at
        FROM courts
        ORDER BY name ASC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn update<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateCourt,
) -> SqlxResult<Option<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        UPDATE courts
        SET name = COALESCE($2, name),
            role = COALESCE($3, role),
            pair_number = COALESCE($4, pair_number),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, court_type, role, pair_number, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(data.name)
    .bind(data.role)
    .bind(data.pair_number)
    .fetch_optional(executor)
    .await
}

pub async fn set_type<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    court_type: CourtType,
) -> SqlxResult<Option<CourtRow>> {
    sqlx::query_as::<_, CourtRow>(
        r#"
        UPDATE courts
        SET court_type = $2,
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, court_type, role, pair_number, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(court_type)
    .fetch_optional(executor)
    .await
}

pub async fn set_all_training<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE courts
        SET court_type = 'training',
            updated_at = NOW()
        WHERE court_type <> 'training'
        "#,
    )
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM courts WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}
