use crate::models::{PlayerRow, QueueEntryRow, QueuedPlayer, Qualification};
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

/// Append the player at the tail of `queue_type`.
///
/// Callers must remove any previous entry for the player first.
pub async fn insert_tail<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
    queue_type: Qualification,
) -> SqlxResult<QueueEntryRow> {
    sqlx::query_as::<_, QueueEntryRow>(
        r#"
        INSERT INTO queue_entries (player_id, queue_type, position)
        VALUES (
            $1, $2,
            (SELECT COALESCE(MAX(position), 0) + 1 FROM queue_entries WHERE queue_type = $2)
        )
        RETURNING id, player_id, queue_type, position, enqueued_at
        "#,
    )
    .bind(player_id)
    .bind(queue_type)
    .fetch_one(executor)
    .await
}

pub async fn get_for_player<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
) -> SqlxResult<Option<QueueEntryRow>> {
    sqlx::query_as::<_, QueueEntryRow>(
        r#"
        SELECT id, player_id, queue_type, position, enqueued_at
        FROM queue_entries
        WHERE player_id = $1
        "#,
    )
    .bind(player_id)
    .fetch_optional(executor)
    .await
}

pub async fn delete_for_player<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
) -> SqlxResult<Option<QueueEntryRow>> {
    sqlx::query_as::<_, QueueEntryRow>(
        r#"
        DELETE FROM queue_entries
        WHERE player_id = $1
        RETURNING id, player_id, queue_type, position, enqueued_at
        "#,
    )
    .bind(player_id)
    .fetch_optional(executor)
    .await
}

/// Close gaps so positions run `1..=N` in their existing order.
pub async fn reindex<'e>(
    executor: impl PgExecutor<'e>,
    queue_type: Qualification,
) -> SqlxResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE queue_entries q
        SET position = ranked.new_position
        FROM (
            SELECT id, ROW_NUMBER() OVER (ORDER BY position ASC) AS new_position
            FROM queue_entries
            WHERE queue_type = $1
        ) ranked
        WHERE q.id = ranked.id AND q.position <> ranked.new_position
        "#,
    )
    .bind(queue_type)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn list<'e>(
    executor: impl PgExecutor<'e>,
    queue_type: Qualification,
) -> SqlxResult<Vec<QueueEntryRow>> {
    sqlx::query_as::<_, QueueEntryRow>(
        r#"
        SELECT id, player_id, queue_type, position, enqueued_at
        FROM queue_entries
        WHERE queue_type = $1
        ORDER BY position ASC
        "#,
    )
    .bind(queue_type)
    .fetch_all(executor)
    .await
}

pub async fn list_with_players<'e>(
    executor: impl PgExecutor<'e>,
    queue_type: Qualification,
) -> SqlxResult<Vec<QueuedPlayer>> {
    #[derive(sqlx::FromRow)]
    struct JoinedRow {
        // Entry fields
        id: Uuid,
        player_id: Uuid,
        queue_type: Qualification,
        position: i32,
        enqueued_at: DateTime<Utc>,
        // Player fields
        name: String,
        email: Option<String>,
        qualification: Qualification,
        is_active: bool,
        court_id: Option<Uuid>,
        court_assigned_at: Option<DateTime<Utc>>,
        team_id: Option<Uuid>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    }

    let rows = sqlx::query_as::<_, JoinedRow>(
        r#"
        SELECT
            q.id, q.player_id, q.queue_type, q.position, q.enqueued_at,
            p.name, p.email, p.qualification, p.is_active, p.court_id, p.court_assigned_at,
            p.team_id, p.created_at, p.updated_at
        FROM queue_entries q
        JOIN players p ON q.player_id = p.id
        WHERE q.queue_type = $1
        ORDER BY q.position ASC
        "#,
    )
    .bind(queue_type)
    .fetch_all(executor)
    .await?;

    let results = rows
        .into_iter()
        .map(|row| QueuedPlayer {
            entry: QueueEntryRow {
                id: row.id,
                player_id: row.player_id,
                queue_type: row.queue_type,
                position: row.position,
                enqueued_at: row.enqueued_at,
            },
            player: PlayerRow {
                id: row.player_id,
                name: row.name,
                email: row.email,
                qualification: row.qualification,
                is_active: row.is_active,
                court_id: row.court_id,
                court_assigned_at: row.court_assigned_at,
                team_id: row.team_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        })
        .collect();

    Ok(results)
}

pub async fn set_position<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
    position: i32,
) -> SqlxResult<bool> {
    let result = sqlx::query("UPDATE queue_entries SET position = $2 WHERE player_id = $1")
        .bind(player_id)
        .bind(position)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_all<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<u64> {
    let result = sqlx::query("DELETE FROM queue_entries")
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
