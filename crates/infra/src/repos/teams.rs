use crate::models::TeamRow;
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

pub async fn create<'e>(executor: impl PgExecutor<'e>, number: &str) -> SqlxResult<TeamRow> {
    sqlx::query_as::<_, TeamRow>(
        r#"
        INSERT INTO teams (number)
        VALUES ($1)
        RETURNING id, number, created_at
        "#,
    )
    .bind(number)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<TeamRow>> {
    sqlx::query_as::<_, TeamRow>("SELECT id, number, created_at FROM teams WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn get_by_number<'e>(
    executor: impl PgExecutor<'e>,
    number: &str,
) -> SqlxResult<Option<TeamRow>> {
    sqlx::query_as::<_, TeamRow>("SELECT id, number, created_at FROM teams WHERE number = $1")
        .bind(number)
        .fetch_optional(executor)
        .await
}

pub async fn list<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<Vec<TeamRow>> {
    sqlx::query_as::<_, TeamRow>("SELECT id, number, created_at FROM teams ORDER BY number ASC")
        .fetch_all(executor)
        .await
}
