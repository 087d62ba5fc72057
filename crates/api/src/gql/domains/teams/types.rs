use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, Utc};

#[derive(SimpleObject, Clone)]
pub struct Team {
    pub id: ID,
    pub number: String,
    pub created_at: DateTime<Utc>,
}

impl From<infra::models::TeamRow> for Team {
    fn from(row: infra::models::TeamRow) -> Self {
        Self {
            id: row.id.into(),
            number: row.number,
            created_at: row.created_at,
        }
    }
}
