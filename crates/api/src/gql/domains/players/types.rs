use async_graphql::{InputObject, SimpleObject, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::common::types::Qualification;

#[derive(SimpleObject, Clone)]
pub struct Player {
    pub id: ID,
    pub name: String,
    pub email: Option<String>,
    pub qualification: Qualification,
    pub is_active: bool,
    pub court_id: Option<ID>,
    pub court_assigned_at: Option<DateTime<Utc>>,
    pub team_id: Option<ID>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::PlayerRow> for Player {
    fn from(row: infra::models::PlayerRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            email: row.email,
            qualification: row.qualification.into(),
            is_active: row.is_active,
            court_id: row.court_id.map(|id| id.into()),
            court_assigned_at: row.court_assigned_at,
            team_id: row.team_id.map(|id| id.into()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(InputObject)]
pub struct RegisterPlayerInput {
    pub name: String,
    pub email: Option<String>,
    pub qualification: Qualification,
}

/// Only the listed fields can change; omitted fields keep their value.
#[derive(InputObject)]
pub struct UpdatePlayerInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub qualification: Option<Qualification>,
    pub team_id: Option<Uuid>,
}
