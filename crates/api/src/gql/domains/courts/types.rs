use async_graphql::{InputObject, SimpleObject, ID};
use chrono::{DateTime, Utc};
use infra::models::{CourtOccupancy, MAX_PLAYERS_PER_COURT};

use crate::gql::common::types::{CourtRole, CourtType, MatchType};
use crate::gql::domains::players::types::Player;

#[derive(SimpleObject, Clone)]
pub struct Court {
    pub id: ID,
    pub name: String,
    pub court_type: CourtType,
    pub role: CourtRole,
    pub pair_number: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<infra::models::CourtRow> for Court {
    fn from(row: infra::models::CourtRow) -> Self {
        Self {
            id: row.id.into(),
            name: row.name,
            court_type: row.court_type.into(),
            role: row.role.into(),
            pair_number: row.pair_number,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A court with its occupants, first placed first.
#[derive(SimpleObject, Clone)]
pub struct CourtStatus {
    pub court: Court,
    pub players: Vec<Player>,
    pub occupancy: i32,
    pub capacity: i32,
    pub available_slots: i32,
    pub is_full: bool,
}

impl From<CourtOccupancy> for CourtStatus {
    fn from(occupancy: CourtOccupancy) -> Self {
        let count = occupancy.count() as i32;
        let available_slots = occupancy.free_slots() as i32;
        let is_full = occupancy.is_full();
        Self {
            court: occupancy.court.into(),
            players: occupancy.players.into_iter().map(Player::from).collect(),
            occupancy: count,
            capacity: MAX_PLAYERS_PER_COURT as i32,
            available_slots,
            is_full,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct CourtAssignment {
    pub player: Player,
    pub court: Court,
    pub match_type: MatchType,
}

#[derive(SimpleObject, Clone)]
pub struct CourtTypeChangeResult {
    pub court: Court,
    pub old_type: CourtType,
    pub new_type: CourtType,
    /// Occupants sent back to their queue by the change.
    pub moved_players: Vec<Player>,
}

impl From<infra::store::CourtTypeChange> for CourtTypeChangeResult {
    fn from(change: infra::store::CourtTypeChange) -> Self {
        Self {
            new_type: change.court.court_type.into(),
            old_type: change.old_type.into(),
            court: change.court.into(),
            moved_players: change.moved_players.into_iter().map(Player::from).collect(),
        }
    }
}

#[derive(InputObject)]
pub struct CreateCourtInput {
    pub name: String,
    pub court_type: CourtType,
    pub role: Option<CourtRole>,
    pub pair_number: Option<i32>,
}

/// The court type is changed through `changeCourtType` only.
#[derive(InputObject)]
pub struct UpdateCourtInput {
    pub name: Option<String>,
    pub role: Option<CourtRole>,
    pub pair_number: Option<i32>,
}
