use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use uuid::Uuid;

/// Maximum number of players on a single court.
pub const MAX_PLAYERS_PER_COURT: usize = 4;

/// Skill tier of a player. Also names the waiting queue the player belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, sqlx::Type, Serialize, Deserialize,
)]
#[sqlx(type_name = "qualification", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Qualification {
    Advanced,
    Intermediate,
}

impl Qualification {
    pub const ALL: [Qualification; 2] = [Qualification::Advanced, Qualification::Intermediate];

    pub fn as_str(&self) -> &'static str {
        match self {
            Qualification::Advanced => "advanced",
            Qualification::Intermediate => "intermediate",
        }
    }
}

impl fmt::Display for Qualification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "court_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CourtType {
    Advanced,
    Intermediate,
    Training,
}

impl CourtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourtType::Advanced => "advanced",
            CourtType::Intermediate => "intermediate",
            CourtType::Training => "training",
        }
    }

    /// The qualification a playable court serves. Training courts serve none.
    pub fn qualification(&self) -> Option<Qualification> {
        match self {
            CourtType::Advanced => Some(Qualification::Advanced),
            CourtType::Intermediate => Some(Qualification::Intermediate),
            CourtType::Training => None,
        }
    }

    pub fn is_training(&self) -> bool {
        matches!(self, CourtType::Training)
    }
}

impl fmt::Display for CourtType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position of a court in a warmup/game pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "court_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CourtRole {
    Game,
    Warmup,
    Standard,
}

impl CourtRole {
    /// Auto-fill processing precedence: game, then warmup, then the rest.
    pub fn precedence(&self) -> u8 {
        match self {
            CourtRole::Game => 0,
            CourtRole::Warmup => 1,
            CourtRole::Standard => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct PlayerRow {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub qualification: Qualification,
    pub is_active: bool,
    pub court_id: Option<Uuid>,
    pub court_assigned_at: Option<DateTime<Utc>>,
    pub team_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct CourtRow {
    pub id: Uuid,
    pub name: String,
    pub court_type: CourtType,
    pub role: CourtRole,
    pub pair_number: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct QueueEntryRow {
    pub id: Uuid,
    pub player_id: Uuid,
    pub queue_type: Qualification,
    pub position: i32,
    pub enqueued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct TeamRow {
    pub id: Uuid,
    pub number: String,
    pub created_at: DateTime<Utc>,
}

/// A queue entry joined with the player it references.
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedPlayer {
    pub entry: QueueEntryRow,
    pub player: PlayerRow,
}

/// A court together with its current occupants, ordered by placement time.
#[derive(Debug, Clone)]
pub struct CourtOccupancy {
    pub court: CourtRow,
    pub players: Vec<PlayerRow>,
}

impl CourtOccupancy {
    pub fn count(&self) -> usize {
        self.players.len()
    }

    pub fn free_slots(&self) -> usize {
        MAX_PLAYERS_PER_COURT.saturating_sub(self.players.len())
    }

    pub fn is_full(&self) -> bool {
        self.free_slots() == 0
    }
}
