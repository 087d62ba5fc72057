//! Repository accessor for players, courts and queues.
//!
//! Every method is atomic: it either applies completely or not at all.
//! Cross-call consistency (read, decide, write) is the caller's job.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CourtOccupancy, CourtRow, CourtType, PlayerRow, QueueEntryRow, QueuedPlayer, Qualification,
    TeamRow,
};
use crate::queue::QueueError;
use crate::repos::{CreateCourt, CreatePlayer, PlayerFilter, UpdateCourt, UpdatePlayer};
use crate::rules::RuleViolation;

pub mod memory;
pub mod postgres;

pub use memory::MemoryFacilityStore;
pub use postgres::PgFacilityStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<RuleViolation> for StoreError {
    fn from(e: RuleViolation) -> Self {
        StoreError::Conflict(e.to_string())
    }
}

impl From<QueueError> for StoreError {
    fn from(e: QueueError) -> Self {
        StoreError::Validation(e.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Where a player is taken from when placed on a court.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementSource {
    /// Not on any court; a queue entry, if present, is removed.
    Waiting,
    /// Currently on the given court.
    Court(Uuid),
}

#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub player_id: Uuid,
    pub court_id: Uuid,
    pub source: PlacementSource,
}

/// Outcome of a court type transition.
#[derive(Debug, Clone)]
pub struct CourtTypeChange {
    pub court: CourtRow,
    pub old_type: CourtType,
    pub moved_players: Vec<PlayerRow>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionReset {
    pub players_deactivated: u64,
    pub courts_reset: u64,
    pub queue_entries_cleared: u64,
}

#[async_trait]
pub trait FacilityStore: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    /// Create a player. Active players are appended to their qualification
    /// queue. Duplicate names or emails are conflicts.
    async fn create_player(&self, data: CreatePlayer) -> StoreResult<PlayerRow>;

    async fn get_player(&self, id: Uuid) -> StoreResult<Option<PlayerRow>>;

    async fn get_player_by_email(&self, email: &str) -> StoreResult<Option<PlayerRow>>;

    async fn list_players(&self, filter: PlayerFilter) -> StoreResult<Vec<PlayerRow>>;

    /// Apply a typed update. A qualification change moves a queued player
    /// to the tail of the new queue.
    async fn update_player(&self, id: Uuid, data: UpdatePlayer) -> StoreResult<PlayerRow>;

    /// Activation queues an idle player; deactivation clears court and queue.
    async fn set_player_active(&self, id: Uuid, active: bool) -> StoreResult<PlayerRow>;

    async fn delete_player(&self, id: Uuid) -> StoreResult<bool>;

    async fn create_team(&self, number: &str) -> StoreResult<TeamRow>;

    async fn list_teams(&self) -> StoreResult<Vec<TeamRow>>;

    async fn create_court(&self, data: CreateCourt) -> StoreResult<CourtRow>;

    async fn get_court(&self, id: Uuid) -> StoreResult<Option<CourtRow>>;

    /// All courts in declaration (name) order.
    async fn list_courts(&self) -> StoreResult<Vec<CourtRow>>;

    async fn update_court(&self, id: Uuid, data: UpdateCourt) -> StoreResult<CourtRow>;

    /// Remove a court, returning its former occupants to their queues.
    async fn delete_court(&self, id: Uuid) -> StoreResult<Vec<PlayerRow>>;

    /// Change the court type. Switching a playable court to training evicts
    /// every occupant back to the tail of their qualification queue.
    async fn change_court_type(&self, id: Uuid, new_type: CourtType)
        -> StoreResult<CourtTypeChange>;

    async fn list_court_players(&self, court_id: Uuid) -> StoreResult<Vec<PlayerRow>>;

    /// Every court with its occupants, in declaration order.
    async fn list_occupancy(&self) -> StoreResult<Vec<CourtOccupancy>>;

    async fn list_queue(&self, queue_type: Qualification) -> StoreResult<Vec<QueuedPlayer>>;

    /// Append to the tail of `queue_type`, leaving any court or other queue.
    async fn enqueue(&self, player_id: Uuid, queue_type: Qualification)
        -> StoreResult<QueueEntryRow>;

    /// Remove the player's entry and close the gap behind it.
    async fn dequeue(&self, player_id: Uuid) -> StoreResult<Option<QueueEntryRow>>;

    async fn reorder_queue(
        &self,
        queue_type: Qualification,
        order: &[Uuid],
    ) -> StoreResult<Vec<QueueEntryRow>>;

    /// Move a player onto a court. Guards capacity and the expected source;
    /// qualification eligibility is checked by the caller.
    async fn place_player(&self, placement: Placement) -> StoreResult<PlayerRow>;

    /// Take the player off the court. Active players go back to the tail of
    /// their queue. Returns false when the player was not on that court.
    async fn release_player(&self, player_id: Uuid, court_id: Uuid) -> StoreResult<bool>;

    /// Deactivate everyone, empty courts and queues, turn all courts to training.
    async fn reset_session(&self) -> StoreResult<SessionReset>;
}
