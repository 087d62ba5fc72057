use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, Utc};

use crate::gql::common::types::Qualification;
use crate::gql::domains::players::types::Player;

#[derive(SimpleObject, Clone)]
pub struct QueueEntry {
    pub id: ID,
    pub player_id: ID,
    pub queue_type: Qualification,
    pub position: i32,
    pub enqueued_at: DateTime<Utc>,
}

impl From<infra::models::QueueEntryRow> for QueueEntry {
    fn from(row: infra::models::QueueEntryRow) -> Self {
        Self {
            id: row.id.into(),
            player_id: row.player_id.into(),
            queue_type: row.queue_type.into(),
            position: row.position,
            enqueued_at: row.enqueued_at,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct QueuedPlayer {
    pub position: i32,
    pub enqueued_at: DateTime<Utc>,
    pub player: Player,
}

impl From<infra::models::QueuedPlayer> for QueuedPlayer {
    fn from(queued: infra::models::QueuedPlayer) -> Self {
        Self {
            position: queued.entry.position,
            enqueued_at: queued.entry.enqueued_at,
            player: queued.player.into(),
        }
    }
}

/// Both waiting queues, lowest position first.
#[derive(SimpleObject, Clone)]
pub struct QueueStatus {
    pub advanced: Vec<QueuedPlayer>,
    pub intermediate: Vec<QueuedPlayer>,
    pub advanced_count: i32,
    pub intermediate_count: i32,
}
