use infra::models::{QueueEntryRow, Qualification};
use infra::rules::RuleViolation;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::gql::common::helpers::require_player;
use crate::state::AppState;

/// Put a player at the tail of a queue, taking them off any court first.
pub async fn enqueue(
    state: &AppState,
    player_id: Uuid,
    queue_type: Qualification,
) -> Result<QueueEntryRow, AppError> {
    let _guard = state.lock().await;
    let player = require_player(state, player_id).await?;

    let entry = state.store.enqueue(player_id, queue_type).await?;
    info!(player = %player.name, queue = %queue_type, position = entry.position, "Player queued");
    Ok(entry)
}

/// Returns false when the player was not queued.
pub async fn dequeue(state: &AppState, player_id: Uuid) -> Result<bool, AppError> {
    let _guard = state.lock().await;
    let player = require_player(state, player_id).await?;

    let removed = state.store.dequeue(player_id).await?;
    if let Some(entry) = &removed {
        info!(player = %player.name, queue = %entry.queue_type, "Player left the queue");
    }
    Ok(removed.is_some())
}

/// Replace the order of a queue with `order`, which must list every member
/// exactly once.
pub async fn reorder_queue(
    state: &AppState,
    queue_type: Qualification,
    order: &[Uuid],
) -> Result<Vec<QueueEntryRow>, AppError> {
    let _guard = state.lock().await;

    for &player_id in order {
        let player = require_player(state, player_id).await?;
        if !player.is_active {
            return Err(RuleViolation::Inactive {
                player: player.name,
            }
            .into());
        }
        if player.qualification != queue_type {
            return Err(RuleViolation::QueueTypeMismatch {
                qualification: player.qualification,
                queue_type,
            }
            .into());
        }
    }

    let entries = state.store.reorder_queue(queue_type, order).await?;
    info!(queue = %queue_type, size = entries.len(), "Queue reordered");
    Ok(entries)
}
