use infra::models::{CourtRow, CourtType, PlayerRow};
use infra::repos::{CreateCourt, UpdateCourt};
use infra::rules::{self, MatchType};
use infra::store::{CourtTypeChange, Placement, PlacementSource};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::gql::common::helpers::{require_court, require_player, required_text};
use crate::state::AppState;

pub async fn create_court(state: &AppState, data: CreateCourt) -> Result<CourtRow, AppError> {
    let data = CreateCourt {
        name: required_text("name", &data.name)?,
        ..data
    };
    validate_pair_number(data.pair_number)?;

    let _guard = state.lock().await;
    let court = state.store.create_court(data).await?;
    info!(court = %court.name, court_type = %court.court_type, "Court created");
    Ok(court)
}

pub async fn update_court(
    state: &AppState,
    court_id: Uuid,
    data: UpdateCourt,
) -> Result<CourtRow, AppError> {
    let data = UpdateCourt {
        name: data.name.as_deref().map(|n| required_text("name", n)).transpose()?,
        ..data
    };
    validate_pair_number(data.pair_number)?;

    let _guard = state.lock().await;
    Ok(state.store.update_court(court_id, data).await?)
}

/// Remove a court. Returns the occupants, who are back in their queues.
pub async fn delete_court(state: &AppState, court_id: Uuid) -> Result<Vec<PlayerRow>, AppError> {
    let _guard = state.lock().await;
    let moved = state.store.delete_court(court_id).await?;
    info!(court_id = %court_id, moved = moved.len(), "Court deleted");
    Ok(moved)
}

pub async fn change_court_type(
    state: &AppState,
    court_id: Uuid,
    new_type: CourtType,
) -> Result<CourtTypeChange, AppError> {
    let _guard = state.lock().await;
    let change = state.store.change_court_type(court_id, new_type).await?;

    info!(
        court = %change.court.name,
        old_type = %change.old_type,
        new_type = %change.court.court_type,
        moved = change.moved_players.len(),
        "Court type changed"
    );
    Ok(change)
}

/// Place a waiting player on a court by hand.
pub async fn assign_player_to_court(
    state: &AppState,
    player_id: Uuid,
    court_id: Uuid,
) -> Result<(PlayerRow, CourtRow, MatchType), AppError> {
    let _guard = state.lock().await;

    let player = require_player(state, player_id).await?;
    let court = require_court(state, court_id).await?;
    let occupancy = state.store.list_court_players(court_id).await?.len();

    let match_type =
        rules::check_manual_assignment(&player, &court, occupancy, state.assignment_policy())?;

    let placed = state
        .store
        .place_player(Placement {
            player_id,
            court_id,
            source: PlacementSource::Waiting,
        })
        .await?;

    info!(
        player = %placed.name,
        court = %court.name,
        match_type = match_type.as_str(),
        "Player assigned to court"
    );
    Ok((placed, court, match_type))
}

/// Returns false when the player is not on that court.
pub async fn remove_player_from_court(
    state: &AppState,
    player_id: Uuid,
    court_id: Uuid,
) -> Result<bool, AppError> {
    let _guard = state.lock().await;

    let player = require_player(state, player_id).await?;
    let court = require_court(state, court_id).await?;

    let removed = state.store.release_player(player_id, court_id).await?;
    if removed {
        info!(player = %player.name, court = %court.name, "Player removed from court");
    }
    Ok(removed)
}

fn validate_pair_number(pair_number: Option<i32>) -> Result<(), AppError> {
    match pair_number {
        Some(n) if n < 1 => Err(AppError::BadRequest(
            "pairNumber must be a positive integer".to_string(),
        )),
        _ => Ok(()),
    }
}
