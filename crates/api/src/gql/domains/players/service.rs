use infra::models::PlayerRow;
use infra::repos::{CreatePlayer, UpdatePlayer};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::gql::common::helpers::{normalize_email, required_text};
use crate::state::AppState;

/// Create an active player and queue them for their qualification.
pub async fn register_player(state: &AppState, data: CreatePlayer) -> Result<PlayerRow, AppError> {
    let data = CreatePlayer {
        name: required_text("name", &data.name)?,
        email: data.email.as_deref().map(normalize_email).transpose()?,
        ..data
    };

    let _guard = state.lock().await;
    let player = state.store.create_player(data).await?;
    info!(player = %player.name, qualification = %player.qualification, "Player registered");
    Ok(player)
}

pub async fn update_player(
    state: &AppState,
    player_id: Uuid,
    data: UpdatePlayer,
) -> Result<PlayerRow, AppError> {
    let data = UpdatePlayer {
        name: data.name.as_deref().map(|n| required_text("name", n)).transpose()?,
        email: data.email.as_deref().map(normalize_email).transpose()?,
        ..data
    };

    let _guard = state.lock().await;
    Ok(state.store.update_player(player_id, data).await?)
}

pub async fn set_player_active(
    state: &AppState,
    player_id: Uuid,
    active: bool,
) -> Result<PlayerRow, AppError> {
    let _guard = state.lock().await;
    let player = state.store.set_player_active(player_id, active).await?;
    info!(player = %player.name, active, "Player activity changed");
    Ok(player)
}

/// Mark the player present. Idle players join the tail of their queue.
pub async fn login_player(state: &AppState, email: &str) -> Result<PlayerRow, AppError> {
    let email = normalize_email(email)?;

    let _guard = state.lock().await;
    let player = state
        .store
        .get_player_by_email(&email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No player registered with email {email}")))?;

    Ok(state.store.set_player_active(player.id, true).await?)
}

/// Returns false when no player uses this email.
pub async fn logout_player(state: &AppState, email: &str) -> Result<bool, AppError> {
    let email = email.trim().to_lowercase();

    let _guard = state.lock().await;
    let Some(player) = state.store.get_player_by_email(&email).await? else {
        return Ok(false);
    };

    if player.is_active {
        state.store.set_player_active(player.id, false).await?;
        info!(player = %player.name, "Player logged out");
    }
    Ok(true)
}

pub async fn delete_player(state: &AppState, player_id: Uuid) -> Result<bool, AppError> {
    let _guard = state.lock().await;
    if !state.store.delete_player(player_id).await? {
        return Err(AppError::NotFound(format!(
            "Player with ID {} not found",
            player_id
        )));
    }
    info!(player_id = %player_id, "Player deleted");
    Ok(true)
}
