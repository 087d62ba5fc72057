use infra::models::{CourtRow, PlayerRow};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub async fn require_player(state: &AppState, player_id: Uuid) -> Result<PlayerRow, AppError> {
    state
        .store
        .get_player(player_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Player with ID {} not found", player_id)))
}

pub async fn require_court(state: &AppState, court_id: Uuid) -> Result<CourtRow, AppError> {
    state
        .store
        .get_court(court_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Court with ID {} not found", court_id)))
}

/// Trimmed, non-empty text input.
pub fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub fn normalize_email(value: &str) -> Result<String, AppError> {
    let email = value.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(AppError::BadRequest(format!("Invalid email address: {value}"))),
    }
}
