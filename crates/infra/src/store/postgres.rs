//! PostgreSQL-backed store. Each trait call runs in its own transaction and
//! takes row locks on the court and player it touches.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::{
    CourtTypeChange, FacilityStore, Placement, PlacementSource, SessionReset, StoreError,
    StoreResult,
};
use crate::models::{
    CourtOccupancy, CourtRow, CourtType, PlayerRow, QueueEntryRow, QueuedPlayer, Qualification,
    TeamRow, MAX_PLAYERS_PER_COURT,
};
use crate::queue::validate_reorder;
use crate::repos::{
    courts, players, queue_entries, teams, CreateCourt, CreatePlayer, PlayerFilter, UpdateCourt,
    UpdatePlayer,
};
use crate::rules::{self, RuleViolation};

#[derive(Clone)]
pub struct PgFacilityStore {
    pool: PgPool,
}

impl PgFacilityStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unique_violation(e: sqlx::Error, message: impl FnOnce() -> String) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict(message()),
        _ => StoreError::Database(e),
    }
}

async fn lock_player(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> StoreResult<PlayerRow> {
    players::lock_by_id(&mut **tx, id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Player with ID {} not found", id)))
}

async fn lock_court(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> StoreResult<CourtRow> {
    courts::lock_by_id(&mut **tx, id)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("Court with ID {} not found", id)))
}

/// Drop the player's queue entry, if any, and close the gap.
async fn leave_queue(
    tx: &mut Transaction<'_, Postgres>,
    player_id: Uuid,
) -> StoreResult<Option<QueueEntryRow>> {
    let removed = queue_entries::delete_for_player(&mut **tx, player_id).await?;
    if let Some(entry) = &removed {
        queue_entries::reindex(&mut **tx, entry.queue_type).await?;
    }
    Ok(removed)
}

/// Put evicted players back at the tail of their queues, in eviction order.
async fn requeue_all(
    tx: &mut Transaction<'_, Postgres>,
    evicted: &[PlayerRow],
) -> StoreResult<()> {
    for player in evicted.iter().filter(|p| p.is_active) {
        leave_queue(tx, player.id).await?;
        queue_entries::insert_tail(&mut **tx, player.id, player.qualification).await?;
    }
    Ok(())
}

#[async_trait]
impl FacilityStore for PgFacilityStore {
    async fn ping(&self) -> StoreResult<()> {
        let _one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn create_player(&self, data: CreatePlayer) -> StoreResult<PlayerRow> {
        let mut tx = self.pool.begin().await?;

        if players::get_by_name(&mut *tx, &data.name).await?.is_some() {
            return Err(StoreError::Conflict(format!(
                "Player with name '{}' already exists",
                data.name
            )));
        }
        if let Some(email) = &data.email {
            if players::get_by_email(&mut *tx, email).await?.is_some() {
                return Err(StoreError::Conflict(
                    "Player with this email already exists".to_string(),
                ));
            }
        }

        let name = data.name.clone();
        let player = players::create(&mut *tx, data)
            .await
            .map_err(|e| unique_violation(e, || format!("Player '{}' already exists", name)))?;

        if player.is_active {
            queue_entries::insert_tail(&mut *tx, player.id, player.qualification).await?;
        }

        tx.commit().await?;
        Ok(player)
    }

    async fn get_player(&self, id: Uuid) -> StoreResult<Option<PlayerRow>> {
        Ok(players::get_by_id(&self.pool, id).await?)
    }

    async fn get_player_by_email(&self, email: &str) -> StoreResult<Option<PlayerRow>> {
        Ok(players::get_by_email(&self.pool, email).await?)
    }

    async fn list_players(&self, filter: PlayerFilter) -> StoreResult<Vec<PlayerRow>> {
        Ok(players::list(&self.pool, filter).await?)
    }

    async fn update_player(&self, id: Uuid, data: UpdatePlayer) -> StoreResult<PlayerRow> {
        let mut tx = self.pool.begin().await?;
        let current = lock_player(&mut tx, id).await?;

        if let Some(name) = &data.name {
            if let Some(other) = players::get_by_name(&mut *tx, name).await? {
                if other.id != id {
                    return Err(StoreError::Conflict(format!(
                        "Player with name '{}' already exists",
                        name
                    )));
                }
            }
        }
        if let Some(email) = &data.email {
            if let Some(other) = players::get_by_email(&mut *tx, email).await? {
                if other.id != id {
                    return Err(StoreError::Conflict(
                        "Player with this email already exists".to_string(),
                    ));
                }
            }
        }
        if let Some(team_id) = data.team_id {
            if teams::get_by_id(&mut *tx, team_id).await?.is_none() {
                return Err(StoreError::NotFound(format!(
                    "Team with ID {} not found",
                    team_id
                )));
            }
        }

        let updated = players::update(&mut *tx, id, data)
            .await
            .map_err(|e| unique_violation(e, || "Player name or email already in use".to_string()))?
            .ok_or_else(|| StoreError::NotFound(format!("Player with ID {} not found", id)))?;

        if updated.qualification != current.qualification {
            if let Some(entry) = leave_queue(&mut tx, id).await? {
                debug!(
                    "Moving player {} from {} queue to {} queue",
                    id, entry.queue_type, updated.qualification
                );
                queue_entries::insert_tail(&mut *tx, id, updated.qualification).await?;
            }
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn set_player_active(&self, id: Uuid, active: bool) -> StoreResult<PlayerRow> {
        let mut tx = self.pool.begin().await?;
        let current = lock_player(&mut tx, id).await?;

        if !active {
            leave_queue(&mut tx, id).await?;
        }

        let updated = players::set_active(&mut *tx, id, active)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Player with ID {} not found", id)))?;

        if active
            && current.court_id.is_none()
            && queue_entries::get_for_player(&mut *tx, id).await?.is_none()
        {
            queue_entries::insert_tail(&mut *tx, id, updated.qualification).await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_player(&self, id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        leave_queue(&mut tx, id).await?;
        let deleted = players::delete(&mut *tx, id).await?;
        tx.commit().await?;
        Ok(deleted)
    }

    async fn create_team(&self, number: &str) -> StoreResult<TeamRow> {
        if teams::get_by_number(&self.pool, number).await?.is_some() {
            return Err(StoreError::Conflict(format!(
                "Team '{}' already exists",
                number
            )));
        }
        teams::create(&self.pool, number)
            .await
            .map_err(|e| unique_violation(e, || format!("Team '{}' already exists", number)))
    }

    async fn list_teams(&self) -> StoreResult<Vec<TeamRow>> {
        Ok(teams::list(&self.pool).await?)
    }

    async fn create_court(&self, data: CreateCourt) -> StoreResult<CourtRow> {
        if courts::get_by_name(&self.pool, &data.name).await?.is_some() {
            return Err(StoreError::Conflict(format!(
                "Court with name '{}' already exists",
                data.name
            )));
        }
        let name = data.name.clone();
        courts::create(&self.pool, data).await.map_err(|e| {
            unique_violation(e, || format!("Court with name '{}' already exists", name))
        })
    }

    async fn get_court(&self, id: Uuid) -> StoreResult<Option<CourtRow>> {
        Ok(courts::get_by_id(&self.pool, id).await?)
    }

    async fn list_courts(&self) -> StoreResult<Vec<CourtRow>> {
        Ok(courts::list(&self.pool).await?)
    }

    async fn update_court(&self, id: Uuid, data: UpdateCourt) -> StoreResult<CourtRow> {
        let mut tx = self.pool.begin().await?;
        lock_court(&mut tx, id).await?;

        if let Some(name) = &data.name {
            if let Some(other) = courts::get_by_name(&mut *tx, name).await? {
                if other.id != id {
                    return Err(StoreError::Conflict(format!(
                        "Court with name '{}' already exists",
                        name
                    )));
                }
            }
        }

        let updated = courts::update(&mut *tx, id, data)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Court with ID {} not found", id)))?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete_court(&self, id: Uuid) -> StoreResult<Vec<PlayerRow>> {
        let mut tx = self.pool.begin().await?;
        lock_court(&mut tx, id).await?;

        let evicted = players::evict_court(&mut *tx, id).await?;
        requeue_all(&mut tx, &evicted).await?;
        courts::delete(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(evicted)
    }

    async fn change_court_type(
        &self,
        id: Uuid,
        new_type: CourtType,
    ) -> StoreResult<CourtTypeChange> {
        let mut tx = self.pool.begin().await?;
        let court = lock_court(&mut tx, id).await?;
        let old_type = court.court_type;

        if old_type == new_type {
            return Ok(CourtTypeChange {
                court,
                old_type,
                moved_players: Vec::new(),
            });
        }

        let updated = courts::set_type(&mut *tx, id, new_type)
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("Court with ID {} not found", id)))?;

        let moved_players = if new_type.is_training() {
            let evicted = players::evict_court(&mut *tx, id).await?;
            requeue_all(&mut tx, &evicted).await?;
            evicted
        } else {
            Vec::new()
        };

        tx.commit().await?;
        Ok(CourtTypeChange {
            court: updated,
            old_type,
            moved_players,
        })
    }

    async fn list_court_players(&self, court_id: Uuid) -> StoreResult<Vec<PlayerRow>> {
        Ok(players::list_by_court(&self.pool, court_id).await?)
    }

    async fn list_occupancy(&self) -> StoreResult<Vec<CourtOccupancy>> {
        let mut tx = self.pool.begin().await?;
        let court_rows = courts::list(&mut *tx).await?;
        let placed = players::list_on_courts(&mut *tx).await?;
        tx.commit().await?;

        let mut by_court: HashMap<Uuid, Vec<PlayerRow>> = HashMap::new();
        for player in placed {
            if let Some(court_id) = player.court_id {
                by_court.entry(court_id).or_default().push(player);
            }
        }

        Ok(court_rows
            .into_iter()
            .map(|court| {
                let players = by_court.remove(&court.id).unwrap_or_default();
                CourtOccupancy { court, players }
            })
            .collect())
    }

    async fn list_queue(&self, queue_type: Qualification) -> StoreResult<Vec<QueuedPlayer>> {
        Ok(queue_entries::list_with_players(&self.pool, queue_type).await?)
    }

    async fn enqueue(
        &self,
        player_id: Uuid,
        queue_type: Qualification,
    ) -> StoreResult<QueueEntryRow> {
        let mut tx = self.pool.begin().await?;
        let player = lock_player(&mut tx, player_id).await?;
        rules::check_enqueue(&player, queue_type)?;

        if player.court_id.is_some() {
            players::set_court(&mut *tx, player_id, None).await?;
        }
        leave_queue(&mut tx, player_id).await?;
        let entry = queue_entries::insert_tail(&mut *tx, player_id, queue_type).await?;

        tx.commit().await?;
        Ok(entry)
    }

    async fn dequeue(&self, player_id: Uuid) -> StoreResult<Option<QueueEntryRow>> {
        let mut tx = self.pool.begin().await?;
        let removed = leave_queue(&mut tx, player_id).await?;
        tx.commit().await?;
        Ok(removed)
    }

    async fn reorder_queue(
        &self,
        queue_type: Qualification,
        order: &[Uuid],
    ) -> StoreResult<Vec<QueueEntryRow>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("LOCK TABLE queue_entries IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;

        let current: Vec<Uuid> = queue_entries::list(&mut *tx, queue_type)
            .await?
            .into_iter()
            .map(|e| e.player_id)
            .collect();
        validate_reorder(queue_type, &current, order)?;

        for (idx, player_id) in order.iter().enumerate() {
            queue_entries::set_position(&mut *tx, *player_id, idx as i32 + 1).await?;
        }
        let reordered = queue_entries::list(&mut *tx, queue_type).await?;

        tx.commit().await?;
        Ok(reordered)
    }

    async fn place_player(&self, placement: Placement) -> StoreResult<PlayerRow> {
        let mut tx = self.pool.begin().await?;
        let court = lock_court(&mut tx, placement.court_id).await?;
        let player = lock_player(&mut tx, placement.player_id).await?;

        if !player.is_active {
            return Err(RuleViolation::Inactive {
                player: player.name,
            }
            .into());
        }

        match placement.source {
            PlacementSource::Waiting if player.court_id.is_some() => {
                return Err(RuleViolation::AlreadyAssigned {
                    player: player.name,
                }
                .into());
            }
            PlacementSource::Court(from) if player.court_id != Some(from) => {
                return Err(StoreError::Conflict(format!(
                    "Player {} is no longer on the expected court",
                    player.name
                )));
            }
            _ => {}
        }

        let occupancy = players::count_on_court(&mut *tx, court.id).await? as usize;
        if occupancy >= MAX_PLAYERS_PER_COURT {
            return Err(RuleViolation::CourtFull { court: court.name }.into());
        }

        leave_queue(&mut tx, player.id).await?;
        let placed = players::set_court(&mut *tx, player.id, Some(court.id))
            .await?
            .ok_or_else(|| {
                StoreError::NotFound(format!("Player with ID {} not found", player.id))
            })?;

        tx.commit().await?;
        Ok(placed)
    }

    async fn release_player(&self, player_id: Uuid, court_id: Uuid) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let player = lock_player(&mut tx, player_id).await?;

        if player.court_id != Some(court_id) {
            return Ok(false);
        }

        players::set_court(&mut *tx, player_id, None).await?;
        if player.is_active {
            leave_queue(&mut tx, player_id).await?;
            queue_entries::insert_tail(&mut *tx, player_id, player.qualification).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn reset_session(&self) -> StoreResult<SessionReset> {
        let mut tx = self.pool.begin().await?;
        let queue_entries_cleared = queue_entries::delete_all(&mut *tx).await?;
        let players_deactivated = players::deactivate_all(&mut *tx).await?;
        let courts_reset = courts::set_all_training(&mut *tx).await?;
        tx.commit().await?;

        Ok(SessionReset {
            players_deactivated,
            courts_reset,
            queue_entries_cleared,
        })
    }
}
