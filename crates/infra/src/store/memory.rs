//! In-process store. A single write lock makes every call atomic.
//!
//! Used when no database is configured, and by tests, which can inject
//! placement failures.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CourtTypeChange, FacilityStore, Placement, PlacementSource, SessionReset, StoreError,
    StoreResult,
};
use crate::models::{
    CourtOccupancy, CourtRow, CourtType, PlayerRow, QueueEntryRow, QueuedPlayer, Qualification,
    TeamRow, MAX_PLAYERS_PER_COURT,
};
use crate::queue::WaitingQueues;
use crate::repos::{CreateCourt, CreatePlayer, PlayerFilter, UpdateCourt, UpdatePlayer};
use crate::rules::{self, RuleViolation};

#[derive(Default)]
struct FacilityState {
    players: Vec<PlayerRow>,
    courts: Vec<CourtRow>,
    teams: Vec<TeamRow>,
    queues: WaitingQueues,
    last_tick: Option<DateTime<Utc>>,
}

impl FacilityState {
    /// Strictly increasing timestamps so placement order is never ambiguous.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.last_tick {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_tick = Some(next);
        next
    }

    fn player(&self, id: Uuid) -> StoreResult<&PlayerRow> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Player with ID {} not found", id)))
    }

    fn player_mut(&mut self, id: Uuid) -> StoreResult<&mut PlayerRow> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Player with ID {} not found", id)))
    }

    fn court(&self, id: Uuid) -> StoreResult<&CourtRow> {
        self.courts
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Court with ID {} not found", id)))
    }

    fn court_mut(&mut self, id: Uuid) -> StoreResult<&mut CourtRow> {
        self.courts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Court with ID {} not found", id)))
    }

    fn occupants(&self, court_id: Uuid) -> Vec<PlayerRow> {
        let mut on_court: Vec<PlayerRow> = self
            .players
            .iter()
            .filter(|p| p.court_id == Some(court_id))
            .cloned()
            .collect();
        on_court.sort_by(|a, b| a.court_assigned_at.cmp(&b.court_assigned_at));
        on_court
    }

    fn name_taken(&self, name: &str, except: Option<Uuid>) -> bool {
        self.players
            .iter()
            .any(|p| p.name == name && Some(p.id) != except)
    }

    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        self.players.iter().any(|p| {
            p.email
                .as_deref()
                .is_some_and(|e| e.eq_ignore_ascii_case(email))
                && Some(p.id) != except
        })
    }

    fn set_court(&mut self, player_id: Uuid, court_id: Option<Uuid>) -> StoreResult<PlayerRow> {
        let now = self.tick();
        let player = self.player_mut(player_id)?;
        player.court_id = court_id;
        player.court_assigned_at = court_id.map(|_| now);
        player.updated_at = now;
        Ok(player.clone())
    }

    /// Clear every occupant of a court and queue the active ones again.
    fn evict(&mut self, court_id: Uuid) -> StoreResult<Vec<PlayerRow>> {
        let mut evicted = Vec::new();
        for occupant in self.occupants(court_id) {
            let cleared = self.set_court(occupant.id, None)?;
            if cleared.is_active {
                let now = self.tick();
                self.queues.enqueue(cleared.id, cleared.qualification, now);
            }
            evicted.push(cleared);
        }
        Ok(evicted)
    }
}

#[derive(Default)]
pub struct MemoryFacilityStore {
    state: RwLock<FacilityState>,
    failing_players: RwLock<HashSet<Uuid>>,
    unavailable: RwLock<bool>,
}

impl MemoryFacilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every placement of this player fail as a storage error.
    pub async fn fail_placements_for(&self, player_id: Uuid) {
        self.failing_players.write().await.insert(player_id);
    }

    pub async fn clear_failures(&self) {
        self.failing_players.write().await.clear();
    }

    /// Make every call fail as if the backing storage were down.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    async fn check_available(&self) -> StoreResult<()> {
        if *self.unavailable.read().await {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }

    /// True when no player is both queued and on a court, and every queue is dense.
    pub async fn invariants_hold(&self) -> bool {
        let state = self.state.read().await;
        let courts_ok = state
            .courts
            .iter()
            .all(|c| state.occupants(c.id).len() <= MAX_PLAYERS_PER_COURT);
        let exclusive = state.queues.entries().iter().all(|e| {
            state
                .players
                .iter()
                .find(|p| p.id == e.player_id)
                .is_some_and(|p| p.court_id.is_none())
        });
        let dense = Qualification::ALL
            .iter()
            .all(|q| state.queues.is_dense(*q));
        courts_ok && exclusive && dense
    }
}

#[async_trait]
impl FacilityStore for MemoryFacilityStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check_available().await
    }

    async fn create_player(&self, data: CreatePlayer) -> StoreResult<PlayerRow> {
        self.check_available().await?;
        let mut state = self.state.write().await;

        if state.name_taken(&data.name, None) {
            return Err(StoreError::Conflict(format!(
                "Player with name '{}' already exists",
                data.name
            )));
        }
        if let Some(email) = &data.email {
            if state.email_taken(email, None) {
                return Err(StoreError::Conflict(
                    "Player with this email already exists".to_string(),
                ));
            }
        }

        let now = state.tick();
        let player = PlayerRow {
            id: Uuid::new_v4(),
            name: data.name,
            email: data.email,
            qualification: data.qualification,
            is_active: data.is_active,
            court_id: None,
            court_assigned_at: None,
            team_id: None,
            created_at: now,
            updated_at: now,
        };
        state.players.push(player.clone());

        if player.is_active {
            state.queues.enqueue(player.id, player.qualification, now);
        }

        Ok(player)
    }

    async fn get_player(&self, id: Uuid) -> StoreResult<Option<PlayerRow>> {
        self.check_available().await?;
        let state = self.state.read().await;
        Ok(state.players.iter().find(|p| p.id == id).cloned())
    }

    async fn get_player_by_email(&self, email: &str) -> StoreResult<Option<PlayerRow>> {
        self.check_available().await?;
        let state = self.state.read().await;
        Ok(state
            .players
            .iter()
            .find(|p| {
                p.email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .cloned())
    }

    async fn list_players(&self, filter: PlayerFilter) -> StoreResult<Vec<PlayerRow>> {
        self.check_available().await?;
        let state = self.state.read().await;
        let search = filter.search.map(|s| s.to_lowercase());

        let mut rows: Vec<PlayerRow> = state
            .players
            .iter()
            .filter(|p| filter.is_active.is_none_or(|active| p.is_active == active))
            .filter(|p| filter.qualification.is_none_or(|q| p.qualification == q))
            .filter(|p| {
                search.as_deref().is_none_or(|s| {
                    p.name.to_lowercase().contains(s)
                        || p.email
                            .as_deref()
                            .is_some_and(|e| e.to_lowercase().contains(s))
                })
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn update_player(&self, id: Uuid, data: UpdatePlayer) -> StoreResult<PlayerRow> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        let previous = state.player(id)?.qualification;

        if let Some(name) = &data.name {
            if state.name_taken(name, Some(id)) {
                return Err(StoreError::Conflict(format!(
                    "Player with name '{}' already exists",
                    name
                )));
            }
        }
        if let Some(email) = &data.email {
            if state.email_taken(email, Some(id)) {
                return Err(StoreError::Conflict(
                    "Player with this email already exists".to_string(),
                ));
            }
        }
        if let Some(team_id) = data.team_id {
            if !state.teams.iter().any(|t| t.id == team_id) {
                return Err(StoreError::NotFound(format!(
                    "Team with ID {} not found",
                    team_id
                )));
            }
        }

        let now = state.tick();
        let player = state.player_mut(id)?;
        if let Some(name) = data.name {
            player.name = name;
        }
        if let Some(email) = data.email {
            player.email = Some(email);
        }
        if let Some(qualification) = data.qualification {
            player.qualification = qualification;
        }
        if let Some(team_id) = data.team_id {
            player.team_id = Some(team_id);
        }
        player.updated_at = now;
        let updated = player.clone();

        if updated.qualification != previous && state.queues.entry_for(id).is_some() {
            state.queues.enqueue(id, updated.qualification, now);
        }

        Ok(updated)
    }

    async fn set_player_active(&self, id: Uuid, active: bool) -> StoreResult<PlayerRow> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        let now = state.tick();

        let player = state.player_mut(id)?;
        player.is_active = active;
        if !active {
            player.court_id = None;
            player.court_assigned_at = None;
        }
        player.updated_at = now;
        let updated = player.clone();

        if !active {
            state.queues.remove(id);
        } else if updated.court_id.is_none() && state.queues.entry_for(id).is_none() {
            state.queues.enqueue(id, updated.qualification, now);
        }

        Ok(updated)
    }

    async fn delete_player(&self, id: Uuid) -> StoreResult<bool> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        state.queues.remove(id);
        let before = state.players.len();
        state.players.retain(|p| p.id != id);
        Ok(state.players.len() < before)
    }

    async fn create_team(&self, number: &str) -> StoreResult<TeamRow> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        if state.teams.iter().any(|t| t.number == number) {
            return Err(StoreError::Conflict(format!(
                "Team '{}' already exists",
                number
            )));
        }
        let team = TeamRow {
            id: Uuid::new_v4(),
            number: number.to_string(),
            created_at: state.tick(),
        };
        state.teams.push(team.clone());
        Ok(team)
    }

    async fn list_teams(&self) -> StoreResult<Vec<TeamRow>> {
        self.check_available().await?;
        let state = self.state.read().await;
        let mut teams = state.teams.clone();
        teams.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(teams)
    }

    async fn create_court(&self, data: CreateCourt) -> StoreResult<CourtRow> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        if state.courts.iter().any(|c| c.name == data.name) {
            return Err(StoreError::Conflict(format!(
                "Court with name '{}' already exists",
                data.name
            )));
        }

        let now = state.tick();
        let court = CourtRow {
            id: Uuid::new_v4(),
            name: data.name,
            court_type: data.court_type,
            role: data.role,
            pair_number: data.pair_number,
            created_at: now,
            updated_at: now,
        };
        state.courts.push(court.clone());
        state.courts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(court)
    }

    async fn get_court(&self, id: Uuid) -> StoreResult<Option<CourtRow>> {
        self.check_available().await?;
        let state = self.state.read().await;
        Ok(state.courts.iter().find(|c| c.id == id).cloned())
    }

    async fn list_courts(&self) -> StoreResult<Vec<CourtRow>> {
        self.check_available().await?;
        Ok(self.state.read().await.courts.clone())
    }

    async fn update_court(&self, id: Uuid, data: UpdateCourt) -> StoreResult<CourtRow> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        state.court(id)?;

        if let Some(name) = &data.name {
            if state.courts.iter().any(|c| &c.name == name && c.id != id) {
                return Err(StoreError::Conflict(format!(
                    "Court with name '{}' already exists",
                    name
                )));
            }
        }

        let now = state.tick();
        let court = state.court_mut(id)?;
        if let Some(name) = data.name {
            court.name = name;
        }
        if let Some(role) = data.role {
            court.role = role;
        }
        if let Some(pair_number) = data.pair_number {
            court.pair_number = Some(pair_number);
        }
        court.updated_at = now;
        let updated = court.clone();

        state.courts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(updated)
    }

    async fn delete_court(&self, id: Uuid) -> StoreResult<Vec<PlayerRow>> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        state.court(id)?;

        let evicted = state.evict(id)?;
        state.courts.retain(|c| c.id != id);
        Ok(evicted)
    }

    async fn change_court_type(
        &self,
        id: Uuid,
        new_type: CourtType,
    ) -> StoreResult<CourtTypeChange> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        let old_type = state.court(id)?.court_type;

        if old_type == new_type {
            return Ok(CourtTypeChange {
                court: state.court(id)?.clone(),
                old_type,
                moved_players: Vec::new(),
            });
        }

        let now = state.tick();
        let court = state.court_mut(id)?;
        court.court_type = new_type;
        court.updated_at = now;
        let updated = court.clone();

        let moved_players = if new_type.is_training() {
            state.evict(id)?
        } else {
            Vec::new()
        };

        Ok(CourtTypeChange {
            court: updated,
            old_type,
            moved_players,
        })
    }

    async fn list_court_players(&self, court_id: Uuid) -> StoreResult<Vec<PlayerRow>> {
        self.check_available().await?;
        Ok(self.state.read().await.occupants(court_id))
    }

    async fn list_occupancy(&self) -> StoreResult<Vec<CourtOccupancy>> {
        self.check_available().await?;
        let state = self.state.read().await;
        Ok(state
            .courts
            .iter()
            .map(|court| CourtOccupancy {
                court: court.clone(),
                players: state.occupants(court.id),
            })
            .collect())
    }

    async fn list_queue(&self, queue_type: Qualification) -> StoreResult<Vec<QueuedPlayer>> {
        self.check_available().await?;
        let state = self.state.read().await;
        state
            .queues
            .ordered(queue_type)
            .into_iter()
            .map(|entry| {
                Ok(QueuedPlayer {
                    entry: entry.clone(),
                    player: state.player(entry.player_id)?.clone(),
                })
            })
            .collect()
    }

    async fn enqueue(
        &self,
        player_id: Uuid,
        queue_type: Qualification,
    ) -> StoreResult<QueueEntryRow> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        let player = state.player(player_id)?.clone();
        rules::check_enqueue(&player, queue_type)?;

        if player.court_id.is_some() {
            state.set_court(player_id, None)?;
        }
        let now = state.tick();
        Ok(state.queues.enqueue(player_id, queue_type, now))
    }

    async fn dequeue(&self, player_id: Uuid) -> StoreResult<Option<QueueEntryRow>> {
        self.check_available().await?;
        Ok(self.state.write().await.queues.remove(player_id))
    }

    async fn reorder_queue(
        &self,
        queue_type: Qualification,
        order: &[Uuid],
    ) -> StoreResult<Vec<QueueEntryRow>> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        Ok(state.queues.reorder(queue_type, order)?)
    }

    async fn place_player(&self, placement: Placement) -> StoreResult<PlayerRow> {
        self.check_available().await?;
        if self
            .failing_players
            .read()
            .await
            .contains(&placement.player_id)
        {
            return Err(StoreError::Unavailable(format!(
                "write failed for player {}",
                placement.player_id
            )));
        }

        let mut state = self.state.write().await;
        let court = state.court(placement.court_id)?.clone();
        let player = state.player(placement.player_id)?.clone();

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

        if state.occupants(court.id).len() >= MAX_PLAYERS_PER_COURT {
            return Err(RuleViolation::CourtFull { court: court.name }.into());
        }

        state.queues.remove(player.id);
        state.set_court(player.id, Some(court.id))
    }

    async fn release_player(&self, player_id: Uuid, court_id: Uuid) -> StoreResult<bool> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        let player = state.player(player_id)?.clone();

        if player.court_id != Some(court_id) {
            return Ok(false);
        }

        state.set_court(player_id, None)?;
        if player.is_active {
            let now = state.tick();
            state.queues.enqueue(player_id, player.qualification, now);
        }
        Ok(true)
    }

    async fn reset_session(&self) -> StoreResult<SessionReset> {
        self.check_available().await?;
        let mut state = self.state.write().await;
        let now = state.tick();

        let queue_entries_cleared = state.queues.entries().len() as u64;
        state.queues.clear();

        let mut players_deactivated = 0;
        for player in state
            .players
            .iter_mut()
            .filter(|p| p.is_active || p.court_id.is_some())
        {
            player.is_active = false;
            player.court_id = None;
            player.court_assigned_at = None;
            player.updated_at = now;
            players_deactivated += 1;
        }

        let mut courts_reset = 0;
        for court in state
            .courts
            .iter_mut()
            .filter(|c| !c.court_type.is_training())
        {
            court.court_type = CourtType::Training;
            court.updated_at = now;
            courts_reset += 1;
        }

        Ok(SessionReset {
            players_deactivated,
            courts_reset,
            queue_entries_cleared,
        })
    }
}
