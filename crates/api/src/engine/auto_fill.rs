//! Batch placement of queued players onto courts.
//!
//! A pass works on a snapshot of court occupancy and both waiting queues.
//! Courts are visited game first, then warmup, then the rest; inside each
//! group the fullest court goes first. Game courts with a paired warmup
//! court pull matching players off the warmup court before touching the
//! queue; whatever the queue has left after the game court is served goes
//! into the seats vacated on the warmup court. Once every court has been
//! served, advanced players may spill onto intermediate courts if the
//! intermediate queue ran dry.
//!
//! Every placement is written on its own. A failed write is recorded and
//! the pass moves on; the player stays where they were.

use std::cmp::Reverse;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use infra::models::{CourtOccupancy, CourtRole, CourtRow, PlayerRow, Qualification};
use infra::rules::{self, MatchType};
use infra::store::{FacilityStore, Placement, PlacementSource, StoreResult};
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PlannedAssignment {
    pub player: PlayerRow,
    pub court: CourtRow,
    pub from_court: Option<CourtRow>,
    pub match_type: MatchType,
}

#[derive(Debug, Clone)]
pub struct FailedAssignment {
    pub player: PlayerRow,
    pub court: CourtRow,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct AutoFillReport {
    pub assignments: Vec<PlannedAssignment>,
    pub errors: Vec<FailedAssignment>,
    pub remaining_advanced: usize,
    pub remaining_intermediate: usize,
    pub dry_run: bool,
}

impl AutoFillReport {
    pub fn assignments_made(&self) -> usize {
        self.assignments.len()
    }

    pub fn remaining(&self, qualification: Qualification) -> usize {
        match qualification {
            Qualification::Advanced => self.remaining_advanced,
            Qualification::Intermediate => self.remaining_intermediate,
        }
    }
}

pub struct AutoFillEngine {
    store: Arc<dyn FacilityStore>,
}

impl AutoFillEngine {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    /// Run a pass and write every placement.
    pub async fn run(&self) -> StoreResult<AutoFillReport> {
        self.execute(false).await
    }

    /// Compute what a pass would do without writing anything.
    pub async fn preview(&self) -> StoreResult<AutoFillReport> {
        self.execute(true).await
    }

    async fn execute(&self, dry_run: bool) -> StoreResult<AutoFillReport> {
        let courts = self.store.list_occupancy().await?;

        let mut queues = HashMap::new();
        for qualification in Qualification::ALL {
            let line: VecDeque<PlayerRow> = self
                .store
                .list_queue(qualification)
                .await?
                .into_iter()
                .map(|queued| queued.player)
                .filter(|p| p.is_active && p.court_id.is_none())
                .collect();
            queues.insert(qualification, line);
        }

        let mut pass = Pass {
            store: self.store.as_ref(),
            dry_run,
            courts,
            queues,
            skipped: HashSet::new(),
            report: AutoFillReport {
                dry_run,
                ..Default::default()
            },
        };
        pass.fill().await;

        let mut report = pass.report;
        report.remaining_advanced = pass.queues[&Qualification::Advanced].len();
        report.remaining_intermediate = pass.queues[&Qualification::Intermediate].len();

        info!(
            dry_run,
            assignments = report.assignments_made(),
            errors = report.errors.len(),
            remaining_advanced = report.remaining_advanced,
            remaining_intermediate = report.remaining_intermediate,
            "Auto-fill pass finished"
        );

        Ok(report)
    }
}

/// Mutable working state of one engine pass.
struct Pass<'a> {
    store: &'a dyn FacilityStore,
    dry_run: bool,
    courts: Vec<CourtOccupancy>,
    queues: HashMap<Qualification, VecDeque<PlayerRow>>,
    /// Players whose write failed; left alone for the rest of the pass.
    skipped: HashSet<Uuid>,
    report: AutoFillReport,
}

impl Pass<'_> {
    async fn fill(&mut self) {
        let order = self.processing_order();

        for &idx in &order {
            let court = &self.courts[idx].court;
            let Some(qualification) = court.court_type.qualification() else {
                continue;
            };

            if court.role == CourtRole::Game {
                if let Some(warmup) = self.warmup_for(idx) {
                    self.cascade(idx, warmup, qualification).await;
                }
            }

            self.fill_from_queue(idx, qualification, MatchType::PerfectMatch, usize::MAX)
                .await;
        }

        if self.queue_is_empty(Qualification::Intermediate)
            && !self.queue_is_empty(Qualification::Advanced)
        {
            for &idx in &order {
                if rules::can_overflow(Qualification::Advanced, self.courts[idx].court.court_type) {
                    self.fill_from_queue(
                        idx,
                        Qualification::Advanced,
                        MatchType::OverflowAssignment,
                        usize::MAX,
                    )
                    .await;
                }
            }
        }
    }

    /// Playable courts by role precedence, fullest first within a role.
    fn processing_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.courts.len())
            .filter(|&i| rules::accepts_auto_fill(&self.courts[i].court))
            .collect();
        order.sort_by_key(|&i| {
            (
                self.courts[i].court.role.precedence(),
                Reverse(self.courts[i].count()),
            )
        });
        order
    }

    fn warmup_for(&self, game_idx: usize) -> Option<usize> {
        let game = &self.courts[game_idx].court;
        self.courts
            .iter()
            .position(|c| rules::is_warmup_for(game, &c.court))
    }

    fn queue_is_empty(&self, qualification: Qualification) -> bool {
        self.queues
            .get(&qualification)
            .is_none_or(|line| line.is_empty())
    }

    /// Move matching players from the warmup court up to the game court, top
    /// the game court up from the queue, then refill the slots vacated on the
    /// warmup court. Each player moves at most once per pass.
    async fn cascade(&mut self, game_idx: usize, warmup_idx: usize, qualification: Qualification) {
        let free = self.courts[game_idx].free_slots();
        if free == 0 {
            return;
        }

        let movers: Vec<PlayerRow> = self.courts[warmup_idx]
            .players
            .iter()
            .filter(|p| p.qualification == qualification && !self.skipped.contains(&p.id))
            .take(free)
            .cloned()
            .collect();
        if movers.is_empty() {
            return;
        }

        let from = self.courts[warmup_idx].court.clone();
        let mut moved = 0;
        for player in movers {
            let source = PlacementSource::Court(from.id);
            if self
                .place(&player, game_idx, source, Some(&from), MatchType::Warmup)
                .await
            {
                self.courts[warmup_idx].players.retain(|p| p.id != player.id);
                moved += 1;
            }
        }

        self.fill_from_queue(game_idx, qualification, MatchType::PerfectMatch, usize::MAX)
            .await;

        if moved > 0 {
            debug!(court = %from.name, moved, "Refilling warmup court");
            self.fill_from_queue(warmup_idx, qualification, MatchType::QueueCascade, moved)
                .await;
        }
    }

    /// Take up to `limit` players from the head of `queue` onto the court,
    /// bounded by its free slots.
    async fn fill_from_queue(
        &mut self,
        court_idx: usize,
        queue: Qualification,
        match_type: MatchType,
        limit: usize,
    ) {
        let mut placed = 0;

        while placed < limit && !self.courts[court_idx].is_full() {
            let Some(pos) = self.queues.get(&queue).and_then(|line| {
                line.iter().position(|p| !self.skipped.contains(&p.id))
            }) else {
                break;
            };
            let Some(player) = self.queues.get(&queue).and_then(|line| line.get(pos)).cloned()
            else {
                break;
            };

            if self
                .place(&player, court_idx, PlacementSource::Waiting, None, match_type)
                .await
            {
                if let Some(line) = self.queues.get_mut(&queue) {
                    line.remove(pos);
                }
                placed += 1;
            }
        }
    }

    /// Check eligibility, write one placement and mirror it in the snapshot.
    /// Returns false when the placement was refused or the write failed; the
    /// failure is recorded and the player skipped.
    async fn place(
        &mut self,
        player: &PlayerRow,
        court_idx: usize,
        source: PlacementSource,
        from_court: Option<&CourtRow>,
        match_type: MatchType,
    ) -> bool {
        let court = self.courts[court_idx].court.clone();

        let mut candidate = player.clone();
        if let PlacementSource::Court(_) = source {
            candidate.court_id = None;
        }
        let occupancy = self.courts[court_idx].count();
        if !rules::can_auto_assign(&candidate, &court, occupancy, match_type) {
            debug!(player = %player.name, court = %court.name, "Player not eligible for court");
            self.skipped.insert(player.id);
            self.report.errors.push(FailedAssignment {
                player: player.clone(),
                court,
                message: "Player is not eligible for this court".to_string(),
            });
            return false;
        }

        let placed = if self.dry_run {
            candidate.court_id = Some(court.id);
            candidate
        } else {
            let placement = Placement {
                player_id: player.id,
                court_id: court.id,
                source,
            };
            match self.store.place_player(placement).await {
                Ok(row) => row,
                Err(e) => {
                    warn!(
                        player = %player.name,
                        court = %court.name,
                        error = %e,
                        "Auto-fill placement failed"
                    );
                    self.skipped.insert(player.id);
                    self.report.errors.push(FailedAssignment {
                        player: player.clone(),
                        court,
                        message: e.to_string(),
                    });
                    return false;
                }
            }
        };

        if !self.dry_run {
            info!(
                player = %placed.name,
                court = %court.name,
                match_type = match_type.as_str(),
                "Player placed"
            );
        }

        self.courts[court_idx].players.push(placed.clone());
        self.report.assignments.push(PlannedAssignment {
            player: placed,
            court,
            from_court: from_court.cloned(),
            match_type,
        });
        true
    }
}
