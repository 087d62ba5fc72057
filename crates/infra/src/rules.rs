//! Capacity and eligibility rules for placing players on courts.
//!
//! Everything here is a pure function of the records involved; both store
//! implementations and the auto-fill engine call into these checks.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    CourtRole, CourtRow, CourtType, PlayerRow, Qualification, MAX_PLAYERS_PER_COURT,
};

/// Why a player landed on a court. Used for reporting only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    PerfectMatch,
    TrainingCourt,
    OverflowAssignment,
    QueueCascade,
    Warmup,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::PerfectMatch => "perfect_match",
            MatchType::TrainingCourt => "training_court",
            MatchType::OverflowAssignment => "overflow_assignment",
            MatchType::QueueCascade => "queue_cascade",
            MatchType::Warmup => "warmup",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    #[error("Court {court} is full (maximum {max} players)", max = MAX_PLAYERS_PER_COURT)]
    CourtFull { court: String },

    #[error("Player qualification ({qualification}) doesn't match court type ({court_type})")]
    QualificationMismatch {
        qualification: Qualification,
        court_type: CourtType,
    },

    #[error("Player {player} is already assigned to a court")]
    AlreadyAssigned { player: String },

    #[error("Court {court} is a training court and does not accept direct assignments")]
    TrainingCourt { court: String },

    #[error("Player {player} is not active")]
    Inactive { player: String },

    #[error("Player qualification ({qualification}) doesn't match queue type ({queue_type})")]
    QueueTypeMismatch {
        qualification: Qualification,
        queue_type: Qualification,
    },
}

/// Policy knobs for operator-driven placements.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssignmentPolicy {
    pub allow_training: bool,
}

/// Basic eligibility: room on the court, player not already placed, and a
/// matching court type. Training courts accept any qualification.
pub fn can_assign(player: &PlayerRow, court: &CourtRow, occupancy: usize) -> bool {
    if occupancy >= MAX_PLAYERS_PER_COURT || player.court_id.is_some() {
        return false;
    }

    match court.court_type.qualification() {
        None => true,
        Some(served) => served == player.qualification,
    }
}

/// Full check for a manual placement, returning the match tag on success.
pub fn check_manual_assignment(
    player: &PlayerRow,
    court: &CourtRow,
    occupancy: usize,
    policy: AssignmentPolicy,
) -> Result<MatchType, RuleViolation> {
    if occupancy >= MAX_PLAYERS_PER_COURT {
        return Err(RuleViolation::CourtFull {
            court: court.name.clone(),
        });
    }
    if player.court_id.is_some() {
        return Err(RuleViolation::AlreadyAssigned {
            player: player.name.clone(),
        });
    }
    if !player.is_active {
        return Err(RuleViolation::Inactive {
            player: player.name.clone(),
        });
    }

    match court.court_type.qualification() {
        None if policy.allow_training => Ok(MatchType::TrainingCourt),
        None => Err(RuleViolation::TrainingCourt {
            court: court.name.clone(),
        }),
        Some(served) if served == player.qualification => Ok(MatchType::PerfectMatch),
        Some(_) => Err(RuleViolation::QualificationMismatch {
            qualification: player.qualification,
            court_type: court.court_type,
        }),
    }
}

/// Training courts never receive automatic placements.
pub fn accepts_auto_fill(court: &CourtRow) -> bool {
    !court.court_type.is_training()
}

/// Eligibility for an engine placement. `player` must already be off any
/// source court. Overflow placements only move advanced players down a tier.
pub fn can_auto_assign(
    player: &PlayerRow,
    court: &CourtRow,
    occupancy: usize,
    match_type: MatchType,
) -> bool {
    if !accepts_auto_fill(court) || !player.is_active {
        return false;
    }

    match match_type {
        MatchType::OverflowAssignment => {
            occupancy < MAX_PLAYERS_PER_COURT
                && player.court_id.is_none()
                && can_overflow(player.qualification, court.court_type)
        }
        _ => can_assign(player, court, occupancy),
    }
}

/// Advanced players may spill onto intermediate courts; never the reverse.
pub fn can_overflow(qualification: Qualification, court_type: CourtType) -> bool {
    qualification == Qualification::Advanced && court_type == CourtType::Intermediate
}

/// Whether `warmup` backs `game` in a warmup/game pairing.
pub fn is_warmup_for(game: &CourtRow, warmup: &CourtRow) -> bool {
    game.role == CourtRole::Game
        && warmup.role == CourtRole::Warmup
        && game.pair_number.is_some()
        && game.pair_number == warmup.pair_number
        && game.court_type == warmup.court_type
        && !game.court_type.is_training()
}

pub fn check_enqueue(player: &PlayerRow, queue_type: Qualification) -> Result<(), RuleViolation> {
    if !player.is_active {
        return Err(RuleViolation::Inactive {
            player: player.name.clone(),
        });
    }
    if player.qualification != queue_type {
        return Err(RuleViolation::QueueTypeMismatch {
            qualification: player.qualification,
            queue_type,
        });
    }
    Ok(())
}
