use async_graphql::{SimpleObject, ID};

use crate::engine::{AutoFillReport, FailedAssignment, PlannedAssignment};
use crate::gql::common::types::MatchType;
use crate::gql::domains::courts::types::Court;
use crate::gql::domains::players::types::Player;
use infra::models::Qualification;

#[derive(SimpleObject, Clone)]
pub struct AssignmentDetail {
    pub player: Player,
    pub court: Court,
    /// Set when the player moved over from a warmup court.
    pub from_court: Option<Court>,
    pub match_type: MatchType,
}

impl From<PlannedAssignment> for AssignmentDetail {
    fn from(a: PlannedAssignment) -> Self {
        Self {
            player: a.player.into(),
            court: a.court.into(),
            from_court: a.from_court.map(Court::from),
            match_type: a.match_type.into(),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct AssignmentError {
    pub player_id: ID,
    pub player_name: String,
    pub court_id: ID,
    pub court_name: String,
    pub message: String,
}

impl From<FailedAssignment> for AssignmentError {
    fn from(f: FailedAssignment) -> Self {
        Self {
            player_id: f.player.id.into(),
            player_name: f.player.name,
            court_id: f.court.id.into(),
            court_name: f.court.name,
            message: f.message,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct AutoFillResult {
    pub assignments_made: i32,
    pub details: Vec<AssignmentDetail>,
    pub errors: Vec<AssignmentError>,
    pub remaining_advanced: i32,
    pub remaining_intermediate: i32,
    pub dry_run: bool,
}

impl From<AutoFillReport> for AutoFillResult {
    fn from(report: AutoFillReport) -> Self {
        Self {
            assignments_made: report.assignments_made() as i32,
            remaining_advanced: report.remaining(Qualification::Advanced) as i32,
            remaining_intermediate: report.remaining(Qualification::Intermediate) as i32,
            dry_run: report.dry_run,
            details: report
                .assignments
                .into_iter()
                .map(AssignmentDetail::from)
                .collect(),
            errors: report
                .errors
                .into_iter()
                .map(AssignmentError::from)
                .collect(),
        }
    }
}
