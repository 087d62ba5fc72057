use async_graphql::Enum;
use infra::models;
use infra::rules;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum Qualification {
    Advanced,
    Intermediate,
}

impl From<models::Qualification> for Qualification {
    fn from(q: models::Qualification) -> Self {
        match q {
            models::Qualification::Advanced => Qualification::Advanced,
            models::Qualification::Intermediate => Qualification::Intermediate,
        }
    }
}

impl From<Qualification> for models::Qualification {
    fn from(q: Qualification) -> Self {
        match q {
            Qualification::Advanced => models::Qualification::Advanced,
            Qualification::Intermediate => models::Qualification::Intermediate,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum CourtType {
    Advanced,
    Intermediate,
    Training,
}

impl From<models::CourtType> for CourtType {
    fn from(t: models::CourtType) -> Self {
        match t {
            models::CourtType::Advanced => CourtType::Advanced,
            models::CourtType::Intermediate => CourtType::Intermediate,
            models::CourtType::Training => CourtType::Training,
        }
    }
}

impl From<CourtType> for models::CourtType {
    fn from(t: CourtType) -> Self {
        match t {
            CourtType::Advanced => models::CourtType::Advanced,
            CourtType::Intermediate => models::CourtType::Intermediate,
            CourtType::Training => models::CourtType::Training,
        }
    }
}

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum CourtRole {
    Game,
    Warmup,
    Standard,
}

impl From<models::CourtRole> for CourtRole {
    fn from(r: models::CourtRole) -> Self {
        match r {
            models::CourtRole::Game => CourtRole::Game,
            models::CourtRole::Warmup => CourtRole::Warmup,
            models::CourtRole::Standard => CourtRole::Standard,
        }
    }
}

impl From<CourtRole> for models::CourtRole {
    fn from(r: CourtRole) -> Self {
        match r {
            CourtRole::Game => models::CourtRole::Game,
            CourtRole::Warmup => models::CourtRole::Warmup,
            CourtRole::Standard => models::CourtRole::Standard,
        }
    }
}

/// Reported with every placement; values match the audit tags.
#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
#[graphql(rename_items = "snake_case")]
pub enum MatchType {
    PerfectMatch,
    TrainingCourt,
    OverflowAssignment,
    QueueCascade,
    Warmup,
}

impl From<rules::MatchType> for MatchType {
    fn from(m: rules::MatchType) -> Self {
        match m {
            rules::MatchType::PerfectMatch => MatchType::PerfectMatch,
            rules::MatchType::TrainingCourt => MatchType::TrainingCourt,
            rules::MatchType::OverflowAssignment => MatchType::OverflowAssignment,
            rules::MatchType::QueueCascade => MatchType::QueueCascade,
            rules::MatchType::Warmup => MatchType::Warmup,
        }
    }
}
