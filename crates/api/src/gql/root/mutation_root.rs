use async_graphql::MergedObject;

use crate::gql::domains::automation::AutomationMutation;
use crate::gql::domains::courts::CourtMutation;
use crate::gql::domains::players::PlayerMutation;
use crate::gql::domains::queue::QueueMutation;
use crate::gql::domains::session::SessionMutation;
use crate::gql::domains::teams::TeamMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    AutomationMutation,
    CourtMutation,
    PlayerMutation,
    QueueMutation,
    SessionMutation,
    TeamMutation,
);
