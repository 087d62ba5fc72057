use async_graphql::MergedObject;

use crate::gql::domains::automation::AutomationQuery;
use crate::gql::domains::courts::CourtQuery;
use crate::gql::domains::players::PlayerQuery;
use crate::gql::domains::queue::QueueQuery;
use crate::gql::domains::teams::TeamQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(AutomationQuery, CourtQuery, PlayerQuery, QueueQuery, TeamQuery);
