use async_graphql::SimpleObject;

#[derive(SimpleObject, Clone)]
pub struct SessionResetResult {
    pub players_deactivated: i32,
    pub courts_reset: i32,
    pub queue_entries_cleared: i32,
}

impl From<infra::store::SessionReset> for SessionResetResult {
    fn from(reset: infra::store::SessionReset) -> Self {
        Self {
            players_deactivated: reset.players_deactivated as i32,
            courts_reset: reset.courts_reset as i32,
            queue_entries_cleared: reset.queue_entries_cleared as i32,
        }
    }
}
