use async_graphql::{Context, Object, Result};
use tracing::info;

use super::types::SessionResetResult;
use crate::gql::error::GqlResultExt;
use crate::state::AppState;

#[derive(Default)]
pub struct SessionMutation;

#[Object]
impl SessionMutation {
    /// Deactivate everyone, empty courts and queues, turn every court to training.
    async fn start_new_session(&self, ctx: &Context<'_>) -> Result<SessionResetResult> {
        let state = ctx.data::<AppState>()?;

        let _guard = state.lock().await;
        let reset = state.store.reset_session().await.gql()?;

        info!(
            players = reset.players_deactivated,
            courts = reset.courts_reset,
            queue_entries = reset.queue_entries_cleared,
            "New session started"
        );
        Ok(reset.into())
    }
}
