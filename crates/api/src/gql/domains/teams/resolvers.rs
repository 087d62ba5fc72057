use async_graphql::{Context, Object, Result};

use super::types::Team;
use crate::gql::common::helpers::required_text;
use crate::gql::error::GqlResultExt;
use crate::state::AppState;

#[derive(Default)]
pub struct TeamQuery;

#[Object]
impl TeamQuery {
    async fn teams(&self, ctx: &Context<'_>) -> Result<Vec<Team>> {
        let state = ctx.data::<AppState>()?;
        let rows = state.store.list_teams().await.gql()?;
        Ok(rows.into_iter().map(Team::from).collect())
    }
}

#[derive(Default)]
pub struct TeamMutation;

#[Object]
impl TeamMutation {
    async fn create_team(&self, ctx: &Context<'_>, number: String) -> Result<Team> {
        let state = ctx.data::<AppState>()?;
        let number = required_text("number", &number).gql()?;

        let _guard = state.lock().await;
        state
            .store
            .create_team(&number)
            .await
            .map(Team::from)
            .gql()
    }
}
