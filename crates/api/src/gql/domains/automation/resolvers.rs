use async_graphql::{Context, Object, Result};

use super::service;
use super::types::AutoFillResult;
use crate::gql::error::GqlResultExt;
use crate::state::AppState;

#[derive(Default)]
pub struct AutomationQuery;

#[Object]
impl AutomationQuery {
    /// What `autoFillCourts` would do right now. Changes nothing.
    async fn auto_fill_preview(&self, ctx: &Context<'_>) -> Result<AutoFillResult> {
        let state = ctx.data::<AppState>()?;
        service::auto_fill_preview(state)
            .await
            .map(AutoFillResult::from)
            .gql()
    }
}

#[derive(Default)]
pub struct AutomationMutation;

#[Object]
impl AutomationMutation {
    async fn auto_fill_courts(&self, ctx: &Context<'_>) -> Result<AutoFillResult> {
        let state = ctx.data::<AppState>()?;
        service::auto_fill(state)
            .await
            .map(AutoFillResult::from)
            .gql()
    }
}
