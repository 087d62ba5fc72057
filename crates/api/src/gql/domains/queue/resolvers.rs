use async_graphql::{Context, Object, Result};
use infra::models::Qualification as InfraQualification;
use uuid::Uuid;

use super::service;
use super::types::{QueueEntry, QueueStatus, QueuedPlayer};
use crate::gql::common::types::Qualification;
use crate::gql::error::GqlResultExt;
use crate::state::AppState;

#[derive(Default)]
pub struct QueueQuery;

#[Object]
impl QueueQuery {
    async fn queue_status(&self, ctx: &Context<'_>) -> Result<QueueStatus> {
        let state = ctx.data::<AppState>()?;

        let advanced: Vec<QueuedPlayer> = state
            .store
            .list_queue(InfraQualification::Advanced)
            .await
            .gql()?
            .into_iter()
            .map(QueuedPlayer::from)
            .collect();
        let intermediate: Vec<QueuedPlayer> = state
            .store
            .list_queue(InfraQualification::Intermediate)
            .await
            .gql()?
            .into_iter()
            .map(QueuedPlayer::from)
            .collect();

        Ok(QueueStatus {
            advanced_count: advanced.len() as i32,
            intermediate_count: intermediate.len() as i32,
            advanced,
            intermediate,
        })
    }

    async fn queue(
        &self,
        ctx: &Context<'_>,
        queue_type: Qualification,
    ) -> Result<Vec<QueuedPlayer>> {
        let state = ctx.data::<AppState>()?;
        let rows = state.store.list_queue(queue_type.into()).await.gql()?;
        Ok(rows.into_iter().map(QueuedPlayer::from).collect())
    }
}

#[derive(Default)]
pub struct QueueMutation;

#[Object]
impl QueueMutation {
    async fn enqueue(
        &self,
        ctx: &Context<'_>,
        player_id: Uuid,
        queue_type: Qualification,
    ) -> Result<QueueEntry> {
        let state = ctx.data::<AppState>()?;
        service::enqueue(state, player_id, queue_type.into())
            .await
            .map(QueueEntry::from)
            .gql()
    }

    /// Returns false when the player was not queued.
    async fn dequeue(&self, ctx: &Context<'_>, player_id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        service::dequeue(state, player_id).await.gql()
    }

    async fn reorder_queue(
        &self,
        ctx: &Context<'_>,
        queue_type: Qualification,
        player_ids: Vec<Uuid>,
    ) -> Result<Vec<QueueEntry>> {
        let state = ctx.data::<AppState>()?;
        let entries = service::reorder_queue(state, queue_type.into(), &player_ids)
            .await
            .gql()?;
        Ok(entries.into_iter().map(QueueEntry::from).collect())
    }
}
