use async_graphql::{Context, Object, Result};
use infra::models::CourtRole as InfraCourtRole;
use infra::repos::{CreateCourt, UpdateCourt};
use uuid::Uuid;

use super::service;
use super::types::{
    Court, CourtAssignment, CourtStatus, CourtTypeChangeResult, CreateCourtInput,
    UpdateCourtInput,
};
use crate::gql::common::types::CourtType;
use crate::gql::domains::players::types::Player;
use crate::gql::error::GqlResultExt;
use crate::state::AppState;

#[derive(Default)]
pub struct CourtQuery;

#[Object]
impl CourtQuery {
    async fn courts(&self, ctx: &Context<'_>) -> Result<Vec<Court>> {
        let state = ctx.data::<AppState>()?;
        let rows = state.store.list_courts().await.gql()?;
        Ok(rows.into_iter().map(Court::from).collect())
    }

    async fn court(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Court>> {
        let state = ctx.data::<AppState>()?;
        Ok(state.store.get_court(id).await.gql()?.map(Court::from))
    }

    /// Players currently on a court, first placed first.
    async fn court_players(&self, ctx: &Context<'_>, court_id: Uuid) -> Result<Vec<Player>> {
        let state = ctx.data::<AppState>()?;
        let rows = state.store.list_court_players(court_id).await.gql()?;
        Ok(rows.into_iter().map(Player::from).collect())
    }

    /// Snapshot of every court with its occupants.
    async fn court_status(&self, ctx: &Context<'_>) -> Result<Vec<CourtStatus>> {
        let state = ctx.data::<AppState>()?;
        let occupancy = state.store.list_occupancy().await.gql()?;
        Ok(occupancy.into_iter().map(CourtStatus::from).collect())
    }
}

#[derive(Default)]
pub struct CourtMutation;

#[Object]
impl CourtMutation {
    async fn create_court(&self, ctx: &Context<'_>, input: CreateCourtInput) -> Result<Court> {
        let state = ctx.data::<AppState>()?;

        let data = CreateCourt {
            name: input.name,
            court_type: input.court_type.into(),
            role: input.role.map(Into::into).unwrap_or(InfraCourtRole::Standard),
            pair_number: input.pair_number,
        };

        service::create_court(state, data)
            .await
            .map(Court::from)
            .gql()
    }

    async fn update_court(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdateCourtInput,
    ) -> Result<Court> {
        let state = ctx.data::<AppState>()?;

        let data = UpdateCourt {
            name: input.name,
            role: input.role.map(Into::into),
            pair_number: input.pair_number,
        };

        service::update_court(state, id, data)
            .await
            .map(Court::from)
            .gql()
    }

    /// Delete a court; returns the players sent back to their queues.
    async fn delete_court(&self, ctx: &Context<'_>, id: Uuid) -> Result<Vec<Player>> {
        let state = ctx.data::<AppState>()?;
        let moved = service::delete_court(state, id).await.gql()?;
        Ok(moved.into_iter().map(Player::from).collect())
    }

    async fn change_court_type(
        &self,
        ctx: &Context<'_>,
        court_id: Uuid,
        new_type: CourtType,
    ) -> Result<CourtTypeChangeResult> {
        let state = ctx.data::<AppState>()?;
        service::change_court_type(state, court_id, new_type.into())
            .await
            .map(CourtTypeChangeResult::from)
            .gql()
    }

    async fn assign_player_to_court(
        &self,
        ctx: &Context<'_>,
        player_id: Uuid,
        court_id: Uuid,
    ) -> Result<CourtAssignment> {
        let state = ctx.data::<AppState>()?;
        let (player, court, match_type) =
            service::assign_player_to_court(state, player_id, court_id)
                .await
                .gql()?;

        Ok(CourtAssignment {
            player: player.into(),
            court: court.into(),
            match_type: match_type.into(),
        })
    }

    /// Returns false when the player was not on that court.
    async fn remove_player_from_court(
        &self,
        ctx: &Context<'_>,
        player_id: Uuid,
        court_id: Uuid,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        service::remove_player_from_court(state, player_id, court_id)
            .await
            .gql()
    }
}
