use async_graphql::{Context, Object, Result};
use infra::repos::{CreatePlayer, PlayerFilter, UpdatePlayer};
use uuid::Uuid;

use super::service;
use super::types::{Player, RegisterPlayerInput, UpdatePlayerInput};
use crate::gql::common::types::Qualification;
use crate::gql::error::GqlResultExt;
use crate::state::AppState;

#[derive(Default)]
pub struct PlayerQuery;

#[Object]
impl PlayerQuery {
    /// List players, optionally filtered by activity and qualification.
    /// `search` matches name or email.
    async fn players(
        &self,
        ctx: &Context<'_>,
        is_active: Option<bool>,
        qualification: Option<Qualification>,
        search: Option<String>,
    ) -> Result<Vec<Player>> {
        let state = ctx.data::<AppState>()?;

        let filter = PlayerFilter {
            is_active,
            qualification: qualification.map(Into::into),
            search: search.filter(|s| !s.trim().is_empty()),
        };

        let rows = state.store.list_players(filter).await.gql()?;
        Ok(rows.into_iter().map(Player::from).collect())
    }

    async fn player(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Player>> {
        let state = ctx.data::<AppState>()?;
        Ok(state.store.get_player(id).await.gql()?.map(Player::from))
    }
}

#[derive(Default)]
pub struct PlayerMutation;

#[Object]
impl PlayerMutation {
    async fn register_player(
        &self,
        ctx: &Context<'_>,
        input: RegisterPlayerInput,
    ) -> Result<Player> {
        let state = ctx.data::<AppState>()?;

        let data = CreatePlayer {
            name: input.name,
            email: input.email,
            qualification: input.qualification.into(),
            is_active: true,
        };

        service::register_player(state, data)
            .await
            .map(Player::from)
            .gql()
    }

    async fn update_player(
        &self,
        ctx: &Context<'_>,
        id: Uuid,
        input: UpdatePlayerInput,
    ) -> Result<Player> {
        let state = ctx.data::<AppState>()?;

        let data = UpdatePlayer {
            name: input.name,
            email: input.email,
            qualification: input.qualification.map(Into::into),
            team_id: input.team_id,
        };

        service::update_player(state, id, data)
            .await
            .map(Player::from)
            .gql()
    }

    async fn set_player_active(&self, ctx: &Context<'_>, id: Uuid, active: bool) -> Result<Player> {
        let state = ctx.data::<AppState>()?;
        service::set_player_active(state, id, active)
            .await
            .map(Player::from)
            .gql()
    }

    async fn login_player(&self, ctx: &Context<'_>, email: String) -> Result<Player> {
        let state = ctx.data::<AppState>()?;
        service::login_player(state, &email)
            .await
            .map(Player::from)
            .gql()
    }

    async fn logout_player(&self, ctx: &Context<'_>, email: String) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        service::logout_player(state, &email).await.gql()
    }

    async fn delete_player(&self, ctx: &Context<'_>, id: Uuid) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        service::delete_player(state, id).await.gql()
    }
}
