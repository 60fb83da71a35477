use std::sync::Arc;

use async_graphql::*;
use videomenu_catalog::MenuService;

use super::context::{claims, ScopeGuard};
use super::error::from_menu_error;
use super::types::{GqlPosition, GqlPositionGroup};

pub const READ_SCOPE: &str = "read";

/// Platform surface. Requires a bearer token with the `read` scope.
#[derive(Default)]
pub struct PlatformQuery;

#[Object]
impl PlatformQuery {
    #[graphql(guard = "ScopeGuard::new(READ_SCOPE)")]
    async fn platform_positions_video_menu(
        &self,
        ctx: &Context<'_>,
        tags_filter: Vec<String>,
    ) -> Result<Vec<GqlPositionGroup>> {
        if let Some(c) = claims(ctx) {
            tracing::info!(user_id = %c.sub, client_id = %c.client_id, tags = ?tags_filter, "Platform menu requested");
        }
        let service = ctx.data_unchecked::<Arc<MenuService>>();
        let groups = service
            .query_grouped(&tags_filter)
            .await
            .map_err(from_menu_error)?;
        Ok(groups.into_iter().map(GqlPositionGroup::from).collect())
    }

    #[graphql(guard = "ScopeGuard::new(READ_SCOPE)")]
    async fn platform_positions_video_menu_slider(
        &self,
        ctx: &Context<'_>,
        tags_filter: Vec<String>,
        current_id: ID,
    ) -> Result<Vec<GqlPosition>> {
        if let Some(c) = claims(ctx) {
            tracing::info!(user_id = %c.sub, client_id = %c.client_id, current_id = %current_id.as_str(), "Platform slider requested");
        }
        let service = ctx.data_unchecked::<Arc<MenuService>>();
        let window = service
            .query_window(&tags_filter, &current_id)
            .await
            .map_err(from_menu_error)?;
        Ok(window.into_iter().map(GqlPosition::from).collect())
    }
}
