use std::sync::Arc;

use async_graphql::*;
use videomenu_catalog::MenuService;

use super::error::from_menu_error;
use super::types::{GqlPosition, GqlPositionGroup, GqlRandomVideoGroup};

/// Public website surface. No authentication.
#[derive(Default)]
pub struct WebsiteQuery;

#[Object]
impl WebsiteQuery {
    /// Enabled positions matching `tags_filter`, bundled into display groups.
    async fn positions_video_menu(
        &self,
        ctx: &Context<'_>,
        tags_filter: Vec<String>,
    ) -> Result<Vec<GqlPositionGroup>> {
        let service = ctx.data_unchecked::<Arc<MenuService>>();
        let groups = service
            .query_grouped(&tags_filter)
            .await
            .map_err(from_menu_error)?;
        Ok(groups.into_iter().map(GqlPositionGroup::from).collect())
    }

    /// Up to five positions around `current_id` in menu order.
    async fn positions_video_menu_slider(
        &self,
        ctx: &Context<'_>,
        tags_filter: Vec<String>,
        current_id: ID,
    ) -> Result<Vec<GqlPosition>> {
        let service = ctx.data_unchecked::<Arc<MenuService>>();
        let window = service
            .query_window(&tags_filter, &current_id)
            .await
            .map_err(from_menu_error)?;
        Ok(window.into_iter().map(GqlPosition::from).collect())
    }

    /// One random video position for every configured menu tag.
    async fn random_video_main(&self, ctx: &Context<'_>) -> Result<Vec<GqlRandomVideoGroup>> {
        let service = ctx.data_unchecked::<Arc<MenuService>>();
        let groups = service
            .discover_random_by_all_tags()
            .await
            .map_err(from_menu_error)?;
        Ok(groups.into_iter().map(GqlRandomVideoGroup::from).collect())
    }
}
