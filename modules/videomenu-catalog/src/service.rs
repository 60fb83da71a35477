use std::sync::Arc;

use tracing::{error, info, warn};
use videomenu_common::{
    EngineSettings, GroupOrderConfig, MenuError, Position, PositionGroup, RandomVideoGroup,
};

use crate::executor::{decode_document, store_error, CatalogExecutor};
use crate::group_order::GroupOrderResolver;
use crate::pipeline::{Pipeline, RankedPosition};
use crate::shaper;
use crate::store::{CatalogStore, StoreError};

/// Entry point for the menu query surfaces. Stateless per request; every
/// call reads the group order and the catalog afresh.
pub struct MenuService {
    store: Arc<dyn CatalogStore>,
    settings: EngineSettings,
    resolver: GroupOrderResolver,
    executor: CatalogExecutor,
}

impl MenuService {
    pub fn new(store: Arc<dyn CatalogStore>, settings: EngineSettings) -> Self {
        let resolver = GroupOrderResolver::new(
            store.clone(),
            settings.config_key.clone(),
            settings.config_lookup_timeout,
        );
        let executor = CatalogExecutor::new(store.clone(), settings.query_timeout);
        Self {
            store,
            settings,
            resolver,
            executor,
        }
    }

    /// Positions bundled into groups, groups in configured order.
    pub async fn query_grouped(&self, tags: &[String]) -> Result<Vec<PositionGroup>, MenuError> {
        info!(tags = ?tags, "Grouped positions requested");
        let groups = shaper::group(self.ranked(tags).await?);
        info!(tags = ?tags, groups = groups.len(), "Grouped positions completed");
        Ok(groups)
    }

    /// All positions in ranking order.
    pub async fn query_flat(&self, tags: &[String]) -> Result<Vec<Position>, MenuError> {
        info!(tags = ?tags, "Flat positions requested");
        let flat = shaper::flatten(self.ranked(tags).await?);
        info!(tags = ?tags, count = flat.len(), "Flat positions completed");
        Ok(flat)
    }

    /// Slider window of at most five positions around `target_id`.
    pub async fn query_window(
        &self,
        tags: &[String],
        target_id: &str,
    ) -> Result<Vec<Position>, MenuError> {
        let flat = self.query_flat(tags).await?;
        let window = shaper::window_around(&flat, target_id).inspect_err(|_| {
            warn!(tags = ?tags, target_id, "Slider target not in flat positions");
        })?;
        info!(target_id, count = window.len(), "Slider window completed");
        Ok(window.to_vec())
    }

    /// One random video position per configured tag. Tags without an eligible
    /// position are left out. Group order failures fall back to `main-menu`.
    pub async fn discover_random_by_all_tags(&self) -> Result<Vec<RandomVideoGroup>, MenuError> {
        let config = self.resolver.resolve().await;
        let mut out = Vec::new();

        for tag in config.tags() {
            let sampled = tokio::time::timeout(
                self.settings.sample_timeout,
                self.store.sample_video_position(tag),
            )
            .await
            .map_err(StoreError::from)
            .and_then(|r| r)
            .map_err(|e| {
                error!(tag, error = %e, "Random sample failed");
                store_error(e, &[tag.to_string()])
            })?;

            let Some(doc) = sampled else {
                continue;
            };
            let item = decode_document(doc).map_err(|e| MenuError::QueryExecution {
                tags: vec![tag.to_string()],
                reason: e.to_string(),
            })?;
            out.push(RandomVideoGroup {
                tag: tag.to_string(),
                item,
            });
        }

        info!(tags = config.group_order.len(), sampled = out.len(), "Random video discovery completed");
        Ok(out)
    }

    async fn ranked(&self, tags: &[String]) -> Result<Vec<RankedPosition>, MenuError> {
        let config = self.group_order_for_query(tags).await?;
        let pipeline = Pipeline::build(tags, &config);
        self.executor.execute_ranked(&pipeline).await
    }

    /// Missing or malformed configuration falls back to `main-menu`; an
    /// unreachable store is surfaced.
    async fn group_order_for_query(&self, tags: &[String]) -> Result<GroupOrderConfig, MenuError> {
        match self.resolver.fetch().await {
            Ok(config) => Ok(config),
            Err(MenuError::ConfigUnavailable(reason)) => {
                warn!(tags = ?tags, reason = %reason, "Group order unavailable, using main-menu default");
                Ok(GroupOrderConfig::default())
            }
            Err(e) => {
                error!(tags = ?tags, error = %e, "Group order lookup failed");
                Err(e.with_tags(tags))
            }
        }
    }
}
