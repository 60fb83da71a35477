use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use videomenu_common::{GroupOrderConfig, MenuError};

use crate::store::{CatalogStore, StoreError};

/// Looks up the group order from the plugin document. Fetched fresh on every
/// call; the document is administered elsewhere and may change at any time.
pub struct GroupOrderResolver {
    store: Arc<dyn CatalogStore>,
    config_key: String,
    timeout: Duration,
}

impl GroupOrderResolver {
    pub fn new(store: Arc<dyn CatalogStore>, config_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            store,
            config_key: config_key.into(),
            timeout,
        }
    }

    /// Strict lookup. A missing or malformed document is `ConfigUnavailable`;
    /// an unreachable store is `StorageUnavailable`.
    pub async fn fetch(&self) -> Result<GroupOrderConfig, MenuError> {
        let lookup = tokio::time::timeout(self.timeout, self.store.plugin_config(&self.config_key))
            .await
            .map_err(StoreError::from)
            .and_then(|r| r);

        let config = match lookup {
            Ok(Some(config)) => config,
            Ok(None) => {
                return Err(MenuError::ConfigUnavailable(format!(
                    "no plugin document {:?}",
                    self.config_key
                )))
            }
            Err(StoreError::Unavailable(reason)) => {
                return Err(MenuError::StorageUnavailable {
                    tags: Vec::new(),
                    reason,
                })
            }
            Err(StoreError::Query(reason)) => return Err(MenuError::ConfigUnavailable(reason)),
        };

        let parsed = parse_group_order(&config)?;
        debug!(tags = parsed.group_order.len(), "Resolved group order");
        Ok(parsed)
    }

    /// Fail-open lookup: any failure yields the `main-menu` default.
    pub async fn resolve(&self) -> GroupOrderConfig {
        match self.fetch().await {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Group order unavailable, using main-menu default");
                GroupOrderConfig::default()
            }
        }
    }
}

fn parse_group_order(config: &Value) -> Result<GroupOrderConfig, MenuError> {
    let group_order = config
        .get("groupOrder")
        .ok_or_else(|| MenuError::ConfigUnavailable("config has no groupOrder".to_string()))?;

    serde_json::from_value(group_order.clone())
        .map_err(|e| MenuError::ConfigUnavailable(format!("malformed groupOrder: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCatalogStore;
    use serde_json::json;

    const KEY: &str = "tablq_positions_menu";

    fn resolver(store: MemoryCatalogStore) -> GroupOrderResolver {
        GroupOrderResolver::new(Arc::new(store), KEY, Duration::from_secs(1))
    }

    #[tokio::test]
    async fn reads_group_order_verbatim() {
        let store = MemoryCatalogStore::new().with_plugin_config(
            KEY,
            json!({"groupOrder": {"promo": ["desserts", "mains"], "empty": []}}),
        );
        let config = resolver(store).fetch().await.unwrap();
        assert_eq!(config.group_order["promo"], vec!["desserts", "mains"]);
        assert!(config.group_order["empty"].is_empty());
    }

    #[tokio::test]
    async fn missing_document_is_config_unavailable() {
        let err = resolver(MemoryCatalogStore::new()).fetch().await.unwrap_err();
        assert!(matches!(err, MenuError::ConfigUnavailable(_)));
    }

    #[tokio::test]
    async fn malformed_group_order_is_config_unavailable() {
        let store = MemoryCatalogStore::new()
            .with_plugin_config(KEY, json!({"groupOrder": {"promo": "desserts"}}));
        let err = resolver(store).fetch().await.unwrap_err();
        assert!(matches!(err, MenuError::ConfigUnavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_store_is_storage_unavailable() {
        let store = MemoryCatalogStore::new();
        store.set_config_unavailable(true);
        let err = resolver(store).fetch().await.unwrap_err();
        assert!(matches!(err, MenuError::StorageUnavailable { .. }));
    }

    #[tokio::test]
    async fn slow_lookup_times_out() {
        let store = MemoryCatalogStore::new().with_plugin_config(KEY, json!({"groupOrder": {}}));
        store.set_delay(Some(Duration::from_millis(200)));
        let resolver = GroupOrderResolver::new(Arc::new(store), KEY, Duration::from_millis(20));
        assert!(matches!(
            resolver.fetch().await,
            Err(MenuError::StorageUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn resolve_falls_back_to_main_menu() {
        let store = MemoryCatalogStore::new();
        store.set_unavailable(true);
        assert_eq!(resolver(store).resolve().await, GroupOrderConfig::default());
    }
}
