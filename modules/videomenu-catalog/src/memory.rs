// In-memory catalog store.
//
// Holds raw documents exactly as the Postgres store would return them, so the
// executor's normalisation and decoding paths run unchanged. Failure toggles
// let tests drive the unavailable/timeout branches without a database.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::seq::IndexedRandom;
use serde_json::Value;

use crate::store::{CatalogStore, StoreError, StoredDocument};

#[derive(Default)]
struct Inner {
    plugins: Vec<(String, Value)>,
    positions: Vec<StoredDocument>,
    unavailable: bool,
    config_unavailable: bool,
    delay: Option<Duration>,
}

#[derive(Default)]
pub struct MemoryCatalogStore {
    inner: Mutex<Inner>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a plugin `config` document.
    pub fn with_plugin_config(self, short_name: &str, config: Value) -> Self {
        {
            let mut inner = self.lock();
            inner.plugins.retain(|(name, _)| name != short_name);
            inner.plugins.push((short_name.to_string(), config));
        }
        self
    }

    pub fn with_position(self, id: &str, doc: Value) -> Self {
        self.insert_position(id, doc);
        self
    }

    pub fn insert_position(&self, id: &str, doc: Value) {
        let mut inner = self.lock();
        inner.positions.retain(|p| p.id != id);
        inner.positions.push(StoredDocument::new(id, doc));
    }

    /// Every call fails as if the store were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Only the plugin config lookup fails.
    pub fn set_config_unavailable(&self, unavailable: bool) {
        self.lock().config_unavailable = unavailable;
    }

    /// Delay every call, for exercising caller timeouts.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.lock().delay = delay;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn pause(&self) {
        let delay = self.lock().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.lock().unavailable {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        } else {
            Ok(())
        }
    }
}

fn is_enabled(doc: &Value) -> bool {
    doc.get("status").and_then(Value::as_str) == Some("enabled")
}

fn doc_tags(doc: &Value) -> impl Iterator<Item = &str> {
    doc.get("tags")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
}

fn non_empty_str(doc: &Value, field: &str) -> bool {
    doc.get(field)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn plugin_config(&self, short_name: &str) -> Result<Option<Value>, StoreError> {
        self.pause().await;
        self.check_available()?;
        let inner = self.lock();
        if inner.config_unavailable {
            return Err(StoreError::Unavailable("plugin lookup failed".to_string()));
        }
        Ok(inner
            .plugins
            .iter()
            .find(|(name, _)| name == short_name)
            .map(|(_, config)| config.clone()))
    }

    async fn enabled_positions(&self, tags: &[String]) -> Result<Vec<StoredDocument>, StoreError> {
        self.pause().await;
        self.check_available()?;
        let inner = self.lock();
        Ok(inner
            .positions
            .iter()
            .filter(|p| is_enabled(&p.doc))
            .filter(|p| doc_tags(&p.doc).any(|t| tags.iter().any(|want| want == t)))
            .cloned()
            .collect())
    }

    async fn sample_video_position(
        &self,
        tag: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        self.pause().await;
        self.check_available()?;
        let inner = self.lock();
        let eligible: Vec<&StoredDocument> = inner
            .positions
            .iter()
            .filter(|p| is_enabled(&p.doc))
            .filter(|p| doc_tags(&p.doc).any(|t| t == tag))
            .filter(|p| non_empty_str(&p.doc, "videoUrlHevc"))
            .filter(|p| non_empty_str(&p.doc, "urlPosterPrevVideo"))
            .collect();
        Ok(eligible.choose(&mut rand::rng()).map(|p| (*p).clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn enabled_positions_filters_status_and_tags() {
        let store = MemoryCatalogStore::new()
            .with_position("1", json!({"name": "a", "status": "enabled", "tags": ["promo"]}))
            .with_position("2", json!({"name": "b", "status": "disabled", "tags": ["promo"]}))
            .with_position("3", json!({"name": "c", "status": "enabled", "tags": ["other"]}))
            .with_position("4", json!({"name": "d", "status": "enabled"}));

        let docs = store.enabled_positions(&tags(&["promo"])).await.unwrap();
        let ids: Vec<_> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        assert!(store.enabled_positions(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sample_requires_video_and_poster() {
        let store = MemoryCatalogStore::new()
            .with_position(
                "1",
                json!({"status": "enabled", "tags": ["promo"], "videoUrlHevc": "v.mp4"}),
            )
            .with_position(
                "2",
                json!({"status": "enabled", "tags": ["promo"], "videoUrlHevc": "v.mp4", "urlPosterPrevVideo": ""}),
            );
        assert_eq!(store.sample_video_position("promo").await.unwrap(), None);

        store.insert_position(
            "3",
            json!({"status": "enabled", "tags": ["promo"], "videoUrlHevc": "v.mp4", "urlPosterPrevVideo": "p.jpg"}),
        );
        let sampled = store.sample_video_position("promo").await.unwrap().unwrap();
        assert_eq!(sampled.id, "3");
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryCatalogStore::new();
        store.set_unavailable(true);
        assert!(matches!(
            store.plugin_config("x").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(
            store.enabled_positions(&tags(&["a"])).await,
            Err(StoreError::Unavailable(_))
        ));
    }
}
