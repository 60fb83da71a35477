use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{error, info};
use videomenu_common::{MenuError, Position};

use crate::pipeline::{Pipeline, RankedPosition};
use crate::store::{CatalogStore, StoreError, StoredDocument};

/// Runs a [`Pipeline`] against the catalog store.
pub struct CatalogExecutor {
    store: Arc<dyn CatalogStore>,
    timeout: Duration,
}

impl CatalogExecutor {
    pub fn new(store: Arc<dyn CatalogStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Fetch candidates, decode them and evaluate the pipeline. Ranking
    /// fields are kept for shapers that need the group index.
    pub async fn execute_ranked(&self, pipeline: &Pipeline) -> Result<Vec<RankedPosition>, MenuError> {
        let tags = pipeline.tags();
        info!(tags = ?tags, stages = pipeline.stages().len(), "Executing ranking pipeline");

        let docs = tokio::time::timeout(self.timeout, self.store.enabled_positions(tags))
            .await
            .map_err(StoreError::from)
            .and_then(|r| r)
            .map_err(|e| {
                error!(tags = ?tags, error = %e, "Catalog fetch failed");
                store_error(e, tags)
            })?;

        let positions = docs
            .into_iter()
            .map(decode_document)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                error!(tags = ?tags, error = %e, "Failed to decode catalog documents");
                MenuError::QueryExecution {
                    tags: tags.to_vec(),
                    reason: e.to_string(),
                }
            })?;

        let ranked = pipeline.apply(positions);
        info!(tags = ?tags, count = ranked.len(), "Ranking pipeline completed");
        Ok(ranked)
    }

    /// Ranked positions with the ranking fields discarded.
    pub async fn execute(&self, pipeline: &Pipeline) -> Result<Vec<Position>, MenuError> {
        Ok(self
            .execute_ranked(pipeline)
            .await?
            .into_iter()
            .map(|r| r.position)
            .collect())
    }
}

pub(crate) fn store_error(e: StoreError, tags: &[String]) -> MenuError {
    match e {
        StoreError::Unavailable(reason) => MenuError::StorageUnavailable {
            tags: tags.to_vec(),
            reason,
        },
        StoreError::Query(reason) => MenuError::QueryExecution {
            tags: tags.to_vec(),
            reason,
        },
    }
}

/// Decode a raw document into a [`Position`].
///
/// The store row id becomes `id`; a legacy `group_name` field stands in for a
/// missing `groupName` and is always dropped.
pub(crate) fn decode_document(stored: StoredDocument) -> Result<Position, serde_json::Error> {
    let StoredDocument { id, mut doc } = stored;

    if let Value::Object(fields) = &mut doc {
        // Null top-level fields decode as absent.
        fields.retain(|_, v| !v.is_null());
        let legacy = fields.remove("group_name");
        if !fields.contains_key("groupName") {
            if let Some(legacy) = legacy {
                fields.insert("groupName".to_string(), legacy);
            }
        }
        fields.remove("_id");
        fields.insert("id".to_string(), Value::String(id));
    }

    serde_json::from_value(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_sets_id_from_row() {
        let p = decode_document(StoredDocument::new(
            "row-1",
            json!({"id": "ignored", "name": "Varenyky", "status": "enabled"}),
        ))
        .unwrap();
        assert_eq!(p.id, "row-1");
        assert_eq!(p.name, "Varenyky");
    }

    #[test]
    fn decode_prefers_group_name_over_legacy_field() {
        let p = decode_document(StoredDocument::new(
            "1",
            json!({"groupName": "mains", "group_name": "old"}),
        ))
        .unwrap();
        assert_eq!(p.group_name, "mains");

        let p = decode_document(StoredDocument::new("2", json!({"group_name": "soups"}))).unwrap();
        assert_eq!(p.group_name, "soups");

        let p = decode_document(StoredDocument::new(
            "3",
            json!({"groupName": null, "group_name": "salads"}),
        ))
        .unwrap();
        assert_eq!(p.group_name, "salads");
    }

    #[test]
    fn decode_treats_null_fields_as_absent() {
        let p = decode_document(StoredDocument::new(
            "1",
            json!({"name": "Kompot", "tags": null, "groupName": null, "videoUrlHevc": null}),
        ))
        .unwrap();
        assert!(p.tags.is_empty());
        assert_eq!(p.group_name, "");
        assert_eq!(p.video_url_hevc, None);
    }

    #[test]
    fn decode_rejects_wrongly_typed_fields() {
        assert!(decode_document(StoredDocument::new("1", json!({"tags": "promo"}))).is_err());
        assert!(decode_document(StoredDocument::new("2", json!(["not", "an", "object"]))).is_err());
    }

    #[tokio::test]
    async fn execute_returns_positions_in_pipeline_order() {
        use crate::memory::MemoryCatalogStore;
        use videomenu_common::GroupOrderConfig;

        let store = MemoryCatalogStore::new()
            .with_position("b", json!({"name": "Banosh", "groupName": "mains", "status": "enabled", "tags": ["t"]}))
            .with_position("a", json!({"name": "Uzvar", "groupName": "drinks", "status": "enabled", "tags": ["t"]}))
            .with_position("c", json!({"name": "Holubtsi", "groupName": "mains", "status": "disabled", "tags": ["t"]}));
        let executor = CatalogExecutor::new(Arc::new(store), Duration::from_secs(1));

        let tags = vec!["t".to_string()];
        let config = GroupOrderConfig::new([("t".to_string(), vec!["drinks".to_string(), "mains".to_string()])].into());
        let positions = executor.execute(&Pipeline::build(&tags, &config)).await.unwrap();
        let ids: Vec<_> = positions.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
