// Store seam for the catalog engine.
//
// The engine reads two things: the plugin document carrying the group order,
// and raw position documents. Both live in an external store that this
// service never writes. Decoding happens above this seam so that corrupt
// documents surface as query failures, not store failures.

use async_trait::async_trait;
use serde_json::Value;

/// A raw position document as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub doc: Value,
}

impl StoredDocument {
    pub fn new(id: impl Into<String>, doc: Value) -> Self {
        Self { id: id.into(), doc }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Unavailable(String),

    #[error("store query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(e.to_string()),
            _ => StoreError::Query(e.to_string()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for StoreError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        StoreError::Unavailable("store call timed out".to_string())
    }
}

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// The `config` document of the plugin registered under `short_name`.
    async fn plugin_config(&self, short_name: &str) -> Result<Option<Value>, StoreError>;

    /// Enabled position documents carrying at least one of `tags`.
    async fn enabled_positions(&self, tags: &[String]) -> Result<Vec<StoredDocument>, StoreError>;

    /// One randomly chosen enabled document tagged `tag` that has both a
    /// video URL and a poster URL.
    async fn sample_video_position(&self, tag: &str)
        -> Result<Option<StoredDocument>, StoreError>;
}
