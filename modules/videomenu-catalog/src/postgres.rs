// Postgres-backed catalog. Position documents are stored as JSONB rows in
// `menu_positions`; the group order lives in `plugins.config`.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use tracing::debug;

use crate::store::{CatalogStore, StoreError, StoredDocument};

#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    doc: Value,
}

impl From<DocumentRow> for StoredDocument {
    fn from(row: DocumentRow) -> Self {
        StoredDocument::new(row.id, row.doc)
    }
}

#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run the embedded SQL migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::from(sqlx::Error::from(e)))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn plugin_config(&self, short_name: &str) -> Result<Option<Value>, StoreError> {
        let config = sqlx::query_scalar::<_, Value>(
            "SELECT config FROM plugins WHERE short_name = $1",
        )
        .bind(short_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(config)
    }

    async fn enabled_positions(&self, tags: &[String]) -> Result<Vec<StoredDocument>, StoreError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, doc FROM menu_positions
            WHERE doc->>'status' = 'enabled'
              AND jsonb_typeof(doc->'tags') = 'array'
              AND doc->'tags' ?| $1
            ORDER BY id
            "#,
        )
        .bind(tags)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Fetched candidate positions");
        Ok(rows.into_iter().map(StoredDocument::from).collect())
    }

    async fn sample_video_position(
        &self,
        tag: &str,
    ) -> Result<Option<StoredDocument>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, doc FROM menu_positions
            WHERE doc->>'status' = 'enabled'
              AND jsonb_typeof(doc->'tags') = 'array'
              AND doc->'tags' ? $1
              AND coalesce(doc->>'videoUrlHevc', '') <> ''
              AND coalesce(doc->>'urlPosterPrevVideo', '') <> ''
            ORDER BY random()
            LIMIT 1
            "#,
        )
        .bind(tag)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(StoredDocument::from))
    }
}
