use std::sync::Arc;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

use videomenu_api::routes;
use videomenu_catalog::{MenuService, PgCatalogStore};
use videomenu_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("videomenu=info")),
        )
        .json()
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    let store = PgCatalogStore::new(pool);
    store.migrate().await?;
    info!("Catalog migrations applied");

    let service = Arc::new(MenuService::new(Arc::new(store), config.engine_settings()));
    let app = routes::build_router(&config, service);

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("Video menu API starting on {addr}");
    info!("GraphiQL IDE available at http://{addr}/graphql");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
