pub mod executor;
pub mod group_order;
pub mod memory;
pub mod pipeline;
pub mod postgres;
pub mod service;
pub mod shaper;
pub mod store;

#[cfg(feature = "test-utils")]
pub mod testutil;

pub use executor::CatalogExecutor;
pub use group_order::GroupOrderResolver;
pub use memory::MemoryCatalogStore;
pub use pipeline::{Pipeline, RankedPosition, RankingFields, SortKey, Stage};
pub use postgres::PgCatalogStore;
pub use service::MenuService;
pub use store::{CatalogStore, StoreError, StoredDocument};
