pub mod context;
pub mod error;
pub mod platform;
pub mod types;
pub mod website;

use std::sync::Arc;

use async_graphql::*;
use videomenu_catalog::MenuService;

/// Merged query root composing the website and platform surfaces.
#[derive(MergedObject, Default)]
pub struct QueryRoot(website::WebsiteQuery, platform::PlatformQuery);

pub type AppSchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

pub fn build_schema(service: Arc<MenuService>) -> AppSchema {
    Schema::build(QueryRoot::default(), EmptyMutation, EmptySubscription)
        .data(service)
        .limit_depth(10)
        .limit_complexity(1000)
        .finish()
}
