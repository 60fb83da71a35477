use async_graphql::ErrorExtensions;
use videomenu_common::MenuError;

/// Create a NOT_FOUND GraphQL error.
pub fn not_found(msg: impl std::fmt::Display) -> async_graphql::Error {
    async_graphql::Error::new(msg.to_string()).extend_with(|_, e| {
        e.set("code", "NOT_FOUND");
    })
}

/// Create an UNAVAILABLE GraphQL error. The caller may retry.
pub fn unavailable(msg: impl std::fmt::Display) -> async_graphql::Error {
    tracing::error!("store unavailable: {msg}");
    async_graphql::Error::new("catalog temporarily unavailable").extend_with(|_, e| {
        e.set("code", "UNAVAILABLE");
    })
}

/// Create an INTERNAL GraphQL error (hides internal details).
pub fn internal(msg: impl std::fmt::Display) -> async_graphql::Error {
    tracing::error!("internal error: {msg}");
    async_graphql::Error::new("internal error").extend_with(|_, e| {
        e.set("code", "INTERNAL");
    })
}

/// Map an engine error onto a coded GraphQL error.
pub fn from_menu_error(e: MenuError) -> async_graphql::Error {
    match &e {
        MenuError::NotFound(_) => not_found(&e),
        MenuError::StorageUnavailable { .. } => unavailable(&e),
        MenuError::QueryExecution { .. } | MenuError::ConfigUnavailable(_) => internal(&e),
    }
}
