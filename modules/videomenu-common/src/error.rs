use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    #[error("Catalog store unavailable (tags {tags:?}): {reason}")]
    StorageUnavailable { tags: Vec<String>, reason: String },

    #[error("Query execution failed (tags {tags:?}): {reason}")]
    QueryExecution { tags: Vec<String>, reason: String },

    #[error("Position with ID {0} not found")]
    NotFound(String),

    #[error("Group order configuration unavailable: {0}")]
    ConfigUnavailable(String),
}

impl MenuError {
    /// Attach the tag filter being processed to store-derived errors.
    pub fn with_tags(self, tags: &[String]) -> Self {
        match self {
            MenuError::StorageUnavailable { reason, .. } => MenuError::StorageUnavailable {
                tags: tags.to_vec(),
                reason,
            },
            MenuError::QueryExecution { reason, .. } => MenuError::QueryExecution {
                tags: tags.to_vec(),
                reason,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_tags_sets_context_on_store_errors_only() {
        let tags = vec!["promo".to_string()];
        let err = MenuError::StorageUnavailable {
            tags: vec![],
            reason: "down".into(),
        }
        .with_tags(&tags);
        assert_eq!(
            err.to_string(),
            "Catalog store unavailable (tags [\"promo\"]): down"
        );

        let err = MenuError::NotFound("p1".into()).with_tags(&tags);
        assert_eq!(err, MenuError::NotFound("p1".into()));
    }
}
