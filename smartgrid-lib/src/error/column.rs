//! Column registry errors

/// Errors raised while building a column set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnError {
    /// Two column definitions share the same key.
    #[error("Duplicate column key '{key}'")]
    DuplicateKey { key: String },

    /// A column definition has an empty key.
    #[error("Column at position {position} has an empty key")]
    EmptyKey { position: usize },
}

impl ColumnError {
    /// Creates a new duplicate key error.
    pub fn duplicate(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }
}
