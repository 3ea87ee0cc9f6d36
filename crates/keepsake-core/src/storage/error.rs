//! Storage error handling
//!
//! Provides typed errors for store operations. `NotFound` and `Validation`
//! are distinguishable variants so callers can react to them; everything
//! else is propagated from the underlying store unchanged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Mutation against an item id that does not exist
    #[error("captured item with id {id} not found")]
    NotFound { id: i64 },

    /// Input rejected before persistence
    #[error("validation failed: {0}")]
    Validation(String),

    /// Failed to create the data directory
    #[error("failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Stored tags or metadata column does not hold valid JSON
    #[error("invalid JSON in storage: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl StoreError {
    /// True when the error means the addressed item does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = StoreError::NotFound { id: 42 };
        assert!(err.is_not_found());
        // Callers match on the message case-insensitively
        assert!(err.to_string().to_lowercase().contains("not found"));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_validation_message() {
        let err = StoreError::Validation("content cannot be empty".to_string());
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("content cannot be empty"));
    }

    #[test]
    fn test_database_error_conversion() {
        let err: StoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
