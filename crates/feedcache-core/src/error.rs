//! Error types for feedcache-core

use crate::config::StoreLocation;
use thiserror::Error;

/// Errors delivered by feed store operations
///
/// None of these leave the store unusable: after any failure the next
/// operation runs normally. The store never retries on its own.
#[derive(Error, Debug)]
pub enum FeedStoreError {
    /// A stored record or the snapshot timestamp failed to parse (retrieve only)
    #[error("Invalid cached data at {field}: {reason}")]
    InvalidData { field: String, reason: String },

    /// The write transaction could not be committed (insert / delete only)
    #[error("Failed to write feed cache")]
    WriteFailed(#[source] rusqlite::Error),

    /// The storage engine failed while reading (retrieve only)
    #[error("Failed to read feed cache")]
    ReadFailed(#[source] rusqlite::Error),

    #[error("Failed to open feed cache at {location}")]
    Open {
        location: StoreLocation,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to create cache directory: {path}")]
    CreateDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The serial worker is not running, so the operation was never executed
    #[error("Feed cache worker is not running")]
    WorkerUnavailable,
}

impl FeedStoreError {
    pub(crate) fn invalid_data(field: impl Into<String>, reason: impl ToString) -> Self {
        FeedStoreError::InvalidData {
            field: field.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_invalid_data(&self) -> bool {
        matches!(self, FeedStoreError::InvalidData { .. })
    }

    pub fn is_write_failure(&self) -> bool {
        matches!(self, FeedStoreError::WriteFailed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_data_message_names_field() {
        let err = FeedStoreError::invalid_data("images[3].url", "relative URL without a base");
        assert!(err.is_invalid_data());
        assert!(!err.is_write_failure());
        assert_eq!(
            err.to_string(),
            "Invalid cached data at images[3].url: relative URL without a base"
        );
    }

    #[test]
    fn test_write_failed_keeps_source() {
        let err = FeedStoreError::WriteFailed(rusqlite::Error::InvalidQuery);
        assert!(err.is_write_failure());
        assert!(std::error::Error::source(&err).is_some());
    }
}
