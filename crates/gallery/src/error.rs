//! Error types for the gallery library.

use std::time::Duration;

use thiserror::Error;

use crate::model::TransitionError;
use crate::store::Collection;

/// Failures reported by a [`DocumentStore`](crate::store::DocumentStore).
///
/// Every variant is safe to retry: document updates are idempotent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The document addressed by an update does not exist.
    #[error("document '{id}' not found in {collection}")]
    NotFound { collection: Collection, id: String },

    /// An insert addressed an id that is already taken.
    #[error("document '{id}' already exists in {collection}")]
    AlreadyExists { collection: Collection, id: String },

    /// A document read inside a transaction changed before commit.
    #[error("concurrent modification of '{id}' in {collection}")]
    Conflict { collection: Collection, id: String },

    /// The operation deadline expired before the call was issued.
    #[error("operation timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },

    /// The store does not offer the requested capability.
    #[error("unsupported store operation: {0}")]
    Unsupported(&'static str),

    /// Transport or backend failure.
    #[error("store backend error: {0}")]
    Backend(String),

    /// An internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,
}

/// Main error type for gallery operations.
#[derive(Debug, Error)]
pub enum GalleryError {
    /// The primary entity of an operation does not exist.
    #[error("{collection} document '{id}' not found")]
    NotFound { collection: Collection, id: String },

    /// Caller-supplied input is invalid for the current state.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested assignment transition is not allowed.
    #[error("Invalid transition: {0}")]
    Transition(#[from] TransitionError),

    /// Failure from the document store.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Error reading or writing a snapshot file.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GalleryError {
    pub(crate) fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        GalleryError::NotFound {
            collection,
            id: id.into(),
        }
    }

    /// Whether re-issuing the same operation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GalleryError::Store(_))
    }

    /// Whether this is an optimistic-concurrency conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, GalleryError::Store(StoreError::Conflict { .. }))
    }
}

/// Result type alias for gallery operations.
pub type Result<T> = std::result::Result<T, GalleryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let conflict = GalleryError::from(StoreError::Conflict {
            collection: Collection::Shows,
            id: "s1".to_string(),
        });
        assert!(conflict.is_retryable());
        assert!(conflict.is_conflict());

        let missing = GalleryError::not_found(Collection::Artworks, "a1");
        assert!(!missing.is_retryable());
        assert_eq!(missing.to_string(), "artworks document 'a1' not found");
    }
}
