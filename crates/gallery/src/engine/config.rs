//! Engine configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GalleryError, Result};

/// Configuration for the consistency engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Run each operation inside one store transaction when the store
    /// supports it.
    pub transactional: bool,

    /// How many times an operation is re-run after an optimistic
    /// concurrency conflict before the conflict is returned.
    pub max_conflict_retries: u32,

    /// Base delay between conflict retries, in milliseconds. The actual
    /// delay grows with the attempt number and carries random jitter.
    pub retry_backoff_ms: u64,

    /// Deadline for a whole operation, in milliseconds. `None` disables it.
    pub operation_timeout_ms: Option<u64>,

    /// Reject reorders that mention ids outside `artworkIds`. When false,
    /// ids already present in `artworkOrder` are tolerated too.
    pub strict_order: bool,

    /// Revert already-applied writes when a later write of the same
    /// operation fails on a store without transactions.
    pub compensate_on_failure: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            transactional: true,
            max_conflict_retries: 3,
            retry_backoff_ms: 10,
            operation_timeout_ms: Some(10_000),
            strict_order: true,
            compensate_on_failure: true,
        }
    }
}

impl EngineConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file; absent fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            GalleryError::Config(format!("Failed to read '{}': {}", path.display(), e))
        })?;
        let config: EngineConfig = serde_json::from_str(&raw).map_err(|e| {
            GalleryError::Config(format!("Invalid config '{}': {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.operation_timeout_ms == Some(0) {
            return Err(GalleryError::Config(
                "operation_timeout_ms must be positive (omit it to disable)".to_string(),
            ));
        }
        Ok(())
    }

    /// Prefer or avoid store transactions.
    pub fn with_transactions(mut self, enabled: bool) -> Self {
        self.transactional = enabled;
        self
    }

    /// Set the conflict retry budget.
    pub fn with_max_conflict_retries(mut self, retries: u32) -> Self {
        self.max_conflict_retries = retries;
        self
    }

    /// Set the base retry backoff.
    pub fn with_retry_backoff_ms(mut self, ms: u64) -> Self {
        self.retry_backoff_ms = ms;
        self
    }

    /// Set or clear the operation deadline.
    pub fn with_operation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.operation_timeout_ms = timeout.map(|t| t.as_millis() as u64);
        self
    }

    /// Choose strict or lenient reorder validation.
    pub fn with_strict_order(mut self, strict: bool) -> Self {
        self.strict_order = strict;
        self
    }

    /// Enable or disable compensation on the non-transactional path.
    pub fn with_compensation(mut self, enabled: bool) -> Self {
        self.compensate_on_failure = enabled;
        self
    }

    /// Operation deadline as a duration.
    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.transactional);
        assert!(config.strict_order);
        assert_eq!(config.operation_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"strict_order": false, "operation_timeout_ms": null}"#)
                .unwrap();
        assert!(!config.strict_order);
        assert!(config.transactional);
        assert_eq!(config.operation_timeout(), None);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = EngineConfig::new().with_operation_timeout(Some(Duration::ZERO));
        assert!(config.validate().is_err());
    }
}
