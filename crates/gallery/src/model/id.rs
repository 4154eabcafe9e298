//! Document id validation and generation.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{GalleryError, Result};

static ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.:-]{0,127}$").expect("Invalid regex")
});

/// Check a caller-supplied id before it reaches the store.
///
/// Ids start with an ASCII letter or digit and may contain `_ . : -`, up to
/// 128 characters. `kind` names the entity in the error message.
pub fn validate_id(kind: &str, id: &str) -> Result<()> {
    if ID_PATTERN.is_match(id) {
        Ok(())
    } else if id.trim().is_empty() {
        Err(GalleryError::Validation(format!("{} id must not be empty", kind)))
    } else {
        Err(GalleryError::Validation(format!(
            "invalid {} id '{}': expected letters, digits, '_', '.', ':' or '-'",
            kind, id
        )))
    }
}

/// A fresh artwork id.
pub fn generate_artwork_id() -> String {
    format!("art_{:016x}", fastrand::u64(..))
}
