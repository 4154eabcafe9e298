//! Operation results and non-fatal warnings.

use std::fmt;

use serde::Serialize;

use crate::model::{Artist, Artwork, Show};
use crate::notify::AcceptanceEvent;
use crate::store::Collection;

/// A non-fatal problem recorded while applying an operation.
///
/// The operation still succeeded for its primary entity; these flag
/// documents a reconciliation pass should look at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartialApplicationWarning {
    /// A referenced document does not exist, so its update was skipped.
    MissingDocument { collection: Collection, id: String },

    /// The acceptance notification could not be handed off.
    NotificationFailed { artist_id: String, reason: String },
}

impl fmt::Display for PartialApplicationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartialApplicationWarning::MissingDocument { collection, id } => {
                write!(f, "{} document '{}' is missing; its update was skipped", collection, id)
            }
            PartialApplicationWarning::NotificationFailed { artist_id, reason } => {
                write!(f, "notification for artist '{}' failed: {}", artist_id, reason)
            }
        }
    }
}

/// Result of a single-artwork operation.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentResult {
    /// Artwork as written.
    pub artwork: Artwork,
    /// Number of document writes issued.
    pub writes: usize,
    /// Non-fatal problems.
    pub warnings: Vec<PartialApplicationWarning>,
}

/// Result of an artist-level operation.
#[derive(Debug, Clone, Serialize)]
pub struct ArtistResult {
    /// Artist as written.
    pub artist: Artist,
    /// Artworks now accepted.
    pub accepted: Vec<String>,
    /// Artworks now rejected.
    pub rejected: Vec<String>,
    /// Number of document writes issued.
    pub writes: usize,
    /// Non-fatal problems.
    pub warnings: Vec<PartialApplicationWarning>,
    /// Notification emitted on acceptance, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<AcceptanceEvent>,
}

/// Result of a curation-order change.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResult {
    /// Show as written.
    pub show: Show,
    /// Number of document writes issued.
    pub writes: usize,
    /// Non-fatal problems.
    pub warnings: Vec<PartialApplicationWarning>,
}

macro_rules! impl_clean {
    ($($ty:ty),+) => {
        $(impl $ty {
            /// Whether the operation completed without warnings.
            pub fn is_clean(&self) -> bool {
                self.warnings.is_empty()
            }
        })+
    };
}

impl_clean!(AssignmentResult, ArtistResult, OrderResult);
