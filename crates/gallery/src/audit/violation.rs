//! Violation types reported by the audit.

use serde::{Deserialize, Serialize};

use crate::store::Collection;

/// Kind of inconsistency found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Accepted artwork missing from its show's or location's `artworkIds`.
    AcceptedNotMember,
    /// Membership entry for an artwork that is not placed there.
    StrayMember,
    /// Artist of an accepted artwork missing from `artistIds`.
    ArtistNotMember,
    /// `artworkOrder` entry that is not in `artworkIds`.
    OrderNotMember,
    /// The same id listed twice in one array.
    DuplicateEntry,
    /// Unassigned or rejected artwork still holding show/location references.
    UnplacedWithReferences,
    /// Artwork listed by more than one show or location.
    MultipleMemberships,
    /// Reference to a document that does not exist.
    DanglingReference,
    /// Stored status that does not match its references.
    InconsistentStatus,
}

impl ViolationKind {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ViolationKind::AcceptedNotMember => "Accepted Not Member",
            ViolationKind::StrayMember => "Stray Member",
            ViolationKind::ArtistNotMember => "Artist Not Member",
            ViolationKind::OrderNotMember => "Order Not Member",
            ViolationKind::DuplicateEntry => "Duplicate Entry",
            ViolationKind::UnplacedWithReferences => "Unplaced With References",
            ViolationKind::MultipleMemberships => "Multiple Memberships",
            ViolationKind::DanglingReference => "Dangling Reference",
            ViolationKind::InconsistentStatus => "Inconsistent Status",
        }
    }

    /// How serious this kind is.
    pub fn severity(&self) -> Severity {
        match self {
            ViolationKind::DanglingReference | ViolationKind::DuplicateEntry => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Severity level of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Leftover that does not break placement (e.g. a reference to a deleted document).
    Warning,
    /// Broken cross-entity invariant.
    Error,
}

/// One inconsistency, anchored on the document that shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    /// Collection of the document the violation was found on.
    pub collection: Collection,
    pub document_id: String,
    /// The other id involved, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<String>,
    pub description: String,
}

impl Violation {
    /// Create a violation.
    pub fn new(
        kind: ViolationKind,
        collection: Collection,
        document_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            collection,
            document_id: document_id.into(),
            related_id: None,
            description: description.into(),
        }
    }

    /// Set the related id.
    pub fn with_related(mut self, id: impl Into<String>) -> Self {
        self.related_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_violation() {
        let violation = Violation::new(
            ViolationKind::OrderNotMember,
            Collection::Shows,
            "s1",
            "order lists A9 but artworkIds does not",
        )
        .with_related("A9");

        assert_eq!(violation.severity, Severity::Error);
        assert_eq!(violation.related_id.as_deref(), Some("A9"));
        assert_eq!(
            ViolationKind::DanglingReference.severity(),
            Severity::Warning
        );
    }
}
