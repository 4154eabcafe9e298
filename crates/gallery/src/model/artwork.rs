//! Artwork documents.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::relation::IdList;
use crate::store::Collection;

use super::assignment::{Assignment, ShowStatus};
use super::{Entity, empty_string};

/// An artwork owned by one artist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ArtworkRecord", into = "ArtworkRecord")]
pub struct Artwork {
    /// Document id.
    pub id: String,

    /// Owning artist; fixed at creation.
    pub artist_id: String,

    /// Display title.
    pub title: Option<String>,

    /// Current placement.
    pub assignment: Assignment,

    /// Shows this artwork was exhibited in, oldest first.
    pub been_in_shows: IdList,

    /// Sold flag, never touched by the engine.
    pub sold: bool,

    /// Pending-sale flag, never touched by the engine.
    pub pending_sale: bool,
}

impl Artwork {
    /// Create an unassigned artwork.
    pub fn new(id: impl Into<String>, artist_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            artist_id: artist_id.into(),
            title: None,
            assignment: Assignment::None,
            been_in_shows: IdList::new(),
            sold: false,
            pending_sale: false,
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Stored `showStatus`.
    pub fn show_status(&self) -> ShowStatus {
        self.assignment.status()
    }

    /// Stored `artshowId`, if any.
    pub fn artshow_id(&self) -> Option<&str> {
        self.assignment.show_id()
    }

    /// Stored `locationId`, if any.
    pub fn location_id(&self) -> Option<&str> {
        self.assignment.location_id()
    }
}

impl Entity for Artwork {
    const COLLECTION: Collection = Collection::Artworks;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Input for creating an artwork.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewArtwork {
    /// Explicit id; generated when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl NewArtwork {
    /// New artwork with a generated id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Flat stored shape of an artwork.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArtworkRecord {
    id: String,
    #[serde(default)]
    artist_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default)]
    show_status: Option<String>,
    #[serde(default, with = "empty_string")]
    artshow_id: Option<String>,
    #[serde(default, with = "empty_string")]
    location_id: Option<String>,
    #[serde(default)]
    been_in_shows: IdList,
    #[serde(default)]
    sold: bool,
    #[serde(default)]
    pending_sale: bool,
}

impl From<ArtworkRecord> for Artwork {
    fn from(record: ArtworkRecord) -> Self {
        let raw_status = record.show_status.as_deref().unwrap_or("");
        let status = ShowStatus::parse(raw_status).unwrap_or_else(|| {
            warn!(artwork = %record.id, status = raw_status, "unknown showStatus, reading as none");
            ShowStatus::None
        });

        let (assignment, coerced) = Assignment::from_stored(
            status,
            record.artshow_id,
            record.location_id,
            record.been_in_shows.last(),
        );
        if coerced {
            warn!(
                artwork = %record.id,
                status = status.as_str(),
                "stored placement fields are inconsistent; read as {}",
                assignment.status().as_str()
            );
        }

        Artwork {
            id: record.id,
            artist_id: record.artist_id,
            title: record.title,
            assignment,
            been_in_shows: record.been_in_shows,
            sold: record.sold,
            pending_sale: record.pending_sale,
        }
    }
}

impl From<Artwork> for ArtworkRecord {
    fn from(artwork: Artwork) -> Self {
        let show_status = artwork.assignment.status().as_str().to_string();
        let artshow_id = artwork.assignment.show_id().map(str::to_string);
        let location_id = artwork.assignment.location_id().map(str::to_string);

        ArtworkRecord {
            id: artwork.id,
            artist_id: artwork.artist_id,
            title: artwork.title,
            show_status: Some(show_status),
            artshow_id,
            location_id,
            been_in_shows: artwork.been_in_shows,
            sold: artwork.sold,
            pending_sale: artwork.pending_sale,
        }
    }
}
