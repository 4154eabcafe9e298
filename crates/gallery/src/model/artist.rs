//! Artist (user) documents.

use serde::{Deserialize, Serialize};

use crate::relation::{IdList, Related, Relation};
use crate::store::Collection;

use super::{Entity, empty_string, string_enum};

/// User role. Only artists and on-boarding users own artworks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArtistRole {
    #[default]
    Artist,
    OnBoarding,
    Other(String),
}

string_enum!(ArtistRole {
    Artist => "artist",
    OnBoarding => "on-boarding",
});

/// Artist workflow status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArtistStatus {
    #[default]
    Active,
    OnBoarding,
    Accepted,
    Showing,
    Shown,
    Rejected,
    Other(String),
}

string_enum!(ArtistStatus {
    Active => "active",
    OnBoarding => "on-boarding",
    Accepted => "accepted",
    Showing => "showing",
    Shown => "shown",
    Rejected => "rejected",
});

/// An artist and the artworks they own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub role: ArtistRole,

    #[serde(default)]
    pub status: ArtistStatus,

    /// Show the artist is currently placed in.
    #[serde(default, with = "empty_string")]
    pub artshow_id: Option<String>,

    /// Owned artworks (ownership, not show membership).
    #[serde(default)]
    pub artworks: IdList,
}

impl Artist {
    /// Create an active artist with no artworks.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            role: ArtistRole::Artist,
            status: ArtistStatus::Active,
            artshow_id: None,
            artworks: IdList::new(),
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: ArtistRole) -> Self {
        self.role = role;
        self
    }

    /// Status to fall back to when leaving a show.
    pub fn idle_status(&self) -> ArtistStatus {
        match self.role {
            ArtistRole::OnBoarding => ArtistStatus::OnBoarding,
            _ => ArtistStatus::Active,
        }
    }
}

impl Entity for Artist {
    const COLLECTION: Collection = Collection::Artists;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Related for Artist {
    fn members_mut(&mut self, relation: Relation) -> Option<&mut IdList> {
        match relation {
            Relation::ArtistArtworks => Some(&mut self.artworks),
            _ => None,
        }
    }

    fn members(&self, relation: Relation) -> Option<&IdList> {
        match relation {
            Relation::ArtistArtworks => Some(&self.artworks),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_idle_status_follows_role() {
        let artist = Artist::new("a1");
        assert_eq!(artist.idle_status(), ArtistStatus::Active);

        let onboarding = Artist::new("a2").with_role(ArtistRole::OnBoarding);
        assert_eq!(onboarding.idle_status(), ArtistStatus::OnBoarding);
    }

    #[test]
    fn test_reads_user_document() {
        let artist: Artist = serde_json::from_value(json!({
            "id": "a1",
            "role": "artist",
            "status": "showing",
            "artshowId": "s1",
            "artworks": ["A1", "A2"],
            "email": "ignored@example.com"
        }))
        .unwrap();

        assert_eq!(artist.status, ArtistStatus::Showing);
        assert_eq!(artist.artshow_id.as_deref(), Some("s1"));
        assert_eq!(artist.artworks, ["A1", "A2"]);
    }
}
