//! Location documents.

use serde::{Deserialize, Serialize};

use crate::relation::{IdList, Related, Relation};
use crate::store::Collection;

use super::Entity;

/// A physical venue hosting artworks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub artist_ids: IdList,

    #[serde(default)]
    pub artwork_ids: IdList,
}

impl Location {
    /// Create an empty location.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artist_ids: IdList::new(),
            artwork_ids: IdList::new(),
        }
    }
}

impl Entity for Location {
    const COLLECTION: Collection = Collection::Locations;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Related for Location {
    fn members_mut(&mut self, relation: Relation) -> Option<&mut IdList> {
        match relation {
            Relation::LocationArtists => Some(&mut self.artist_ids),
            Relation::LocationArtworks => Some(&mut self.artwork_ids),
            _ => None,
        }
    }

    fn members(&self, relation: Relation) -> Option<&IdList> {
        match relation {
            Relation::LocationArtists => Some(&self.artist_ids),
            Relation::LocationArtworks => Some(&self.artwork_ids),
            _ => None,
        }
    }
}
