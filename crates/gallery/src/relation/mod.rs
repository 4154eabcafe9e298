//! Relationship storage.
//!
//! Every cross-entity reference that lives in an array is named by a
//! [`Relation`]: the owning collection plus the stored field. Engine code
//! mutates relations through [`Related::members_mut`] and the deduplicating
//! [`IdList`], never by editing raw arrays.

mod id_list;

pub use id_list::IdList;

use crate::store::Collection;

/// A stored many-valued relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `show.artistIds`
    ShowArtists,
    /// `show.artworkIds`
    ShowArtworks,
    /// `show.artworkOrder`
    ShowOrder,
    /// `location.artistIds`
    LocationArtists,
    /// `location.artworkIds`
    LocationArtworks,
    /// `artist.artworks` (ownership, not membership)
    ArtistArtworks,
}

impl Relation {
    /// Collection of the document that stores this relation.
    pub fn owner(&self) -> Collection {
        match self {
            Relation::ShowArtists | Relation::ShowArtworks | Relation::ShowOrder => {
                Collection::Shows
            }
            Relation::LocationArtists | Relation::LocationArtworks => Collection::Locations,
            Relation::ArtistArtworks => Collection::Artists,
        }
    }

    /// Stored field name.
    pub fn field(&self) -> &'static str {
        match self {
            Relation::ShowArtists | Relation::LocationArtists => "artistIds",
            Relation::ShowArtworks | Relation::LocationArtworks => "artworkIds",
            Relation::ShowOrder => "artworkOrder",
            Relation::ArtistArtworks => "artworks",
        }
    }
}

/// Documents that own relation arrays.
pub trait Related {
    /// Mutable access to the list stored for `relation`, if this document owns it.
    fn members_mut(&mut self, relation: Relation) -> Option<&mut IdList>;

    /// Shared access to the list stored for `relation`.
    fn members(&self, relation: Relation) -> Option<&IdList>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_fields() {
        assert_eq!(Relation::ShowOrder.field(), "artworkOrder");
        assert_eq!(Relation::LocationArtworks.owner(), Collection::Locations);
        assert_eq!(Relation::ArtistArtworks.owner(), Collection::Artists);
    }
}
