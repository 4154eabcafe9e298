//! Show documents.

use serde::{Deserialize, Serialize};

use crate::relation::{IdList, Related, Relation};
use crate::store::Collection;

use super::{Entity, string_enum};

/// Whether a show is currently running.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShowState {
    #[default]
    Active,
    Inactive,
    Other(String),
}

string_enum!(ShowState {
    Active => "active",
    Inactive => "inactive",
});

/// An exhibition.
///
/// `artist_ids` and `artwork_ids` are unordered membership sets;
/// `artwork_order` is the curated display sequence and must stay a subset of
/// `artwork_ids`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub status: ShowState,

    #[serde(default)]
    pub artist_ids: IdList,

    #[serde(default)]
    pub artwork_ids: IdList,

    #[serde(default)]
    pub artwork_order: IdList,
}

impl Show {
    /// Create an empty active show.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: ShowState::Active,
            artist_ids: IdList::new(),
            artwork_ids: IdList::new(),
            artwork_order: IdList::new(),
        }
    }

    /// Order entries that are not members of the show.
    pub fn orphaned_order_entries(&self) -> Vec<&str> {
        self.artwork_order
            .iter()
            .filter(|id| !self.artwork_ids.contains(id))
            .collect()
    }
}

impl Entity for Show {
    const COLLECTION: Collection = Collection::Shows;

    fn id(&self) -> &str {
        &self.id
    }
}

impl Related for Show {
    fn members_mut(&mut self, relation: Relation) -> Option<&mut IdList> {
        match relation {
            Relation::ShowArtists => Some(&mut self.artist_ids),
            Relation::ShowArtworks => Some(&mut self.artwork_ids),
            Relation::ShowOrder => Some(&mut self.artwork_order),
            _ => None,
        }
    }

    fn members(&self, relation: Relation) -> Option<&IdList> {
        match relation {
            Relation::ShowArtists => Some(&self.artist_ids),
            Relation::ShowArtworks => Some(&self.artwork_ids),
            Relation::ShowOrder => Some(&self.artwork_order),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_arrays_read_as_empty() {
        let show: Show = serde_json::from_value(json!({"id": "s1", "name": "Spring"})).unwrap();
        assert!(show.artwork_ids.is_empty());
        assert!(show.artwork_order.is_empty());
        assert_eq!(show.status, ShowState::Active);
    }

    #[test]
    fn test_unknown_status_round_trips() {
        let show: Show =
            serde_json::from_value(json!({"id": "s1", "status": "archived"})).unwrap();
        assert_eq!(show.status, ShowState::Other("archived".to_string()));
        assert_eq!(serde_json::to_value(&show).unwrap()["status"], "archived");
    }

    #[test]
    fn test_orphaned_order_entries() {
        let mut show = Show::new("s1", "Spring");
        show.artwork_ids.insert("A1");
        show.artwork_order.insert("A1");
        show.artwork_order.insert("A2");
        assert_eq!(show.orphaned_order_entries(), vec!["A2"]);
    }
}
