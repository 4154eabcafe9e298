//! Audit scan.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::model::{Artist, Entity, Location, Show};
use crate::relation::IdList;
use crate::store::{Collection, Document, DocumentStore, Predicate};

use super::violation::{Severity, Violation, ViolationKind};

/// Result of an audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Everything found, grouped by the scan that found it.
    pub violations: Vec<Violation>,
    /// Documents read across all collections.
    pub documents_scanned: usize,
    /// When the audit ran.
    pub audited_at: DateTime<Utc>,
}

impl AuditReport {
    /// Whether no violation was found.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of violations of one kind.
    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Violations of error severity.
    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations
            .iter()
            .filter(|v| v.severity == Severity::Error)
    }
}

/// Scan every collection of `store` for cross-entity inconsistencies.
pub fn audit(store: &dyn DocumentStore) -> Result<AuditReport> {
    let artwork_docs = store.query(Collection::Artworks, &Predicate::all())?;
    let shows: Vec<Show> = load(store)?;
    let locations: Vec<Location> = load(store)?;
    let artists: Vec<Artist> = load(store)?;

    let artworks: Vec<RawArtwork> = artwork_docs
        .iter()
        .filter_map(RawArtwork::from_document)
        .collect();

    let documents_scanned = artwork_docs.len() + shows.len() + locations.len() + artists.len();

    let mut scan = Scan::new(&artworks, &shows, &locations, &artists);
    scan.artworks();
    scan.shows();
    scan.locations();
    scan.artists();
    scan.exclusive_membership();

    debug!(
        documents = documents_scanned,
        violations = scan.violations.len(),
        "audit finished"
    );

    Ok(AuditReport {
        violations: scan.violations,
        documents_scanned,
        audited_at: Utc::now(),
    })
}

fn load<T: Entity>(store: &dyn DocumentStore) -> Result<Vec<T>> {
    store
        .query(T::COLLECTION, &Predicate::all())?
        .into_iter()
        .map(|doc| serde_json::from_value(doc).map_err(Into::into))
        .collect()
}

/// Placement fields exactly as stored.
struct RawArtwork {
    id: String,
    artist_id: Option<String>,
    status: String,
    show: Option<String>,
    location: Option<String>,
}

impl RawArtwork {
    fn from_document(doc: &Document) -> Option<Self> {
        Some(Self {
            id: text(doc, "id")?,
            artist_id: text(doc, "artistId"),
            status: text(doc, "showStatus")
                .map(|s| s.to_ascii_lowercase())
                .unwrap_or_else(|| "none".to_string()),
            show: text(doc, "artshowId"),
            location: text(doc, "locationId"),
        })
    }
}

fn text(doc: &Document, field: &str) -> Option<String> {
    doc.get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

struct Scan<'a> {
    artworks: &'a [RawArtwork],
    shows: &'a [Show],
    locations: &'a [Location],
    artists: &'a [Artist],
    artwork_index: HashMap<&'a str, &'a RawArtwork>,
    show_index: HashMap<&'a str, &'a Show>,
    location_index: HashMap<&'a str, &'a Location>,
    artist_ids: HashSet<&'a str>,
    violations: Vec<Violation>,
}

impl<'a> Scan<'a> {
    fn new(
        artworks: &'a [RawArtwork],
        shows: &'a [Show],
        locations: &'a [Location],
        artists: &'a [Artist],
    ) -> Self {
        Self {
            artworks,
            shows,
            locations,
            artists,
            artwork_index: artworks.iter().map(|a| (a.id.as_str(), a)).collect(),
            show_index: shows.iter().map(|s| (s.id.as_str(), s)).collect(),
            location_index: locations.iter().map(|l| (l.id.as_str(), l)).collect(),
            artist_ids: artists.iter().map(|a| a.id.as_str()).collect(),
            violations: Vec::new(),
        }
    }

    fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    fn dangling(
        &mut self,
        collection: Collection,
        document_id: &str,
        field: &str,
        target: Collection,
        target_id: &str,
    ) {
        self.push(
            Violation::new(
                ViolationKind::DanglingReference,
                collection,
                document_id,
                format!("{} references {} '{}' which does not exist", field, target, target_id),
            )
            .with_related(target_id),
        );
    }

    /// Artwork-side checks: status against references.
    fn artworks(&mut self) {
        for artwork in self.artworks {
            match &artwork.artist_id {
                Some(artist_id) if !self.artist_ids.contains(artist_id.as_str()) => self.dangling(
                    Collection::Artworks,
                    &artwork.id,
                    "artistId",
                    Collection::Artists,
                    artist_id,
                ),
                None => self.push(Violation::new(
                    ViolationKind::InconsistentStatus,
                    Collection::Artworks,
                    &artwork.id,
                    "artwork has no artistId",
                )),
                Some(_) => {}
            }

            match artwork.status.as_str() {
                "accepted" => self.accepted(artwork),
                "shown" => match &artwork.show {
                    None => self.push(Violation::new(
                        ViolationKind::InconsistentStatus,
                        Collection::Artworks,
                        &artwork.id,
                        "shown without artshowId",
                    )),
                    Some(show_id) if !self.show_index.contains_key(show_id.as_str()) => self
                        .dangling(
                            Collection::Artworks,
                            &artwork.id,
                            "artshowId",
                            Collection::Shows,
                            show_id,
                        ),
                    Some(_) => {}
                },
                "none" | "rejected" => {
                    if artwork.show.is_some() || artwork.location.is_some() {
                        self.push(Violation::new(
                            ViolationKind::UnplacedWithReferences,
                            Collection::Artworks,
                            &artwork.id,
                            format!(
                                "{} artwork still references show '{}' / location '{}'",
                                artwork.status,
                                artwork.show.as_deref().unwrap_or(""),
                                artwork.location.as_deref().unwrap_or("")
                            ),
                        ));
                    }
                }
                other => self.push(Violation::new(
                    ViolationKind::InconsistentStatus,
                    Collection::Artworks,
                    &artwork.id,
                    format!("unknown showStatus '{}'", other),
                )),
            }
        }
    }

    fn accepted(&mut self, artwork: &'a RawArtwork) {
        let Some(show_id) = &artwork.show else {
            self.push(Violation::new(
                ViolationKind::InconsistentStatus,
                Collection::Artworks,
                &artwork.id,
                "accepted without artshowId",
            ));
            return;
        };

        match self.show_index.get(show_id.as_str()).copied() {
            None => self.dangling(
                Collection::Artworks,
                &artwork.id,
                "artshowId",
                Collection::Shows,
                show_id,
            ),
            Some(show) => {
                if !show.artwork_ids.contains(&artwork.id) {
                    self.push(
                        Violation::new(
                            ViolationKind::AcceptedNotMember,
                            Collection::Artworks,
                            &artwork.id,
                            format!("accepted into show '{}' but missing from its artworkIds", show_id),
                        )
                        .with_related(show_id),
                    );
                }
                self.artist_member(Collection::Shows, &show.id, &show.artist_ids, artwork);
            }
        }

        let Some(location_id) = &artwork.location else {
            return;
        };
        match self.location_index.get(location_id.as_str()).copied() {
            None => self.dangling(
                Collection::Artworks,
                &artwork.id,
                "locationId",
                Collection::Locations,
                location_id,
            ),
            Some(location) => {
                if !location.artwork_ids.contains(&artwork.id) {
                    self.push(
                        Violation::new(
                            ViolationKind::AcceptedNotMember,
                            Collection::Artworks,
                            &artwork.id,
                            format!(
                                "accepted at location '{}' but missing from its artworkIds",
                                location_id
                            ),
                        )
                        .with_related(location_id),
                    );
                }
                self.artist_member(
                    Collection::Locations,
                    &location.id,
                    &location.artist_ids,
                    artwork,
                );
            }
        }
    }

    fn artist_member(
        &mut self,
        collection: Collection,
        owner_id: &str,
        artist_ids: &IdList,
        artwork: &RawArtwork,
    ) {
        let Some(artist_id) = &artwork.artist_id else {
            return;
        };
        if !artist_ids.contains(artist_id) {
            self.push(
                Violation::new(
                    ViolationKind::ArtistNotMember,
                    collection,
                    owner_id,
                    format!(
                        "artist '{}' of accepted artwork '{}' missing from artistIds",
                        artist_id, artwork.id
                    ),
                )
                .with_related(artist_id),
            );
        }
    }

    fn duplicates(&mut self, collection: Collection, owner_id: &str, field: &str, list: &IdList) {
        for id in list.duplicates() {
            self.push(
                Violation::new(
                    ViolationKind::DuplicateEntry,
                    collection,
                    owner_id,
                    format!("{} lists '{}' more than once", field, id),
                )
                .with_related(id),
            );
        }
    }

    /// Membership entries must point at existing artworks placed there.
    fn members(&mut self, collection: Collection, owner_id: &str, list: &IdList) {
        for artwork_id in list.iter() {
            let placed_here = match self.artwork_index.get(artwork_id).copied() {
                None => {
                    self.dangling(collection, owner_id, "artworkIds", Collection::Artworks, artwork_id);
                    continue;
                }
                Some(artwork) => match collection {
                    Collection::Locations => artwork.location.as_deref() == Some(owner_id),
                    _ => artwork.show.as_deref() == Some(owner_id),
                },
            };
            if !placed_here {
                self.push(
                    Violation::new(
                        ViolationKind::StrayMember,
                        collection,
                        owner_id,
                        format!("artworkIds lists '{}' which is not placed here", artwork_id),
                    )
                    .with_related(artwork_id),
                );
            }
        }
    }

    fn artist_refs(&mut self, collection: Collection, owner_id: &str, list: &IdList) {
        for artist_id in list.iter() {
            if !self.artist_ids.contains(artist_id) {
                self.dangling(collection, owner_id, "artistIds", Collection::Artists, artist_id);
            }
        }
    }

    fn shows(&mut self) {
        for show in self.shows {
            self.duplicates(Collection::Shows, &show.id, "artworkIds", &show.artwork_ids);
            self.duplicates(Collection::Shows, &show.id, "artistIds", &show.artist_ids);
            self.duplicates(Collection::Shows, &show.id, "artworkOrder", &show.artwork_order);
            self.members(Collection::Shows, &show.id, &show.artwork_ids);
            self.artist_refs(Collection::Shows, &show.id, &show.artist_ids);

            for artwork_id in show.orphaned_order_entries() {
                self.push(
                    Violation::new(
                        ViolationKind::OrderNotMember,
                        Collection::Shows,
                        &show.id,
                        format!("artworkOrder lists '{}' which is not in artworkIds", artwork_id),
                    )
                    .with_related(artwork_id),
                );
            }
        }
    }

    fn locations(&mut self) {
        for location in self.locations {
            self.duplicates(
                Collection::Locations,
                &location.id,
                "artworkIds",
                &location.artwork_ids,
            );
            self.duplicates(
                Collection::Locations,
                &location.id,
                "artistIds",
                &location.artist_ids,
            );
            self.members(Collection::Locations, &location.id, &location.artwork_ids);
            self.artist_refs(Collection::Locations, &location.id, &location.artist_ids);
        }
    }

    fn artists(&mut self) {
        for artist in self.artists {
            for artwork_id in artist.artworks.iter() {
                if !self.artwork_index.contains_key(artwork_id) {
                    self.dangling(
                        Collection::Artists,
                        &artist.id,
                        "artworks",
                        Collection::Artworks,
                        artwork_id,
                    );
                }
            }
            if let Some(show_id) = &artist.artshow_id {
                if !self.show_index.contains_key(show_id.as_str()) {
                    self.dangling(
                        Collection::Artists,
                        &artist.id,
                        "artshowId",
                        Collection::Shows,
                        show_id,
                    );
                }
            }
        }
    }

    /// An artwork may be a member of at most one show and one location.
    fn exclusive_membership(&mut self) {
        let show_lists = self.shows.iter().map(|s| (s.id.as_str(), &s.artwork_ids));
        let location_lists = self
            .locations
            .iter()
            .map(|l| (l.id.as_str(), &l.artwork_ids));

        let shared_shows = shared_members(show_lists);
        let shared_locations = shared_members(location_lists);

        for (collection, shared) in [
            (Collection::Shows, shared_shows),
            (Collection::Locations, shared_locations),
        ] {
            for (artwork_id, owners) in shared {
                self.push(
                    Violation::new(
                        ViolationKind::MultipleMemberships,
                        Collection::Artworks,
                        artwork_id,
                        format!("listed by {} {}", collection, owners.join(", ")),
                    )
                    .with_related(owners.join(",")),
                );
            }
        }
    }
}

/// Artwork ids that appear in more than one owner's list, with the owners.
fn shared_members<'a>(
    lists: impl Iterator<Item = (&'a str, &'a IdList)>,
) -> BTreeMap<&'a str, Vec<&'a str>> {
    let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for (owner_id, list) in lists {
        for artwork_id in list.iter() {
            let entry = owners.entry(artwork_id).or_default();
            if !entry.contains(&owner_id) {
                entry.push(owner_id);
            }
        }
    }
    owners.retain(|_, owners| owners.len() > 1);
    owners
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Artwork, Assignment};
    use crate::store::MemoryStore;
    use serde_json::json;

    fn consistent_store() -> MemoryStore {
        let store = MemoryStore::new();
        let mut artwork = Artwork::new("A1", "a1");
        artwork.assignment = Assignment::accepted("s1", Some("l1"));
        store.put_entity(&artwork).unwrap();

        let mut show = Show::new("s1", "Spring");
        show.artwork_ids.insert("A1");
        show.artwork_order.insert("A1");
        show.artist_ids.insert("a1");
        store.put_entity(&show).unwrap();

        let mut location = Location::new("l1", "North wall");
        location.artwork_ids.insert("A1");
        location.artist_ids.insert("a1");
        store.put_entity(&location).unwrap();

        let mut artist = Artist::new("a1");
        artist.artworks.insert("A1");
        store.put_entity(&artist).unwrap();
        store
    }

    #[test]
    fn test_consistent_store_is_clean() {
        let report = audit(&consistent_store()).unwrap();
        assert!(report.is_clean(), "{:?}", report.violations);
        assert_eq!(report.documents_scanned, 4);
    }

    #[test]
    fn test_detects_seeded_violations() {
        let store = consistent_store();
        store
            .put_entity(&{
                let mut show = Show::new("s2", "Autumn");
                show.artwork_ids.insert("A1");
                show.artwork_order.insert("A1");
                show.artwork_order.insert("A7");
                show
            })
            .unwrap();
        store
            .insert(
                Collection::Artworks,
                "A2",
                json!({"artistId": "a1", "showStatus": "rejected", "artshowId": "s1"}),
            )
            .unwrap();
        store
            .insert(
                Collection::Artworks,
                "A3",
                json!({"artistId": "a1", "showStatus": "accepted", "artshowId": ""}),
            )
            .unwrap();

        let report = audit(&store).unwrap();
        assert_eq!(report.count(ViolationKind::StrayMember), 1);
        assert_eq!(report.count(ViolationKind::OrderNotMember), 1);
        assert_eq!(report.count(ViolationKind::MultipleMemberships), 1);
        assert_eq!(report.count(ViolationKind::UnplacedWithReferences), 1);
        assert_eq!(report.count(ViolationKind::InconsistentStatus), 1);
        assert!(report.errors().count() >= 5);
    }

    #[test]
    fn test_detects_missing_memberships() {
        let store = consistent_store();
        store
            .update(
                Collection::Shows,
                "s1",
                &json!({"artworkIds": [], "artistIds": [], "artworkOrder": []})
                    .as_object()
                    .cloned()
                    .unwrap(),
            )
            .unwrap();

        let report = audit(&store).unwrap();
        assert_eq!(report.count(ViolationKind::AcceptedNotMember), 1);
        assert_eq!(report.count(ViolationKind::ArtistNotMember), 1);
    }

    #[test]
    fn test_dangling_references_are_warnings() {
        let store = consistent_store();
        store
            .update(
                Collection::Artists,
                "a1",
                &json!({"artworks": ["A1", "gone"]}).as_object().cloned().unwrap(),
            )
            .unwrap();

        let report = audit(&store).unwrap();
        assert_eq!(report.count(ViolationKind::DanglingReference), 1);
        assert_eq!(report.errors().count(), 0);
    }
}
