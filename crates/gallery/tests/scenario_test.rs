//! End-to-end curation scenarios against the in-memory store.

use std::sync::Arc;

use gallery::{
    Artist, ArtistStatus, Artwork, Assignment, Collection, ConsistencyEngine, DocumentStore,
    Location, MemoryStore, Show, ShowStatus,
};

/// Artist a1 owning A1 and A2, show s1, location l1.
fn gallery() -> (Arc<MemoryStore>, ConsistencyEngine) {
    let store = MemoryStore::new();

    let mut artist = Artist::new("a1");
    artist.artworks = ["A1", "A2"].into_iter().collect();
    store.put_entity(&artist).unwrap();
    store.put_entity(&Artwork::new("A1", "a1")).unwrap();
    store.put_entity(&Artwork::new("A2", "a1")).unwrap();
    store.put_entity(&Show::new("s1", "Spring")).unwrap();
    store.put_entity(&Location::new("l1", "North Wall")).unwrap();

    let store = Arc::new(store);
    let engine = ConsistencyEngine::new(store.clone());
    (store, engine)
}

#[test]
fn test_assign_artwork_updates_every_side() {
    let (store, engine) = gallery();

    let result = engine.assign_artwork("A1", "s1", Some("l1")).unwrap();
    assert!(result.is_clean());

    let a1: Artwork = store.expect_entity("A1").unwrap();
    assert_eq!(a1.show_status(), ShowStatus::Accepted);
    assert_eq!(a1.artshow_id(), Some("s1"));
    assert_eq!(a1.location_id(), Some("l1"));

    let s1: Show = store.expect_entity("s1").unwrap();
    assert_eq!(s1.artwork_ids, ["A1"]);
    assert_eq!(s1.artwork_order, ["A1"]);
    assert_eq!(s1.artist_ids, ["a1"]);

    let l1: Location = store.expect_entity("l1").unwrap();
    assert_eq!(l1.artwork_ids, ["A1"]);
    assert_eq!(l1.artist_ids, ["a1"]);
}

#[test]
fn test_reject_artwork_clears_references() {
    let (store, engine) = gallery();
    engine.assign_artwork("A1", "s1", Some("l1")).unwrap();

    engine.reject_artwork("A1").unwrap();

    let raw = store.get(Collection::Artworks, "A1").unwrap().unwrap();
    assert_eq!(raw["showStatus"], "rejected");
    assert_eq!(raw["artshowId"], "");
    assert_eq!(raw["locationId"], "");

    let s1: Show = store.expect_entity("s1").unwrap();
    assert!(s1.artwork_ids.is_empty());
    assert!(s1.artwork_order.is_empty());
    let l1: Location = store.expect_entity("l1").unwrap();
    assert!(l1.artwork_ids.is_empty());
}

#[test]
fn test_reorder_changes_sequence_not_membership() {
    let (store, engine) = gallery();
    engine.assign_artwork("A1", "s1", None).unwrap();
    engine.assign_artwork("A2", "s1", None).unwrap();
    let before: Show = store.expect_entity("s1").unwrap();
    assert_eq!(before.artwork_order, ["A1", "A2"]);

    let result = engine.reorder("s1", &["A2", "A1"]).unwrap();

    assert_eq!(result.show.artwork_order, ["A2", "A1"]);
    let after: Show = store.expect_entity("s1").unwrap();
    assert_eq!(after.artwork_order, ["A2", "A1"]);
    assert_eq!(after.artwork_ids, before.artwork_ids);
}

#[test]
fn test_reorder_rejects_ids_outside_the_show() {
    let (store, engine) = gallery();
    engine.assign_artwork("A1", "s1", None).unwrap();

    assert!(engine.reorder("s1", &["A1", "A2"]).is_err());
    assert!(engine.reorder("s1", &["A1", "A1"]).is_err());

    let s1: Show = store.expect_entity("s1").unwrap();
    assert_eq!(s1.artwork_order, ["A1"]);
}

#[test]
fn test_accept_artist_with_selection() {
    let (store, engine) = gallery();

    let result = engine
        .accept_artist_into_show("a1", "s1", Some("l1"), &["A1"])
        .unwrap();

    assert_eq!(result.accepted, vec!["A1".to_string()]);
    assert_eq!(result.rejected, vec!["A2".to_string()]);

    let a1: Artwork = store.expect_entity("A1").unwrap();
    assert!(a1.assignment.is_accepted_at("s1", Some("l1")));

    let a2: Artwork = store.expect_entity("A2").unwrap();
    assert_eq!(a2.assignment, Assignment::Rejected);
    let raw = store.get(Collection::Artworks, "A2").unwrap().unwrap();
    assert_eq!(raw["artshowId"], "");
    assert_eq!(raw["locationId"], "");

    let artist: Artist = store.expect_entity("a1").unwrap();
    assert_eq!(artist.status, ArtistStatus::Showing);
    assert_eq!(artist.artshow_id.as_deref(), Some("s1"));
}

#[test]
fn test_mark_shown_twice_records_show_once() {
    let (store, engine) = gallery();

    engine.mark_shown("A1", "s1").unwrap();
    let second = engine.mark_shown("A1", "s1").unwrap();

    assert_eq!(second.writes, 0);
    let a1: Artwork = store.expect_entity("A1").unwrap();
    assert_eq!(a1.show_status(), ShowStatus::Shown);
    assert_eq!(a1.been_in_shows, ["s1"]);
}

#[test]
fn test_full_season() {
    let (store, engine) = gallery();
    store.put_entity(&Show::new("s2", "Autumn")).unwrap();

    engine
        .accept_artist_into_show("a1", "s1", Some("l1"), &["A1", "A2"])
        .unwrap();
    engine.reorder("s1", &["A2", "A1"]).unwrap();
    engine.mark_shown("A1", "s1").unwrap();
    engine.mark_shown("A2", "s1").unwrap();
    engine.remove_artist_from_show("a1").unwrap();
    engine.assign_artwork("A1", "s2", None).unwrap();
    engine.mark_shown("A1", "s2").unwrap();

    let a1: Artwork = store.expect_entity("A1").unwrap();
    assert_eq!(a1.been_in_shows, ["s1", "s2"]);
    let a2: Artwork = store.expect_entity("A2").unwrap();
    assert_eq!(a2.been_in_shows, ["s1"]);
    assert_eq!(a2.assignment, Assignment::Rejected);

    let s1: Show = store.expect_entity("s1").unwrap();
    assert!(s1.artwork_ids.is_empty());
    assert!(s1.artist_ids.is_empty());

    let report = engine.audit().unwrap();
    assert!(report.is_clean(), "{:#?}", report.violations);
}
