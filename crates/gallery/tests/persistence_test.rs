//! Store persistence tests: snapshot files and version history.

use std::thread;
use std::time::Duration;

use tempfile::TempDir;

use gallery::{Artwork, ConsistencyEngine, GalleryError, MemoryStore, Show, ShowStatus};

fn small_gallery() -> MemoryStore {
    let store = MemoryStore::new();
    store.put_entity(&Artwork::new("A1", "a1").with_title("Dusk")).unwrap();
    store.put_entity(&Show::new("s1", "Spring")).unwrap();
    store
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gallery.json");
    let store = small_gallery();

    store.save(&path).unwrap();
    let loaded = MemoryStore::load(&path).unwrap();

    let artwork: Artwork = loaded.expect_entity("A1").unwrap();
    assert_eq!(artwork.title.as_deref(), Some("Dusk"));
    let show: Show = loaded.expect_entity("s1").unwrap();
    assert_eq!(show.name, "Spring");
}

#[test]
fn test_save_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("gallery.json");

    small_gallery().save(&path).unwrap();

    assert!(path.exists());
}

#[test]
fn test_engine_changes_survive_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gallery.json");
    small_gallery().save(&path).unwrap();

    let store = std::sync::Arc::new(MemoryStore::load(&path).unwrap());
    let engine = ConsistencyEngine::new(store.clone());
    engine.assign_artwork("A1", "s1", None).unwrap();
    store.save(&path).unwrap();

    let reloaded = MemoryStore::load(&path).unwrap();
    let artwork: Artwork = reloaded.expect_entity("A1").unwrap();
    assert_eq!(artwork.show_status(), ShowStatus::Accepted);
    let show: Show = reloaded.expect_entity("s1").unwrap();
    assert_eq!(show.artwork_order, ["A1"]);
}

#[test]
fn test_history_keeps_previous_versions() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gallery.json");
    let store = small_gallery();

    store.save_with_history(&path).unwrap();
    assert!(MemoryStore::list_history(&path).unwrap().is_empty());

    thread::sleep(Duration::from_millis(5));
    store.put_entity(&Show::new("s2", "Summer")).unwrap();
    store.save_with_history(&path).unwrap();

    thread::sleep(Duration::from_millis(5));
    store.put_entity(&Show::new("s3", "Autumn")).unwrap();
    store.save_with_history(&path).unwrap();

    let history = MemoryStore::list_history(&path).unwrap();
    assert_eq!(history.len(), 2);
    assert!(dir.path().join("gallery.history").is_dir());

    // Newest first: the version that already had s2.
    let newest = MemoryStore::load_history(&path, 0).unwrap();
    assert!(newest.entity::<Show>("s2").unwrap().is_some());
    assert!(newest.entity::<Show>("s3").unwrap().is_none());

    let oldest = MemoryStore::load_history(&path, 1).unwrap();
    assert!(oldest.entity::<Show>("s2").unwrap().is_none());
}

#[test]
fn test_missing_history_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gallery.json");
    small_gallery().save_with_history(&path).unwrap();

    let err = MemoryStore::load_history(&path, 0).err().unwrap();
    assert!(matches!(err, GalleryError::Persistence(_)));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = MemoryStore::load(dir.path().join("absent.json")).err().unwrap();
    assert!(matches!(err, GalleryError::Persistence(_)));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn test_load_rejects_malformed_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gallery.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        MemoryStore::load(&path),
        Err(GalleryError::Persistence(_))
    ));
}
