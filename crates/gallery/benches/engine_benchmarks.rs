//! Engine performance benchmarks.
//!
//! Measures single-artwork transitions, batch artist acceptance and the
//! consistency audit over galleries of growing size.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use gallery::{Artist, Artwork, ConsistencyEngine, EngineConfig, Location, MemoryStore, Show};

/// Gallery with one artist owning `artworks` artworks, two shows and a location.
fn gallery(artworks: usize, transactional: bool) -> (Arc<MemoryStore>, ConsistencyEngine, Vec<String>) {
    let store = MemoryStore::new().with_transactions(transactional);
    let ids: Vec<String> = (0..artworks).map(|i| format!("A{}", i)).collect();

    let mut artist = Artist::new("a1");
    artist.artworks = ids.iter().map(String::as_str).collect();
    store.put_entity(&artist).unwrap();
    for id in &ids {
        store.put_entity(&Artwork::new(id.as_str(), "a1")).unwrap();
    }
    store.put_entity(&Show::new("s1", "Spring")).unwrap();
    store.put_entity(&Show::new("s2", "Summer")).unwrap();
    store.put_entity(&Location::new("l1", "North Wall")).unwrap();

    let store = Arc::new(store);
    let engine = ConsistencyEngine::new(store.clone())
        .with_config(EngineConfig::default().with_transactions(transactional));
    (store, engine, ids)
}

/// Benchmark single-artwork transitions.
fn bench_single_artwork(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_artwork");

    for transactional in [true, false] {
        let (_store, engine, _) = gallery(4, transactional);
        let label = if transactional { "transactional" } else { "direct" };

        // Accept then reject
        group.bench_function(BenchmarkId::new("assign_reject", label), |b| {
            b.iter(|| {
                black_box(engine.assign_artwork("A0", "s1", Some("l1")).unwrap());
                black_box(engine.reject_artwork("A0").unwrap());
            })
        });

        // Idempotent repeat
        engine.assign_artwork("A1", "s1", None).unwrap();
        group.bench_function(BenchmarkId::new("repeat_assign", label), |b| {
            b.iter(|| black_box(engine.assign_artwork("A1", "s1", None).unwrap()))
        });
    }

    group.finish();
}

/// Benchmark batch acceptance of one artist with many artworks.
fn bench_accept_artist(c: &mut Criterion) {
    let mut group = c.benchmark_group("accept_artist");
    group.sample_size(20);

    for size in [10, 100, 500] {
        let (_store, engine, ids) = gallery(size, true);
        let selection: Vec<&str> = ids.iter().step_by(2).map(String::as_str).collect();
        let mut flip = false;

        group.bench_with_input(BenchmarkId::from_parameter(size), &selection, |b, selection| {
            b.iter(|| {
                // Alternate shows so every iteration moves the whole artist.
                flip = !flip;
                let show = if flip { "s1" } else { "s2" };
                black_box(
                    engine
                        .accept_artist_into_show("a1", show, Some("l1"), selection)
                        .unwrap(),
                )
            })
        });
    }

    group.finish();
}

/// Benchmark the consistency audit.
fn bench_audit(c: &mut Criterion) {
    let mut group = c.benchmark_group("audit");

    for size in [10, 100, 1000] {
        let (_store, engine, ids) = gallery(size, false);
        engine
            .accept_artist_into_show("a1", "s1", Some("l1"), &ids)
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &engine, |b, engine| {
            b.iter(|| black_box(engine.audit().unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_artwork, bench_accept_artist, bench_audit);
criterion_main!(benches);
