//! Property-based tests for the consistency engine.
//!
//! These tests use proptest to drive random sequences of curation
//! operations over a small gallery and verify that the stored documents
//! stay mutually consistent after every step.
//!
//! # Testing Philosophy
//!
//! Property-based tests verify:
//! 1. **No failures**: Well-formed operations on existing documents succeed
//! 2. **Consistency**: The audit finds nothing after any operation
//! 3. **Idempotence**: Repeating an assignment writes nothing
//! 4. **Cleanup**: Rejection and removal leave no references behind
//!
//! # Running Property Tests
//!
//! ```bash
//! # Run all property tests
//! cargo test -p gallery --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p gallery --test property_tests
//! ```

use std::sync::Arc;

use proptest::prelude::*;

use gallery::{
    Artist, Artwork, Assignment, ConsistencyEngine, EngineConfig, Location, MemoryStore, Show,
};

// =============================================================================
// Test Strategies
// =============================================================================

const ARTISTS: [(&str, [&str; 2]); 2] = [("a1", ["A1", "A2"]), ("a2", ["A3", "A4"])];
const ARTWORKS: [&str; 4] = ["A1", "A2", "A3", "A4"];
const SHOWS: [&str; 2] = ["s1", "s2"];
const LOCATIONS: [&str; 2] = ["l1", "l2"];

#[derive(Debug, Clone)]
enum Op {
    Assign {
        artwork: usize,
        show: usize,
        location: Option<usize>,
    },
    Reject {
        artwork: usize,
    },
    Reassign {
        artwork: usize,
        show: usize,
        location: Option<usize>,
    },
    MarkShown {
        artwork: usize,
        show: usize,
    },
    AcceptArtist {
        artist: usize,
        show: usize,
        location: Option<usize>,
        selection: u8,
    },
    RemoveArtist {
        artist: usize,
    },
    Reorder {
        show: usize,
        rotate: usize,
    },
}

fn artwork_index() -> impl Strategy<Value = usize> {
    0..ARTWORKS.len()
}

fn show_index() -> impl Strategy<Value = usize> {
    0..SHOWS.len()
}

fn location_index() -> impl Strategy<Value = Option<usize>> {
    proptest::option::of(0..LOCATIONS.len())
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (artwork_index(), show_index(), location_index()).prop_map(
            |(artwork, show, location)| Op::Assign { artwork, show, location }
        ),
        2 => artwork_index().prop_map(|artwork| Op::Reject { artwork }),
        2 => (artwork_index(), show_index(), location_index()).prop_map(
            |(artwork, show, location)| Op::Reassign { artwork, show, location }
        ),
        1 => (artwork_index(), show_index())
            .prop_map(|(artwork, show)| Op::MarkShown { artwork, show }),
        2 => (0..ARTISTS.len(), show_index(), location_index(), 0u8..4).prop_map(
            |(artist, show, location, selection)| Op::AcceptArtist {
                artist,
                show,
                location,
                selection,
            }
        ),
        1 => (0..ARTISTS.len()).prop_map(|artist| Op::RemoveArtist { artist }),
        1 => (show_index(), 0usize..4).prop_map(|(show, rotate)| Op::Reorder { show, rotate }),
    ]
}

// =============================================================================
// Helpers
// =============================================================================

fn gallery(transactional: bool) -> (Arc<MemoryStore>, ConsistencyEngine) {
    let store = MemoryStore::new().with_transactions(transactional);
    for (artist_id, artworks) in ARTISTS {
        let mut artist = Artist::new(artist_id);
        artist.artworks = artworks.into_iter().collect();
        store.put_entity(&artist).unwrap();
        for artwork_id in artworks {
            store.put_entity(&Artwork::new(artwork_id, artist_id)).unwrap();
        }
    }
    for id in SHOWS {
        store.put_entity(&Show::new(id, id.to_uppercase())).unwrap();
    }
    for id in LOCATIONS {
        store.put_entity(&Location::new(id, id.to_uppercase())).unwrap();
    }

    let store = Arc::new(store);
    let engine = ConsistencyEngine::new(store.clone())
        .with_config(EngineConfig::default().with_transactions(transactional));
    (store, engine)
}

fn apply(store: &MemoryStore, engine: &ConsistencyEngine, op: &Op) -> gallery::Result<()> {
    let location = |index: &Option<usize>| index.map(|i| LOCATIONS[i]);
    match op {
        Op::Assign {
            artwork,
            show,
            location: loc,
        } => engine
            .assign_artwork(ARTWORKS[*artwork], SHOWS[*show], location(loc))
            .map(drop),
        Op::Reject { artwork } => engine.reject_artwork(ARTWORKS[*artwork]).map(drop),
        Op::Reassign {
            artwork,
            show,
            location: loc,
        } => engine
            .reassign_artwork(ARTWORKS[*artwork], SHOWS[*show], location(loc))
            .map(drop),
        Op::MarkShown { artwork, show } => {
            engine.mark_shown(ARTWORKS[*artwork], SHOWS[*show]).map(drop)
        }
        Op::AcceptArtist {
            artist,
            show,
            location: loc,
            selection,
        } => {
            let (artist_id, artworks) = ARTISTS[*artist];
            let chosen: Vec<&str> = artworks
                .iter()
                .enumerate()
                .filter(|(bit, _)| (*selection >> *bit) & 1 == 1)
                .map(|(_, id)| *id)
                .collect();
            engine
                .accept_artist_into_show(artist_id, SHOWS[*show], location(loc), &chosen)
                .map(drop)
        }
        Op::RemoveArtist { artist } => engine.remove_artist_from_show(ARTISTS[*artist].0).map(drop),
        Op::Reorder { show, rotate } => {
            let current: Show = store.expect_entity(SHOWS[*show])?;
            let mut order = current.artwork_ids.into_vec();
            if !order.is_empty() {
                let by = rotate % order.len();
                order.rotate_left(by);
            }
            engine.reorder(SHOWS[*show], &order).map(drop)
        }
    }
}

fn assert_consistent(engine: &ConsistencyEngine, op: &Op) -> Result<(), TestCaseError> {
    let report = engine.audit().map_err(|e| TestCaseError::fail(e.to_string()))?;
    prop_assert!(
        report.is_clean(),
        "after {:?}: {:#?}",
        op,
        report.violations
    );
    Ok(())
}

// =============================================================================
// Consistency Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any operation sequence leaves the gallery consistent, with transactions.
    #[test]
    fn random_operations_stay_consistent_transactional(ops in prop::collection::vec(op(), 1..24)) {
        let (store, engine) = gallery(true);
        for op in &ops {
            let applied = apply(&store, &engine, op);
            prop_assert!(applied.is_ok(), "{:?} failed: {:?}", op, applied);
            assert_consistent(&engine, op)?;
        }
    }

    /// Any operation sequence leaves the gallery consistent, without transactions.
    #[test]
    fn random_operations_stay_consistent_direct(ops in prop::collection::vec(op(), 1..24)) {
        let (store, engine) = gallery(false);
        for op in &ops {
            let applied = apply(&store, &engine, op);
            prop_assert!(applied.is_ok(), "{:?} failed: {:?}", op, applied);
            assert_consistent(&engine, op)?;
        }
    }
}

// =============================================================================
// Operation Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Assigning then rejecting clears references and membership.
    #[test]
    fn assign_then_reject_clears_everything(
        history in prop::collection::vec(op(), 0..12),
        artwork in artwork_index(),
        show in show_index(),
        location in location_index(),
    ) {
        let (store, engine) = gallery(true);
        for op in &history {
            apply(&store, &engine, op).unwrap();
        }
        let artwork_id = ARTWORKS[artwork];

        engine.assign_artwork(artwork_id, SHOWS[show], location.map(|i| LOCATIONS[i])).unwrap();
        engine.reject_artwork(artwork_id).unwrap();

        let stored: Artwork = store.expect_entity(artwork_id).unwrap();
        prop_assert_eq!(stored.assignment, Assignment::Rejected);
        for id in SHOWS {
            let show: Show = store.expect_entity(id).unwrap();
            prop_assert!(!show.artwork_ids.contains(artwork_id));
            prop_assert!(!show.artwork_order.contains(artwork_id));
        }
        for id in LOCATIONS {
            let location: Location = store.expect_entity(id).unwrap();
            prop_assert!(!location.artwork_ids.contains(artwork_id));
        }
    }

    /// A repeated assignment writes nothing and changes nothing.
    #[test]
    fn repeated_assignment_is_a_no_op(
        history in prop::collection::vec(op(), 0..12),
        artwork in artwork_index(),
        show in show_index(),
        location in location_index(),
    ) {
        let (store, engine) = gallery(false);
        for op in &history {
            apply(&store, &engine, op).unwrap();
        }
        let location = location.map(|i| LOCATIONS[i]);

        engine.assign_artwork(ARTWORKS[artwork], SHOWS[show], location).unwrap();
        let before = store.snapshot().unwrap().collections;
        let again = engine.assign_artwork(ARTWORKS[artwork], SHOWS[show], location).unwrap();
        let after = store.snapshot().unwrap().collections;

        prop_assert_eq!(again.writes, 0);
        prop_assert_eq!(before, after);
    }

    /// Removing an artist leaves none of their artworks placed.
    #[test]
    fn remove_artist_unplaces_every_artwork(
        history in prop::collection::vec(op(), 0..16),
        artist in 0..ARTISTS.len(),
    ) {
        let (store, engine) = gallery(true);
        for op in &history {
            apply(&store, &engine, op).unwrap();
        }
        let (artist_id, artworks) = ARTISTS[artist];

        engine.remove_artist_from_show(artist_id).unwrap();

        for artwork_id in artworks {
            let stored: Artwork = store.expect_entity(artwork_id).unwrap();
            prop_assert!(stored.artshow_id().is_none(), "{} still placed", artwork_id);
            prop_assert!(stored.location_id().is_none());
        }
        let stored: Artist = store.expect_entity(artist_id).unwrap();
        prop_assert!(stored.artshow_id.is_none());
    }
}
