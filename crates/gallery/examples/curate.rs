//! Example: curate a small show and audit the result.
//!
//! Usage:
//!   cargo run --example curate -- [store_path]
//!
//! Without a path the gallery lives in memory only.

use std::env;
use std::sync::Arc;

use gallery::{Artist, Artwork, ConsistencyEngine, Location, MemoryStore, Show};

fn main() -> gallery::Result<()> {
    let store = Arc::new(MemoryStore::new());

    let mut artist = Artist::new("ada").with_name("Ada Park");
    artist.artworks = ["dusk", "harbor", "field"].into_iter().collect();
    store.put_entity(&artist)?;
    for id in ["dusk", "harbor", "field"] {
        store.put_entity(&Artwork::new(id, "ada"))?;
    }
    store.put_entity(&Show::new("spring", "Spring Salon"))?;
    store.put_entity(&Location::new("north", "North Wall"))?;

    let engine = ConsistencyEngine::new(store.clone());

    let accepted = engine.accept_artist_into_show("ada", "spring", Some("north"), &["dusk", "field"])?;
    println!(
        "Accepted {:?}, declined {:?} ({} writes)",
        accepted.accepted, accepted.rejected, accepted.writes
    );

    let ordered = engine.reorder("spring", &["field", "dusk"])?;
    println!("Order: {:?}", ordered.show.artwork_order.as_slice());

    engine.mark_shown("field", "spring")?;

    let report = engine.audit()?;
    println!(
        "Audit: {} documents, {} violations",
        report.documents_scanned,
        report.violations.len()
    );

    if let Some(path) = env::args().nth(1) {
        store.save(&path)?;
        println!("Saved to {}", path);
    }

    Ok(())
}
