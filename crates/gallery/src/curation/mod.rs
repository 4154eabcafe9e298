//! Curation order of a show.
//!
//! `artworkOrder` is the curated display sequence. It never holds an id
//! twice and, under strict ordering, only holds ids that are members of the
//! show. Assignment keeps it in step automatically (append on accept, filter
//! on reject); curators replace it wholesale with [`CurationOrderer::reorder`].
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use gallery::{ConsistencyEngine, MemoryStore};
//!
//! let engine = ConsistencyEngine::new(Arc::new(MemoryStore::new()));
//! let result = engine.orderer().reorder("s1", &["A2", "A1"]).unwrap();
//! println!("New order: {:?}", result.show.artwork_order);
//! ```

mod order;

pub use order::{CurationOrderer, validate_order};
pub(crate) use order::{append_to_order, remove_from_order};
