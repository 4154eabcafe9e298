//! Gallery: relational consistency for a show-curation document store.
//!
//! Artworks, shows, locations and artists live in a schemaless document
//! store and reference each other through id fields and id arrays. The
//! store enforces none of those references. This crate is the layer that
//! keeps them mutually consistent when artworks are accepted, rejected,
//! moved, exhibited, created or deleted.
//!
//! # Core Principles
//!
//! - **One operation, one plan**: every change is computed in memory first and
//!   written as a single ordered set of field updates
//! - **Transactional when possible**: with a transactional store an operation
//!   commits atomically and is retried on conflict
//! - **Honest partial results**: missing secondary documents are reported as
//!   warnings instead of being silently skipped
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gallery::{ConsistencyEngine, MemoryStore};
//!
//! let store = Arc::new(MemoryStore::load("gallery.json").unwrap());
//! let engine = ConsistencyEngine::new(store);
//!
//! let result = engine
//!     .accept_artist_into_show("a1", "s1", Some("l1"), &["A1", "A3"])
//!     .unwrap();
//! println!("Accepted: {:?}", result.accepted);
//! println!("Declined: {:?}", result.rejected);
//!
//! let report = engine.audit().unwrap();
//! assert!(report.is_clean());
//! ```

pub mod audit;
pub mod curation;
pub mod engine;
pub mod error;
pub mod model;
pub mod notify;
pub mod relation;
pub mod store;

pub use audit::{AuditReport, Severity, Violation, ViolationKind};
pub use curation::CurationOrderer;
pub use engine::{
    ArtistResult, AssignmentResult, ConsistencyEngine, EngineConfig, OrderResult,
    PartialApplicationWarning,
};
pub use error::{GalleryError, Result, StoreError};
pub use model::{
    Artist, ArtistRole, ArtistStatus, Artwork, Assignment, Location, NewArtwork, Show,
    ShowStatus, Transition,
};
pub use notify::{AcceptanceEvent, NotificationHook};
pub use relation::{IdList, Relation};
pub use store::{Collection, DocumentStore, MemoryStore, Predicate};
