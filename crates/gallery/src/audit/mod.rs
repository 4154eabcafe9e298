//! Read-only consistency audit over the four collections.
//!
//! The audit reads raw documents, not the engine's typed view, so it sees
//! stored combinations the engine would coerce (for example `accepted` with
//! an empty `artshowId`). It reports; it never repairs.
//!
//! # Example
//!
//! ```no_run
//! use gallery::MemoryStore;
//! use gallery::audit::audit;
//!
//! let store = MemoryStore::load("gallery.json").unwrap();
//! let report = audit(&store).unwrap();
//! for violation in &report.violations {
//!     println!("[{}] {}", violation.kind.label(), violation.description);
//! }
//! ```

mod scan;
mod violation;

pub use scan::{AuditReport, audit};
pub use violation::{Severity, Violation, ViolationKind};
