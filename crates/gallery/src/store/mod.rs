//! Document store interface consumed by the engine.
//!
//! The engine never depends on a concrete backend. Anything that can get a
//! document by id, update a subset of its fields, and answer a conjunctive
//! field query can host it. Transactions are optional: stores that support
//! them advertise it through [`DocumentStore::supports_transactions`].
//!
//! [`MemoryStore`] is the in-process implementation used by tests and the
//! command-line tool. Its transactions are optimistic: reads record document
//! versions and the commit fails with [`StoreError::Conflict`] if any of them
//! moved.

mod memory;
mod persistence;
mod predicate;

pub use memory::MemoryStore;
pub use persistence::{STORE_FORMAT_VERSION, StoreSnapshot};
pub use predicate::{Clause, Predicate};

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StoreError};

/// A schemaless document. Always a JSON object carrying its own `id`.
pub type Document = Value;

/// Field-level update: only the listed top-level fields are replaced.
pub type FieldUpdates = Map<String, Value>;

/// Result of a single store call.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The four collections the engine keeps consistent.
///
/// Declaration order is the write order inside one operation: the artwork
/// is written first so that it is the freshest record of intended state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Artworks,
    Shows,
    Locations,
    Artists,
}

impl Collection {
    /// All collections, in write order.
    pub const ALL: [Collection; 4] = [
        Collection::Artworks,
        Collection::Shows,
        Collection::Locations,
        Collection::Artists,
    ];

    /// Collection name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Artworks => "artworks",
            Collection::Shows => "shows",
            Collection::Locations => "locations",
            Collection::Artists => "artists",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generic document repository.
///
/// Implementations must be thread-safe (Send + Sync); the engine shares one
/// store across concurrent operations. Each call may block on I/O and should
/// bound itself with the backend's own timeout.
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, or `None` if it does not exist.
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    /// Replace the given top-level fields of an existing document.
    ///
    /// Fails with [`StoreError::NotFound`] if the document does not exist.
    /// Applying the same update twice leaves the same document.
    fn update(&self, collection: Collection, id: &str, fields: &FieldUpdates) -> StoreResult<()>;

    /// Create a document. Fails with [`StoreError::AlreadyExists`] if the id is taken.
    fn insert(&self, collection: Collection, id: &str, document: Document) -> StoreResult<()>;

    /// Delete a document. Deleting a missing document succeeds.
    fn delete(&self, collection: Collection, id: &str) -> StoreResult<()>;

    /// All documents of a collection matching `predicate`.
    fn query(&self, collection: Collection, predicate: &Predicate) -> StoreResult<Vec<Document>>;

    /// Whether [`run_transaction`](Self::run_transaction) is available.
    fn supports_transactions(&self) -> bool {
        false
    }

    /// Run `body` atomically: either every write it issued is committed, or
    /// none is. The body may be invoked once per call; retrying after a
    /// [`StoreError::Conflict`] is the caller's decision.
    fn run_transaction(
        &self,
        body: &mut dyn FnMut(&mut dyn Transaction) -> Result<()>,
    ) -> Result<()> {
        let _ = body;
        Err(StoreError::Unsupported("transactions").into())
    }

    /// Backend name (for logging).
    fn name(&self) -> &str;
}

/// Read/write context handed to a transaction body.
///
/// Reads observe the transaction's own earlier writes.
pub trait Transaction {
    fn get(&mut self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    fn update(&mut self, collection: Collection, id: &str, fields: &FieldUpdates)
    -> StoreResult<()>;

    fn insert(&mut self, collection: Collection, id: &str, document: Document) -> StoreResult<()>;

    fn delete(&mut self, collection: Collection, id: &str) -> StoreResult<()>;
}

/// Ensure a document value is an object carrying `id`.
pub(crate) fn with_id(id: &str, document: Document) -> StoreResult<Map<String, Value>> {
    match document {
        Value::Object(mut fields) => {
            fields.insert("id".to_string(), Value::String(id.to_string()));
            Ok(fields)
        }
        other => Err(StoreError::Backend(format!(
            "document '{}' must be a JSON object, got {}",
            id,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_write_order() {
        let mut shuffled = vec![
            Collection::Artists,
            Collection::Locations,
            Collection::Artworks,
            Collection::Shows,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Collection::ALL.to_vec());
    }

    #[test]
    fn test_with_id_rejects_non_objects() {
        assert!(with_id("x", json!([1, 2])).is_err());
        let fields = with_id("x", json!({"name": "n"})).unwrap();
        assert_eq!(fields["id"], "x");
    }
}
