//! Deadline-checked access to a store, either direct or inside a transaction.

use std::time::{Duration, Instant};

use crate::error::StoreError;
use crate::store::{
    Collection, Document, DocumentStore, FieldUpdates, Predicate, StoreResult, Transaction,
};

/// Operation deadline, checked before every store call.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Deadline {
    started: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub(crate) fn start(limit: Option<Duration>) -> Self {
        Self {
            started: Instant::now(),
            limit,
        }
    }

    /// Stop enforcing the limit.
    pub(crate) fn clear(&mut self) {
        self.limit = None;
    }

    pub(crate) fn check(&self) -> StoreResult<()> {
        let elapsed = self.started.elapsed();
        match self.limit {
            Some(limit) if elapsed >= limit => Err(StoreError::Timeout { elapsed }),
            _ => Ok(()),
        }
    }
}

/// The calls a work set needs, independent of whether a transaction is open.
pub(crate) trait DocAccess {
    fn get(&mut self, collection: Collection, id: &str) -> StoreResult<Option<Document>>;

    fn update(&mut self, collection: Collection, id: &str, fields: &FieldUpdates)
    -> StoreResult<()>;

    fn insert(&mut self, collection: Collection, id: &str, document: Document) -> StoreResult<()>;

    fn delete(&mut self, collection: Collection, id: &str) -> StoreResult<()>;

    /// Whether writes are buffered and committed atomically.
    fn is_transactional(&self) -> bool;

    /// Lift the deadline so compensating writes can still be issued.
    fn clear_deadline(&mut self);
}

/// Direct calls against the store.
pub(crate) struct StoreAccess<'a> {
    store: &'a dyn DocumentStore,
    deadline: Deadline,
}

impl<'a> StoreAccess<'a> {
    pub(crate) fn new(store: &'a dyn DocumentStore, deadline: Deadline) -> Self {
        Self { store, deadline }
    }

    /// Ids of the documents matching `predicate`.
    pub(crate) fn query_ids(
        &self,
        collection: Collection,
        predicate: &Predicate,
    ) -> StoreResult<Vec<String>> {
        self.deadline.check()?;
        let docs = self.store.query(collection, predicate)?;
        Ok(docs
            .iter()
            .filter_map(|doc| doc.get("id").and_then(|id| id.as_str()))
            .map(str::to_string)
            .collect())
    }
}

impl DocAccess for StoreAccess<'_> {
    fn get(&mut self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        self.deadline.check()?;
        self.store.get(collection, id)
    }

    fn update(
        &mut self,
        collection: Collection,
        id: &str,
        fields: &FieldUpdates,
    ) -> StoreResult<()> {
        self.deadline.check()?;
        self.store.update(collection, id, fields)
    }

    fn insert(&mut self, collection: Collection, id: &str, document: Document) -> StoreResult<()> {
        self.deadline.check()?;
        self.store.insert(collection, id, document)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> StoreResult<()> {
        self.deadline.check()?;
        self.store.delete(collection, id)
    }

    fn is_transactional(&self) -> bool {
        false
    }

    fn clear_deadline(&mut self) {
        self.deadline.clear();
    }
}

/// Calls routed through an open transaction.
pub(crate) struct TxAccess<'a> {
    tx: &'a mut dyn Transaction,
    deadline: Deadline,
}

impl<'a> TxAccess<'a> {
    pub(crate) fn new(tx: &'a mut dyn Transaction, deadline: Deadline) -> Self {
        Self { tx, deadline }
    }
}

impl DocAccess for TxAccess<'_> {
    fn get(&mut self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        self.deadline.check()?;
        self.tx.get(collection, id)
    }

    fn update(
        &mut self,
        collection: Collection,
        id: &str,
        fields: &FieldUpdates,
    ) -> StoreResult<()> {
        self.deadline.check()?;
        self.tx.update(collection, id, fields)
    }

    fn insert(&mut self, collection: Collection, id: &str, document: Document) -> StoreResult<()> {
        self.deadline.check()?;
        self.tx.insert(collection, id, document)
    }

    fn delete(&mut self, collection: Collection, id: &str) -> StoreResult<()> {
        self.deadline.check()?;
        self.tx.delete(collection, id)
    }

    fn is_transactional(&self) -> bool {
        true
    }

    fn clear_deadline(&mut self) {
        self.deadline.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_without_limit_never_expires() {
        assert!(Deadline::start(None).check().is_ok());
    }

    #[test]
    fn test_expired_deadline() {
        let deadline = Deadline::start(Some(Duration::ZERO));
        assert!(matches!(deadline.check(), Err(StoreError::Timeout { .. })));
    }
}
