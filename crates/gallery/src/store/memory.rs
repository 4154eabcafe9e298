//! In-memory document store with optimistic transactions.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{GalleryError, Result, StoreError};
use crate::model::Entity;

use super::{
    Collection, Document, DocumentStore, FieldUpdates, Predicate, StoreResult, Transaction,
    with_id,
};

/// A stored document and the version it was last written at.
#[derive(Debug, Clone)]
pub(super) struct Stored {
    pub(super) version: u64,
    pub(super) fields: Map<String, Value>,
}

#[derive(Debug, Default)]
pub(super) struct Tables {
    pub(super) collections: HashMap<Collection, IndexMap<String, Stored>>,
    next_version: u64,
}

impl Tables {
    fn bump(&mut self) -> u64 {
        self.next_version += 1;
        self.next_version
    }

    fn table(&self, collection: Collection) -> Option<&IndexMap<String, Stored>> {
        self.collections.get(&collection)
    }

    fn version(&self, collection: Collection, id: &str) -> Option<u64> {
        self.table(collection)
            .and_then(|docs| docs.get(id))
            .map(|stored| stored.version)
    }

    fn fields(&self, collection: Collection, id: &str) -> Option<&Map<String, Value>> {
        self.table(collection)
            .and_then(|docs| docs.get(id))
            .map(|stored| &stored.fields)
    }

    pub(super) fn put(&mut self, collection: Collection, id: &str, fields: Map<String, Value>) {
        let version = self.bump();
        self.collections
            .entry(collection)
            .or_default()
            .insert(id.to_string(), Stored { version, fields });
    }

    fn remove(&mut self, collection: Collection, id: &str) {
        if let Some(docs) = self.collections.get_mut(&collection) {
            docs.shift_remove(id);
        }
    }
}

/// Thread-safe in-memory [`DocumentStore`].
///
/// Every write bumps a store-wide version counter, so a transaction can tell
/// whether anything it read has changed, including delete-then-recreate.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    transactional: bool,
}

impl MemoryStore {
    /// Create an empty store with transaction support.
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            transactional: true,
        }
    }

    /// Create an empty store that refuses transactions, forcing callers onto
    /// the best-effort write path.
    pub fn non_transactional() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            transactional: false,
        }
    }

    /// Toggle transaction support.
    pub fn with_transactions(mut self, enabled: bool) -> Self {
        self.transactional = enabled;
        self
    }

    /// Insert or overwrite a typed document.
    pub fn put_entity<T: Entity>(&self, entity: &T) -> Result<()> {
        let value = serde_json::to_value(entity)?;
        let fields = with_id(entity.id(), value)?;
        self.write()?.put(T::COLLECTION, entity.id(), fields);
        Ok(())
    }

    /// Read a typed document.
    pub fn entity<T: Entity>(&self, id: &str) -> Result<Option<T>> {
        match self.get(T::COLLECTION, id)? {
            Some(document) => Ok(Some(serde_json::from_value(document)?)),
            None => Ok(None),
        }
    }

    /// Read a typed document that must exist.
    pub fn expect_entity<T: Entity>(&self, id: &str) -> Result<T> {
        self.entity(id)?
            .ok_or_else(|| GalleryError::not_found(T::COLLECTION, id))
    }

    /// Number of documents in a collection.
    pub fn len(&self, collection: Collection) -> usize {
        self.read()
            .map(|tables| tables.table(collection).map_or(0, IndexMap::len))
            .unwrap_or(0)
    }

    /// Whether every collection is empty.
    pub fn is_empty(&self) -> bool {
        Collection::ALL.iter().all(|c| self.len(*c) == 0)
    }

    /// Current version of a document, if it exists.
    pub fn version(&self, collection: Collection, id: &str) -> Option<u64> {
        self.read().ok()?.version(collection, id)
    }

    pub(super) fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StoreError::LockPoisoned)
    }

    pub(super) fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        let tables = self.read()?;
        Ok(tables
            .fields(collection, id)
            .map(|fields| Value::Object(fields.clone())))
    }

    fn update(&self, collection: Collection, id: &str, fields: &FieldUpdates) -> StoreResult<()> {
        let mut tables = self.write()?;
        let mut current = tables
            .fields(collection, id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        merge_fields(&mut current, fields);
        tables.put(collection, id, current);
        Ok(())
    }

    fn insert(&self, collection: Collection, id: &str, document: Document) -> StoreResult<()> {
        let fields = with_id(id, document)?;
        let mut tables = self.write()?;
        if tables.fields(collection, id).is_some() {
            return Err(StoreError::AlreadyExists {
                collection,
                id: id.to_string(),
            });
        }
        tables.put(collection, id, fields);
        Ok(())
    }

    fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        let mut tables = self.write()?;
        if tables.fields(collection, id).is_some() {
            tables.bump();
            tables.remove(collection, id);
        }
        Ok(())
    }

    fn query(&self, collection: Collection, predicate: &Predicate) -> StoreResult<Vec<Document>> {
        let tables = self.read()?;
        Ok(tables
            .table(collection)
            .into_iter()
            .flat_map(|docs| docs.values())
            .map(|stored| Value::Object(stored.fields.clone()))
            .filter(|doc| predicate.matches(doc))
            .collect())
    }

    fn supports_transactions(&self) -> bool {
        self.transactional
    }

    fn run_transaction(
        &self,
        body: &mut dyn FnMut(&mut dyn Transaction) -> Result<()>,
    ) -> Result<()> {
        if !self.transactional {
            return Err(StoreError::Unsupported("transactions").into());
        }

        let mut txn = MemoryTransaction::new(self);
        body(&mut txn)?;
        txn.commit().map_err(GalleryError::from)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

fn merge_fields(target: &mut Map<String, Value>, updates: &FieldUpdates) {
    for (field, value) in updates {
        if field == "id" {
            continue;
        }
        target.insert(field.clone(), value.clone());
    }
}

type Key = (Collection, String);

/// Buffered transaction over a [`MemoryStore`].
///
/// No lock is held while the body runs; the commit takes the write lock,
/// validates every recorded read version and applies the buffered writes.
struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    /// Version observed at first read (`None` = document absent).
    reads: HashMap<Key, Option<u64>>,
    /// Transaction-local view of every touched document (`None` = deleted).
    view: IndexMap<Key, Option<Map<String, Value>>>,
    /// Keys written by this transaction, in write order.
    dirty: Vec<Key>,
}

impl<'a> MemoryTransaction<'a> {
    fn new(store: &'a MemoryStore) -> Self {
        Self {
            store,
            reads: HashMap::new(),
            view: IndexMap::new(),
            dirty: Vec::new(),
        }
    }

    fn current(&mut self, collection: Collection, id: &str) -> StoreResult<Option<Map<String, Value>>> {
        let key = (collection, id.to_string());
        if let Some(local) = self.view.get(&key) {
            return Ok(local.clone());
        }

        let tables = self.store.read()?;
        let fields = tables.fields(collection, id).cloned();
        self.reads.insert(key.clone(), tables.version(collection, id));
        drop(tables);

        self.view.insert(key, fields.clone());
        Ok(fields)
    }

    fn stage(&mut self, collection: Collection, id: &str, fields: Option<Map<String, Value>>) {
        let key = (collection, id.to_string());
        if !self.dirty.contains(&key) {
            self.dirty.push(key.clone());
        }
        self.view.insert(key, fields);
    }

    fn commit(self) -> StoreResult<()> {
        if self.dirty.is_empty() {
            return Ok(());
        }

        let mut tables = self.store.write()?;
        for ((collection, id), seen) in &self.reads {
            if tables.version(*collection, id) != *seen {
                debug!(%collection, id = %id, "transaction read set changed, aborting commit");
                return Err(StoreError::Conflict {
                    collection: *collection,
                    id: id.clone(),
                });
            }
        }

        for key in &self.dirty {
            let (collection, id) = key;
            match self.view.get(key) {
                Some(Some(fields)) => tables.put(*collection, id, fields.clone()),
                Some(None) => {
                    tables.bump();
                    tables.remove(*collection, id);
                }
                None => {}
            }
        }
        debug!(writes = self.dirty.len(), "transaction committed");
        Ok(())
    }
}

impl Transaction for MemoryTransaction<'_> {
    fn get(&mut self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
        Ok(self.current(collection, id)?.map(Value::Object))
    }

    fn update(
        &mut self,
        collection: Collection,
        id: &str,
        fields: &FieldUpdates,
    ) -> StoreResult<()> {
        let mut current = self
            .current(collection, id)?
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })?;
        merge_fields(&mut current, fields);
        self.stage(collection, id, Some(current));
        Ok(())
    }

    fn insert(&mut self, collection: Collection, id: &str, document: Document) -> StoreResult<()> {
        let fields = with_id(id, document)?;
        if self.current(collection, id)?.is_some() {
            return Err(StoreError::AlreadyExists {
                collection,
                id: id.to_string(),
            });
        }
        self.stage(collection, id, Some(fields));
        Ok(())
    }

    fn delete(&mut self, collection: Collection, id: &str) -> StoreResult<()> {
        if self.current(collection, id)?.is_some() {
            self.stage(collection, id, None);
        }
        Ok(())
    }
}
