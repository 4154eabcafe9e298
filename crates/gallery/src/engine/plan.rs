//! Ordered write plans and their application.

use tracing::{debug, warn};

use crate::error::{Result, StoreError};
use crate::store::{Collection, Document, FieldUpdates};

use super::report::PartialApplicationWarning;
use super::session::DocAccess;

/// What a planned write does to its document.
#[derive(Debug, Clone)]
pub(crate) enum WriteOp {
    Insert(Document),
    Update(FieldUpdates),
    Delete,
}

impl WriteOp {
    /// Inserts go first so nothing ever references a document that does
    /// not exist yet; deletes go last so references are gone first.
    fn phase(&self) -> u8 {
        match self {
            WriteOp::Insert(_) => 0,
            WriteOp::Update(_) => 1,
            WriteOp::Delete => 2,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            WriteOp::Insert(_) => "insert",
            WriteOp::Update(_) => "update",
            WriteOp::Delete => "delete",
        }
    }
}

/// How to revert an applied write.
#[derive(Debug, Clone)]
pub(crate) enum Undo {
    /// Remove the inserted document.
    Delete,
    /// Put the previous values of the changed fields back.
    Restore(FieldUpdates),
    /// Recreate the deleted document as it was read.
    Reinsert(Document),
}

#[derive(Debug, Clone)]
pub(crate) struct PlannedWrite {
    pub(crate) collection: Collection,
    pub(crate) id: String,
    pub(crate) op: WriteOp,
    pub(crate) undo: Undo,
}

impl PlannedWrite {
    fn execute(&self, access: &mut dyn DocAccess) -> std::result::Result<(), StoreError> {
        match &self.op {
            WriteOp::Insert(document) => access.insert(self.collection, &self.id, document.clone()),
            WriteOp::Update(fields) => access.update(self.collection, &self.id, fields),
            WriteOp::Delete => access.delete(self.collection, &self.id),
        }
    }

    fn revert(&self, access: &mut dyn DocAccess) -> std::result::Result<(), StoreError> {
        match &self.undo {
            Undo::Delete => access.delete(self.collection, &self.id),
            Undo::Restore(fields) => access.update(self.collection, &self.id, fields),
            Undo::Reinsert(document) => access.insert(self.collection, &self.id, document.clone()),
        }
    }
}

/// Writes of one operation, in application order.
#[derive(Debug, Clone, Default)]
pub(crate) struct WritePlan {
    writes: Vec<PlannedWrite>,
}

/// Outcome of applying a plan.
#[derive(Debug, Default)]
pub(crate) struct Flushed {
    pub(crate) writes: usize,
    pub(crate) warnings: Vec<PartialApplicationWarning>,
}

impl WritePlan {
    pub(crate) fn push(&mut self, write: PlannedWrite) {
        self.writes.push(write);
    }

    pub(crate) fn len(&self) -> usize {
        self.writes.len()
    }

    /// Order by phase; the sort is stable so collection and fetch order
    /// survive within a phase.
    pub(crate) fn finish(mut self) -> Self {
        self.writes.sort_by_key(|write| write.op.phase());
        self
    }

    /// Collections and ids in application order.
    #[cfg(test)]
    pub(crate) fn targets(&self) -> Vec<(Collection, &str)> {
        self.writes
            .iter()
            .map(|write| (write.collection, write.id.as_str()))
            .collect()
    }

    /// Apply every write.
    ///
    /// Inside a transaction any failure aborts the transaction. Outside one,
    /// an update addressed at a document that vanished is skipped with a
    /// warning; any other failure stops the plan, optionally reverting the
    /// writes already applied, and is returned.
    pub(crate) fn apply(self, access: &mut dyn DocAccess, compensate: bool) -> Result<Flushed> {
        let transactional = access.is_transactional();
        let mut applied: Vec<&PlannedWrite> = Vec::with_capacity(self.writes.len());
        let mut warnings = Vec::new();

        for write in &self.writes {
            debug!(
                collection = %write.collection,
                id = %write.id,
                op = write.op.name(),
                "applying write"
            );
            match write.execute(access) {
                Ok(()) => applied.push(write),
                Err(StoreError::NotFound { collection, id })
                    if !transactional && matches!(write.op, WriteOp::Update(_)) =>
                {
                    warn!(%collection, id = %id, "document disappeared before its update; skipped");
                    warnings.push(PartialApplicationWarning::MissingDocument { collection, id });
                }
                Err(err) => {
                    if !transactional && compensate && !applied.is_empty() {
                        compensate_writes(access, &applied);
                    }
                    return Err(err.into());
                }
            }
        }

        Ok(Flushed {
            writes: applied.len(),
            warnings,
        })
    }
}

/// Revert applied writes newest first. Best effort: failures are logged.
fn compensate_writes(access: &mut dyn DocAccess, applied: &[&PlannedWrite]) {
    warn!(writes = applied.len(), "write plan failed midway; compensating");
    access.clear_deadline();

    for write in applied.iter().rev() {
        match write.revert(access) {
            Ok(()) => debug!(collection = %write.collection, id = %write.id, "write reverted"),
            Err(err) => warn!(
                collection = %write.collection,
                id = %write.id,
                error = %err,
                "compensation failed; document left as written"
            ),
        }
    }
}
