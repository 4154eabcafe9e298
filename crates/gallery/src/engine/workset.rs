//! Typed working copies of the documents one operation touches.
//!
//! Documents are fetched at most once per operation and mutated in memory.
//! When the computation is done the work set diffs every copy against what
//! was read and turns the differences into a [`WritePlan`] that writes only
//! changed fields, artworks first and artists last.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{GalleryError, Result};
use crate::model::{Artist, Artwork, Entity, Location, Show};
use crate::relation::{Related, Relation};
use crate::store::{Collection, Document, FieldUpdates, with_id};

use super::plan::{Flushed, PlannedWrite, Undo, WriteOp, WritePlan};
use super::report::PartialApplicationWarning;
use super::session::DocAccess;

pub(crate) enum Origin<T> {
    /// Created by this operation.
    Created,
    /// Read from the store.
    Loaded { entity: T, raw: Document },
}

pub(crate) struct Tracked<T> {
    origin: Origin<T>,
    current: T,
    deleted: bool,
}

/// Per-collection working copies, in fetch order.
#[derive(Default)]
pub(crate) struct Slots {
    artworks: IndexMap<String, Tracked<Artwork>>,
    shows: IndexMap<String, Tracked<Show>>,
    locations: IndexMap<String, Tracked<Location>>,
    artists: IndexMap<String, Tracked<Artist>>,
}

/// Entities the work set can hold.
pub(crate) trait Slot: Entity {
    #[doc(hidden)]
    fn slot(slots: &mut Slots) -> &mut IndexMap<String, Tracked<Self>>;
}

macro_rules! impl_slot {
    ($ty:ty, $field:ident) => {
        impl Slot for $ty {
            fn slot(slots: &mut Slots) -> &mut IndexMap<String, Tracked<Self>> {
                &mut slots.$field
            }
        }
    };
}

impl_slot!(Artwork, artworks);
impl_slot!(Show, shows);
impl_slot!(Location, locations);
impl_slot!(Artist, artists);

pub(crate) struct WorkSet<'a> {
    access: &'a mut dyn DocAccess,
    slots: Slots,
    missing: HashSet<(Collection, String)>,
    warnings: Vec<PartialApplicationWarning>,
}

impl<'a> WorkSet<'a> {
    pub(crate) fn new(access: &'a mut dyn DocAccess) -> Self {
        Self {
            access,
            slots: Slots::default(),
            missing: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Working copy of a document, fetching it on first use.
    fn fetch<T: Slot>(&mut self, id: &str) -> Result<Option<&mut T>> {
        if !T::slot(&mut self.slots).contains_key(id) {
            let key = (T::COLLECTION, id.to_string());
            if self.missing.contains(&key) {
                return Ok(None);
            }
            let Some(raw) = self.access.get(T::COLLECTION, id)? else {
                self.missing.insert(key);
                return Ok(None);
            };
            let entity: T = serde_json::from_value(raw.clone())?;
            T::slot(&mut self.slots).insert(
                id.to_string(),
                Tracked {
                    origin: Origin::Loaded {
                        entity: entity.clone(),
                        raw,
                    },
                    current: entity,
                    deleted: false,
                },
            );
        }

        Ok(T::slot(&mut self.slots)
            .get_mut(id)
            .filter(|tracked| !tracked.deleted)
            .map(|tracked| &mut tracked.current))
    }

    /// A document the operation cannot proceed without.
    pub(crate) fn require<T: Slot>(&mut self, id: &str) -> Result<&mut T> {
        self.fetch::<T>(id)?
            .ok_or_else(|| GalleryError::not_found(T::COLLECTION, id))
    }

    /// A document whose absence only degrades the operation.
    pub(crate) fn secondary<T: Slot>(&mut self, id: &str) -> Result<Option<&mut T>> {
        if self.fetch::<T>(id)?.is_none() {
            self.note_missing(T::COLLECTION, id);
            return Ok(None);
        }
        self.fetch::<T>(id)
    }

    fn note_missing(&mut self, collection: Collection, id: &str) {
        let warning = PartialApplicationWarning::MissingDocument {
            collection,
            id: id.to_string(),
        };
        if !self.warnings.contains(&warning) {
            warn!(%collection, id = %id, "referenced document is missing; skipping its update");
            self.warnings.push(warning);
        }
    }

    /// Stage a new document. Fails if the id is already taken.
    pub(crate) fn create<T: Slot>(&mut self, entity: T) -> Result<()> {
        let id = entity.id().to_string();
        if self.fetch::<T>(&id)?.is_some() {
            return Err(GalleryError::Validation(format!(
                "{} document '{}' already exists",
                T::COLLECTION,
                id
            )));
        }
        self.missing.remove(&(T::COLLECTION, id.clone()));
        T::slot(&mut self.slots).insert(
            id,
            Tracked {
                origin: Origin::Created,
                current: entity,
                deleted: false,
            },
        );
        Ok(())
    }

    /// Stage deletion of an existing document.
    pub(crate) fn delete<T: Slot>(&mut self, id: &str) -> Result<()> {
        self.require::<T>(id)?;
        let slot = T::slot(&mut self.slots);
        let created = slot
            .get(id)
            .is_some_and(|tracked| matches!(tracked.origin, Origin::Created));
        if created {
            slot.shift_remove(id);
        } else if let Some(tracked) = slot.get_mut(id) {
            tracked.deleted = true;
        }
        Ok(())
    }

    fn related(&mut self, collection: Collection, id: &str) -> Result<Option<&mut dyn Related>> {
        Ok(match collection {
            Collection::Shows => self.secondary::<Show>(id)?.map(|doc| doc as &mut dyn Related),
            Collection::Locations => self
                .secondary::<Location>(id)?
                .map(|doc| doc as &mut dyn Related),
            Collection::Artists => self
                .secondary::<Artist>(id)?
                .map(|doc| doc as &mut dyn Related),
            Collection::Artworks => None,
        })
    }

    /// Add `member` to a relation of `owner`. A missing owner is a warning.
    pub(crate) fn add_member(&mut self, relation: Relation, owner: &str, member: &str) -> Result<bool> {
        Ok(match self.related(relation.owner(), owner)? {
            Some(doc) => doc
                .members_mut(relation)
                .is_some_and(|list| list.insert(member)),
            None => false,
        })
    }

    /// Remove `member` from a relation of `owner`. A missing owner is a warning.
    pub(crate) fn remove_member(
        &mut self,
        relation: Relation,
        owner: &str,
        member: &str,
    ) -> Result<bool> {
        Ok(match self.related(relation.owner(), owner)? {
            Some(doc) => doc
                .members_mut(relation)
                .is_some_and(|list| list.remove(member)),
            None => false,
        })
    }

    /// Build the write plan and apply it through the session.
    pub(crate) fn commit(self, compensate: bool) -> Result<Flushed> {
        let plan = self.slots.plan()?;
        debug!(writes = plan.len(), "write plan built");

        let mut flushed = plan.apply(self.access, compensate)?;
        let mut warnings = self.warnings;
        warnings.append(&mut flushed.warnings);
        flushed.warnings = warnings;
        Ok(flushed)
    }

    #[cfg(test)]
    fn plan(&self) -> Result<WritePlan> {
        self.slots.plan()
    }
}

impl Slots {
    fn plan(&self) -> Result<WritePlan> {
        let mut plan = WritePlan::default();
        stage(&self.artworks, &mut plan)?;
        stage(&self.shows, &mut plan)?;
        stage(&self.locations, &mut plan)?;
        stage(&self.artists, &mut plan)?;
        Ok(plan.finish())
    }
}

fn stage<T: Entity>(slot: &IndexMap<String, Tracked<T>>, plan: &mut WritePlan) -> Result<()> {
    for (id, tracked) in slot {
        let write = match (&tracked.origin, tracked.deleted) {
            (Origin::Created, _) => PlannedWrite {
                collection: T::COLLECTION,
                id: id.clone(),
                op: WriteOp::Insert(serde_json::to_value(&tracked.current)?),
                undo: Undo::Delete,
            },
            (Origin::Loaded { raw, .. }, true) => PlannedWrite {
                collection: T::COLLECTION,
                id: id.clone(),
                op: WriteOp::Delete,
                undo: Undo::Reinsert(raw.clone()),
            },
            (Origin::Loaded { entity, .. }, false) => {
                let Some((forward, backward)) = diff(id, entity, &tracked.current)? else {
                    continue;
                };
                PlannedWrite {
                    collection: T::COLLECTION,
                    id: id.clone(),
                    op: WriteOp::Update(forward),
                    undo: Undo::Restore(backward),
                }
            }
        };
        plan.push(write);
    }
    Ok(())
}

/// Changed top-level fields as (new values, previous values).
fn diff<T: Serialize>(
    id: &str,
    original: &T,
    current: &T,
) -> Result<Option<(FieldUpdates, FieldUpdates)>> {
    let before = with_id(id, serde_json::to_value(original)?)?;
    let after = with_id(id, serde_json::to_value(current)?)?;

    let mut forward = Map::new();
    let mut backward = Map::new();
    for (field, value) in after {
        let previous = before.get(&field);
        if previous == Some(&value) {
            continue;
        }
        backward.insert(field.clone(), previous.cloned().unwrap_or(Value::Null));
        forward.insert(field, value);
    }

    if forward.is_empty() {
        Ok(None)
    } else {
        Ok(Some((forward, backward)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::session::{Deadline, StoreAccess};
    use crate::model::Assignment;
    use crate::store::{DocumentStore, MemoryStore};

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.put_entity(&Artwork::new("A1", "a1")).unwrap();
        store.put_entity(&Show::new("s1", "Spring")).unwrap();
        store.put_entity(&Artist::new("a1")).unwrap();
        store
    }

    #[test]
    fn test_unchanged_documents_produce_no_writes() {
        let store = seeded();
        let mut access = StoreAccess::new(&store, Deadline::start(None));
        let mut ws = WorkSet::new(&mut access);
        ws.require::<Artwork>("A1").unwrap();
        ws.require::<Show>("s1").unwrap();
        assert_eq!(ws.plan().unwrap().len(), 0);
    }

    #[test]
    fn test_plan_writes_only_changed_fields_in_collection_order() {
        let store = seeded();
        let mut access = StoreAccess::new(&store, Deadline::start(None));
        let mut ws = WorkSet::new(&mut access);

        // Fetch the show before the artwork; the plan still writes the artwork first.
        ws.add_member(Relation::ShowArtworks, "s1", "A1").unwrap();
        ws.require::<Artwork>("A1").unwrap().assignment = Assignment::accepted("s1", None);

        let plan = ws.plan().unwrap();
        assert_eq!(
            plan.targets(),
            vec![(Collection::Artworks, "A1"), (Collection::Shows, "s1")]
        );

        let flushed = ws.commit(true).unwrap();
        assert_eq!(flushed.writes, 2);
        let show = store.get(Collection::Shows, "s1").unwrap().unwrap();
        assert_eq!(show["artworkIds"], serde_json::json!(["A1"]));
        assert_eq!(show["name"], "Spring");
    }

    #[test]
    fn test_missing_secondary_is_warned_once() {
        let store = seeded();
        let mut access = StoreAccess::new(&store, Deadline::start(None));
        let mut ws = WorkSet::new(&mut access);

        assert!(!ws.add_member(Relation::LocationArtworks, "gone", "A1").unwrap());
        assert!(!ws.add_member(Relation::LocationArtists, "gone", "a1").unwrap());

        let flushed = ws.commit(true).unwrap();
        assert_eq!(flushed.writes, 0);
        assert_eq!(flushed.warnings.len(), 1);
    }

    #[test]
    fn test_create_then_delete_in_same_operation_writes_nothing() {
        let store = seeded();
        let mut access = StoreAccess::new(&store, Deadline::start(None));
        let mut ws = WorkSet::new(&mut access);

        ws.create(Artwork::new("A9", "a1")).unwrap();
        assert!(ws.create(Artwork::new("A9", "a1")).is_err());
        ws.delete::<Artwork>("A9").unwrap();
        assert_eq!(ws.plan().unwrap().len(), 0);
    }

    #[test]
    fn test_inserts_precede_updates_and_deletes_come_last() {
        let store = seeded();
        let mut access = StoreAccess::new(&store, Deadline::start(None));
        let mut ws = WorkSet::new(&mut access);

        ws.add_member(Relation::ArtistArtworks, "a1", "A2").unwrap();
        ws.delete::<Artwork>("A1").unwrap();
        ws.create(Artwork::new("A2", "a1")).unwrap();

        let plan = ws.plan().unwrap();
        assert_eq!(
            plan.targets(),
            vec![
                (Collection::Artworks, "A2"),
                (Collection::Artists, "a1"),
                (Collection::Artworks, "A1"),
            ]
        );
    }
}
