//! Reordering and incremental maintenance of `artworkOrder`.

use std::collections::HashSet;

use tracing::info;

use crate::engine::{ConsistencyEngine, Mode, OrderResult, WorkSet};
use crate::error::{GalleryError, Result};
use crate::model::{Show, validate_id};
use crate::relation::Relation;

/// Check a proposed order against a show before anything is written.
///
/// Duplicates are always rejected. In strict mode every id must be a member
/// of the show; in lenient mode ids already present in the current order are
/// tolerated as well.
pub fn validate_order<S: AsRef<str>>(show: &Show, new_order: &[S], strict: bool) -> Result<()> {
    let mut seen = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for id in new_order.iter().map(AsRef::as_ref) {
        if !seen.insert(id) && !duplicates.contains(&id) {
            duplicates.push(id);
        }
    }
    if !duplicates.is_empty() {
        return Err(GalleryError::Validation(format!(
            "order for show '{}' repeats {}",
            show.id,
            duplicates.join(", ")
        )));
    }

    let foreign: Vec<&str> = new_order
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| {
            !show.artwork_ids.contains(id) && (strict || !show.artwork_order.contains(id))
        })
        .collect();
    if !foreign.is_empty() {
        return Err(GalleryError::Validation(format!(
            "order for show '{}' names artworks that are not in the show: {}",
            show.id,
            foreign.join(", ")
        )));
    }

    Ok(())
}

/// Append an artwork to a show's order unless present. Missing show is a warning.
pub(crate) fn append_to_order(ws: &mut WorkSet<'_>, show_id: &str, artwork_id: &str) -> Result<bool> {
    ws.add_member(Relation::ShowOrder, show_id, artwork_id)
}

/// Filter an artwork out of a show's order. Missing show is a warning.
pub(crate) fn remove_from_order(
    ws: &mut WorkSet<'_>,
    show_id: &str,
    artwork_id: &str,
) -> Result<bool> {
    ws.remove_member(Relation::ShowOrder, show_id, artwork_id)
}

/// Curation-order operations, run through the engine.
///
/// Each call is a read-modify-write of one show and always uses a store
/// transaction when one is available, regardless of
/// [`EngineConfig::transactional`](crate::EngineConfig::transactional).
pub struct CurationOrderer<'e> {
    engine: &'e ConsistencyEngine,
}

impl<'e> CurationOrderer<'e> {
    pub(crate) fn new(engine: &'e ConsistencyEngine) -> Self {
        Self { engine }
    }

    /// Replace a show's order wholesale.
    pub fn reorder<S: AsRef<str>>(&self, show_id: &str, new_order: &[S]) -> Result<OrderResult> {
        validate_id("show", show_id)?;
        let strict = self.engine.config().strict_order;

        let executed = self.engine.execute("reorder", Mode::PreferTransaction, |ws| {
            let show = ws.require::<Show>(show_id)?;
            validate_order(show, new_order, strict)?;
            show.artwork_order
                .replace(new_order.iter().map(|id| id.as_ref().to_string()).collect());
            Ok(show.clone())
        })?;

        info!(show = show_id, entries = new_order.len(), writes = executed.writes, "show reordered");
        Ok(executed.into_order_result())
    }

    /// Append one artwork to the end of a show's order.
    ///
    /// Under strict ordering the artwork must already be a member of the show.
    pub fn append_to_order(&self, show_id: &str, artwork_id: &str) -> Result<OrderResult> {
        validate_id("show", show_id)?;
        validate_id("artwork", artwork_id)?;
        let strict = self.engine.config().strict_order;

        let executed = self.engine.execute("append_to_order", Mode::PreferTransaction, |ws| {
            let show = ws.require::<Show>(show_id)?;
            if strict && !show.artwork_ids.contains(artwork_id) {
                return Err(GalleryError::Validation(format!(
                    "artwork '{}' is not in show '{}'",
                    artwork_id, show_id
                )));
            }
            show.artwork_order.insert(artwork_id);
            Ok(show.clone())
        })?;

        Ok(executed.into_order_result())
    }

    /// Remove one artwork from a show's order. Absent ids are a no-op.
    pub fn remove_from_order(&self, show_id: &str, artwork_id: &str) -> Result<OrderResult> {
        validate_id("show", show_id)?;

        let executed = self.engine.execute("remove_from_order", Mode::PreferTransaction, |ws| {
            let show = ws.require::<Show>(show_id)?;
            show.artwork_order.remove(artwork_id);
            Ok(show.clone())
        })?;

        Ok(executed.into_order_result())
    }
}
