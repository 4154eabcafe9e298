//! The consistency engine.
//!
//! Every public operation reads the documents it needs into a work set,
//! computes the new state through the assignment state machine, and writes
//! the changed fields back in one ordered plan. With a transactional store
//! the whole operation is one optimistic transaction, re-run on conflict;
//! otherwise the plan is applied write by write with optional compensation.

mod config;
mod placement;
mod plan;
mod report;
mod session;
mod workset;

pub use config::EngineConfig;
pub use report::{ArtistResult, AssignmentResult, OrderResult, PartialApplicationWarning};
pub(crate) use workset::WorkSet;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audit::{self, AuditReport};
use crate::curation::CurationOrderer;
use crate::error::{GalleryError, Result, StoreError};
use crate::model::{
    Artist, ArtistStatus, Artwork, Assignment, NewArtwork, Show, Transition,
    generate_artwork_id, validate_id,
};
use crate::notify::{AcceptanceEvent, NotificationHook};
use crate::relation::{IdList, Relation};
use crate::store::{Collection, DocumentStore, Predicate, Transaction};

use placement::Footprint;
use plan::Flushed;
use session::{Deadline, StoreAccess, TxAccess};

/// How an operation wants to reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Transactional if configured and supported.
    Default,
    /// Transactional whenever supported.
    PreferTransaction,
}

/// Value computed by an operation plus what applying it took.
pub(crate) struct Executed<T> {
    pub(crate) value: T,
    pub(crate) writes: usize,
    pub(crate) warnings: Vec<PartialApplicationWarning>,
}

impl<T> Executed<T> {
    fn new(value: T, flushed: Flushed) -> Self {
        Self {
            value,
            writes: flushed.writes,
            warnings: flushed.warnings,
        }
    }
}

impl Executed<Artwork> {
    fn into_assignment_result(self) -> AssignmentResult {
        AssignmentResult {
            artwork: self.value,
            writes: self.writes,
            warnings: self.warnings,
        }
    }
}

impl Executed<Show> {
    pub(crate) fn into_order_result(self) -> OrderResult {
        OrderResult {
            show: self.value,
            writes: self.writes,
            warnings: self.warnings,
        }
    }
}

/// Keeps artworks, shows, locations and artists consistent with each other.
///
/// The engine is stateless apart from its configuration: it holds the store
/// behind an `Arc` and can be shared across threads.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use gallery::{ConsistencyEngine, EngineConfig, MemoryStore};
///
/// let store = Arc::new(MemoryStore::load("gallery.json").unwrap());
/// let engine = ConsistencyEngine::new(store)
///     .with_config(EngineConfig::default().with_strict_order(false));
///
/// let result = engine.assign_artwork("A1", "s1", Some("l1")).unwrap();
/// for warning in &result.warnings {
///     eprintln!("warning: {}", warning);
/// }
/// ```
pub struct ConsistencyEngine {
    store: Arc<dyn DocumentStore>,
    config: EngineConfig,
    notifier: Option<Arc<dyn NotificationHook>>,
}

impl ConsistencyEngine {
    /// Create an engine with default configuration.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            config: EngineConfig::default(),
            notifier: None,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Add a hook that is told about every artist acceptance.
    pub fn with_notifier(mut self, hook: impl NotificationHook + 'static) -> Self {
        self.notifier = Some(Arc::new(hook));
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Underlying store.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Curation-order operations.
    pub fn orderer(&self) -> CurationOrderer<'_> {
        CurationOrderer::new(self)
    }

    // =========================================================================
    // Single-artwork operations
    // =========================================================================

    /// Accept an artwork into a show and optionally a location.
    ///
    /// An artwork placed elsewhere is detached from its old show and location
    /// first. Missing show or location documents are reported as warnings.
    pub fn assign_artwork(
        &self,
        artwork_id: &str,
        show_id: &str,
        location_id: Option<&str>,
    ) -> Result<AssignmentResult> {
        validate_id("artwork", artwork_id)?;
        validate_target(show_id, location_id)?;
        let accept = accept(show_id, location_id);

        let deadline = self.deadline();
        let holders = self.holders(deadline, artwork_id)?;

        let executed = self.execute_with("assign_artwork", Mode::Default, deadline, |ws| {
            let artwork = placement::transition(ws, artwork_id, &accept)?;
            placement::sweep(ws, artwork_id, &holders)?;
            Ok(artwork)
        })?;

        info!(
            artwork = artwork_id,
            show = show_id,
            location = location_id.unwrap_or("-"),
            writes = executed.writes,
            "artwork assigned"
        );
        Ok(executed.into_assignment_result())
    }

    /// Reject an artwork, clearing its references. No-op when unplaced.
    ///
    /// Every show and location still listing the artwork is found by query
    /// and cleaned, so re-running a rejection that failed halfway finishes it.
    pub fn reject_artwork(&self, artwork_id: &str) -> Result<AssignmentResult> {
        validate_id("artwork", artwork_id)?;

        let deadline = self.deadline();
        let holders = self.holders(deadline, artwork_id)?;

        let executed = self.execute_with("reject_artwork", Mode::Default, deadline, |ws| {
            let artwork = placement::transition(ws, artwork_id, &Transition::Reject)?;
            placement::sweep(ws, artwork_id, &holders)?;
            Ok(artwork)
        })?;

        info!(artwork = artwork_id, writes = executed.writes, "artwork rejected");
        Ok(executed.into_assignment_result())
    }

    /// Move an artwork to a new show and location.
    ///
    /// Rejection against the old placement and acceptance into the new one
    /// are one operation: one transaction when available, otherwise one
    /// plan that writes the old show before the new one.
    pub fn reassign_artwork(
        &self,
        artwork_id: &str,
        show_id: &str,
        location_id: Option<&str>,
    ) -> Result<AssignmentResult> {
        validate_id("artwork", artwork_id)?;
        validate_target(show_id, location_id)?;
        let accept = accept(show_id, location_id);

        let deadline = self.deadline();
        let holders = self.holders(deadline, artwork_id)?;

        let executed = self.execute_with("reassign_artwork", Mode::Default, deadline, |ws| {
            let current = &ws.require::<Artwork>(artwork_id)?.assignment;
            // Already there: re-accepting only repairs, it must not move the
            // artwork to the back of the curation order.
            if current.is_placed() && !current.is_accepted_at(show_id, location_id) {
                placement::transition(ws, artwork_id, &Transition::Reject)?;
            }
            let artwork = placement::transition(ws, artwork_id, &accept)?;
            placement::sweep(ws, artwork_id, &holders)?;
            Ok(artwork)
        })?;

        info!(
            artwork = artwork_id,
            show = show_id,
            location = location_id.unwrap_or("-"),
            writes = executed.writes,
            "artwork reassigned"
        );
        Ok(executed.into_assignment_result())
    }

    /// Record that an artwork was exhibited in a show.
    ///
    /// Appends the show to `beenInShows` unless it is already the last entry.
    /// An artwork placed in a different show is detached from it first.
    pub fn mark_shown(&self, artwork_id: &str, show_id: &str) -> Result<AssignmentResult> {
        validate_id("artwork", artwork_id)?;
        validate_id("show", show_id)?;
        let mark = Transition::MarkShown {
            show_id: show_id.to_string(),
        };

        let deadline = self.deadline();
        let holders = self.holders(deadline, artwork_id)?;

        let executed = self.execute_with("mark_shown", Mode::Default, deadline, |ws| {
            ws.secondary::<Show>(show_id)?;
            let artwork = placement::transition(ws, artwork_id, &mark)?;
            placement::sweep(ws, artwork_id, &holders)?;
            Ok(artwork)
        })?;

        info!(artwork = artwork_id, show = show_id, writes = executed.writes, "artwork marked shown");
        Ok(executed.into_assignment_result())
    }

    // =========================================================================
    // Artist-level operations
    // =========================================================================

    /// Accept an artist into a show with a selection of their artworks.
    ///
    /// Selected artworks are accepted into the show and location; every other
    /// artwork of the artist is declined. The artist becomes `showing` and
    /// is added to the show's and location's `artistIds`, and removed from
    /// the shows and locations its artworks left. Selecting an artwork the
    /// artist does not own is a validation error.
    pub fn accept_artist_into_show<S: AsRef<str>>(
        &self,
        artist_id: &str,
        show_id: &str,
        location_id: Option<&str>,
        selected: &[S],
    ) -> Result<ArtistResult> {
        validate_id("artist", artist_id)?;
        validate_target(show_id, location_id)?;
        let mut chosen = IdList::new();
        for id in selected {
            validate_id("artwork", id.as_ref())?;
            chosen.insert(id.as_ref());
        }
        let accept = accept(show_id, location_id);

        let deadline = self.deadline();
        let listed = self.owned_artworks(deadline, artist_id)?;
        let holders = self.holders_of_all(deadline, &listed)?;

        let executed = self.execute_with(
            "accept_artist_into_show",
            Mode::Default,
            deadline,
            |ws| {
                let artist = ws.require::<Artist>(artist_id)?;
                let mut owned = artist.artworks.clone();
                let mut footprint = Footprint::default();
                if let Some(previous) = &artist.artshow_id {
                    footprint.shows.insert(previous.clone());
                }
                for id in &listed {
                    owned.insert(id);
                }

                if let Some(foreign) = chosen.iter().find(|id| !owned.contains(id)) {
                    return Err(GalleryError::Validation(format!(
                        "artwork '{}' is not owned by artist '{}'",
                        foreign, artist_id
                    )));
                }

                let mut accepted = Vec::new();
                let mut rejected = Vec::new();
                for artwork_id in owned.iter() {
                    let selected = chosen.contains(artwork_id);
                    let artwork = if selected {
                        Some(ws.require::<Artwork>(artwork_id)?)
                    } else {
                        ws.secondary::<Artwork>(artwork_id)?
                    };
                    let Some(artwork) = artwork else {
                        continue;
                    };
                    if artwork.artist_id != artist_id {
                        if selected {
                            return Err(GalleryError::Validation(format!(
                                "artwork '{}' belongs to artist '{}', not '{}'",
                                artwork_id, artwork.artist_id, artist_id
                            )));
                        }
                        debug!(artwork = artwork_id, "listed artwork has another owner; left alone");
                        continue;
                    }
                    footprint.record(&artwork.assignment);

                    if selected {
                        placement::transition(ws, artwork_id, &accept)?;
                        accepted.push(artwork_id.to_string());
                    } else {
                        placement::transition(ws, artwork_id, &Transition::Decline)?;
                        rejected.push(artwork_id.to_string());
                    }
                    if let Some(held) = holders.get(artwork_id) {
                        footprint.extend(held);
                        placement::sweep(ws, artwork_id, held)?;
                    }
                }

                ws.add_member(Relation::ShowArtists, show_id, artist_id)?;
                if let Some(location_id) = location_id {
                    ws.add_member(Relation::LocationArtists, location_id, artist_id)?;
                }
                footprint.release(ws, artist_id, Some(show_id), location_id)?;

                let artist = ws.require::<Artist>(artist_id)?;
                artist.status = ArtistStatus::Showing;
                artist.artshow_id = Some(show_id.to_string());
                Ok((artist.clone(), accepted, rejected))
            },
        )?;

        let Executed {
            value: (artist, accepted, rejected),
            writes,
            mut warnings,
        } = executed;

        info!(
            artist = artist_id,
            show = show_id,
            accepted = accepted.len(),
            rejected = rejected.len(),
            writes,
            "artist accepted into show"
        );

        let event = AcceptanceEvent::new(artist_id, show_id, location_id, accepted.len());
        let notification = self.notify(&event, &mut warnings);

        Ok(ArtistResult {
            artist,
            accepted,
            rejected,
            writes,
            warnings,
            notification,
        })
    }

    /// Withdraw an artist from the show they are in.
    ///
    /// Every placed artwork of the artist is rejected, the artist leaves the
    /// `artistIds` of every show and location involved, `artshowId` is cleared
    /// and the status falls back to `on-boarding` or `active`.
    pub fn remove_artist_from_show(&self, artist_id: &str) -> Result<ArtistResult> {
        validate_id("artist", artist_id)?;

        let deadline = self.deadline();
        let listed = self.owned_artworks(deadline, artist_id)?;
        let holders = self.holders_of_all(deadline, &listed)?;

        let executed = self.execute_with("remove_artist_from_show", Mode::Default, deadline, |ws| {
            let artist = ws.require::<Artist>(artist_id)?;
            let mut owned = artist.artworks.clone();
            let mut footprint = Footprint::default();
            if let Some(show_id) = &artist.artshow_id {
                footprint.shows.insert(show_id.clone());
            }
            for id in &listed {
                owned.insert(id);
            }

            let mut rejected = Vec::new();
            for artwork_id in owned.iter() {
                let Some(artwork) = ws.secondary::<Artwork>(artwork_id)? else {
                    continue;
                };
                if artwork.artist_id != artist_id {
                    continue;
                }
                if !matches!(artwork.assignment, Assignment::None | Assignment::Rejected) {
                    footprint.record(&artwork.assignment);
                    placement::transition(ws, artwork_id, &Transition::Remove)?;
                    rejected.push(artwork_id.to_string());
                }
                // Unplaced artworks can still be listed by a show after an
                // earlier removal failed halfway.
                if let Some(held) = holders.get(artwork_id) {
                    footprint.extend(held);
                    placement::sweep(ws, artwork_id, held)?;
                }
            }

            footprint.release(ws, artist_id, None, None)?;

            let artist = ws.require::<Artist>(artist_id)?;
            artist.artshow_id = None;
            artist.status = artist.idle_status();
            Ok((artist.clone(), rejected))
        })?;

        let Executed {
            value: (artist, rejected),
            writes,
            warnings,
        } = executed;

        info!(
            artist = artist_id,
            rejected = rejected.len(),
            writes,
            "artist removed from show"
        );

        Ok(ArtistResult {
            artist,
            accepted: Vec::new(),
            rejected,
            writes,
            warnings,
            notification: None,
        })
    }

    // =========================================================================
    // Ordering
    // =========================================================================

    /// Replace a show's curation order. See [`CurationOrderer::reorder`].
    pub fn reorder<S: AsRef<str>>(&self, show_id: &str, new_order: &[S]) -> Result<OrderResult> {
        self.orderer().reorder(show_id, new_order)
    }

    // =========================================================================
    // Artwork lifecycle
    // =========================================================================

    /// Create an unassigned artwork owned by `artist_id`.
    pub fn create_artwork(&self, artist_id: &str, new: NewArtwork) -> Result<AssignmentResult> {
        validate_id("artist", artist_id)?;
        let artwork_id = new.id.clone().unwrap_or_else(generate_artwork_id);
        validate_id("artwork", &artwork_id)?;

        let executed = self.execute("create_artwork", Mode::Default, |ws| {
            ws.require::<Artist>(artist_id)?;
            let mut artwork = Artwork::new(&artwork_id, artist_id);
            artwork.title = new.title.clone();
            ws.create(artwork.clone())?;
            ws.add_member(Relation::ArtistArtworks, artist_id, &artwork_id)?;
            Ok(artwork)
        })?;

        info!(artwork = %artwork_id, artist = artist_id, "artwork created");
        Ok(executed.into_assignment_result())
    }

    /// Delete an artwork and every reference to it.
    ///
    /// Shows and locations are found by query, so stale references left by
    /// earlier partial writes are cleaned up as well. The artwork document is
    /// deleted last.
    pub fn delete_artwork(&self, artwork_id: &str) -> Result<AssignmentResult> {
        validate_id("artwork", artwork_id)?;

        let deadline = self.deadline();
        let holders = self.holders(deadline, artwork_id)?;

        let executed = self.execute_with("delete_artwork", Mode::Default, deadline, |ws| {
            let artwork = ws.require::<Artwork>(artwork_id)?.clone();

            let mut holders = holders.clone();
            holders.record(&artwork.assignment);

            for show_id in &holders.shows {
                ws.remove_member(Relation::ShowArtworks, show_id, artwork_id)?;
                ws.remove_member(Relation::ShowOrder, show_id, artwork_id)?;
            }
            for location_id in &holders.locations {
                ws.remove_member(Relation::LocationArtworks, location_id, artwork_id)?;
            }
            ws.remove_member(Relation::ArtistArtworks, &artwork.artist_id, artwork_id)?;
            ws.delete::<Artwork>(artwork_id)?;
            Ok(artwork)
        })?;

        info!(artwork = artwork_id, writes = executed.writes, "artwork deleted");
        Ok(executed.into_assignment_result())
    }

    /// Scan the store for inconsistencies. Read-only.
    pub fn audit(&self) -> Result<AuditReport> {
        audit::audit(self.store.as_ref())
    }

    // =========================================================================
    // Execution
    // =========================================================================

    fn deadline(&self) -> Deadline {
        Deadline::start(self.config.operation_timeout())
    }

    fn uses_transaction(&self, mode: Mode) -> bool {
        self.store.supports_transactions()
            && (self.config.transactional || mode == Mode::PreferTransaction)
    }

    /// Ids of artworks whose `artistId` names the artist.
    fn owned_artworks(&self, deadline: Deadline, artist_id: &str) -> Result<Vec<String>> {
        let access = StoreAccess::new(self.store.as_ref(), deadline);
        Ok(access.query_ids(
            Collection::Artworks,
            &Predicate::all().eq("artistId", artist_id),
        )?)
    }

    /// Shows and locations whose arrays list the artwork.
    fn holders(&self, deadline: Deadline, artwork_id: &str) -> Result<Footprint> {
        let access = StoreAccess::new(self.store.as_ref(), deadline);
        Footprint::find(&access, artwork_id)
    }

    /// [`holders`](Self::holders) for each of `artwork_ids`.
    fn holders_of_all(
        &self,
        deadline: Deadline,
        artwork_ids: &[String],
    ) -> Result<BTreeMap<String, Footprint>> {
        let access = StoreAccess::new(self.store.as_ref(), deadline);
        let mut found = BTreeMap::new();
        for id in artwork_ids {
            found.insert(id.clone(), Footprint::find(&access, id)?);
        }
        Ok(found)
    }

    pub(crate) fn execute<T>(
        &self,
        operation: &'static str,
        mode: Mode,
        body: impl FnMut(&mut WorkSet<'_>) -> Result<T>,
    ) -> Result<Executed<T>> {
        self.execute_with(operation, mode, self.deadline(), body)
    }

    /// Run `body` against a fresh work set and apply the resulting plan.
    ///
    /// In a transaction the body is re-run from scratch after a conflict;
    /// it must not have effects outside the work set.
    fn execute_with<T>(
        &self,
        operation: &'static str,
        mode: Mode,
        deadline: Deadline,
        mut body: impl FnMut(&mut WorkSet<'_>) -> Result<T>,
    ) -> Result<Executed<T>> {
        if !self.uses_transaction(mode) {
            let mut access = StoreAccess::new(self.store.as_ref(), deadline);
            let mut ws = WorkSet::new(&mut access);
            let value = body(&mut ws)?;
            let flushed = ws.commit(self.config.compensate_on_failure)?;
            debug!(operation, writes = flushed.writes, "operation applied");
            return Ok(Executed::new(value, flushed));
        }

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let mut outcome = None;
            let result = self.store.run_transaction(&mut |tx: &mut dyn Transaction| {
                let mut access = TxAccess::new(tx, deadline);
                let mut ws = WorkSet::new(&mut access);
                let value = body(&mut ws)?;
                let flushed = ws.commit(false)?;
                outcome = Some((value, flushed));
                Ok(())
            });

            match result {
                Ok(()) => {
                    let (value, flushed) = outcome.ok_or_else(|| {
                        StoreError::Backend(format!(
                            "{} committed a transaction without running it",
                            self.store.name()
                        ))
                    })?;
                    debug!(operation, attempt, writes = flushed.writes, "transaction committed");
                    return Ok(Executed::new(value, flushed));
                }
                Err(err) if err.is_conflict() && attempt <= self.config.max_conflict_retries => {
                    let delay = self.backoff(attempt);
                    warn!(operation, attempt, delay_ms = delay.as_millis() as u64, error = %err, "conflict; retrying");
                    deadline.check()?;
                    std::thread::sleep(delay);
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.config.retry_backoff_ms;
        Duration::from_millis(base.saturating_mul(u64::from(attempt)) + fastrand::u64(0..=base))
    }

    fn notify(
        &self,
        event: &AcceptanceEvent,
        warnings: &mut Vec<PartialApplicationWarning>,
    ) -> Option<AcceptanceEvent> {
        let hook = self.notifier.as_ref()?;
        match hook.notify(event) {
            Ok(()) => {
                debug!(hook = hook.name(), artist = %event.artist_id, "acceptance notification sent");
                Some(event.clone())
            }
            Err(err) => {
                warn!(hook = hook.name(), artist = %event.artist_id, error = %err, "acceptance notification failed");
                warnings.push(PartialApplicationWarning::NotificationFailed {
                    artist_id: event.artist_id.clone(),
                    reason: err.to_string(),
                });
                None
            }
        }
    }
}

fn accept(show_id: &str, location_id: Option<&str>) -> Transition {
    Transition::Accept {
        show_id: show_id.to_string(),
        location_id: location_id.map(str::to_string),
    }
}

fn validate_target(show_id: &str, location_id: Option<&str>) -> Result<()> {
    validate_id("show", show_id)?;
    if let Some(location_id) = location_id {
        validate_id("location", location_id)?;
    }
    Ok(())
}
