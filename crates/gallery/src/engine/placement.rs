//! Moving one artwork between placements while keeping every back reference
//! in step with it.

use std::collections::BTreeSet;

use tracing::debug;

use crate::curation;
use crate::error::Result;
use crate::model::{Artwork, Assignment, Transition};
use crate::relation::Relation;
use crate::store::{Collection, Predicate};

use super::session::StoreAccess;
use super::workset::WorkSet;

/// Drive an artwork through `transition`.
///
/// Leaves the show and location it no longer references, joins the ones
/// an acceptance names, and records exhibition history for `MarkShown`.
/// The artwork itself must exist; missing shows or locations are warnings.
pub(crate) fn transition(
    ws: &mut WorkSet<'_>,
    artwork_id: &str,
    transition: &Transition,
) -> Result<Artwork> {
    let artwork = ws.require::<Artwork>(artwork_id)?;
    let previous = artwork.assignment.clone();
    let artist_id = artwork.artist_id.clone();
    let next = previous.apply(transition)?;

    debug!(
        artwork = artwork_id,
        transition = transition.name(),
        from = previous.status().as_str(),
        to = next.status().as_str(),
        "applying transition"
    );

    leave(ws, artwork_id, &previous, &next)?;

    match &next {
        Assignment::Accepted {
            show_id,
            location_id,
        } => join(ws, artwork_id, &artist_id, show_id, location_id.as_deref())?,
        Assignment::Shown { show_id, .. } => {
            ws.require::<Artwork>(artwork_id)?
                .been_in_shows
                .push_unless_last(show_id);
        }
        Assignment::None | Assignment::Rejected => {}
    }

    let artwork = ws.require::<Artwork>(artwork_id)?;
    artwork.assignment = next;
    Ok(artwork.clone())
}

/// Drop memberships the new assignment no longer backs.
fn leave(
    ws: &mut WorkSet<'_>,
    artwork_id: &str,
    previous: &Assignment,
    next: &Assignment,
) -> Result<()> {
    let same_show = previous.show_id().is_some() && previous.show_id() == next.show_id();

    if let Some(show_id) = previous.show_id() {
        if !same_show {
            ws.remove_member(Relation::ShowArtworks, show_id, artwork_id)?;
            curation::remove_from_order(ws, show_id, artwork_id)?;
        }
    }
    if let Some(location_id) = previous.location_id() {
        if !same_show || next.location_id() != Some(location_id) {
            ws.remove_member(Relation::LocationArtworks, location_id, artwork_id)?;
        }
    }
    Ok(())
}

/// Add an accepted artwork (and its artist) to the show and location.
fn join(
    ws: &mut WorkSet<'_>,
    artwork_id: &str,
    artist_id: &str,
    show_id: &str,
    location_id: Option<&str>,
) -> Result<()> {
    ws.add_member(Relation::ShowArtworks, show_id, artwork_id)?;
    ws.add_member(Relation::ShowArtists, show_id, artist_id)?;
    curation::append_to_order(ws, show_id, artwork_id)?;

    if let Some(location_id) = location_id {
        ws.add_member(Relation::LocationArtworks, location_id, artwork_id)?;
        ws.add_member(Relation::LocationArtists, location_id, artist_id)?;
    }
    Ok(())
}

/// Drop an artwork from every show and location in `holders` that its
/// current assignment does not back.
///
/// Repairs arrays left behind when an earlier run of an operation wrote the
/// artwork but failed before its shows or locations.
pub(crate) fn sweep(ws: &mut WorkSet<'_>, artwork_id: &str, holders: &Footprint) -> Result<()> {
    let artwork = ws.require::<Artwork>(artwork_id)?;
    let show = artwork.artshow_id().map(str::to_string);
    let location = artwork.location_id().map(str::to_string);

    for show_id in &holders.shows {
        if show.as_ref() != Some(show_id) {
            ws.remove_member(Relation::ShowArtworks, show_id, artwork_id)?;
            curation::remove_from_order(ws, show_id, artwork_id)?;
        }
    }
    for location_id in &holders.locations {
        if location.as_ref() != Some(location_id) {
            ws.remove_member(Relation::LocationArtworks, location_id, artwork_id)?;
        }
    }
    Ok(())
}

/// A set of shows and locations: the ones an artist's artworks were placed
/// in, or the ones whose arrays list an artwork.
#[derive(Debug, Clone, Default)]
pub(crate) struct Footprint {
    pub(crate) shows: BTreeSet<String>,
    pub(crate) locations: BTreeSet<String>,
}

impl Footprint {
    /// Query the shows and locations whose arrays list `artwork_id`.
    pub(crate) fn find(access: &StoreAccess<'_>, artwork_id: &str) -> Result<Self> {
        let mut found = Footprint::default();
        for relation in [Relation::ShowArtworks, Relation::ShowOrder] {
            found.shows.extend(access.query_ids(
                Collection::Shows,
                &Predicate::all().contains(relation.field(), artwork_id),
            )?);
        }
        found.locations.extend(access.query_ids(
            Collection::Locations,
            &Predicate::all().contains(Relation::LocationArtworks.field(), artwork_id),
        )?);
        Ok(found)
    }

    pub(crate) fn extend(&mut self, other: &Footprint) {
        self.shows.extend(other.shows.iter().cloned());
        self.locations.extend(other.locations.iter().cloned());
    }

    pub(crate) fn record(&mut self, assignment: &Assignment) {
        if let Some(show_id) = assignment.show_id() {
            self.shows.insert(show_id.to_string());
        }
        if let Some(location_id) = assignment.location_id() {
            self.locations.insert(location_id.to_string());
        }
    }

    /// Remove the artist from every recorded show and location except the
    /// ones it is staying in.
    pub(crate) fn release(
        &self,
        ws: &mut WorkSet<'_>,
        artist_id: &str,
        keep_show: Option<&str>,
        keep_location: Option<&str>,
    ) -> Result<()> {
        for show_id in &self.shows {
            if Some(show_id.as_str()) != keep_show {
                ws.remove_member(Relation::ShowArtists, show_id, artist_id)?;
            }
        }
        for location_id in &self.locations {
            if Some(location_id.as_str()) != keep_location {
                ws.remove_member(Relation::LocationArtists, location_id, artist_id)?;
            }
        }
        Ok(())
    }
}
