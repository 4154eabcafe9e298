//! Assignment state machine.
//!
//! An artwork's placement is stored as three loosely coupled fields
//! (`showStatus`, `artshowId`, `locationId`). In memory it is a single
//! [`Assignment`] so that combinations such as "accepted without a show"
//! cannot be represented.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stored `showStatus` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowStatus {
    None,
    Accepted,
    Rejected,
    Shown,
}

impl ShowStatus {
    /// Parse a stored value; unknown or empty strings read as `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(ShowStatus::None),
            "accepted" => Some(ShowStatus::Accepted),
            "rejected" => Some(ShowStatus::Rejected),
            "shown" => Some(ShowStatus::Shown),
            _ => None,
        }
    }

    /// Stored string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShowStatus::None => "none",
            ShowStatus::Accepted => "accepted",
            ShowStatus::Rejected => "rejected",
            ShowStatus::Shown => "shown",
        }
    }
}

/// Where an artwork currently stands with respect to shows and locations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Assignment {
    /// Never placed, or placement withdrawn without a decision.
    #[default]
    None,
    /// Placed into a show, optionally at a location.
    Accepted {
        show_id: String,
        location_id: Option<String>,
    },
    /// Declined or removed; holds no references.
    Rejected,
    /// Exhibited in a show.
    Shown {
        show_id: String,
        location_id: Option<String>,
    },
}

impl Assignment {
    /// Build the assignment for an accepted artwork.
    pub fn accepted(show_id: impl Into<String>, location_id: Option<&str>) -> Self {
        Assignment::Accepted {
            show_id: show_id.into(),
            location_id: location_id.map(str::to_string),
        }
    }

    /// Stored status for this assignment.
    pub fn status(&self) -> ShowStatus {
        match self {
            Assignment::None => ShowStatus::None,
            Assignment::Accepted { .. } => ShowStatus::Accepted,
            Assignment::Rejected => ShowStatus::Rejected,
            Assignment::Shown { .. } => ShowStatus::Shown,
        }
    }

    /// Show referenced by `artshowId`, if any.
    pub fn show_id(&self) -> Option<&str> {
        match self {
            Assignment::Accepted { show_id, .. } | Assignment::Shown { show_id, .. } => {
                Some(show_id)
            }
            Assignment::None | Assignment::Rejected => None,
        }
    }

    /// Location referenced by `locationId`, if any.
    pub fn location_id(&self) -> Option<&str> {
        match self {
            Assignment::Accepted { location_id, .. } | Assignment::Shown { location_id, .. } => {
                location_id.as_deref()
            }
            Assignment::None | Assignment::Rejected => None,
        }
    }

    /// Whether the artwork holds show or location references.
    pub fn is_placed(&self) -> bool {
        self.show_id().is_some()
    }

    /// Whether the artwork is accepted into exactly this show and location.
    pub fn is_accepted_at(&self, show_id: &str, location_id: Option<&str>) -> bool {
        matches!(self, Assignment::Accepted { .. })
            && self.show_id() == Some(show_id)
            && self.location_id() == location_id
    }

    /// Rebuild from the three stored fields.
    ///
    /// Returns the assignment and whether the stored combination had to be
    /// coerced (for example `accepted` with an empty `artshowId`).
    pub fn from_stored(
        status: ShowStatus,
        show_id: Option<String>,
        location_id: Option<String>,
        last_shown: Option<&str>,
    ) -> (Self, bool) {
        match (status, show_id) {
            (ShowStatus::None, show) => (Assignment::None, show.is_some() || location_id.is_some()),
            (ShowStatus::Rejected, show) => {
                (Assignment::Rejected, show.is_some() || location_id.is_some())
            }
            (ShowStatus::Accepted, Some(show_id)) => (
                Assignment::Accepted {
                    show_id,
                    location_id,
                },
                false,
            ),
            (ShowStatus::Accepted, None) => (Assignment::None, true),
            (ShowStatus::Shown, Some(show_id)) => (
                Assignment::Shown {
                    show_id,
                    location_id,
                },
                false,
            ),
            (ShowStatus::Shown, None) => match last_shown {
                Some(show_id) => (
                    Assignment::Shown {
                        show_id: show_id.to_string(),
                        location_id,
                    },
                    true,
                ),
                None => (Assignment::None, true),
            },
        }
    }

    /// Apply a transition, returning the new assignment.
    ///
    /// | from | `Accept` | `Reject` | `Decline` | `Remove` | `MarkShown` |
    /// |---|---|---|---|---|---|
    /// | none | accepted | none | rejected | none | shown |
    /// | accepted | accepted | rejected | rejected | rejected | shown |
    /// | rejected | accepted | rejected | rejected | rejected | shown |
    /// | shown | accepted | rejected | rejected | rejected | shown |
    pub fn apply(&self, transition: &Transition) -> Result<Assignment, TransitionError> {
        match transition {
            Transition::Accept {
                show_id,
                location_id,
            } => {
                if show_id.trim().is_empty() {
                    return Err(TransitionError::EmptyShowId { transition: "accept" });
                }
                if location_id.as_deref().is_some_and(|l| l.trim().is_empty()) {
                    return Err(TransitionError::EmptyLocationId);
                }
                Ok(Assignment::Accepted {
                    show_id: show_id.clone(),
                    location_id: location_id.clone(),
                })
            }
            Transition::Reject => Ok(match self {
                Assignment::None => Assignment::None,
                _ => Assignment::Rejected,
            }),
            Transition::Decline => Ok(Assignment::Rejected),
            Transition::Remove => Ok(match self {
                Assignment::None => Assignment::None,
                _ => Assignment::Rejected,
            }),
            Transition::MarkShown { show_id } => {
                if show_id.trim().is_empty() {
                    return Err(TransitionError::EmptyShowId {
                        transition: "mark shown",
                    });
                }
                let location_id = match self {
                    Assignment::Accepted {
                        show_id: current,
                        location_id,
                    }
                    | Assignment::Shown {
                        show_id: current,
                        location_id,
                    } if current == show_id => location_id.clone(),
                    _ => None,
                };
                Ok(Assignment::Shown {
                    show_id: show_id.clone(),
                    location_id,
                })
            }
        }
    }
}

/// A requested change of assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Place into a show (and optionally a location).
    Accept {
        show_id: String,
        location_id: Option<String>,
    },
    /// Curator rejection of a single artwork; no-op when unplaced.
    Reject,
    /// Batch acceptance left this artwork unselected.
    Decline,
    /// The owning artist was removed from the show.
    Remove,
    /// The artwork was exhibited.
    MarkShown { show_id: String },
}

impl Transition {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Transition::Accept { .. } => "accept",
            Transition::Reject => "reject",
            Transition::Decline => "decline",
            Transition::Remove => "remove",
            Transition::MarkShown { .. } => "mark_shown",
        }
    }
}

/// A transition that cannot produce a representable assignment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {transition} without a show id")]
    EmptyShowId { transition: &'static str },

    #[error("location id must be absent or non-empty")]
    EmptyLocationId,
}
