//! Notification hook trait and event payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Emitted once when an artist has been accepted into a show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptanceEvent {
    pub artist_id: String,
    pub show_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    pub selected_artwork_count: usize,
    pub accepted_at: DateTime<Utc>,
}

impl AcceptanceEvent {
    /// Create an event stamped with the current time.
    pub fn new(
        artist_id: impl Into<String>,
        show_id: impl Into<String>,
        location_id: Option<&str>,
        selected_artwork_count: usize,
    ) -> Self {
        Self {
            artist_id: artist_id.into(),
            show_id: show_id.into(),
            location_id: location_id.map(str::to_string),
            selected_artwork_count,
            accepted_at: Utc::now(),
        }
    }
}

/// Why a hook could not take an event.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotifyError {
    /// The consumer or delivery worker has gone away.
    #[error("notification consumer disconnected")]
    Disconnected,

    /// The hook refused the event.
    #[error("notification rejected: {0}")]
    Rejected(String),
}

/// Receiver of acceptance events.
///
/// Implementations must be thread-safe (Send + Sync) and should return
/// quickly: the engine calls them on the request path.
pub trait NotificationHook: Send + Sync {
    /// Hand off one event.
    fn notify(&self, event: &AcceptanceEvent) -> Result<(), NotifyError>;

    /// Hook name (for logging).
    fn name(&self) -> &str;
}
