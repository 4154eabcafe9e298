//! Hook that records events in the log.

use tracing::info;

use super::hook::{AcceptanceEvent, NotificationHook, NotifyError};

/// Logs every acceptance at `info`.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationHook for LogNotifier {
    fn notify(&self, event: &AcceptanceEvent) -> Result<(), NotifyError> {
        info!(
            artist = %event.artist_id,
            show = %event.show_id,
            location = event.location_id.as_deref().unwrap_or("-"),
            selected = event.selected_artwork_count,
            "artist accepted into show"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
