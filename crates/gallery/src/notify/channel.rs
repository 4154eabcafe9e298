//! Hook that forwards events to an in-process receiver.

use std::sync::mpsc::{self, Receiver, Sender};

use super::hook::{AcceptanceEvent, NotificationHook, NotifyError};

/// Sends every event into a standard channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: Sender<AcceptanceEvent>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end of its channel.
    pub fn new() -> (Self, Receiver<AcceptanceEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl NotificationHook for ChannelNotifier {
    fn notify(&self, event: &AcceptanceEvent) -> Result<(), NotifyError> {
        self.sender
            .send(event.clone())
            .map_err(|_| NotifyError::Disconnected)
    }

    fn name(&self) -> &str {
        "channel"
    }
}
