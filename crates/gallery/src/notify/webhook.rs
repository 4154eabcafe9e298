//! Webhook delivery of acceptance events.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, error, warn};

use crate::error::{GalleryError, Result};

use super::hook::{AcceptanceEvent, NotificationHook, NotifyError};

/// Default per-request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs each event as JSON to a fixed URL.
///
/// `notify` only queues the event; a dedicated worker thread owns the HTTP
/// client and delivers events in order. Delivery failures are logged and
/// dropped. Dropping the notifier waits for queued events to be sent.
pub struct WebhookNotifier {
    url: String,
    sender: Option<Sender<AcceptanceEvent>>,
    worker: Option<JoinHandle<()>>,
}

impl WebhookNotifier {
    /// Create a notifier for `url` with the default timeout.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    /// Create a notifier with a custom per-request timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let url = url.into();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(GalleryError::Config(format!(
                "Webhook URL must start with http:// or https://, got '{}'",
                url
            )));
        }

        let (sender, receiver) = mpsc::channel();
        let worker_url = url.clone();
        let worker = thread::Builder::new()
            .name("gallery-webhook".to_string())
            .spawn(move || deliver(worker_url, timeout, receiver))
            .map_err(|e| GalleryError::Config(format!("Failed to start webhook worker: {}", e)))?;

        Ok(Self {
            url,
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Target URL.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl NotificationHook for WebhookNotifier {
    fn notify(&self, event: &AcceptanceEvent) -> std::result::Result<(), NotifyError> {
        let sender = self.sender.as_ref().ok_or(NotifyError::Disconnected)?;
        sender
            .send(event.clone())
            .map_err(|_| NotifyError::Disconnected)
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

impl Drop for WebhookNotifier {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop once the queue is drained.
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!(url = %self.url, "webhook worker panicked");
            }
        }
    }
}

/// Worker loop. The client is built here so it never lives on a caller's
/// async runtime thread.
fn deliver(url: String, timeout: Duration, receiver: Receiver<AcceptanceEvent>) {
    let client = match Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            error!(url = %url, error = %e, "failed to create HTTP client; webhook disabled");
            // Drain so senders never block on a dead worker.
            for _ in receiver {}
            return;
        }
    };

    for event in receiver {
        match client.post(&url).json(&event).send() {
            Ok(response) if response.status().is_success() => {
                debug!(url = %url, artist = %event.artist_id, "webhook delivered");
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().unwrap_or_default();
                warn!(url = %url, %status, body = %body, "webhook rejected event");
            }
            Err(e) => {
                warn!(url = %url, error = %e, "webhook delivery failed");
            }
        }
    }
}
