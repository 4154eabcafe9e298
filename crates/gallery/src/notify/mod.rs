//! Notifications emitted after an artist is accepted into a show.
//!
//! The engine calls the configured [`NotificationHook`] once per successful
//! `accept_artist_into_show`, after every write has landed. Hooks must not
//! block on delivery; a failing hook is reported as a warning on the result
//! and never undoes the acceptance.
//!
//! # Hooks
//!
//! - **LogNotifier** - writes a `tracing` event
//! - **ChannelNotifier** - hands events to an in-process receiver
//! - **WebhookNotifier** - POSTs JSON from a background worker thread
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gallery::{ConsistencyEngine, MemoryStore};
//! use gallery::notify::WebhookNotifier;
//!
//! let engine = ConsistencyEngine::new(Arc::new(MemoryStore::new()))
//!     .with_notifier(WebhookNotifier::new("https://example.org/hooks/accepted").unwrap());
//! ```

mod channel;
mod hook;
mod logging;
mod webhook;

pub use channel::ChannelNotifier;
pub use hook::{AcceptanceEvent, NotificationHook, NotifyError};
pub use logging::LogNotifier;
pub use webhook::WebhookNotifier;
