//! JSON HTTP API over the consistency engine.

pub mod app;
pub mod error;
pub mod handlers;
pub mod state;
