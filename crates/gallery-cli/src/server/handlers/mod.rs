//! API request handlers.

mod artists;
mod artworks;
mod documents;
mod shows;

pub use artists::*;
pub use artworks::*;
pub use documents::*;
pub use shows::*;

use gallery::ConsistencyEngine;
use tracing::warn;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Run an engine operation off the async runtime, then persist the store.
///
/// Engine calls block: conflict retries sleep and the store is synchronous.
/// The store is saved even when the operation fails, since a failure on a
/// store without transactions can leave writes that were not compensated.
async fn run_engine<T, F>(state: &AppState, operation: F) -> Result<T, ApiError>
where
    F: FnOnce(&ConsistencyEngine) -> gallery::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let engine = state.engine.clone();
    let outcome = tokio::task::spawn_blocking(move || operation(&engine)).await;

    let saved = state.persist().await;
    if let Err(e) = &saved {
        warn!(path = %state.store_path.display(), error = %e, "failed to save store");
    }

    let value = outcome.map_err(|e| ApiError::Internal(format!("engine task failed: {}", e)))??;
    saved?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use gallery::{Artwork, MemoryStore};
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> AppState {
        let store = Arc::new(MemoryStore::new());
        store.put_entity(&Artwork::new("A1", "a1")).unwrap();
        let engine = ConsistencyEngine::new(store.clone());
        AppState::new(engine, store, dir.path().join("gallery.json"))
    }

    #[tokio::test]
    async fn test_failed_operation_still_saves() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        let result = run_engine(&state, |engine| engine.reject_artwork("missing")).await;

        assert!(matches!(result, Err(ApiError::Gallery(_))));
        assert!(state.store_path.exists());
    }

    #[tokio::test]
    async fn test_successful_operation_saves() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        let artwork = run_engine(&state, |engine| engine.reject_artwork("A1"))
            .await
            .unwrap();

        assert_eq!(artwork.writes, 0);
        let saved = MemoryStore::load(&state.store_path).unwrap();
        assert!(saved.entity::<Artwork>("A1").unwrap().is_some());
    }
}
