//! Application state for the web server.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use gallery::{ConsistencyEngine, MemoryStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Engine over `store`.
    pub engine: Arc<ConsistencyEngine>,
    /// The store being served, kept concrete for saving.
    pub store: Arc<MemoryStore>,
    /// Path to the store file.
    pub store_path: PathBuf,
    /// Whether to save after every successful write.
    pub auto_save: bool,
    /// Serializes snapshot writes to `store_path`.
    save_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(engine: ConsistencyEngine, store: Arc<MemoryStore>, store_path: PathBuf) -> Self {
        Self {
            engine: Arc::new(engine),
            store,
            store_path,
            auto_save: true,
            save_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Save the store to disk.
    pub async fn save(&self) -> Result<(), gallery::GalleryError> {
        let _guard = self.save_lock.lock().await;
        self.store.save(&self.store_path)
    }

    /// Save if auto-save is on.
    pub async fn persist(&self) -> Result<(), gallery::GalleryError> {
        if self.auto_save {
            self.save().await?;
        }
        Ok(())
    }
}
