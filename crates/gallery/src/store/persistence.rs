//! Persistence for the in-memory store - save/load JSON snapshots.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GalleryError, Result};

use super::memory::MemoryStore;
use super::{Collection, Document, with_id};

/// Current version of the snapshot format.
pub const STORE_FORMAT_VERSION: &str = "1.0.0";

/// Serialized contents of a [`MemoryStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Version of the snapshot format.
    pub format_version: String,

    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,

    /// Documents per collection, in insertion order.
    pub collections: IndexMap<Collection, Vec<Document>>,
}

impl StoreSnapshot {
    /// Number of documents across all collections.
    pub fn document_count(&self) -> usize {
        self.collections.values().map(Vec::len).sum()
    }
}

impl MemoryStore {
    /// Capture every document.
    pub fn snapshot(&self) -> Result<StoreSnapshot> {
        let tables = self.read()?;
        let mut collections = IndexMap::new();
        for collection in Collection::ALL {
            let docs = tables
                .collections
                .get(&collection)
                .map(|docs| {
                    docs.values()
                        .map(|stored| Value::Object(stored.fields.clone()))
                        .collect()
                })
                .unwrap_or_default();
            collections.insert(collection, docs);
        }

        Ok(StoreSnapshot {
            format_version: STORE_FORMAT_VERSION.to_string(),
            saved_at: Utc::now(),
            collections,
        })
    }

    /// Build a transactional store from a snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        let store = MemoryStore::new();
        {
            let mut tables = store.write()?;
            for (collection, docs) in snapshot.collections {
                for doc in docs {
                    let id = doc
                        .get("id")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .ok_or_else(|| {
                            GalleryError::Persistence(format!(
                                "Document without an id in collection '{}'",
                                collection
                            ))
                        })?;
                    let fields = with_id(&id, doc)?;
                    tables.put(collection, &id, fields);
                }
            }
        }
        Ok(store)
    }

    /// Save the store to a JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use gallery::MemoryStore;
    /// # fn example(store: &MemoryStore) -> gallery::Result<()> {
    /// store.save("gallery.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let snapshot = self.snapshot()?;

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    GalleryError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            GalleryError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &snapshot).map_err(|e| {
            GalleryError::Persistence(format!("Failed to serialize store snapshot: {}", e))
        })?;

        Ok(())
    }

    /// Load a store from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let snapshot = read_snapshot(path.as_ref())?;
        Self::from_snapshot(snapshot)
    }

    /// Save with version history.
    ///
    /// Copies the existing file into a `.history` directory, named by the
    /// time it was saved, before writing the new snapshot.
    ///
    /// ```text
    /// data/
    /// ├── gallery.json                  # Current version
    /// └── gallery.history/
    ///     └── 2024-12-30T10-00-00.json  # Previous version
    /// ```
    pub fn save_with_history(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if path.exists() {
            archive_current(path)?;
        }

        self.save(path)
    }

    /// List all historical snapshots, newest first.
    pub fn list_history(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
        let history_dir = history_directory(path.as_ref());

        if !history_dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<PathBuf> = fs::read_dir(&history_dir)
            .map_err(|e| {
                GalleryError::Persistence(format!(
                    "Failed to read history directory '{}': {}",
                    history_dir.display(),
                    e
                ))
            })?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();

        // Sort by filename (timestamp) descending
        entries.sort_by(|a, b| b.cmp(a));

        Ok(entries)
    }

    /// Load a specific historical snapshot (0 = newest).
    pub fn load_history(path: impl AsRef<Path>, index: usize) -> Result<Self> {
        let history = Self::list_history(&path)?;

        let history_path = history.get(index).ok_or_else(|| {
            GalleryError::Persistence(format!(
                "History version {} not found (only {} versions available)",
                index,
                history.len()
            ))
        })?;

        Self::load(history_path)
    }
}

fn read_snapshot(path: &Path) -> Result<StoreSnapshot> {
    let file = File::open(path).map_err(|e| {
        GalleryError::Persistence(format!("Failed to open file '{}': {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        GalleryError::Persistence(format!(
            "Failed to parse store snapshot '{}': {}",
            path.display(),
            e
        ))
    })
}

fn archive_current(path: &Path) -> Result<()> {
    let history_dir = history_directory(path);

    if !history_dir.exists() {
        fs::create_dir_all(&history_dir).map_err(|e| {
            GalleryError::Persistence(format!(
                "Failed to create history directory '{}': {}",
                history_dir.display(),
                e
            ))
        })?;
    }

    let existing = read_snapshot(path)?;
    let timestamp = existing.saved_at.format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
    let history_file = history_dir.join(format!("{}.json", timestamp));

    fs::copy(path, &history_file).map_err(|e| {
        GalleryError::Persistence(format!(
            "Failed to archive '{}' to '{}': {}",
            path.display(),
            history_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Get the history directory for a snapshot file.
fn history_directory(path: &Path) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let parent = path.parent().unwrap_or(Path::new("."));

    parent.join(format!("{}.history", stem))
}
