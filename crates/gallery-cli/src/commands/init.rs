//! Init command - create a store file, optionally seeded from JSON.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use gallery::{Collection, DocumentStore, MemoryStore};
use serde_json::Value;

use super::{CommandResult, Context};

pub fn run(ctx: &Context, from: Option<PathBuf>, force: bool) -> CommandResult {
    if ctx.store_path.exists() && !force {
        return Err(format!(
            "Store file already exists: {}\nUse --force to overwrite it.",
            ctx.store_path.display()
        )
        .into());
    }

    let store = MemoryStore::new();
    if let Some(seed) = &from {
        let content = fs::read_to_string(seed)
            .map_err(|e| format!("Failed to read seed file '{}': {}", seed.display(), e))?;
        let seed_value: Value = serde_json::from_str(&content)?;
        import(&store, &seed_value)?;
    }

    store.save_with_history(&ctx.store_path)?;

    println!(
        "{} {}",
        "Created store".green().bold(),
        ctx.store_path.display().to_string().white()
    );
    for collection in Collection::ALL {
        println!("  {:<10} {}", collection.as_str(), store.len(collection));
    }

    if from.is_some() {
        let report = gallery::audit::audit(&store)?;
        if !report.is_clean() {
            println!();
            println!(
                "{} seed data has {} consistency issue(s); run {} for details",
                "Note:".yellow().bold(),
                report.violations.len(),
                "gallery check".cyan()
            );
        }
    }

    Ok(())
}

/// Insert every document found under a collection key of `seed`.
fn import(store: &MemoryStore, seed: &Value) -> Result<(), Box<dyn std::error::Error>> {
    let object = seed
        .as_object()
        .ok_or("Seed file must be a JSON object keyed by collection name")?;

    for collection in Collection::ALL {
        let Some(docs) = object.get(collection.as_str()) else {
            continue;
        };
        let docs = docs
            .as_array()
            .ok_or_else(|| format!("'{}' must be an array of documents", collection))?;

        for doc in docs {
            let id = doc
                .get("id")
                .and_then(Value::as_str)
                .ok_or_else(|| format!("{} document without a string 'id'", collection))?;
            store.insert(collection, id, doc.clone())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery::EngineConfig;
    use serde_json::json;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> Context {
        Context {
            store_path: dir.path().join("gallery.json"),
            config: EngineConfig::default(),
            webhook: None,
        }
    }

    #[test]
    fn test_import_reads_known_collections() {
        let store = MemoryStore::new();
        import(
            &store,
            &json!({
                "artists": [{"id": "a1", "artworks": ["A1"]}],
                "artworks": [{"id": "A1", "artistId": "a1"}],
                "shows": [{"id": "s1"}],
                "notes": [{"id": "ignored"}]
            }),
        )
        .unwrap();

        assert_eq!(store.len(Collection::Artists), 1);
        assert_eq!(store.len(Collection::Artworks), 1);
        assert_eq!(store.len(Collection::Shows), 1);
        assert_eq!(store.len(Collection::Locations), 0);
    }

    #[test]
    fn test_import_requires_string_ids() {
        let store = MemoryStore::new();
        let err = import(&store, &json!({"shows": [{"name": "Spring"}]})).unwrap_err();
        assert!(err.to_string().contains("without a string 'id'"));
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);

        run(&ctx, None, false).unwrap();
        assert!(ctx.store_path.exists());
        assert!(run(&ctx, None, false).is_err());
        assert!(run(&ctx, None, true).is_ok());
    }
}
