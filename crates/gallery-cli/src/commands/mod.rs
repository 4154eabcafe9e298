//! CLI command implementations.

pub mod artist;
pub mod artwork;
pub mod assign;
pub mod check;
pub mod export;
pub mod history;
pub mod init;
pub mod inspect;
pub mod reorder;
pub mod serve;

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use gallery::notify::{LogNotifier, WebhookNotifier};
use gallery::{ConsistencyEngine, EngineConfig, MemoryStore, PartialApplicationWarning};
use tracing::info;

use crate::cli::Cli;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Settings shared by every command.
pub struct Context {
    pub store_path: PathBuf,
    pub config: EngineConfig,
    pub webhook: Option<String>,
}

impl Context {
    /// Resolve configuration: file first, then command-line overrides.
    pub fn from_cli(cli: &Cli) -> Result<Self, Box<dyn std::error::Error>> {
        let mut config = match &cli.config {
            Some(path) => EngineConfig::from_file(path)?,
            None => EngineConfig::default(),
        };
        if cli.no_transactions {
            config = config.with_transactions(false);
        }
        if cli.lenient_order {
            config = config.with_strict_order(false);
        }
        config.validate()?;

        Ok(Self {
            store_path: cli.store.clone(),
            config,
            webhook: cli.webhook.clone(),
        })
    }

    /// Load the store file.
    pub fn load_store(&self) -> Result<Arc<MemoryStore>, Box<dyn std::error::Error>> {
        if !self.store_path.exists() {
            return Err(format!(
                "Store file not found: {}\nRun 'gallery init' first.",
                self.store_path.display()
            )
            .into());
        }
        Ok(Arc::new(MemoryStore::load(&self.store_path)?))
    }

    /// Build an engine over `store` with the configured notifier.
    pub fn engine(
        &self,
        store: Arc<MemoryStore>,
    ) -> Result<ConsistencyEngine, Box<dyn std::error::Error>> {
        let engine = ConsistencyEngine::new(store).with_config(self.config.clone());
        Ok(match &self.webhook {
            Some(url) => engine.with_notifier(WebhookNotifier::new(url.clone())?),
            None => engine.with_notifier(LogNotifier::new()),
        })
    }

    /// Load the store and build an engine over it.
    pub fn open(&self) -> Result<(Arc<MemoryStore>, ConsistencyEngine), Box<dyn std::error::Error>> {
        let store = self.load_store()?;
        let engine = self.engine(store.clone())?;
        Ok((store, engine))
    }

    /// Write the store back, keeping the previous file in history.
    pub fn save(&self, store: &MemoryStore) -> CommandResult {
        store.save_with_history(&self.store_path)?;
        info!(path = %self.store_path.display(), "store saved");
        Ok(())
    }
}

/// Print the write count and any warnings of a completed operation.
pub(crate) fn print_outcome(writes: usize, warnings: &[PartialApplicationWarning]) {
    if writes == 0 {
        println!("  {}", "No changes needed".dimmed());
    } else {
        println!("  Writes: {}", writes.to_string().white().bold());
    }
    for warning in warnings {
        println!("  {} {}", "Warning:".yellow().bold(), warning);
    }
}
