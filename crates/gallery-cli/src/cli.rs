//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use gallery::Collection;

/// Gallery: keep artworks, shows, locations and artists consistent
#[derive(Parser)]
#[command(name = "gallery")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store snapshot file
    #[arg(short, long, global = true, default_value = "gallery.json")]
    pub store: PathBuf,

    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Apply writes one by one instead of in a store transaction
    #[arg(long, global = true)]
    pub no_transactions: bool,

    /// Allow reorders to keep ids already present in a show's order
    #[arg(long, global = true)]
    pub lenient_order: bool,

    /// POST artist acceptance events to this URL
    #[arg(long, global = true)]
    pub webhook: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a store file, optionally seeded with documents
    Init {
        /// JSON file mapping collection names to arrays of documents
        #[arg(long, value_name = "FILE")]
        from: Option<PathBuf>,

        /// Overwrite an existing store file
        #[arg(long)]
        force: bool,
    },

    /// Create or delete artworks
    Artwork {
        #[command(subcommand)]
        action: ArtworkAction,
    },

    /// Accept an artwork into a show
    Assign {
        /// Artwork id
        artwork: String,

        /// Show id
        show: String,

        /// Location id
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Reject an artwork and clear its show and location
    Reject {
        /// Artwork id
        artwork: String,
    },

    /// Move an artwork to another show and location
    Reassign {
        /// Artwork id
        artwork: String,

        /// Target show id
        show: String,

        /// Target location id
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Accept an artist into a show with a selection of their artworks
    AcceptArtist {
        /// Artist id
        artist: String,

        /// Show id
        show: String,

        /// Location id
        #[arg(short, long)]
        location: Option<String>,

        /// Selected artwork ids (comma separated); the rest are declined
        #[arg(short, long, value_delimiter = ',')]
        artworks: Vec<String>,
    },

    /// Withdraw an artist and all their artworks from their show
    RemoveArtist {
        /// Artist id
        artist: String,
    },

    /// Record that an artwork was exhibited in a show
    MarkShown {
        /// Artwork id
        artwork: String,

        /// Show id
        show: String,
    },

    /// Replace a show's curation order
    Reorder {
        /// Show id
        show: String,

        /// Artwork ids in display order
        #[arg(value_name = "ARTWORK", num_args = 0.., value_delimiter = ',')]
        order: Vec<String>,
    },

    /// Print one document
    Show {
        /// Collection (artworks, shows, locations, artists)
        collection: CollectionArg,

        /// Document id
        id: String,

        /// Output raw JSON
        #[arg(long)]
        json: bool,
    },

    /// Audit the store for broken references
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export a show's curation order
    Export {
        /// Show id
        show: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "tsv")]
        format: OutputFormat,
    },

    /// List or restore earlier versions of the store file
    History {
        /// Restore the version at this index (0 = newest)
        #[arg(long)]
        restore: Option<usize>,
    },

    /// Serve the engine over a JSON HTTP API
    Serve {
        /// Port for web server
        #[arg(short, long, default_value = "3141")]
        port: u16,
    },
}

#[derive(Subcommand)]
pub enum ArtworkAction {
    /// Create an unassigned artwork for an artist
    Create {
        /// Owning artist id
        artist: String,

        /// Explicit artwork id (generated when omitted)
        #[arg(long)]
        id: Option<String>,

        /// Display title
        #[arg(short, long)]
        title: Option<String>,
    },

    /// Delete an artwork and every reference to it
    Delete {
        /// Artwork id
        artwork: String,
    },
}

#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use tsv, csv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Tsv => write!(f, "tsv"),
            OutputFormat::Csv => write!(f, "csv"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Collection name as typed on the command line.
#[derive(Clone, Copy, Debug)]
pub struct CollectionArg(pub Collection);

impl std::str::FromStr for CollectionArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.to_lowercase();
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted || c.as_str().trim_end_matches('s') == wanted)
            .map(CollectionArg)
            .ok_or_else(|| {
                format!(
                    "Unknown collection: {}. Use: artworks, shows, locations, or artists.",
                    s
                )
            })
    }
}
