//! Gallery CLI - assignment consistency for exhibition curation.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{ArtworkAction, Cli, Commands};
use commands::Context;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Context::from_cli(&cli).and_then(|ctx| run(cli.command, &ctx));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Init { from, force } => commands::init::run(ctx, from, force),

        Commands::Artwork { action } => match action {
            ArtworkAction::Create { artist, id, title } => {
                commands::artwork::create(ctx, &artist, id, title)
            }
            ArtworkAction::Delete { artwork } => commands::artwork::delete(ctx, &artwork),
        },

        Commands::Assign {
            artwork,
            show,
            location,
        } => commands::assign::assign(ctx, &artwork, &show, location.as_deref()),

        Commands::Reject { artwork } => commands::assign::reject(ctx, &artwork),

        Commands::Reassign {
            artwork,
            show,
            location,
        } => commands::assign::reassign(ctx, &artwork, &show, location.as_deref()),

        Commands::AcceptArtist {
            artist,
            show,
            location,
            artworks,
        } => commands::artist::accept(ctx, &artist, &show, location.as_deref(), &artworks),

        Commands::RemoveArtist { artist } => commands::artist::remove(ctx, &artist),

        Commands::MarkShown { artwork, show } => commands::assign::mark_shown(ctx, &artwork, &show),

        Commands::Reorder { show, order } => commands::reorder::run(ctx, &show, &order),

        Commands::Show {
            collection,
            id,
            json,
        } => commands::inspect::run(ctx, collection.0, &id, json),

        Commands::Check { json } => commands::check::run(ctx, json),

        Commands::Export {
            show,
            output,
            format,
        } => commands::export::run(ctx, &show, output, format),

        Commands::History { restore } => commands::history::run(ctx, restore),

        Commands::Serve { port } => commands::serve::run(ctx, port),
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise warnings only, or engine
/// progress with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
