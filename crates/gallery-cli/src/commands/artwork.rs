//! Artwork commands - create and delete artworks.

use colored::Colorize;
use gallery::NewArtwork;

use super::{CommandResult, Context, print_outcome};

pub fn create(ctx: &Context, artist: &str, id: Option<String>, title: Option<String>) -> CommandResult {
    let (store, engine) = ctx.open()?;

    let mut new = NewArtwork::new();
    new.id = id;
    new.title = title;
    let result = engine.create_artwork(artist, new)?;
    ctx.save(&store)?;

    println!(
        "{} {} for artist {}",
        "Created artwork".green().bold(),
        result.artwork.id.white().bold(),
        artist.cyan()
    );
    print_outcome(result.writes, &result.warnings);
    Ok(())
}

pub fn delete(ctx: &Context, artwork: &str) -> CommandResult {
    let (store, engine) = ctx.open()?;

    let result = engine.delete_artwork(artwork)?;
    ctx.save(&store)?;

    println!("{} {}", "Deleted artwork".red().bold(), artwork.white().bold());
    if let Some(show) = result.artwork.artshow_id() {
        println!("  Removed from show {}", show.cyan());
    }
    print_outcome(result.writes, &result.warnings);
    Ok(())
}
