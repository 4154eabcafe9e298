//! Artist commands - batch acceptance and withdrawal.

use colored::Colorize;
use gallery::ArtistResult;

use super::{CommandResult, Context, print_outcome};

pub fn accept(
    ctx: &Context,
    artist: &str,
    show: &str,
    location: Option<&str>,
    artworks: &[String],
) -> CommandResult {
    let (store, engine) = ctx.open()?;
    let result = engine.accept_artist_into_show(artist, show, location, artworks)?;
    ctx.save(&store)?;

    println!(
        "{} {} into {}",
        "Accepted artist".green().bold(),
        artist.white().bold(),
        match location {
            Some(location) => format!("{}/{}", show, location),
            None => show.to_string(),
        }
        .cyan()
    );
    print_artworks(&result);
    if result.notification.is_some() {
        println!("  Notification sent");
    }
    print_outcome(result.writes, &result.warnings);
    Ok(())
}

pub fn remove(ctx: &Context, artist: &str) -> CommandResult {
    let (store, engine) = ctx.open()?;
    let result = engine.remove_artist_from_show(artist)?;
    ctx.save(&store)?;

    println!(
        "{} {} (now {})",
        "Removed artist".red().bold(),
        artist.white().bold(),
        result.artist.status
    );
    print_artworks(&result);
    print_outcome(result.writes, &result.warnings);
    Ok(())
}

fn print_artworks(result: &ArtistResult) {
    if !result.accepted.is_empty() {
        println!("  Accepted: {}", result.accepted.join(", ").green());
    }
    if !result.rejected.is_empty() {
        println!("  Rejected: {}", result.rejected.join(", ").red());
    }
}
