//! Show command - print one document.

use colored::Colorize;
use gallery::{Artist, Artwork, Collection, Location, Show};

use super::{CommandResult, Context};
use crate::commands::assign::placement;

pub fn run(ctx: &Context, collection: Collection, id: &str, json: bool) -> CommandResult {
    let store = ctx.load_store()?;

    if json {
        let doc = gallery::DocumentStore::get(store.as_ref(), collection, id)?
            .ok_or_else(|| format!("{} document '{}' not found", collection, id))?;
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    let missing = || format!("{} document '{}' not found", collection, id);
    match collection {
        Collection::Artworks => {
            let artwork: Artwork = store.entity(id)?.ok_or_else(missing)?;
            println!("{} {} {}", "Artwork".cyan().bold(), artwork.id.white().bold(), placement(&artwork));
            println!("  Artist: {}", artwork.artist_id);
            if let Some(title) = &artwork.title {
                println!("  Title:  {}", title);
            }
            print_list("Been in shows", artwork.been_in_shows.iter());
        }
        Collection::Shows => {
            let show: Show = store.entity(id)?.ok_or_else(missing)?;
            println!("{} {} ({})", "Show".cyan().bold(), show.id.white().bold(), show.status);
            print_list("Artists", show.artist_ids.iter());
            print_list("Artworks", show.artwork_ids.iter());
            print_list("Order", show.artwork_order.iter());
            let orphaned = show.orphaned_order_entries();
            if !orphaned.is_empty() {
                println!("  {} {}", "Not in show:".yellow().bold(), orphaned.join(", "));
            }
        }
        Collection::Locations => {
            let location: Location = store.entity(id)?.ok_or_else(missing)?;
            println!("{} {}", "Location".cyan().bold(), location.id.white().bold());
            print_list("Artists", location.artist_ids.iter());
            print_list("Artworks", location.artwork_ids.iter());
        }
        Collection::Artists => {
            let artist: Artist = store.entity(id)?.ok_or_else(missing)?;
            println!("{} {} ({})", "Artist".cyan().bold(), artist.id.white().bold(), artist.status);
            if let Some(show) = &artist.artshow_id {
                println!("  Show: {}", show);
            }
            print_list("Artworks", artist.artworks.iter());
        }
    }

    Ok(())
}

fn print_list<'a>(label: &str, ids: impl Iterator<Item = &'a str>) {
    let ids: Vec<&str> = ids.collect();
    if ids.is_empty() {
        println!("  {}: {}", label, "-".dimmed());
    } else {
        println!("  {}: {}", label, ids.join(", "));
    }
}
