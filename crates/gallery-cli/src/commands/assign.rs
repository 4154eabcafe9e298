//! Single-artwork placement commands.

use colored::Colorize;
use gallery::{Artwork, AssignmentResult};

use super::{CommandResult, Context, print_outcome};

pub fn assign(ctx: &Context, artwork: &str, show: &str, location: Option<&str>) -> CommandResult {
    let (store, engine) = ctx.open()?;
    let result = engine.assign_artwork(artwork, show, location)?;
    ctx.save(&store)?;

    print_result("Assigned", &result);
    Ok(())
}

pub fn reject(ctx: &Context, artwork: &str) -> CommandResult {
    let (store, engine) = ctx.open()?;
    let result = engine.reject_artwork(artwork)?;
    ctx.save(&store)?;

    print_result("Rejected", &result);
    Ok(())
}

pub fn reassign(ctx: &Context, artwork: &str, show: &str, location: Option<&str>) -> CommandResult {
    let (store, engine) = ctx.open()?;
    let result = engine.reassign_artwork(artwork, show, location)?;
    ctx.save(&store)?;

    print_result("Reassigned", &result);
    Ok(())
}

pub fn mark_shown(ctx: &Context, artwork: &str, show: &str) -> CommandResult {
    let (store, engine) = ctx.open()?;
    let result = engine.mark_shown(artwork, show)?;
    ctx.save(&store)?;

    print_result("Marked shown", &result);
    println!(
        "  Been in shows: {}",
        result.artwork.been_in_shows.iter().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}

fn print_result(verb: &str, result: &AssignmentResult) {
    println!(
        "{} {} {}",
        verb.green().bold(),
        result.artwork.id.white().bold(),
        placement(&result.artwork)
    );
    print_outcome(result.writes, &result.warnings);
}

/// "-> show/location (status)" summary of an artwork's placement.
pub(crate) fn placement(artwork: &Artwork) -> String {
    let status = artwork.show_status().as_str();
    match (artwork.artshow_id(), artwork.location_id()) {
        (Some(show), Some(location)) => format!("-> {}/{} ({})", show, location, status),
        (Some(show), None) => format!("-> {} ({})", show, status),
        _ => format!("({})", status),
    }
}
