//! Reorder command - replace a show's curation order.

use colored::Colorize;

use super::{CommandResult, Context, print_outcome};

pub fn run(ctx: &Context, show: &str, order: &[String]) -> CommandResult {
    let (store, engine) = ctx.open()?;
    let result = engine.reorder(show, order)?;
    ctx.save(&store)?;

    println!("{} {}", "Reordered show".green().bold(), show.white().bold());
    for (position, artwork) in result.show.artwork_order.iter().enumerate() {
        println!("  {:>3}. {}", position + 1, artwork);
    }
    print_outcome(result.writes, &result.warnings);
    Ok(())
}
