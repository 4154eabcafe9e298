//! History command - list or restore earlier store versions.

use colored::Colorize;
use gallery::MemoryStore;

use super::{CommandResult, Context};

pub fn run(ctx: &Context, restore: Option<usize>) -> CommandResult {
    let versions = MemoryStore::list_history(&ctx.store_path)?;

    match restore {
        Some(index) => {
            let store = MemoryStore::load_history(&ctx.store_path, index)?;
            // Saving archives the current file, so the restore can be undone.
            ctx.save(&store)?;
            println!(
                "{} version {} of {}",
                "Restored".green().bold(),
                index,
                ctx.store_path.display()
            );
        }
        None => {
            if versions.is_empty() {
                println!("No earlier versions of {}", ctx.store_path.display());
                return Ok(());
            }
            println!(
                "{} {}",
                "History of".cyan().bold(),
                ctx.store_path.display().to_string().white()
            );
            for (index, path) in versions.iter().enumerate() {
                let name = path.file_stem().unwrap_or_default().to_string_lossy();
                println!("  {:>3}  {}", index, name);
            }
        }
    }

    Ok(())
}
