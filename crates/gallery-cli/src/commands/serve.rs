//! Serve command - expose the engine over HTTP.

use colored::Colorize;

use super::{CommandResult, Context};
use crate::server::{app, state::AppState};

pub fn run(ctx: &Context, port: u16) -> CommandResult {
    let (store, engine) = ctx.open()?;
    let state = AppState::new(engine, store, ctx.store_path.clone());

    let url = format!("http://localhost:{}/api", port);
    println!();
    println!(
        "{} {}",
        "Serving gallery API at".cyan().bold(),
        url.white().bold()
    );
    println!();
    println!("  Store: {}", ctx.store_path.display());
    println!(
        "  Transactions: {}",
        if ctx.config.transactional { "on" } else { "off" }
    );
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        // Save on Ctrl+C so nothing written since the last auto-save is lost
        let state_clone = state.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            println!();
            println!("{}", "Shutting down...".yellow());
            if let Err(e) = state_clone.save().await {
                eprintln!("Error saving: {}", e);
            }
            std::process::exit(0);
        });

        if let Err(e) = app::run_server(state, port).await {
            eprintln!("Server error: {}", e);
        }
    });

    Ok(())
}
