//! Check command - audit cross-entity consistency.

use std::collections::BTreeMap;

use colored::Colorize;
use gallery::Severity;

use super::{CommandResult, Context};

pub fn run(ctx: &Context, json_output: bool) -> CommandResult {
    let store = ctx.load_store()?;
    let report = gallery::audit::audit(store.as_ref())?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} {} ({} documents)",
            "Audit of".cyan().bold(),
            ctx.store_path.display().to_string().white(),
            report.documents_scanned
        );
        println!();

        if report.is_clean() {
            println!("{}", "No inconsistencies found".green().bold());
            return Ok(());
        }

        let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
        for violation in &report.violations {
            *by_kind.entry(violation.kind.label()).or_default() += 1;

            let tag = match violation.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
            };
            println!(
                "  {} [{}] {}/{}: {}",
                tag,
                violation.kind.label(),
                violation.collection,
                violation.document_id,
                violation.description
            );
        }

        println!();
        println!("{}", "Summary:".yellow().bold());
        for (label, count) in &by_kind {
            println!("  {:<28} {}", label, count);
        }
    }

    // Only errors fail the command; dangling references are advisory.
    let errors = report.errors().count();
    if errors > 0 {
        return Err(format!("{} consistency error(s) found", errors).into());
    }
    Ok(())
}
