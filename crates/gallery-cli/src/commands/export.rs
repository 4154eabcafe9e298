//! Export command - write a show's curation order.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use colored::Colorize;
use gallery::{Artwork, Show};
use serde::Serialize;

use super::{CommandResult, Context};
use crate::cli::OutputFormat;

/// One exported row.
#[derive(Debug, Serialize)]
struct OrderRow {
    position: usize,
    artwork_id: String,
    artist_id: String,
    title: String,
    location_id: String,
    status: String,
}

pub fn run(ctx: &Context, show_id: &str, output: Option<PathBuf>, format: OutputFormat) -> CommandResult {
    let store = ctx.load_store()?;
    let show: Show = store
        .entity(show_id)?
        .ok_or_else(|| format!("Show not found: {}", show_id))?;

    let mut rows = Vec::with_capacity(show.artwork_order.len());
    for (index, artwork_id) in show.artwork_order.iter().enumerate() {
        let artwork: Option<Artwork> = store.entity(artwork_id)?;
        let row = match artwork {
            Some(artwork) => OrderRow {
                position: index + 1,
                artwork_id: artwork.id.clone(),
                artist_id: artwork.artist_id.clone(),
                title: artwork.title.clone().unwrap_or_default(),
                location_id: artwork.location_id().unwrap_or_default().to_string(),
                status: artwork.show_status().as_str().to_string(),
            },
            None => {
                eprintln!(
                    "{} order entry '{}' has no artwork document",
                    "Warning:".yellow().bold(),
                    artwork_id
                );
                OrderRow {
                    position: index + 1,
                    artwork_id: artwork_id.to_string(),
                    artist_id: String::new(),
                    title: String::new(),
                    location_id: String::new(),
                    status: "missing".to_string(),
                }
            }
        };
        rows.push(row);
    }

    let writer: Box<dyn Write> = match &output {
        Some(path) => Box::new(File::create(path).map_err(|e| {
            format!("Failed to create output file '{}': {}", path.display(), e)
        })?),
        None => Box::new(io::stdout()),
    };

    match format {
        OutputFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, &rows)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv | OutputFormat::Tsv => {
            let delimiter = if matches!(format, OutputFormat::Tsv) { b'\t' } else { b',' };
            let mut csv_writer = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(writer);
            for row in &rows {
                csv_writer.serialize(row)?;
            }
            csv_writer.flush()?;
        }
    }

    if let Some(path) = output {
        println!(
            "{} {} entries of {} to {}",
            "Exported".green().bold(),
            rows.len(),
            show_id.white().bold(),
            path.display().to_string().cyan()
        );
    }

    Ok(())
}
