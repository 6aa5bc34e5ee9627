//! List command handler

use anyhow::{Context, Result};
use wak::{EntryFilter, FileEntry};

use super::MappedWak;
use crate::cli::{FilterArgs, InputArgs, OutputFormat};
use crate::config::Config;

pub fn handle(input: &InputArgs, filter: &FilterArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let wak = MappedWak::open(input, &config)?;
    let container = wak.decode(input, &config)?;

    let filter = EntryFilter::from(filter);
    let entries: Vec<&FileEntry> = container
        .entries()
        .iter()
        .filter(|e| filter.matches(e))
        .collect();

    match format {
        OutputFormat::Text => {
            for entry in &entries {
                println!("{}", entry.listing_line());
            }
        }
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&entries).context("Failed to serialize entries")?;
            println!("{}", json);
        }
    }

    eprintln!(
        "{} of {} entries ({})",
        entries.len(),
        container.len(),
        container.version()
    );

    Ok(())
}
