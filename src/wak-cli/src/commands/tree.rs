//! Tree command handler

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use super::MappedWak;
use crate::cli::{InputArgs, OutputFormat};
use crate::config::Config;

pub fn handle(input: &InputArgs, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    let wak = MappedWak::open(input, &config)?;
    let container = wak.decode(input, &config)?;

    let lines = wak::digest_tree(&container);
    let rendered = match format {
        OutputFormat::Text => {
            let mut text = lines
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n");
            text.push('\n');
            text
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&lines).context("Failed to serialize tree")? + "\n"
        }
    };

    match output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), lines = lines.len(), "tree written");
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
