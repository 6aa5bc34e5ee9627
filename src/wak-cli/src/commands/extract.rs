//! Extract command handler

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use wak::{EntryFilter, ExtractOptions};

use super::MappedWak;
use crate::cli::{FilterArgs, InputArgs};
use crate::config::Config;

/// Pick the output folder: explicit flag, then config
fn resolve_output(output: Option<&Path>, config: &Config) -> Result<PathBuf> {
    match output.map(Path::to_path_buf).or_else(|| config.output.clone()) {
        Some(path) => Ok(path),
        None => bail!(
            "No output folder given. Use -o DIR or run `wakman configure --output DIR`."
        ),
    }
}

pub fn handle(
    input: &InputArgs,
    filter: &FilterArgs,
    output: Option<&Path>,
    sequential: bool,
) -> Result<()> {
    let config = Config::load()?;
    let output = resolve_output(output, &config)?;
    let wak = MappedWak::open(input, &config)?;
    let container = wak.decode(input, &config)?;

    let options = ExtractOptions {
        filter: EntryFilter::from(filter),
        parallel: !sequential,
    };
    let selected = container
        .entries()
        .iter()
        .filter(|e| options.filter.matches(e))
        .count();

    let pb = ProgressBar::new(selected as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress template")?
            .progress_chars("#>-"),
    );

    let report = wak::extract_all(&container, &output, &options, |_, _| pb.inc(1))
        .with_context(|| format!("Failed to create {}", output.display()))?;
    pb.finish_and_clear();

    eprintln!(
        "Extracted {} of {} entries to {}",
        report.written.len(),
        report.attempted(),
        output.display()
    );

    if !report.is_success() {
        for failure in &report.failures {
            eprintln!("  {} (#{}): {}", failure.path, failure.index, failure.error);
        }
        bail!("{} entries failed to extract", report.failures.len());
    }

    Ok(())
}
