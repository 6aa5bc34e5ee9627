//! Configuration command handlers
//!
//! Handles the `configure` subcommand for setting wakman defaults.

use crate::config::Config;
use anyhow::Result;
use std::path::PathBuf;
use wak::FormatVersion;

/// Handle the configure command
pub fn handle(
    wak: Option<PathBuf>,
    output: Option<PathBuf>,
    format_version: Option<FormatVersion>,
    show: bool,
) -> Result<()> {
    let mut config = Config::load()?;

    if show {
        show_config(&config);
        return Ok(());
    }

    if !apply(&mut config, wak, output, format_version) {
        show_usage();
        return Ok(());
    }

    config.save()?;
    show_config(&config);
    if let Ok(path) = Config::config_path() {
        println!("Config saved to: {}", path.display());
    }

    Ok(())
}

/// Apply the given settings, returning whether anything changed
fn apply(
    config: &mut Config,
    wak: Option<PathBuf>,
    output: Option<PathBuf>,
    format_version: Option<FormatVersion>,
) -> bool {
    let changed = wak.is_some() || output.is_some() || format_version.is_some();

    if let Some(path) = wak {
        config.wak_path = Some(path);
    }
    if let Some(path) = output {
        config.output = Some(path);
    }
    if let Some(version) = format_version {
        config.format_version = Some(version);
    }

    changed
}

/// Display current configuration
fn show_config(config: &Config) {
    match &config.wak_path {
        Some(path) => println!("Container: {}", path.display()),
        None => println!("No container path configured"),
    }

    match &config.output {
        Some(path) => println!("Output folder: {}", path.display()),
        None => println!("No output folder configured"),
    }

    println!("Format version: {}", config.resolve_version(None));

    if let Ok(path) = Config::config_path() {
        println!("Config file: {}", path.display());
    }
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: wakman configure [--wak PATH] [--output DIR] [--format-version 1|2]");
    println!("       wakman configure --show");
}
