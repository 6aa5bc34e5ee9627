//! Locating data.wak when no path is given
//!
//! Checked in order: the path on the command line, the configured
//! `wak_path`, then the usual spots relative to the working directory and
//! the default Steam install for the current platform.

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::Config;

const WAK_NAME: &str = "data.wak";

/// Default locations probed for data.wak, most specific first
pub fn default_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(WAK_NAME),
        PathBuf::from("data").join(WAK_NAME),
    ];

    #[cfg(target_os = "windows")]
    {
        candidates.push(
            PathBuf::from(r"C:\Program Files (x86)\Steam\steamapps\common\Noita")
                .join("data")
                .join(WAK_NAME),
        );
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(home) = dirs::home_dir() {
            candidates.push(
                home.join(".local/share/Steam/steamapps/common/Noita")
                    .join("data")
                    .join(WAK_NAME),
            );
        }
    }

    candidates
}

/// First existing file among `candidates`
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Resolve the container path from the command line, config, and defaults
pub fn resolve_input(explicit: Option<&Path>, config: &Config) -> Result<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        warn!(path = %path.display(), "container not found, looking in default locations");
        candidates.push(path.to_path_buf());
    }

    if let Some(path) = &config.wak_path {
        candidates.push(path.clone());
    }
    candidates.extend(default_candidates());

    match first_existing(&candidates) {
        Some(found) => {
            debug!(path = %found.display(), "using container");
            Ok(found)
        }
        None => {
            let tried: Vec<String> = candidates
                .iter()
                .map(|p| format!("  {}", p.display()))
                .collect();
            bail!(
                "Could not find {}. Pass its path explicitly or run `wakman configure --wak PATH`.\nTried:\n{}",
                WAK_NAME,
                tried.join("\n")
            )
        }
    }
}
