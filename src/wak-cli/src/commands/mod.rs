//! Command handlers for wakman

pub mod configure;
pub mod extract;
pub mod list;
pub mod tree;

use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::path::PathBuf;
use tracing::info;
use wak::{EntryFilter, ParsedContainer};

use crate::cli::{FilterArgs, InputArgs};
use crate::config::Config;
use crate::paths;

/// A memory-mapped container file
pub struct MappedWak {
    pub path: PathBuf,
    mmap: Mmap,
}

impl MappedWak {
    /// Resolve and map the container named by `input`
    pub fn open(input: &InputArgs, config: &Config) -> Result<Self> {
        let path = paths::resolve_input(input.input.as_deref(), config)?;
        let file =
            File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        // SAFETY: the file is only read and is not expected to change while mapped
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to map {}", path.display()))?;

        Ok(Self { path, mmap })
    }

    /// Decode the header and table, falling back to the other version once
    pub fn decode(&self, input: &InputArgs, config: &Config) -> Result<ParsedContainer<'_>> {
        let version = config.resolve_version(input.format_version);
        let container = wak::decode(&self.mmap, version)
            .with_context(|| format!("Failed to decode {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            version = %container.version(),
            entries = container.len(),
            "container loaded"
        );
        Ok(container)
    }
}

impl From<&FilterArgs> for EntryFilter {
    fn from(args: &FilterArgs) -> Self {
        EntryFilter {
            contains: args.filter.clone(),
            extension: args.extension.clone(),
        }
    }
}
