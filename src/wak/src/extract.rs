//! Per-entry decryption and extraction to disk
//!
//! Every entry is independent: its payload is a slice of the shared container
//! decrypted with its own IV, and it writes to its own path. Failures are
//! collected per entry so one bad record does not stop the rest.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::container::ParsedContainer;
use crate::crypto::decrypt_ctr;
use crate::table::FileEntry;
use crate::version::CipherParams;

/// Errors isolated to a single entry
#[derive(thiserror::Error, Debug)]
pub enum EntryError {
    #[error("Entry '{path}' spans 0x{offset:08x}+0x{size:08x}, past the end of the container ({len} bytes)")]
    TruncatedEntry {
        path: String,
        offset: u32,
        size: u32,
        len: usize,
    },

    #[error("Entry path '{path}' escapes the output directory")]
    PathTraversal { path: String },

    #[error("Entry {index} has an empty path")]
    EmptyPath { index: u32 },

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Decrypt one entry's payload from the raw container bytes
pub fn decrypt_entry(
    container: &[u8],
    entry: &FileEntry,
    params: &CipherParams,
) -> Result<Vec<u8>, EntryError> {
    if entry.end() > container.len() as u64 {
        return Err(EntryError::TruncatedEntry {
            path: entry.path.clone(),
            offset: entry.offset,
            size: entry.size,
            len: container.len(),
        });
    }

    let iv = params.file_iv(entry.index);
    Ok(decrypt_ctr(&params.key, &iv, &container[entry.range()]))
}

/// Join an archive path onto `root`, refusing anything that would leave it.
///
/// Both `/` and `\` separate segments. Absolute paths, `..` segments and
/// segments containing `:` (drive letters, alternate streams) are rejected;
/// empty and `.` segments are dropped.
pub fn safe_join(root: &Path, path: &str) -> Result<PathBuf, EntryError> {
    let traversal = || EntryError::PathTraversal {
        path: path.to_string(),
    };

    if path.starts_with('/') || path.starts_with('\\') {
        return Err(traversal());
    }

    let mut joined = root.to_path_buf();
    let mut pushed = false;
    for segment in path.split(|c| c == '/' || c == '\\') {
        match segment {
            "" | "." => {}
            ".." => return Err(traversal()),
            s if s.contains(':') => return Err(traversal()),
            s => {
                joined.push(s);
                pushed = true;
            }
        }
    }

    if !pushed {
        return Err(traversal());
    }
    Ok(joined)
}

/// Selects which entries to extract
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Substrings to look for in the path (case-insensitive, any may match)
    pub contains: Vec<String>,
    /// Required file extension, with or without the leading dot
    pub extension: Option<String>,
}

impl EntryFilter {
    /// Whether the filter lets every entry through
    pub fn is_empty(&self) -> bool {
        self.contains.is_empty() && self.extension.is_none()
    }

    /// Check an entry against the filter
    pub fn matches(&self, entry: &FileEntry) -> bool {
        let path = entry.path.to_lowercase();

        if let Some(ext) = &self.extension {
            let ext_lower = ext.to_lowercase();
            let with_dot = if ext_lower.starts_with('.') {
                ext_lower
            } else {
                format!(".{}", ext_lower)
            };
            if !path.ends_with(&with_dot) {
                return false;
            }
        }

        self.contains.is_empty()
            || self
                .contains
                .iter()
                .any(|needle| path.contains(&needle.to_lowercase()))
    }
}

/// Options for [`extract_all`]
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub filter: EntryFilter,
    /// Extract on the rayon thread pool
    pub parallel: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            filter: EntryFilter::default(),
            parallel: true,
        }
    }
}

/// An entry that could not be extracted
#[derive(Debug)]
pub struct EntryFailure {
    pub path: String,
    pub index: u32,
    pub error: EntryError,
}

/// Outcome of an extraction run
#[derive(Debug, Default)]
pub struct ExtractReport {
    /// Files written, in table order
    pub written: Vec<PathBuf>,
    /// Entries excluded by the filter
    pub skipped: usize,
    /// Entries that failed, in table order
    pub failures: Vec<EntryFailure>,
}

impl ExtractReport {
    /// True when no selected entry failed
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of entries that were attempted
    pub fn attempted(&self) -> usize {
        self.written.len() + self.failures.len()
    }
}

/// Decrypt one entry and write it under `root`
pub fn extract_entry(
    container: &ParsedContainer<'_>,
    entry: &FileEntry,
    root: &Path,
) -> Result<PathBuf, EntryError> {
    if entry.path.is_empty() {
        return Err(EntryError::EmptyPath { index: entry.index });
    }
    let out_path = safe_join(root, &entry.path)?;
    let data = container.read(entry)?;

    if let Some(parent) = out_path.parent() {
        // create_dir_all tolerates directories created concurrently
        fs::create_dir_all(parent).map_err(|source| EntryError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&out_path, &data).map_err(|source| EntryError::Io {
        path: out_path.clone(),
        source,
    })?;

    debug!(path = %entry.path, bytes = data.len(), "extracted");
    Ok(out_path)
}

/// Extract every entry selected by `options` into `root`.
///
/// Only failing to create `root` is fatal. Per-entry failures end up in the
/// report. `on_entry` runs after each attempt, possibly from several threads.
pub fn extract_all<F>(
    container: &ParsedContainer<'_>,
    root: &Path,
    options: &ExtractOptions,
    on_entry: F,
) -> crate::Result<ExtractReport>
where
    F: Fn(&FileEntry, &Result<PathBuf, EntryError>) + Sync,
{
    fs::create_dir_all(root)?;

    let selected: Vec<&FileEntry> = container
        .entries()
        .iter()
        .filter(|e| options.filter.matches(e))
        .collect();

    let run = |entry: &FileEntry| {
        let result = extract_entry(container, entry, root);
        on_entry(entry, &result);
        result
    };

    let results: Vec<Result<PathBuf, EntryError>> = if options.parallel {
        selected.par_iter().map(|entry| run(entry)).collect()
    } else {
        selected.iter().map(|entry| run(entry)).collect()
    };

    let mut report = ExtractReport {
        skipped: container.len() - selected.len(),
        ..ExtractReport::default()
    };

    for (entry, result) in selected.into_iter().zip(results) {
        match result {
            Ok(path) => report.written.push(path),
            Err(error) => {
                warn!(path = %entry.path, %error, "entry failed");
                report.failures.push(EntryFailure {
                    path: entry.path.clone(),
                    index: entry.index,
                    error,
                });
            }
        }
    }

    Ok(report)
}
