//! # wak
//!
//! Reader for WAK asset containers - decryption, parsing, and extraction.
//!
//! A container is a 16-byte AES-OFB header, an AES-CTR encrypted file table,
//! and the concatenated AES-CTR encrypted payloads. Each payload's IV comes
//! from the game's own PRNG, reimplemented bit for bit in [`prng`].
//!
//! ## Example
//!
//! ```no_run
//! use std::fs;
//! use wak::{extract_all, ExtractOptions, FormatVersion};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = fs::read("data.wak")?;
//!
//! // Tries v2 first and falls back to v1 on a header mismatch
//! let container = wak::decode(&data, FormatVersion::V2)?;
//!
//! for entry in container.entries() {
//!     println!("{}", entry.listing_line());
//! }
//!
//! let report = extract_all(&container, "out".as_ref(), &ExtractOptions::default(), |_, _| {})?;
//! println!("{} written, {} failed", report.written.len(), report.failures.len());
//! # Ok(())
//! # }
//! ```

pub mod container;
pub mod crypto;
pub mod digest;
pub mod extract;
pub mod header;
pub mod prng;
pub mod table;
pub mod version;

#[cfg(test)]
mod testutil;

// Re-export commonly used items
#[doc(inline)]
pub use container::{decode, decode_as, ParsedContainer};
#[doc(inline)]
pub use digest::{digest_tree, TreeLine};
#[doc(inline)]
pub use extract::{
    decrypt_entry, extract_all, extract_entry, safe_join, EntryError, EntryFailure, EntryFilter,
    ExtractOptions, ExtractReport,
};
#[doc(inline)]
pub use header::{decode_header, Header, HEADER_SIZE};
#[doc(inline)]
pub use prng::{get16, Prng};
#[doc(inline)]
pub use table::{decode_table, parse_table, FileEntry, TableReader};
#[doc(inline)]
pub use version::{CipherParams, FormatVersion, UnknownVersion};

/// Evidence that the constants in use do not fit the archive
#[derive(thiserror::Error, Debug, Clone)]
pub enum Mismatch {
    #[error("Header sanity word is 0x{0:08x}, expected zero")]
    HeaderMagic(u32),

    #[error("Table end 0x{end:08x} lies outside the container ({len} bytes)")]
    TableBounds { end: u32, len: usize },

    #[error("Record {index} at table offset {offset} needs 12 bytes, {remaining} left")]
    RecordOverrun {
        index: u32,
        offset: usize,
        remaining: usize,
    },

    #[error("Path of record {index} is {path_len} bytes, only {remaining} left in table")]
    PathOverrun {
        index: u32,
        path_len: u32,
        remaining: usize,
    },

    #[error("Path of record {index} is not valid UTF-8: {source}")]
    PathEncoding {
        index: u32,
        source: std::str::Utf8Error,
    },
}

/// Errors from decoding a container
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Format mismatch: {0}")]
    FormatMismatch(#[from] Mismatch),

    #[error("Container too short: need {needed} bytes, got {actual}")]
    DataTooShort { needed: usize, actual: usize },

    #[error("Container matches none of the known formats (tried {tried:?}): {last}")]
    UnrecognizedFormat {
        tried: [FormatVersion; 2],
        last: Mismatch,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether retrying with another version's constants could help
    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, Error::FormatMismatch(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
