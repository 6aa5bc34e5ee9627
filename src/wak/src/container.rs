//! Whole-container decoding with format version selection
//!
//! The header does not say which constant set encrypted it, so decoding
//! starts with the requested version and, if the header or table turn out to
//! be garbage, tries the other known version exactly once.

use tracing::{debug, warn};

use crate::header::{decode_header, Header, HEADER_SIZE};
use crate::table::{decode_table, FileEntry};
use crate::version::{CipherParams, FormatVersion};
use crate::{Error, Result};

/// A decoded container borrowing the raw archive bytes
#[derive(Debug, Clone)]
pub struct ParsedContainer<'a> {
    data: &'a [u8],
    version: FormatVersion,
    header: Header,
    entries: Vec<FileEntry>,
}

impl<'a> ParsedContainer<'a> {
    /// Raw (still encrypted) container bytes
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Version whose constants decoded this container
    pub fn version(&self) -> FormatVersion {
        self.version
    }

    /// Cipher constants of the matched version
    pub fn params(&self) -> &'static CipherParams {
        self.version.params()
    }

    /// Decrypted header
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// File table entries in table order
    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find an entry by its archive path
    pub fn find(&self, path: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Decrypt one entry's payload
    pub fn read(&self, entry: &FileEntry) -> std::result::Result<Vec<u8>, crate::EntryError> {
        crate::extract::decrypt_entry(self.data, entry, self.params())
    }
}

/// Decode a container with a single version's constants, no retry
pub fn decode_as(data: &[u8], version: FormatVersion) -> Result<ParsedContainer<'_>> {
    let params = version.params();
    let header = decode_header(data, params)?;
    debug!(
        %version,
        table_end = header.table_end,
        file_count = header.file_count,
        "header decoded"
    );

    let entries = decode_table(&data[HEADER_SIZE..header.table_end as usize], params)?;

    if header.file_count as usize != entries.len() {
        warn!(
            declared = header.file_count,
            parsed = entries.len(),
            "header entry count disagrees with file table"
        );
    }

    Ok(ParsedContainer {
        data,
        version,
        header,
        entries,
    })
}

/// Decode a container, retrying once with the alternate version.
///
/// Errors other than a format mismatch are returned without a retry. When
/// both versions mismatch the result is [`Error::UnrecognizedFormat`].
pub fn decode(data: &[u8], version: FormatVersion) -> Result<ParsedContainer<'_>> {
    let first = match decode_as(data, version) {
        Err(Error::FormatMismatch(mismatch)) => mismatch,
        other => return other,
    };

    let alternate = version.alternate();
    warn!(%version, %alternate, reason = %first, "format mismatch, retrying");

    match decode_as(data, alternate) {
        Err(Error::FormatMismatch(last)) => Err(Error::UnrecognizedFormat {
            tried: [version, alternate],
            last,
        }),
        other => other,
    }
}
