//! File table parsing
//!
//! The decrypted table is a run of variable-length records with no padding:
//! - Bytes 0-3: Payload offset (absolute, little-endian)
//! - Bytes 4-7: Payload size
//! - Bytes 8-11: Path length
//! - Bytes 12..: Path (UTF-8)
//!
//! A record's position in the table is its index, which seeds its IV.

use byteorder::{ByteOrder, LE};
use serde::Serialize;
use std::ops::Range;

use crate::crypto::decrypt_ctr;
use crate::version::CipherParams;
use crate::{Mismatch, Result};

/// Size of the fixed part of a record
pub const RECORD_HEADER_SIZE: usize = 12;

/// One record of the file table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FileEntry {
    /// Relative path as stored in the archive
    pub path: String,
    /// Absolute offset of the encrypted payload in the container
    pub offset: u32,
    /// Payload size in bytes
    pub size: u32,
    /// Declared path length in bytes
    pub path_len: u32,
    /// Position in the table
    pub index: u32,
}

impl FileEntry {
    /// Byte range of the payload in the container
    #[inline]
    pub fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.size as usize
    }

    /// End offset of the payload, computed without overflow
    #[inline]
    pub fn end(&self) -> u64 {
        u64::from(self.offset) + u64::from(self.size)
    }

    /// Format as a listing line
    pub fn listing_line(&self) -> String {
        format!(
            "{}:[offs {:08X}][size {:08X}][pthl {:08X}]",
            self.path, self.offset, self.size, self.path_len
        )
    }
}

/// Iterator over the records of a decrypted table
///
/// Yields an error at the first malformed record and stops afterwards.
pub struct TableReader<'a> {
    buf: &'a [u8],
    pos: usize,
    index: u32,
    failed: bool,
}

impl<'a> TableReader<'a> {
    /// Start reading a decrypted table buffer
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            index: 0,
            failed: false,
        }
    }

    fn read_record(&mut self) -> std::result::Result<FileEntry, Mismatch> {
        let start = self.pos;
        let fixed = self
            .buf
            .get(start..start + RECORD_HEADER_SIZE)
            .ok_or(Mismatch::RecordOverrun {
                index: self.index,
                offset: start,
                remaining: self.buf.len() - start,
            })?;

        let offset = LE::read_u32(&fixed[0..4]);
        let size = LE::read_u32(&fixed[4..8]);
        let path_len = LE::read_u32(&fixed[8..12]);

        let path_start = start + RECORD_HEADER_SIZE;
        let path_end = path_start
            .checked_add(path_len as usize)
            .filter(|&end| end <= self.buf.len())
            .ok_or(Mismatch::PathOverrun {
                index: self.index,
                path_len,
                remaining: self.buf.len() - path_start,
            })?;

        let path = std::str::from_utf8(&self.buf[path_start..path_end])
            .map_err(|source| Mismatch::PathEncoding {
                index: self.index,
                source,
            })?
            .to_string();

        let entry = FileEntry {
            path,
            offset,
            size,
            path_len,
            index: self.index,
        };

        self.pos = path_end;
        self.index += 1;
        Ok(entry)
    }
}

impl Iterator for TableReader<'_> {
    type Item = std::result::Result<FileEntry, Mismatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }

        let record = self.read_record();
        self.failed = record.is_err();
        Some(record)
    }
}

/// Parse a decrypted table buffer into its entries
pub fn parse_table(buf: &[u8]) -> std::result::Result<Vec<FileEntry>, Mismatch> {
    TableReader::new(buf).collect()
}

/// Decrypt the table region (`container[16..table_end]`) and parse it
pub fn decode_table(region: &[u8], params: &CipherParams) -> Result<Vec<FileEntry>> {
    let table = decrypt_ctr(&params.key, &params.table_iv, region);
    Ok(parse_table(&table)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormatVersion;
    use byteorder::WriteBytesExt;

    fn record(buf: &mut Vec<u8>, offset: u32, size: u32, path: &[u8]) {
        buf.write_u32::<LE>(offset).unwrap();
        buf.write_u32::<LE>(size).unwrap();
        buf.write_u32::<LE>(path.len() as u32).unwrap();
        buf.extend_from_slice(path);
    }

    fn sample_table() -> Vec<u8> {
        let mut buf = Vec::new();
        record(&mut buf, 0x100, 0x20, b"data/translations/common.csv");
        record(&mut buf, 0x120, 0x05, b"data/scripts/init.lua");
        record(&mut buf, 0x125, 0x00, b"mods/empty.xml");
        buf
    }

    #[test]
    fn test_parse_table() {
        let entries = parse_table(&sample_table()).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].path, "data/translations/common.csv");
        assert_eq!(entries[0].offset, 0x100);
        assert_eq!(entries[0].size, 0x20);
        assert_eq!(entries[0].path_len, 28);
        assert_eq!(entries[1].index, 1);
        assert_eq!(entries[2].path, "mods/empty.xml");
        assert_eq!(entries[2].range(), 0x125..0x125);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let table = sample_table();
        assert_eq!(parse_table(&table).unwrap(), parse_table(&table).unwrap());
    }

    #[test]
    fn test_empty_table() {
        assert!(parse_table(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_path_past_end() {
        let mut table = sample_table();
        table.write_u32::<LE>(0x200).unwrap();
        table.write_u32::<LE>(0x10).unwrap();
        table.write_u32::<LE>(64).unwrap();
        table.extend_from_slice(b"short");

        let err = parse_table(&table).unwrap_err();
        assert!(matches!(
            err,
            Mismatch::PathOverrun {
                index: 3,
                path_len: 64,
                remaining: 5
            }
        ));
    }

    #[test]
    fn test_huge_path_len_does_not_overflow() {
        let mut table = Vec::new();
        table.write_u32::<LE>(0).unwrap();
        table.write_u32::<LE>(0).unwrap();
        table.write_u32::<LE>(u32::MAX).unwrap();

        assert!(matches!(
            parse_table(&table),
            Err(Mismatch::PathOverrun { index: 0, .. })
        ));
    }

    #[test]
    fn test_truncated_record_header() {
        let mut table = sample_table();
        table.extend_from_slice(&[1, 2, 3, 4, 5]);

        assert!(matches!(
            parse_table(&table),
            Err(Mismatch::RecordOverrun {
                index: 3,
                remaining: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_utf8_path() {
        let mut table = Vec::new();
        record(&mut table, 0, 0, &[0x64, 0xFF, 0xFE, 0x61]);

        assert!(matches!(
            parse_table(&table),
            Err(Mismatch::PathEncoding { index: 0, .. })
        ));
    }

    #[test]
    fn test_reader_stops_after_error() {
        let mut table = Vec::new();
        record(&mut table, 0, 0, b"ok.txt");
        table.extend_from_slice(&[0; 4]);

        let items: Vec<_> = TableReader::new(&table).collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }

    #[test]
    fn test_decode_table_roundtrip() {
        let params = FormatVersion::V1.params();
        let plain = sample_table();
        let encrypted = decrypt_ctr(&params.key, &params.table_iv, &plain);

        let entries = decode_table(&encrypted, params).unwrap();
        assert_eq!(entries, parse_table(&plain).unwrap());
    }

    #[test]
    fn test_listing_line() {
        let entries = parse_table(&sample_table()).unwrap();
        assert_eq!(
            entries[1].listing_line(),
            "data/scripts/init.lua:[offs 00000120][size 00000005][pthl 00000015]"
        );
    }

    #[test]
    fn test_entry_end_no_overflow() {
        let entry = FileEntry {
            path: "a".into(),
            offset: u32::MAX,
            size: u32::MAX,
            path_len: 1,
            index: 0,
        };
        assert_eq!(entry.end(), 2 * u64::from(u32::MAX));
    }
}
