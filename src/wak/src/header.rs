//! Container header (16 bytes, AES-128-OFB)
//!
//! Decrypted layout:
//! - Bytes 0-3: Zero word (version sanity check)
//! - Bytes 4-7: Declared entry count
//! - Bytes 8-11: End offset of the encrypted file table
//! - Bytes 12-15: Reserved

use byteorder::{ByteOrder, LE};

use crate::crypto::apply_ofb;
use crate::version::CipherParams;
use crate::{Error, Mismatch, Result};

/// Header size in bytes
pub const HEADER_SIZE: usize = 16;

/// Decrypted container header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Sanity word, zero when the right constants were used
    pub magic: u32,
    /// Number of entries the header claims the table holds
    pub file_count: u32,
    /// Absolute offset where the file table ends
    pub table_end: u32,
    /// Trailing word, unused
    pub reserved: u32,
}

impl Header {
    /// Parse an already decrypted header
    #[inline]
    pub fn from_bytes(data: &[u8; HEADER_SIZE]) -> Self {
        Self {
            magic: LE::read_u32(&data[0..4]),
            file_count: LE::read_u32(&data[4..8]),
            table_end: LE::read_u32(&data[8..12]),
            reserved: LE::read_u32(&data[12..16]),
        }
    }

    /// Byte length of the encrypted table region
    #[inline]
    pub fn table_len(&self) -> usize {
        (self.table_end as usize).saturating_sub(HEADER_SIZE)
    }
}

/// Decrypt the first 16 bytes of a container without validating them
pub fn decrypt_header(container: &[u8], params: &CipherParams) -> Result<[u8; HEADER_SIZE]> {
    if container.len() < HEADER_SIZE {
        return Err(Error::DataTooShort {
            needed: HEADER_SIZE,
            actual: container.len(),
        });
    }

    let mut block = [0u8; HEADER_SIZE];
    block.copy_from_slice(&container[..HEADER_SIZE]);
    apply_ofb(&params.key, &params.header_iv, &mut block);
    Ok(block)
}

/// Decrypt and validate the container header.
///
/// A nonzero sanity word or a table end outside the container means the
/// constants do not belong to this archive.
pub fn decode_header(container: &[u8], params: &CipherParams) -> Result<Header> {
    let header = Header::from_bytes(&decrypt_header(container, params)?);

    if header.magic != 0 {
        return Err(Mismatch::HeaderMagic(header.magic).into());
    }

    let end = header.table_end as usize;
    if end < HEADER_SIZE || end > container.len() {
        return Err(Mismatch::TableBounds {
            end: header.table_end,
            len: container.len(),
        }
        .into());
    }

    Ok(header)
}
