//! Known format versions and their cipher constants
//!
//! The container layout is identical across versions; what changed with the
//! game update is the constant set used to decrypt it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// AES key shared by every known version.
///
/// This is `get16(0x0165_EC8F)`: the game derives its key with the same
/// generator it uses for file IVs.
const WAK_KEY: [u8; 16] = [
    0xC3, 0xD2, 0xBA, 0xE7, 0xC3, 0xF3, 0x62, 0x9A, 0x17, 0x53, 0x71, 0xD6, 0xB1, 0xF5, 0x05, 0xAA,
];

/// Base seed added to the table index to derive each file's IV
const FILE_SEED_BASE: u32 = 0x0165_EC8F;

/// Big-endian 128-bit one
const IV_ONE_BE: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];

/// Little-endian 128-bit one
const IV_ONE_LE: [u8; 16] = [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

/// 128-bit minus one (counter wraps to zero after the first block)
const IV_NEG_ONE: [u8; 16] = [0xFF; 16];

/// Cipher constants for one format version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherParams {
    /// AES-128 key for header, table and file bodies
    pub key: [u8; 16],
    /// OFB IV for the 16-byte header
    pub header_iv: [u8; 16],
    /// Initial CTR counter for the file table
    pub table_iv: [u8; 16],
    /// PRNG seed of table index zero
    pub file_seed_base: u32,
}

impl CipherParams {
    /// PRNG seed for the entry at `index` in the file table
    #[inline]
    pub fn file_seed(&self, index: u32) -> u32 {
        self.file_seed_base.wrapping_add(index)
    }

    /// CTR IV for the entry at `index` in the file table
    pub fn file_iv(&self, index: u32) -> [u8; 16] {
        crate::prng::get16(self.file_seed(index))
    }
}

static V1_PARAMS: CipherParams = CipherParams {
    key: WAK_KEY,
    header_iv: IV_ONE_BE,
    table_iv: IV_NEG_ONE,
    file_seed_base: FILE_SEED_BASE,
};

static V2_PARAMS: CipherParams = CipherParams {
    key: WAK_KEY,
    header_iv: IV_ONE_LE,
    table_iv: IV_NEG_ONE,
    file_seed_base: FILE_SEED_BASE,
};

/// Container format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FormatVersion {
    /// Archives shipped before the header IV change
    V1,
    /// Archives shipped after the header IV change
    #[default]
    V2,
}

impl FormatVersion {
    /// All known versions, oldest first
    pub const ALL: [FormatVersion; 2] = [FormatVersion::V1, FormatVersion::V2];

    /// Cipher constants for this version
    pub fn params(self) -> &'static CipherParams {
        match self {
            FormatVersion::V1 => &V1_PARAMS,
            FormatVersion::V2 => &V2_PARAMS,
        }
    }

    /// The version tried when this one does not match
    pub fn alternate(self) -> Self {
        match self {
            FormatVersion::V1 => FormatVersion::V2,
            FormatVersion::V2 => FormatVersion::V1,
        }
    }

    /// Numeric selector as used on the command line
    pub fn number(self) -> u8 {
        match self {
            FormatVersion::V1 => 1,
            FormatVersion::V2 => 2,
        }
    }

    /// Look up a version by its numeric selector
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(FormatVersion::V1),
            2 => Some(FormatVersion::V2),
            _ => None,
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Unknown version selector
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown format version '{0}' (expected 1 or 2)")]
pub struct UnknownVersion(pub String);

impl TryFrom<u8> for FormatVersion {
    type Error = UnknownVersion;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Self::from_number(n).ok_or_else(|| UnknownVersion(n.to_string()))
    }
}

impl From<FormatVersion> for u8 {
    fn from(version: FormatVersion) -> u8 {
        version.number()
    }
}

impl FromStr for FormatVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);

        digits
            .parse::<u8>()
            .ok()
            .and_then(Self::from_number)
            .ok_or_else(|| UnknownVersion(s.to_string()))
    }
}
