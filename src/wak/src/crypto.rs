//! AES-128 stream modes used by the container
//!
//! - Header: OFB with a fixed IV
//! - File table and file bodies: CTR with a 128-bit big-endian counter
//!
//! Both modes are their own inverse, so the same functions serve the test
//! fixtures that build encrypted containers.

use aes::Aes128;
use ctr::cipher::{KeyIvInit, StreamCipher};

/// AES-128-CTR with the whole 16-byte block used as a big-endian counter
pub type Aes128Ctr = ctr::Ctr128BE<Aes128>;

/// AES-128-OFB
pub type Aes128Ofb = ofb::Ofb<Aes128>;

/// Apply the OFB keystream in-place. `data` can be any length.
pub fn apply_ofb(key: &[u8; 16], iv: &[u8; 16], data: &mut [u8]) {
    let mut cipher = Aes128Ofb::new(key.into(), iv.into());
    cipher.apply_keystream(data);
}

/// Apply the CTR keystream in-place. `data` can be any length.
///
/// The counter starts at `counter` read as a big-endian integer and wraps
/// modulo 2^128.
pub fn apply_ctr(key: &[u8; 16], counter: &[u8; 16], data: &mut [u8]) {
    let mut cipher = Aes128Ctr::new(key.into(), counter.into());
    cipher.apply_keystream(data);
}

/// Decrypt a CTR region into a fresh buffer
pub fn decrypt_ctr(key: &[u8; 16], counter: &[u8; 16], data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    apply_ctr(key, counter, &mut out);
    out
}
