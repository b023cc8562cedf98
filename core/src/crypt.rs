//! The keystream and the XOR crypt primitive shared by the encoder and the decoder.
//!
//! The pad for keystream position `i` under key `K` is `sha256(be_uint256(i) ++ K)`.

use crate::hasher::{self, Digest};
use ruint::Uint;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// A 256-bit symmetric key.
pub type Key = [u8; 32];

/// The one-time pad for the given keystream position.
pub fn keystream(position: u64, key: &Key) -> Digest {
    let position = Uint::<256, 4>::from(position).to_be_bytes::<32>();
    hasher::hash2_32_concat(&position, key)
}

/// XOR `value` with the pad at keystream position `position`, repeating the pad across values
/// longer than 32 bytes. Applying it twice with the same position and key is the identity.
pub fn crypt(value: &[u8], position: u64, key: &Key) -> Vec<u8> {
    let pad = keystream(position, key);
    value
        .iter()
        .zip(pad.iter().cycle())
        .map(|(v, p)| v ^ p)
        .collect()
}

/// [`crypt`] specialized to a single digest.
pub fn crypt_digest(digest: &Digest, position: u64, key: &Key) -> Digest {
    let mut out = keystream(position, key);
    for (o, d) in out.iter_mut().zip(digest) {
        *o ^= d;
    }
    out
}

/// Map a leaf position in a garbled tree to its keystream position.
///
/// A garbled tree over `plaintext_leaves` data leaves holds the data leaves at positions
/// `0..n`, followed by the internal digests at positions `n..2n-1`. Data leaf `p` is encrypted
/// at keystream position `p`. Digest slot `j`, found at position `n + j`, is encrypted at
/// keystream position `2n + j`.
pub fn keystream_position(position: usize, plaintext_leaves: usize) -> u64 {
    if position < plaintext_leaves {
        position as u64
    } else {
        (position + plaintext_leaves) as u64
    }
}
