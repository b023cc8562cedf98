//! The digest function used throughout the tree, and utilities for building its inputs.
//!
//! Every digest in this crate is SHA-256 over a packed layout: fixed-width fields concatenated
//! with no length prefixes and no padding.

use sha2::{Digest as _, Sha256};

/// A 256-bit digest.
pub type Digest = [u8; 32];

/// The width of a leaf chunk and of every digest, in bytes.
pub const CHUNK_SIZE: usize = 32;

/// The reserved all-zero value marking the end of a garbled tree.
///
/// It is never produced by [`hash`] in practice and is only ever placed into a tree as the final
/// hash leaf of an encoding.
pub const SENTINEL: Digest = [0u8; 32];

/// Hash an arbitrary bit-string.
pub fn hash(input: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// Hash two 32-byte inputs, left and right. This is the digest of an internal node.
pub fn hash2_32_concat(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Hash leaf data as a list of 32-byte words.
///
/// The data is fed chunk by chunk, which for a packed `bytes32[]` layout is byte-identical to
/// hashing the whole buffer. A trailing partial chunk is hashed as is.
pub fn hash_chunks(data: &[u8]) -> Digest {
    let mut hasher = Sha256::new();
    for chunk in data.chunks(CHUNK_SIZE) {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}
