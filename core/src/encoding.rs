//! Garbling and un-garbling of trees.
//!
//! A garbled tree over a plaintext tree with `n` leaves has `2n` leaves:
//!   - positions `0..n` hold the plaintext leaves, each encrypted as a plain leaf,
//!   - positions `n..2n-1` hold the internal digests of the plaintext tree in
//!     [`Node::digests_pack`] order, each encrypted as a hash leaf,
//!   - position `2n-1` holds the [`SENTINEL`].
//!
//! See [`crate::crypt::keystream_position`] for the keystream position of every slot.
//!
//! Decoding checks every internal digest claimed by the garbled tree against what is actually
//! computed from its inputs. For a pair of plaintext leaves the inputs are the decrypted leaves
//! themselves. Higher up, the inputs are the decrypted digests the garbled tree claims for the two
//! children, so that every disagreement is witnessed by exactly three garbled leaves.

use crate::crypt::{crypt, crypt_digest, keystream_position, Key};
use crate::error::{FormatError, TreeError};
use crate::hasher::{hash2_32_concat, hash_chunks, Digest, SENTINEL};
use crate::tree::{from_leaves, Node};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Where in the tree a digest mismatch was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchLevel {
    /// The claimed digest over two plaintext leaves is wrong.
    Leaf,
    /// The claimed digest over two claimed digests is wrong.
    Node,
}

/// A disagreement between the digest a garbled tree claims and the digest computed from the
/// claimed inputs. This is the evidence a buyer brings to a dispute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestMismatch {
    pub level: MismatchLevel,
    /// The garbled leaf at `index_in`.
    pub in1: Node,
    /// The garbled leaf at `index_in + 1`.
    pub in2: Node,
    /// The garbled leaf at `index_out`, holding the claimed digest over `in1` and `in2`.
    pub out: Node,
    pub index_in: usize,
    pub index_out: usize,
    /// The decrypted content of `out`.
    pub expected_digest: Digest,
    /// The digest computed from the decrypted `in1` and `in2`.
    pub actual_digest: Digest,
}

/// The result of decoding a garbled tree.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// The plaintext tree, rebuilt from the decrypted leaves.
    pub tree: Node,
    /// Every digest mismatch, level by level and left to right within a level.
    pub mismatches: Vec<DigestMismatch>,
}

impl Decoded {
    /// Whether every claimed digest matched.
    pub fn is_consistent(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Garble a tree with the given key.
///
/// The plaintext tree should have a power-of-two number of leaves for the result to be
/// decodable.
pub fn encode(root: &Node, key: &Key) -> Result<Node, TreeError> {
    let data: Vec<&[u8]> = root.leaves().filter_map(Node::data).collect();
    garble(&data, &root.digests_pack(), key)
}

/// Garble a tree, but replace the first leaf with zeroes of the same length before encrypting.
///
/// The digests stay those of the honest tree, so decoding reports a leaf-level mismatch over the
/// first pair of leaves.
pub fn encode_forge_first_leaf(root: &Node, key: &Key) -> Result<Node, TreeError> {
    let data = forged_leaf_data(root);
    let data: Vec<&[u8]> = data.iter().map(Vec::as_slice).collect();
    garble(&data, &root.digests_pack(), key)
}

/// Garble a tree, replacing the first leaf with zeroes as [`encode_forge_first_leaf`] does, and
/// additionally replace the digest over the first pair of leaves with one honestly computed over
/// the forged pair.
///
/// The forgery then goes unnoticed at the leaf level and surfaces one level higher. With only two
/// plaintext leaves there is no higher level and the forgery is undetectable by decoding.
pub fn encode_forge_first_leaf_first_hash(root: &Node, key: &Key) -> Result<Node, TreeError> {
    let data = forged_leaf_data(root);
    let mut digests = root.digests_pack();
    if let ([first, second, ..], Some(digest)) = (data.as_slice(), digests.first_mut()) {
        *digest = hash2_32_concat(&hash_chunks(first), &hash_chunks(second));
    }
    let data: Vec<&[u8]> = data.iter().map(Vec::as_slice).collect();
    garble(&data, &digests, key)
}

fn forged_leaf_data(root: &Node) -> Vec<Vec<u8>> {
    let mut data: Vec<Vec<u8>> = root
        .leaves()
        .filter_map(Node::data)
        .map(<[u8]>::to_vec)
        .collect();
    if let Some(first) = data.first_mut() {
        first.fill(0);
    }
    data
}

fn garble(data: &[&[u8]], digests: &[Digest], key: &Key) -> Result<Node, TreeError> {
    let n = data.len();
    let mut leaves = Vec::with_capacity(n + digests.len() + 1);
    for (i, value) in data.iter().enumerate() {
        leaves.push(Node::leaf(crypt(value, keystream_position(i, n), key))?);
    }
    for (j, digest) in digests.iter().enumerate() {
        let position = keystream_position(n + j, n);
        leaves.push(Node::HashLeaf(crypt_digest(digest, position, key)));
    }
    leaves.push(Node::HashLeaf(SENTINEL));
    from_leaves(leaves)
}

/// Decode a garbled tree with the given key.
///
/// Fails if the tree is not shaped like a garbled tree. Otherwise the whole tree is decoded and
/// every digest mismatch is reported, without stopping at the first one.
///
/// Decoding with the wrong key yields garbage leaves. It is not reported as such: the garbage
/// surfaces as digest mismatches, indistinguishable from those of a dishonest encoding.
pub fn decode(root: &Node, key: &Key) -> Result<Decoded, FormatError> {
    let garbled: Vec<&Node> = root.leaves().collect();
    let count = garbled.len();
    if count < 2 || !count.is_power_of_two() {
        return Err(FormatError::InvalidLeafCount { count });
    }
    if raw(garbled[count - 1]) != SENTINEL {
        return Err(FormatError::NotEncoded);
    }

    let m = count / 2;

    // decrypted claimed digests of the slots at positions m..count-1.
    let mut claimed = Vec::with_capacity(m - 1);
    for position in m..count - 1 {
        let digest: &Digest = raw(garbled[position])
            .try_into()
            .map_err(|_| FormatError::MalformedDigestSlot { position })?;
        claimed.push(crypt_digest(digest, keystream_position(position, m), key));
    }

    // garbled data is always a multiple of 32 bytes, and crypt preserves the length.
    let mut nodes: Vec<Node> = (0..m)
        .map(|i| Node::leaf_unchecked(crypt(raw(garbled[i]), keystream_position(i, m), key)))
        .collect();

    let mut mismatches = Vec::new();
    let mut node_index = 0;
    let mut digest_index = m;
    while nodes.len() > 1 {
        let mut next = Vec::with_capacity(nodes.len() / 2);
        let mut iter = nodes.into_iter();
        while let (Some(left), Some(right)) = (iter.next(), iter.next()) {
            let node = Node::pair(left, right);
            let expected_digest = claimed[digest_index - m];
            let (level, actual_digest) = if node_index < m {
                (MismatchLevel::Leaf, node.digest())
            } else {
                let left = &claimed[node_index - m];
                let right = &claimed[node_index + 1 - m];
                (MismatchLevel::Node, hash2_32_concat(left, right))
            };

            if expected_digest != actual_digest {
                mismatches.push(DigestMismatch {
                    level,
                    in1: garbled[node_index].clone(),
                    in2: garbled[node_index + 1].clone(),
                    out: garbled[digest_index].clone(),
                    index_in: node_index,
                    index_out: digest_index,
                    expected_digest,
                    actual_digest,
                });
            }

            node_index += 2;
            digest_index += 1;
            next.push(node);
        }
        nodes = next;
    }

    let tree = nodes.pop().ok_or(FormatError::InvalidLeafCount { count })?;
    Ok(Decoded { tree, mismatches })
}

fn raw(node: &Node) -> &[u8] {
    node.data().unwrap_or_default()
}
