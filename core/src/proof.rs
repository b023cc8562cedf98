//! Proving and verifying inclusion of leaves in a tree.
//!
//! A proof is the list of sibling digests along the path from the root down to a leaf. The first
//! entry is the sibling just below the root and the last entry is the sibling of the leaf itself.
//! Verification consumes the proof from the end, climbing from the leaf towards the root, and
//! uses the binary index of the leaf to decide on which side each sibling goes.

use crate::error::LookupError;
use crate::hasher::{hash2_32_concat, Digest};
use crate::tree::Node;

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

struct Entry<'a> {
    node: &'a Node,
    parent: Option<usize>,
    // index of this node among its parent's children.
    child_index: usize,
}

/// A parent-indexed view of a tree, built once and then used to generate any number of proofs.
///
/// Building the index is linear in the size of the tree. Each proof afterwards costs only the
/// height of the tree.
pub struct LeafIndex<'a> {
    entries: Vec<Entry<'a>>,
    // entry index of each leaf, left to right.
    leaves: Vec<usize>,
}

impl<'a> LeafIndex<'a> {
    /// Index the tree under `root`.
    pub fn new(root: &'a Node) -> Self {
        let mut entries = Vec::new();
        let mut leaves = Vec::new();
        let mut stack = vec![(root, None, 0)];
        while let Some((node, parent, child_index)) = stack.pop() {
            let id = entries.len();
            entries.push(Entry {
                node,
                parent,
                child_index,
            });
            if node.is_leaf() {
                leaves.push(id);
            } else {
                for (i, child) in node.children().iter().enumerate().rev() {
                    stack.push((child, Some(id), i));
                }
            }
        }
        LeafIndex { entries, leaves }
    }

    /// The number of leaves in the tree.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Whether the index holds no leaves. This never holds for an index over a built tree.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Whether the tree has no promoted single-child nodes, i.e. a power-of-two leaf count.
    /// Every garbled tree is complete.
    pub fn is_complete(&self) -> bool {
        self.len().is_power_of_two()
    }

    /// The leaf at the given position, left to right.
    pub fn leaf(&self, position: usize) -> Option<&'a Node> {
        self.leaves.get(position).map(|&id| self.entries[id].node)
    }

    /// The position of the first leaf equal to `target`, if any.
    pub fn position_of(&self, target: &Node) -> Option<usize> {
        self.leaves
            .iter()
            .position(|&id| self.entries[id].node == target)
    }

    /// The proof for the leaf at the given position.
    ///
    /// Levels where a node was promoted without a sibling contribute no entry. Such proofs do not
    /// pass [`validate_proof`], which assumes a complete tree: use [`LeafIndex::is_complete`] to
    /// tell whether every proof of this index can be validated.
    pub fn proof(&self, position: usize) -> Result<Vec<Digest>, LookupError> {
        let mut id = *self.leaves.get(position).ok_or(LookupError::NotInTree)?;
        let mut siblings = Vec::new();
        while let Some(parent) = self.entries[id].parent {
            if let [left, right] = self.entries[parent].node.children() {
                let sibling = if self.entries[id].child_index == 0 {
                    right
                } else {
                    left
                };
                siblings.push(sibling.digest());
            }
            id = parent;
        }
        siblings.reverse();
        Ok(siblings)
    }
}

/// Get the proof of inclusion of `target` under `root`.
///
/// When several leaves equal the target, the proof is for the leftmost one. See
/// [`LeafIndex::proof`] for trees whose leaf count is not a power of two.
pub fn get_proof(root: &Node, target: &Node) -> Result<Vec<Digest>, LookupError> {
    let index = LeafIndex::new(root);
    let position = index.position_of(target).ok_or(LookupError::NotInTree)?;
    index.proof(position)
}

/// Check a proof of inclusion of `leaf` at `leaf_index` against `root_digest`.
///
/// At step `i` of the climb, `proof[len - 1 - i]` is combined on the left when bit `i` of the
/// leaf index is set, and on the right otherwise.
///
/// Only complete trees, with a power-of-two leaf count, are supported. A leaf below a promoted
/// single-child node has fewer proof entries than index bits, so its proof is rejected.
pub fn validate_proof(
    root_digest: &Digest,
    leaf: &Node,
    leaf_index: usize,
    proof: &[Digest],
) -> bool {
    if proof.len() > usize::BITS as usize {
        return false;
    }

    let mut digest = leaf.digest();
    for (i, sibling) in proof.iter().rev().enumerate() {
        digest = if (leaf_index >> i) & 1 == 1 {
            hash2_32_concat(sibling, &digest)
        } else {
            hash2_32_concat(&digest, sibling)
        };
    }
    digest == *root_digest
}
