//! This module defines the binary Merkle tree over byte slices.
//!
//! There are three kinds of nodes.
//!   1. Internal nodes, which have one or two children. The digest of an internal node with two
//!      children is the hash of the concatenation of the children's digests. An internal node
//!      with a single child is the result of promoting an unpaired node and carries the digest of
//!      its child unchanged.
//!   2. Leaf nodes, which carry a buffer of 32-byte chunks. The digest of a leaf is the hash of
//!      its chunks, concatenated.
//!   3. Hash leaves, which carry a single 32-byte value that is taken as the digest verbatim.
//!      These are how internal digests are embedded as data in a garbled tree.
//!
//! Trees are immutable once built. Internal digests are computed once, at construction.

use crate::error::TreeError;
use crate::hasher::{self, Digest, CHUNK_SIZE};

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use core::fmt;

/// The data of an internal node.
#[derive(Clone)]
pub struct Internal {
    children: Vec<Node>,
    digest: Digest,
}

impl Internal {
    /// The children of this node, left to right. There are always one or two.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// The digest of this node.
    pub fn digest(&self) -> Digest {
        self.digest
    }
}

/// The data of a leaf: always a whole number of 32-byte chunks. Built only by [`Node::leaf`].
///
/// ```compile_fail
/// use fairswap_core::tree::{LeafData, Node};
/// let leaf = Node::Leaf(LeafData(vec![1; 33]));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LeafData(Vec<u8>);

impl LeafData {
    /// The raw bytes of the leaf.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// The number of 32-byte chunks.
    pub fn chunk_count(&self) -> usize {
        self.0.len() / CHUNK_SIZE
    }
}

impl AsRef<[u8]> for LeafData {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A node in the tree.
#[derive(Clone)]
pub enum Node {
    /// A node with one or two children.
    Internal(Internal),
    /// A leaf carrying a multiple of 32 bytes of data.
    Leaf(LeafData),
    /// A leaf whose data is its own digest.
    HashLeaf(Digest),
}

impl Node {
    /// Create a leaf node. Fails if the data is not a multiple of 32 bytes long.
    pub fn leaf(data: impl Into<Vec<u8>>) -> Result<Self, TreeError> {
        let data = data.into();
        if data.len() % CHUNK_SIZE != 0 {
            return Err(TreeError::InvalidLeafLength { len: data.len() });
        }
        Ok(Node::Leaf(LeafData(data)))
    }

    /// Create a leaf from data already known to be a multiple of 32 bytes long.
    pub(crate) fn leaf_unchecked(data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len() % CHUNK_SIZE, 0);
        Node::Leaf(LeafData(data))
    }

    /// Create a hash leaf from a slice. Fails if the slice is not exactly 32 bytes long.
    pub fn hash_leaf(data: &[u8]) -> Result<Self, TreeError> {
        let digest: Digest = data
            .try_into()
            .map_err(|_| TreeError::InvalidHashLeafLength { len: data.len() })?;
        Ok(Node::HashLeaf(digest))
    }

    /// Create an internal node over one or two children.
    pub fn internal(mut children: Vec<Node>) -> Result<Self, TreeError> {
        match children.len() {
            0 => Err(TreeError::NoChildren),
            1 => Ok(Node::promote(children.remove(0))),
            2 => {
                let right = children.remove(1);
                let left = children.remove(0);
                Ok(Node::pair(left, right))
            }
            count => Err(TreeError::TooManyChildren { count }),
        }
    }

    /// Join two nodes under a new internal node.
    pub fn pair(left: Node, right: Node) -> Self {
        let digest = hasher::hash2_32_concat(&left.digest(), &right.digest());
        Node::Internal(Internal {
            children: vec![left, right],
            digest,
        })
    }

    /// Wrap a lone node in a single-child internal node, keeping its digest.
    pub fn promote(child: Node) -> Self {
        let digest = child.digest();
        Node::Internal(Internal {
            children: vec![child],
            digest,
        })
    }

    /// The digest of this node.
    pub fn digest(&self) -> Digest {
        match self {
            Node::Internal(internal) => internal.digest,
            Node::Leaf(data) => hasher::hash_chunks(data.as_slice()),
            Node::HashLeaf(digest) => *digest,
        }
    }

    /// The children of this node, left to right. Empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Internal(internal) => &internal.children,
            Node::Leaf(_) | Node::HashLeaf(_) => &[],
        }
    }

    /// The raw data of a leaf or hash leaf. `None` for internal nodes.
    pub fn data(&self) -> Option<&[u8]> {
        match self {
            Node::Internal(_) => None,
            Node::Leaf(data) => Some(data.as_slice()),
            Node::HashLeaf(digest) => Some(digest),
        }
    }

    /// Whether this is a leaf or a hash leaf.
    pub fn is_leaf(&self) -> bool {
        !matches!(self, Node::Internal(_))
    }

    /// Iterate the leaf-level nodes of this tree, left to right.
    pub fn leaves(&self) -> Leaves<'_> {
        Leaves { stack: vec![self] }
    }

    /// The number of leaves in this tree.
    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    /// The number of edges between the root and the deepest leaf.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut level = vec![self];
        loop {
            let next: Vec<&Node> = level.iter().flat_map(|&node| node.children()).collect();
            if next.is_empty() {
                return height;
            }
            height += 1;
            level = next;
        }
    }

    /// All internal node digests, deepest level first and left to right within a level. The
    /// root digest comes last.
    ///
    /// Encoding and decoding address digests by their position in this sequence.
    pub fn digests_pack(&self) -> Vec<Digest> {
        let mut levels: Vec<Vec<Digest>> = Vec::new();
        let mut level = vec![self];
        while !level.is_empty() {
            let mut digests = Vec::new();
            let mut next = Vec::new();
            for node in level {
                if let Node::Internal(internal) = node {
                    digests.push(internal.digest);
                    next.extend(internal.children.iter());
                }
            }
            if !digests.is_empty() {
                levels.push(digests);
            }
            level = next;
        }
        levels.into_iter().rev().flatten().collect()
    }

    /// All internal node digests in post-order: the left subtree, then the right subtree, then
    /// the node itself. The root digest comes last.
    pub fn digests_dfs(&self) -> Vec<Digest> {
        let mut digests = Vec::new();
        let mut stack = vec![(self, false)];
        while let Some((node, expanded)) = stack.pop() {
            let Node::Internal(internal) = node else {
                continue;
            };
            if expanded {
                digests.push(internal.digest);
            } else {
                stack.push((node, true));
                stack.extend(internal.children.iter().rev().map(|child| (child, false)));
            }
        }
        digests
    }
}

/// Leaf-family nodes compare by their raw data. Any other pairing compares by digest.
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self.data(), other.data()) {
            (Some(a), Some(b)) => a == b,
            _ => self.digest() == other.digest(),
        }
    }
}

impl Eq for Node {}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Internal(internal) => f
                .debug_struct("Internal")
                .field("digest", &hex::encode(internal.digest))
                .field("children", &internal.children)
                .finish(),
            Node::Leaf(data) => f.debug_tuple("Leaf").field(&hex::encode(data)).finish(),
            Node::HashLeaf(digest) => f.debug_tuple("HashLeaf").field(&hex::encode(digest)).finish(),
        }
    }
}

/// Iterator over the leaves of a tree, left to right. Created by [`Node::leaves`].
pub struct Leaves<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Internal(internal) => self.stack.extend(internal.children.iter().rev()),
                leaf => return Some(leaf),
            }
        }
        None
    }
}

/// Build a tree by pairing adjacent nodes level by level until a single root remains. An
/// unpaired trailing node is promoted to the next level on its own.
pub fn from_leaves(leaves: Vec<Node>) -> Result<Node, TreeError> {
    let mut nodes = leaves;
    while nodes.len() > 1 {
        let mut next = Vec::with_capacity((nodes.len() + 1) / 2);
        let mut iter = nodes.into_iter();
        while let Some(left) = iter.next() {
            next.push(match iter.next() {
                Some(right) => Node::pair(left, right),
                None => Node::promote(left),
            });
        }
        nodes = next;
    }
    nodes.pop().ok_or(TreeError::EmptyInput)
}

/// Split `data` into `slice_count` contiguous leaves of `ceil(len / slice_count)` bytes each and
/// build a tree over them. Trailing leaves may be short or empty.
///
/// `slice_count` must be at least 2 and a power of two, and every resulting slice must be a
/// multiple of 32 bytes long.
pub fn from_bytes(data: &[u8], slice_count: usize) -> Result<Node, TreeError> {
    if slice_count < 2 || !slice_count.is_power_of_two() {
        return Err(TreeError::InvalidSliceCount { count: slice_count });
    }
    let slice_len = data.len().div_ceil(slice_count);
    let leaves = (0..slice_count)
        .map(|s| {
            let start = (slice_len * s).min(data.len());
            let end = (slice_len * (s + 1)).min(data.len());
            Node::leaf(&data[start..end])
        })
        .collect::<Result<Vec<_>, _>>()?;
    from_leaves(leaves)
}

/// Build a tree with one leaf per item.
pub fn from_list<I, T>(items: I) -> Result<Node, TreeError>
where
    I: IntoIterator<Item = T>,
    T: Into<Vec<u8>>,
{
    let leaves = items
        .into_iter()
        .map(Node::leaf)
        .collect::<Result<Vec<_>, _>>()?;
    from_leaves(leaves)
}

#[cfg(test)]
mod tests {
    use super::{from_bytes, from_leaves, from_list, Node};
    use crate::{
        error::TreeError,
        hasher::{hash2_32_concat, hash_chunks},
    };

    fn leaf(byte: u8) -> Node {
        Node::leaf(vec![byte; 32]).unwrap()
    }

    #[test]
    fn leaf_length_must_be_multiple_of_32() {
        assert_eq!(
            Node::leaf(vec![0; 33]),
            Err(TreeError::InvalidLeafLength { len: 33 })
        );
        assert!(Node::leaf(Vec::new()).is_ok());
        assert!(Node::leaf(vec![0; 64]).is_ok());
    }

    #[test]
    fn hash_leaf_digest_is_its_data() {
        let node = Node::hash_leaf(&[9; 32]).unwrap();
        assert_eq!(node.digest(), [9; 32]);
        assert_eq!(
            Node::hash_leaf(&[9; 31]),
            Err(TreeError::InvalidHashLeafLength { len: 31 })
        );
    }

    #[test]
    fn internal_children_are_bounded() {
        assert_eq!(Node::internal(Vec::new()), Err(TreeError::NoChildren));
        assert_eq!(
            Node::internal(vec![leaf(0), leaf(1), leaf(2)]),
            Err(TreeError::TooManyChildren { count: 3 })
        );
        let single = Node::internal(vec![leaf(4)]).unwrap();
        assert_eq!(single.children().len(), 1);
        assert_eq!(single.digest(), leaf(4).digest());
    }

    #[test]
    fn leaves_compare_by_data_and_nodes_by_digest() {
        let data = [5u8; 32];
        assert_eq!(Node::leaf(data.to_vec()).unwrap(), Node::hash_leaf(&data).unwrap());
        // same data, different digests: still equal as leaves.
        assert_ne!(
            Node::leaf(data.to_vec()).unwrap().digest(),
            Node::hash_leaf(&data).unwrap().digest()
        );
        assert_eq!(Node::pair(leaf(1), leaf(2)), Node::pair(leaf(1), leaf(2)));
        assert_ne!(Node::pair(leaf(1), leaf(2)), Node::pair(leaf(2), leaf(1)));
    }

    #[test]
    fn from_leaves_rejects_empty_input() {
        assert_eq!(from_leaves(Vec::new()), Err(TreeError::EmptyInput));
    }

    #[test]
    fn from_leaves_two_leaves() {
        let root = from_leaves(vec![leaf(0), leaf(1)]).unwrap();
        assert_eq!(root.children().len(), 2);
        assert_eq!(root.height(), 1);
        assert_eq!(root.digests_pack().len(), 1);
        assert_eq!(
            root.digest(),
            hash2_32_concat(&hash_chunks(&[0; 32]), &hash_chunks(&[1; 32]))
        );
    }

    #[test]
    fn from_leaves_preserves_order() {
        let leaves: Vec<Node> = (0..8).map(leaf).collect();
        let root = from_leaves(leaves.clone()).unwrap();
        let got: Vec<Node> = root.leaves().cloned().collect();
        assert_eq!(got, leaves);
        assert_eq!(root.leaf_count(), 8);
        assert_eq!(root.height(), 3);
    }

    #[test]
    fn odd_levels_promote_trailing_node() {
        let root = from_leaves((0..3).map(leaf).collect()).unwrap();
        let right = &root.children()[1];
        assert_eq!(right.children().len(), 1);
        assert_eq!(right.digest(), leaf(2).digest());
        assert_eq!(
            root.digest(),
            hash2_32_concat(
                &hash2_32_concat(&leaf(0).digest(), &leaf(1).digest()),
                &leaf(2).digest()
            )
        );
    }

    #[test]
    fn digests_pack_is_deepest_first() {
        let root = from_leaves((0..4).map(leaf).collect()).unwrap();
        let left = hash2_32_concat(&leaf(0).digest(), &leaf(1).digest());
        let right = hash2_32_concat(&leaf(2).digest(), &leaf(3).digest());
        assert_eq!(
            root.digests_pack(),
            vec![left, right, hash2_32_concat(&left, &right)]
        );
        assert!(leaf(0).digests_pack().is_empty());
    }

    #[test]
    fn from_bytes_validates_slice_count() {
        for count in [0, 1, 3, 6] {
            assert_eq!(
                from_bytes(&[0; 64], count),
                Err(TreeError::InvalidSliceCount { count })
            );
        }
    }

    #[test]
    fn from_bytes_splits_evenly() {
        let mut data = vec![0u8; 32];
        data.extend_from_slice(&[1u8; 32]);
        let root = from_bytes(&data, 2).unwrap();
        assert_eq!(root, from_leaves(vec![leaf(0), leaf(1)]).unwrap());
    }

    #[test]
    fn from_bytes_short_trailing_slices() {
        // 320 bytes into 4 slices of 96: the last one is short.
        let root = from_bytes(&[7u8; 320], 4).unwrap();
        let lens: Vec<usize> = root.leaves().map(|l| l.data().unwrap().len()).collect();
        assert_eq!(lens, vec![96, 96, 96, 32]);

        // 63 chunks into 64 slices of 32: the last one is empty.
        let root = from_bytes(&[7u8; 2016], 64).unwrap();
        let lens: Vec<usize> = root.leaves().map(|l| l.data().unwrap().len()).collect();
        assert_eq!(lens.len(), 64);
        assert!(lens[..63].iter().all(|&len| len == 32));
        assert_eq!(lens[63], 0);

        // 40 bytes into 2 slices of 20 bytes each cannot form leaves.
        assert_eq!(
            from_bytes(&[7u8; 40], 2),
            Err(TreeError::InvalidLeafLength { len: 20 })
        );
    }

    #[test]
    fn partial_chunk_leaves_cannot_be_built() {
        assert!(Node::leaf(vec![1u8; 33]).is_err());
        assert!(from_list([vec![1u8; 32], vec![1u8; 33]]).is_err());
        assert!(from_bytes(&[1u8; 66], 2).is_err());

        let Node::Leaf(data) = Node::leaf(vec![1u8; 64]).unwrap() else {
            panic!("not a leaf");
        };
        assert_eq!(data.chunk_count(), 2);
        assert_eq!(data.as_slice(), &[1u8; 64][..]);
    }

    #[test]
    fn digests_dfs_is_post_order() {
        let root = from_leaves((0..4).map(leaf).collect()).unwrap();
        let left = hash2_32_concat(&leaf(0).digest(), &leaf(1).digest());
        let right = hash2_32_concat(&leaf(2).digest(), &leaf(3).digest());
        assert_eq!(
            root.digests_dfs(),
            vec![left, right, hash2_32_concat(&left, &right)]
        );

        // 3 leaves: the promoted node carries its own entry after the left subtree.
        let root = from_leaves((0..3).map(leaf).collect()).unwrap();
        assert_eq!(
            root.digests_dfs(),
            vec![left, leaf(2).digest(), root.digest()]
        );
        assert_eq!(root.digests_dfs().len(), root.digests_pack().len());
        assert!(leaf(0).digests_dfs().is_empty());
    }

    #[test]
    fn from_list_builds_one_leaf_per_item() {
        let root = from_list(vec![vec![1u8; 32], vec![2u8; 64]]).unwrap();
        assert_eq!(root.leaf_count(), 2);
        assert_eq!(root.leaves().nth(1).unwrap().data().unwrap().len(), 64);
    }
}
