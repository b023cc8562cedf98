//! Seeded tree fixtures shared by the unit tests.

use crate::tree::{from_leaves, Node};
use rand::{RngCore as _, SeedableRng as _};

/// `count` random leaves of `chunks` 32-byte chunks each. The same seed gives the same leaves.
pub fn random_leaves(seed: u64, count: usize, chunks: usize) -> Vec<Node> {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut data = vec![0u8; 32 * chunks];
            rng.fill_bytes(&mut data);
            Node::leaf(data).unwrap()
        })
        .collect()
}

/// A tree over `count` random single-chunk leaves.
pub fn random_tree(seed: u64, count: usize) -> Node {
    from_leaves(random_leaves(seed, count, 1)).unwrap()
}

/// A random key.
pub fn random_key(seed: u64) -> [u8; 32] {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(seed ^ 0x6b6579);
    let mut key = [0u8; 32];
    rng.fill_bytes(&mut key);
    key
}
