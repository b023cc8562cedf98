//! Dispute evidence: packaging a digest mismatch so that a third party can adjudicate it.
//!
//! A complaint names three leaves of the garbled tree: two inputs and the claimed digest over
//! them. Each comes with its proof of inclusion against the garbled root the seller committed to.
//! Given the revealed key, the adjudicator decrypts the three leaves, recomputes the digest from
//! the inputs and upholds the complaint when it differs from the claimed one. Nothing else of the
//! dataset needs to be revealed.

use crate::crypt::{crypt, crypt_digest, keystream_position, Key};
use crate::encoding::DigestMismatch;
use crate::error::{FormatError, LookupError};
use crate::hasher::{hash2_32_concat, hash_chunks, Digest, CHUNK_SIZE};
use crate::proof::{validate_proof, LeafIndex};
use crate::tree::Node;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// A digest mismatch together with proofs of inclusion of its leaves in the garbled tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "borsh",
    derive(borsh::BorshDeserialize, borsh::BorshSerialize)
)]
pub struct Complaint {
    /// The number of leaves of the garbled tree.
    pub garbled_leaf_count: u64,
    pub index_in: u64,
    pub index_out: u64,
    /// Raw garbled data at `index_in`.
    pub in1: Vec<u8>,
    /// Raw garbled data at `index_in + 1`.
    pub in2: Vec<u8>,
    /// Raw garbled data at `index_out`.
    pub out: Digest,
    pub proof_in1: Vec<Digest>,
    pub proof_in2: Vec<Digest>,
    pub proof_out: Vec<Digest>,
}

impl Complaint {
    /// Build a complaint about `mismatch`, found while decoding the garbled tree under
    /// `garbled_root`.
    pub fn from_mismatch(
        garbled_root: &Node,
        mismatch: &DigestMismatch,
    ) -> Result<Self, LookupError> {
        Self::with_index(&LeafIndex::new(garbled_root), mismatch)
    }

    /// Build a complaint using an index over the garbled tree. Use this when packaging several
    /// mismatches of the same tree.
    pub fn with_index(
        index: &LeafIndex,
        mismatch: &DigestMismatch,
    ) -> Result<Self, LookupError> {
        let at = |position: usize, expected: &Node| match index.leaf(position) {
            Some(leaf) if leaf == expected => index.proof(position),
            _ => Err(LookupError::NotInTree),
        };

        let proof_in1 = at(mismatch.index_in, &mismatch.in1)?;
        let proof_in2 = at(mismatch.index_in + 1, &mismatch.in2)?;
        let proof_out = at(mismatch.index_out, &mismatch.out)?;

        Ok(Complaint {
            garbled_leaf_count: index.len() as u64,
            index_in: mismatch.index_in as u64,
            index_out: mismatch.index_out as u64,
            in1: mismatch.in1.data().unwrap_or_default().to_vec(),
            in2: mismatch.in2.data().unwrap_or_default().to_vec(),
            out: mismatch.out.digest(),
            proof_in1,
            proof_in2,
            proof_out,
        })
    }
}

/// Adjudicate a complaint against the garbled root the seller committed to, using the revealed
/// key.
///
/// Returns `Ok(true)` when the complaint is upheld: all three proofs hold, the leaves are related
/// as inputs and output of one internal node, and the decrypted claimed digest differs from the
/// one computed from the decrypted inputs.
pub fn verify_complaint(
    garbled_root_digest: &Digest,
    key: &Key,
    complaint: &Complaint,
) -> Result<bool, FormatError> {
    let count = complaint.garbled_leaf_count as usize;
    if count < 2 || !count.is_power_of_two() {
        return Err(FormatError::InvalidLeafCount { count });
    }
    let m = count / 2;
    let index_in = complaint.index_in as usize;
    let index_out = complaint.index_out as usize;

    // the output slot of the pair starting at `index_in`.
    if index_in % 2 != 0 || index_out != m + index_in / 2 || index_out >= count - 1 {
        return Ok(false);
    }

    let (in1, in2) = if index_in < m {
        match (Node::leaf(complaint.in1.clone()), Node::leaf(complaint.in2.clone())) {
            (Ok(in1), Ok(in2)) => (in1, in2),
            _ => return Ok(false),
        }
    } else {
        let in1 = Node::hash_leaf(&complaint.in1)
            .map_err(|_| FormatError::MalformedDigestSlot { position: index_in })?;
        let in2 = Node::hash_leaf(&complaint.in2).map_err(|_| FormatError::MalformedDigestSlot {
            position: index_in + 1,
        })?;
        (in1, in2)
    };
    let out = Node::HashLeaf(complaint.out);

    let included = validate_proof(garbled_root_digest, &in1, index_in, &complaint.proof_in1)
        && validate_proof(garbled_root_digest, &in2, index_in + 1, &complaint.proof_in2)
        && validate_proof(garbled_root_digest, &out, index_out, &complaint.proof_out);
    if !included {
        return Ok(false);
    }

    let decrypt =
        |data: &[u8], position: usize| crypt(data, keystream_position(position, m), key);
    let actual = if index_in < m {
        hash2_32_concat(
            &hash_chunks(&decrypt(&complaint.in1, index_in)),
            &hash_chunks(&decrypt(&complaint.in2, index_in + 1)),
        )
    } else {
        hash2_32_concat(
            &crypt_digest(&in1.digest(), keystream_position(index_in, m), key),
            &crypt_digest(&in2.digest(), keystream_position(index_in + 1, m), key),
        )
    };
    let expected = crypt_digest(&complaint.out, keystream_position(index_out, m), key);

    Ok(expected != actual)
}

/// The mismatch that is cheapest to publish: the one with the least input data, earliest found
/// among equals. Node-level mismatches carry two digests as inputs, leaf-level ones carry two
/// full slices.
pub fn cheapest(mismatches: &[DigestMismatch]) -> Option<&DigestMismatch> {
    mismatches.iter().min_by_key(|m| {
        let len = |node: &Node| node.data().map_or(CHUNK_SIZE, <[u8]>::len);
        len(&m.in1) + len(&m.in2)
    })
}
