//! Boundary operations of the FairSwap garbled tree encoding.
//!
//! These wrap [`fairswap_core`] in the request shapes a transport layer deals with: leaves and
//! digests travel as hex strings, and the numbers of a computation result (result, nonce and key)
//! are 256-bit integers serialized as 32 big-endian bytes.
//!
//! Errors carry a stable [`ErrorKind`] for transport layers to map onto their statuses. Digest
//! mismatches found while decoding are not errors: they come back as [`MismatchPayload`]s,
//! ready to be published as dispute evidence.

use fairswap_core::{
    decode, dispute::Complaint, encode, from_bytes, from_leaves, DigestMismatch, Key,
    LeafIndex, MismatchLevel, Node,
};
use ruint::aliases::U256;
use tracing::{debug, info, warn};

pub use error::{Error, ErrorKind};
pub use fairswap_core;
pub use options::Options;

mod error;
pub mod logging;
mod options;

/// The numbers produced by a computation that a seller wants to sell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputationResult {
    pub result: U256,
    pub nonce: U256,
    pub key: U256,
}

/// A garbled tree, as its leaves and its root digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoding {
    /// Hex of every garbled leaf, left to right.
    pub leaves: Vec<String>,
    /// Hex of the root digest of the garbled tree.
    pub root: String,
}

impl Encoding {
    /// Split the leaves into the encrypted data leaves and the hash leaves, the shape expected by
    /// [`root_digest`] and [`decode_computation`].
    pub fn split(&self) -> (&[String], &[String]) {
        self.leaves.split_at(self.leaves.len() / 2)
    }
}

/// A digest mismatch in hex, with the proofs a third party needs to adjudicate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MismatchPayload {
    pub level: MismatchLevel,
    pub index_in: usize,
    pub index_out: usize,
    pub in1: String,
    pub in2: String,
    pub out: String,
    pub expected_digest: String,
    pub actual_digest: String,
    pub proof_in1: Vec<String>,
    pub proof_in2: Vec<String>,
    pub proof_out: Vec<String>,
}

impl MismatchPayload {
    fn new(mismatch: &DigestMismatch, complaint: &Complaint) -> Self {
        let hexes = |digests: &[[u8; 32]]| -> Vec<String> {
            digests.iter().map(hex::encode).collect()
        };
        MismatchPayload {
            level: mismatch.level,
            index_in: mismatch.index_in,
            index_out: mismatch.index_out,
            in1: hex::encode(&complaint.in1),
            in2: hex::encode(&complaint.in2),
            out: hex::encode(complaint.out),
            expected_digest: hex::encode(mismatch.expected_digest),
            actual_digest: hex::encode(mismatch.actual_digest),
            proof_in1: hexes(&complaint.proof_in1),
            proof_in2: hexes(&complaint.proof_in2),
            proof_out: hexes(&complaint.proof_out),
        }
    }
}

/// The outcome of decoding a garbled computation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedComputation {
    /// The first decoded leaf, read as a 256-bit integer. `None` when it does not fit, in which
    /// case the leaves and mismatches are still reported.
    pub result: Option<U256>,
    /// Hex of every decoded plaintext leaf.
    pub decoded: Vec<String>,
    /// Hex of every garbled leaf the decoding was done on.
    pub encoding: Vec<String>,
    /// Every digest mismatch found, in the order found.
    pub mismatches: Vec<MismatchPayload>,
}

/// Garble an arbitrary payload: split it into `options` slices, build a tree and encode it.
pub fn encode_payload(data: &[u8], key: &Key, options: &Options) -> Result<Encoding, Error> {
    let plain = from_bytes(data, options.slice_count)?;
    let garbled = encode(&plain, key)?;
    debug!(
        plain_leaves = plain.leaf_count(),
        garbled_leaves = garbled.leaf_count(),
        "garbled payload"
    );
    Ok(Encoding {
        leaves: leaf_hexes(&garbled),
        root: hex::encode(garbled.digest()),
    })
}

/// Garble `result ++ nonce` under `key`.
pub fn encode_computation(
    computation: &ComputationResult,
    options: &Options,
) -> Result<Encoding, Error> {
    info!("encoding computation result");
    let mut data = Vec::with_capacity(64);
    data.extend_from_slice(&computation.result.to_be_bytes::<32>());
    data.extend_from_slice(&computation.nonce.to_be_bytes::<32>());
    encode_payload(&data, &computation.key.to_be_bytes::<32>(), options)
}

/// The root digest of the tree over `leaves` followed by `hash_leaves`.
pub fn root_digest<S: AsRef<str>>(leaves: &[S], hash_leaves: &[S]) -> Result<String, Error> {
    info!("computing root digest");
    let tree = parse_tree(leaves, hash_leaves)?;
    Ok(hex::encode(tree.digest()))
}

/// Decode the garbled tree over `leaves` followed by `hash_leaves` with `key`.
pub fn decode_computation<S: AsRef<str>>(
    leaves: &[S],
    hash_leaves: &[S],
    key: U256,
) -> Result<DecodedComputation, Error> {
    info!("decoding computation result");
    let garbled = parse_tree(leaves, hash_leaves)?;
    let decoded = decode(&garbled, &key.to_be_bytes::<32>())?;

    let mut mismatches = Vec::with_capacity(decoded.mismatches.len());
    if !decoded.mismatches.is_empty() {
        let index = LeafIndex::new(&garbled);
        for mismatch in &decoded.mismatches {
            warn!(
                level = ?mismatch.level,
                index_in = mismatch.index_in,
                index_out = mismatch.index_out,
                "digest mismatch"
            );
            let complaint = Complaint::with_index(&index, mismatch)?;
            mismatches.push(MismatchPayload::new(mismatch, &complaint));
        }
    }

    let first = decoded
        .tree
        .leaves()
        .next()
        .and_then(Node::data)
        .unwrap_or_default();
    let result = U256::try_from_be_slice(first);
    if result.is_none() {
        warn!(len = first.len(), "decoded result does not fit into 256 bits");
    }

    Ok(DecodedComputation {
        result,
        decoded: leaf_hexes(&decoded.tree),
        encoding: leaf_hexes(&garbled),
        mismatches,
    })
}

fn leaf_hexes(tree: &Node) -> Vec<String> {
    tree.leaves().filter_map(Node::data).map(hex::encode).collect()
}

fn parse_tree<S: AsRef<str>>(leaves: &[S], hash_leaves: &[S]) -> Result<Node, Error> {
    let mut nodes = Vec::with_capacity(leaves.len() + hash_leaves.len());
    for (i, leaf) in leaves.iter().enumerate() {
        nodes.push(Node::leaf(parse_hex(i, leaf.as_ref())?)?);
    }
    for (j, leaf) in hash_leaves.iter().enumerate() {
        let i = leaves.len() + j;
        nodes.push(Node::hash_leaf(&parse_hex(i, leaf.as_ref())?)?);
    }
    Ok(from_leaves(nodes)?)
}

fn parse_hex(leaf: usize, s: &str) -> Result<Vec<u8>, Error> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|source| Error::Hex { leaf, source })
}
