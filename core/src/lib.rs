//! Core operations and types of the FairSwap garbled Merkle tree.
//!
//! A seller splits a payload into slices, builds a Merkle tree over them and garbles the tree with
//! a secret key. Once the key is revealed, a buyer decodes the garbled tree and learns every
//! position where the seller's claimed digests disagree with the data actually delivered. Each such
//! disagreement can be turned into a [`dispute::Complaint`] which a third party can adjudicate by
//! looking at three leaves of the garbled tree and their inclusion proofs.
//!
//! This crate does not require the standard library, but does require Rust's alloc crate.

#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

extern crate alloc;

pub mod crypt;
pub mod dispute;
pub mod encoding;
pub mod error;
#[cfg(test)]
mod fixtures;
pub mod hasher;
pub mod proof;
pub mod tree;

pub use crypt::{crypt, Key};
pub use encoding::{decode, encode, Decoded, DigestMismatch, MismatchLevel};
pub use error::{Error, ErrorKind, FormatError, LookupError, TreeError};
pub use hasher::{Digest, SENTINEL};
pub use proof::{get_proof, validate_proof, LeafIndex};
pub use tree::{from_bytes, from_leaves, from_list, Node};
