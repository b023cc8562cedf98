//! Errors of tree construction, garbled tree decoding and proof lookup.
//!
//! Every error here fails the operation immediately. Digest disagreements found while decoding
//! are not errors: they are collected as [`crate::DigestMismatch`] values and returned alongside
//! the decoded tree.

use core::fmt;

/// Errors in building a tree or a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeError {
    /// A tree was requested over an empty list of leaves.
    EmptyInput,
    /// Leaf data was not a multiple of 32 bytes long.
    InvalidLeafLength { len: usize },
    /// Hash leaf data was not exactly 32 bytes long.
    InvalidHashLeafLength { len: usize },
    /// An internal node was requested without children.
    NoChildren,
    /// An internal node was requested with more than two children.
    TooManyChildren { count: usize },
    /// The slice count was below 2 or not a power of two.
    InvalidSliceCount { count: usize },
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::EmptyInput => write!(f, "cannot create tree from empty list"),
            TreeError::InvalidLeafLength { len } => {
                write!(f, "leaf data length {len} is not a multiple of 32")
            }
            TreeError::InvalidHashLeafLength { len } => {
                write!(f, "hash leaf data length {len} is not 32")
            }
            TreeError::NoChildren => write!(f, "internal node must have a child"),
            TreeError::TooManyChildren { count } => {
                write!(f, "cannot have more than two children, got {count}")
            }
            TreeError::InvalidSliceCount { count } => {
                write!(f, "slice count must be >= 2 and a power of 2, got {count}")
            }
        }
    }
}

/// Errors in the shape of a garbled tree handed to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    /// The garbled tree does not have 2^x leaves, with x at least 1.
    InvalidLeafCount { count: usize },
    /// The final leaf is not the sentinel.
    NotEncoded,
    /// A leaf in the digest half of the garbled tree is not 32 bytes long.
    MalformedDigestSlot { position: usize },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidLeafCount { count } => {
                write!(f, "garbled tree must have 2^x leaves, got {count}")
            }
            FormatError::NotEncoded => write!(f, "the tree does not appear to be encoded"),
            FormatError::MalformedDigestSlot { position } => {
                write!(f, "digest slot at position {position} is not 32 bytes")
            }
        }
    }
}

/// Errors in looking up a node within a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupError {
    /// The node is not part of the tree.
    NotInTree,
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::NotInTree => write!(f, "node is not part of this tree"),
        }
    }
}

/// The stable classification of an [`Error`], for mapping onto transport-level statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input could not be turned into a tree.
    Construction,
    /// The input does not conform to the garbled tree format.
    Format,
    /// A requested node is absent.
    Lookup,
}

/// Any error produced by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    Tree(TreeError),
    Format(FormatError),
    Lookup(LookupError),
}

impl Error {
    /// Get the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Tree(_) => ErrorKind::Construction,
            Error::Format(_) => ErrorKind::Format,
            Error::Lookup(_) => ErrorKind::Lookup,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Tree(e) => e.fmt(f),
            Error::Format(e) => e.fmt(f),
            Error::Lookup(e) => e.fmt(f),
        }
    }
}

impl From<TreeError> for Error {
    fn from(e: TreeError) -> Self {
        Error::Tree(e)
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Error::Format(e)
    }
}

impl From<LookupError> for Error {
    fn from(e: LookupError) -> Self {
        Error::Lookup(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TreeError {}

#[cfg(feature = "std")]
impl std::error::Error for FormatError {}

#[cfg(feature = "std")]
impl std::error::Error for LookupError {}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
