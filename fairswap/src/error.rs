use std::fmt;

use fairswap_core::{FormatError, LookupError, TreeError};

/// The stable classification of boundary errors.
///
/// Transport layers map these onto their own status codes and must not depend on the error
/// messages themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request could not be parsed.
    InvalidInput,
    /// The leaves could not be built into a tree.
    Construction,
    /// The leaves do not form a garbled tree.
    Format,
    /// A requested leaf is not part of the tree.
    Lookup,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid-input",
            ErrorKind::Construction => "construction",
            ErrorKind::Format => "format",
            ErrorKind::Lookup => "lookup",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors of the boundary operations.
#[derive(Debug)]
pub enum Error {
    /// A leaf was not valid hex.
    Hex { leaf: usize, source: hex::FromHexError },
    Core(fairswap_core::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Hex { .. } => ErrorKind::InvalidInput,
            Error::Core(e) => match e.kind() {
                fairswap_core::ErrorKind::Construction => ErrorKind::Construction,
                fairswap_core::ErrorKind::Format => ErrorKind::Format,
                fairswap_core::ErrorKind::Lookup => ErrorKind::Lookup,
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Hex { leaf, source } => write!(f, "leaf {leaf} is not valid hex: {source}"),
            Error::Core(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Hex { source, .. } => Some(source),
            Error::Core(e) => Some(e),
        }
    }
}

impl From<fairswap_core::Error> for Error {
    fn from(e: fairswap_core::Error) -> Self {
        Error::Core(e)
    }
}

impl From<TreeError> for Error {
    fn from(e: TreeError) -> Self {
        Error::Core(e.into())
    }
}

impl From<FormatError> for Error {
    fn from(e: FormatError) -> Self {
        Error::Core(e.into())
    }
}

impl From<LookupError> for Error {
    fn from(e: LookupError) -> Self {
        Error::Core(e.into())
    }
}
