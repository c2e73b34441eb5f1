//! OSC decode error types

use thiserror::Error;

/// OSC protocol errors
///
/// Only structural failures surface here. Frame-size inconsistencies are
/// recovered inside the parser and reported through [`Diagnostics`](super::Diagnostics).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A read would run past the end of the supplied buffer
    #[error("read out of bounds: need {needed} bytes at offset {offset}, buffer holds {len}")]
    OutOfBounds {
        /// Cursor position where the read started
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Length of the supplied buffer
        len: usize,
    },

    /// Blob length prefix was negative
    #[error("negative blob length {length} at offset {offset}")]
    NegativeLength {
        /// Cursor position of the length prefix
        offset: usize,
        /// Decoded length
        length: i32,
    },

    /// Bundles nested deeper than the parser follows
    #[error("bundle nesting exceeds {max} levels")]
    NestingTooDeep {
        /// Configured limit
        max: usize,
    },

    /// Type tag outside the supported set (strict mode only)
    #[error("unsupported type tag {tag:?} in message {address}")]
    UnknownTypeTag {
        /// Offending tag character
        tag: char,
        /// Address of the message being decoded
        address: String,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
