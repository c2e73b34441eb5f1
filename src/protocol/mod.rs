//! OSC protocol core implementation
//!
//! This module provides the wire format, the message model, the decoder, and
//! the queue decoded messages are handed off through.

mod diagnostics;
mod error;
mod message;
mod parser;
mod queue;
pub mod reader;
mod types;
pub mod writer;

pub use diagnostics::{Diagnostics, DiagnosticsSnapshot};
pub use error::{Error, Result};
pub use message::{Bundle, Message, Packet};
pub use parser::{Parser, ParserConfig, TagPolicy};
pub use queue::MessageQueue;
pub use types::{Timestamp, Value, tag};

/// First string of every bundle
pub const BUNDLE_TAG: &str = "#bundle";

/// Deepest bundle nesting the parser will follow
pub const MAX_BUNDLE_DEPTH: usize = 32;

/// Alignment of every OSC field
pub const ALIGNMENT: usize = 4;

/// Bytes occupied by a string of `len` bytes, terminator and padding included.
#[inline]
#[must_use]
pub const fn padded_len_string(len: usize) -> usize {
    (len + ALIGNMENT) & !(ALIGNMENT - 1)
}

/// Bytes occupied by a blob of `len` bytes after its size prefix.
#[inline]
#[must_use]
pub const fn padded_len_blob(len: usize) -> usize {
    (len + ALIGNMENT - 1) & !(ALIGNMENT - 1)
}
