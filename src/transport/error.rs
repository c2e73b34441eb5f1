//! Transport-level error types covering socket and receive-thread failures.

use std::io;

use thiserror::Error;

/// Unified error type for OSC transport operations.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Underlying socket failure.
    #[error("socket error: {0}")]
    Io(#[from] io::Error),

    /// Encoded packet does not fit in a single UDP datagram.
    #[error("packet too large: {len} bytes (max {max})")]
    PacketTooLarge {
        /// Length of the encoded packet.
        len: usize,
        /// Largest datagram payload UDP can carry.
        max: usize,
    },

    /// The receive thread panicked before it could be joined.
    #[error("receive thread panicked")]
    ReceiverPanicked,
}
