//! UDP endpoints for sending and receiving OSC packets

mod client;
mod error;
mod server;
mod socket;

pub use client::Client;
pub use error::TransportError;
pub use server::{Server, ServerConfig};
pub use socket::SocketBinding;

/// Largest payload a single UDP datagram can carry.
pub const MAX_DATAGRAM_SIZE: usize = 65_507;
