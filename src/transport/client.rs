//! Sending endpoint.

use std::net::SocketAddr;

use tracing::instrument;

use super::socket::SocketBinding;
use super::{MAX_DATAGRAM_SIZE, TransportError};
use crate::protocol::{Bundle, Message, Packet, Value};

/// OSC sender bound to one remote address.
#[derive(Debug, Clone)]
pub struct Client {
    socket: SocketBinding,
    remote: SocketAddr,
}

impl Client {
    /// Bind an ephemeral local port and target `remote`.
    pub fn connect(remote: SocketAddr) -> Result<Self, TransportError> {
        Ok(Self {
            socket: SocketBinding::bind_ephemeral_for(remote)?,
            remote,
        })
    }

    /// Send from an explicit local address.
    pub fn with_local_addr(local: SocketAddr, remote: SocketAddr) -> Result<Self, TransportError> {
        Ok(Self {
            socket: SocketBinding::bind(local)?,
            remote,
        })
    }

    /// Encode and send a packet as one datagram.
    #[instrument(level = "trace", skip(self, packet), fields(remote = %self.remote))]
    pub fn send(&self, packet: &Packet) -> Result<usize, TransportError> {
        self.send_bytes(&packet.encode())
    }

    /// Send a single message.
    pub fn send_message(
        &self,
        address: impl Into<String>,
        values: impl Into<Vec<Value>>,
    ) -> Result<usize, TransportError> {
        self.send_bytes(&Message::new(address, values).encode())
    }

    /// Send a bundle.
    pub fn send_bundle(&self, bundle: &Bundle) -> Result<usize, TransportError> {
        self.send_bytes(&bundle.encode())
    }

    fn send_bytes(&self, bytes: &[u8]) -> Result<usize, TransportError> {
        if bytes.len() > MAX_DATAGRAM_SIZE {
            return Err(TransportError::PacketTooLarge {
                len: bytes.len(),
                max: MAX_DATAGRAM_SIZE,
            });
        }
        self.socket.send_to(bytes, self.remote)
    }

    /// Destination address.
    #[must_use]
    pub const fn remote_addr(&self) -> SocketAddr {
        self.remote
    }

    /// Local address datagrams are sent from.
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.socket.local_addr()
    }
}
