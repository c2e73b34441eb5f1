//! Receiving endpoint: a UDP socket, a receive thread, and the queue it fills.

use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, instrument, trace, warn};

use super::socket::SocketBinding;
use super::{MAX_DATAGRAM_SIZE, TransportError};
use crate::protocol::{DiagnosticsSnapshot, Message, MessageQueue, Parser, ParserConfig};

/// Server configuration options.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Local address to listen on.
    pub bind_addr: SocketAddr,
    /// Size of the receive buffer in bytes.
    ///
    /// Raised to [`MAX_DATAGRAM_SIZE`] if smaller, since a short buffer would
    /// silently truncate datagrams before they reach the parser.
    pub buffer_size: usize,
    /// How often the receive thread wakes to check for shutdown.
    pub poll_interval: Duration,
    /// Decoder options.
    pub parser: ParserConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, crate::DEFAULT_PORT)),
            buffer_size: MAX_DATAGRAM_SIZE,
            poll_interval: Duration::from_millis(100),
            parser: ParserConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Default configuration listening on `addr`.
    #[must_use]
    pub fn with_bind_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Self::default()
        }
    }
}

/// OSC receiver.
///
/// Datagrams are decoded on a dedicated thread; the application polls
/// [`Server::dequeue`] at its own cadence. Dropping the server stops and
/// joins the thread.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    parser: Arc<Parser>,
    running: Arc<AtomicBool>,
    receiver: Option<JoinHandle<()>>,
}

impl Server {
    /// Bind the socket and start the receive thread.
    #[instrument(level = "info", skip(config), fields(addr = %config.bind_addr))]
    pub fn bind(config: ServerConfig) -> Result<Self, TransportError> {
        let socket = SocketBinding::bind(config.bind_addr)?;
        socket.set_read_timeout(Some(config.poll_interval))?;
        let local_addr = socket.local_addr()?;

        let parser = Arc::new(Parser::with_config(MessageQueue::new(), config.parser));
        let running = Arc::new(AtomicBool::new(true));

        let receiver = thread::Builder::new().name("osc-receiver".into()).spawn({
            let parser = Arc::clone(&parser);
            let running = Arc::clone(&running);
            let buffer_size = config.buffer_size.max(MAX_DATAGRAM_SIZE);
            move || receive_loop(&socket, &parser, &running, buffer_size)
        })?;

        info!(%local_addr, "OSC server listening");
        Ok(Self {
            local_addr,
            parser,
            running,
            receiver: Some(receiver),
        })
    }

    /// Pop the oldest decoded message, or `None` if nothing is waiting.
    #[must_use]
    pub fn dequeue(&self) -> Option<Message> {
        self.parser.queue().dequeue()
    }

    /// Number of decoded messages waiting.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.parser.queue().len()
    }

    /// Another handle to the queue, for consumers living elsewhere.
    #[must_use]
    pub fn queue(&self) -> MessageQueue {
        self.parser.queue().clone()
    }

    /// Decode counters for everything received so far.
    #[must_use]
    pub fn diagnostics(&self) -> DiagnosticsSnapshot {
        self.parser.snapshot()
    }

    /// Address the socket is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Check whether the receive thread is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.receiver
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the receive thread and wait for it to exit.
    pub fn shutdown(mut self) -> Result<(), TransportError> {
        self.stop()
    }

    fn stop(&mut self) -> Result<(), TransportError> {
        self.running.store(false, Ordering::Release);
        match self.receiver.take() {
            Some(handle) => handle.join().map_err(|_| TransportError::ReceiverPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(error = %err, "OSC server did not shut down cleanly");
        }
    }
}

fn receive_loop(socket: &SocketBinding, parser: &Parser, running: &AtomicBool, buffer_size: usize) {
    let mut buf = vec![0u8; buffer_size];

    while running.load(Ordering::Acquire) {
        match socket.recv_from(&mut buf) {
            Ok((len, from)) => {
                trace!(len, %from, "datagram received");
                // Failures are logged and counted by the parser.
                let _ = parser.parse_packet(&buf[..len]);
            }
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::WouldBlock
                        | ErrorKind::TimedOut
                        | ErrorKind::Interrupted
                        | ErrorKind::ConnectionReset
                ) => {}
            Err(err) => {
                warn!(error = %err, "OSC receive failed; stopping receiver");
                break;
            }
        }
    }
    debug!("OSC receive loop exited");
}
