//! oscwire - OSC (Open Sound Control) wire codec and UDP endpoints
//!
//! This library decodes OSC 1.0 packets (messages and arbitrarily nested
//! bundles) into typed messages, hands them off through a thread-safe queue,
//! and encodes messages and bundles for sending.
//!
//! # Quick Start
//!
//! ```rust
//! use oscwire::{Message, MessageQueue, Parser, Value};
//!
//! // Encode a message
//! let bytes = Message::new("/VMC/Ext/OK", vec![Value::Int(1)]).encode();
//!
//! // Decode it into a queue
//! let parser = Parser::new(MessageQueue::new());
//! parser.parse_packet(&bytes)?;
//!
//! let message = parser.queue().dequeue().expect("one message");
//! assert_eq!(message.address(), "/VMC/Ext/OK");
//! assert_eq!(message.value(0), Some(&Value::Int(1)));
//! # Ok::<(), oscwire::Error>(())
//! ```
//!
//! # Features
//!
//! - **Bundle decoding** - nested bundles, time tags inherited by contents
//! - **Tolerant framing** - size mismatches are logged and counted, not fatal
//! - **Bounds-checked reads** - truncated packets fail cleanly
//! - **UDP endpoints** - a threaded [`Server`] and a [`Client`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod protocol;
pub mod transport;

pub use protocol::{
    BUNDLE_TAG, Bundle, DiagnosticsSnapshot, Error, Message, MessageQueue, Packet, Parser,
    ParserConfig, Result, TagPolicy, Timestamp, Value,
};
pub use transport::{Client, Server, ServerConfig, TransportError};

/// OSC specification version implemented
pub const OSC_VERSION: &str = "1.0";

/// Default OSC listen port
pub const DEFAULT_PORT: u16 = 3333;
