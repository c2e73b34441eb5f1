//! OSC message and bundle model

use std::fmt;

use bytes::{BufMut, BytesMut};

use super::writer::{write_blob, write_f32, write_i32, write_string, write_timetag};
use super::{BUNDLE_TAG, Timestamp, Value, tag};

/// A decoded (or to-be-sent) OSC message
///
/// Immutable once built. Messages decoded outside a bundle carry
/// [`Timestamp::IMMEDIATE`]; messages from a bundle carry the tag of the
/// nearest enclosing bundle.
///
/// Arguments are stored one slot per type tag. A tag the decoder did not
/// understand leaves its slot `None`, so slot `k` always belongs to tag `k`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    address: String,
    timestamp: Timestamp,
    values: Vec<Option<Value>>,
}

impl Message {
    /// Create a message to be delivered immediately
    pub fn new(address: impl Into<String>, values: impl Into<Vec<Value>>) -> Self {
        Self::with_timestamp(address, Timestamp::IMMEDIATE, values)
    }

    /// Create a message with an explicit time tag
    pub fn with_timestamp(
        address: impl Into<String>,
        timestamp: Timestamp,
        values: impl Into<Vec<Value>>,
    ) -> Self {
        Self::from_slots(
            address.into(),
            timestamp,
            values.into().into_iter().map(Some).collect(),
        )
    }

    pub(crate) fn from_slots(
        address: String,
        timestamp: Timestamp,
        values: Vec<Option<Value>>,
    ) -> Self {
        Self {
            address,
            timestamp,
            values,
        }
    }

    /// Address string (e.g. `/VMC/Ext/OK`)
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Effective time tag
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Argument slots in type-tag order, `None` for unsupported tags
    #[must_use]
    pub fn values(&self) -> &[Option<Value>] {
        &self.values
    }

    /// Argument for type tag `index`, if present and decoded
    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Decoded arguments only, skipping unset slots
    pub fn present_values(&self) -> impl Iterator<Item = &Value> {
        self.values.iter().flatten()
    }

    /// Consume the message into its parts
    #[must_use]
    pub fn into_parts(self) -> (String, Timestamp, Vec<Option<Value>>) {
        (self.address, self.timestamp, self.values)
    }

    /// Type-tag string for the present arguments, including the leading comma
    ///
    /// Unset slots have no tag to write and are left out.
    #[must_use]
    pub fn type_tags(&self) -> String {
        std::iter::once(tag::PREFIX)
            .chain(self.present_values().map(Value::type_tag))
            .collect()
    }

    /// Encode as a bare OSC message
    ///
    /// The timestamp is not part of a bare message on the wire; wrap the
    /// message in a [`Bundle`] to send it.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = BytesMut::new();
        self.encode_into(&mut out);
        out.to_vec()
    }

    pub(crate) fn encode_into(&self, out: &mut BytesMut) {
        write_string(out, &self.address);
        write_string(out, &self.type_tags());
        for value in self.present_values() {
            match value {
                Value::Int(v) => write_i32(out, *v),
                Value::Float(v) => write_f32(out, *v),
                Value::String(v) => write_string(out, v),
                Value::Blob(v) => write_blob(out, v),
            }
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.address, self.timestamp)?;
        for slot in &self.values {
            match slot {
                Some(value) => write!(f, " {value}")?,
                None => write!(f, " _")?,
            }
        }
        Ok(())
    }
}

/// A time-tagged group of packets
#[derive(Debug, Clone, PartialEq)]
pub struct Bundle {
    /// Time tag applied to every message inside
    pub timestamp: Timestamp,
    /// Nested messages and bundles, in wire order
    pub elements: Vec<Packet>,
}

impl Bundle {
    /// Create an empty bundle
    #[must_use]
    pub const fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            elements: Vec::new(),
        }
    }

    /// Append an element, builder style
    #[must_use]
    pub fn with(mut self, element: impl Into<Packet>) -> Self {
        self.elements.push(element.into());
        self
    }

    /// Append an element
    pub fn push(&mut self, element: impl Into<Packet>) {
        self.elements.push(element.into());
    }

    /// Encode to bytes
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = BytesMut::new();
        self.encode_into(&mut out);
        out.to_vec()
    }

    fn encode_into(&self, out: &mut BytesMut) {
        write_string(out, BUNDLE_TAG);
        write_timetag(out, self.timestamp.ticks());
        for element in &self.elements {
            // Reserve the size prefix and back-fill it once the element is written.
            let size_at = out.len();
            out.put_i32(0);
            element.encode_into(out);
            let size = i32::try_from(out.len() - size_at - 4)
                .expect("bundle element exceeds OSC size prefix");
            out[size_at..size_at + 4].copy_from_slice(&size.to_be_bytes());
        }
    }
}

/// Anything that can sit at the top level of a datagram
#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// Single message
    Message(Message),
    /// Bundle of packets
    Bundle(Bundle),
}

impl Packet {
    /// Encode to bytes
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = BytesMut::new();
        self.encode_into(&mut out);
        out.to_vec()
    }

    fn encode_into(&self, out: &mut BytesMut) {
        match self {
            Self::Message(message) => message.encode_into(out),
            Self::Bundle(bundle) => bundle.encode_into(out),
        }
    }
}

impl From<Message> for Packet {
    fn from(message: Message) -> Self {
        Self::Message(message)
    }
}

impl From<Bundle> for Packet {
    fn from(bundle: Bundle) -> Self {
        Self::Bundle(bundle)
    }
}
