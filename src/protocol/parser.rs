//! OSC packet decoder
//!
//! Turns a received buffer into [`Message`]s and publishes them on a
//! [`MessageQueue`]. Bundles are unpacked recursively; every message inside a
//! bundle inherits the time tag of its nearest enclosing bundle.
//!
//! Two kinds of trouble are distinguished:
//!
//! - Reading past the end of the buffer aborts the whole [`Parser::parse`]
//!   call with [`Error::OutOfBounds`]. Messages already enqueued stay queued.
//! - Size bookkeeping mismatches (an element that does not consume exactly
//!   its declared range, or a bundle element size that is not a multiple of
//!   4) are logged, counted in [`Diagnostics`], and recovered from by jumping
//!   to the declared end, so well-formed siblings are still delivered.

use std::sync::Arc;

use tracing::{instrument, trace, warn};

use super::reader::{read_blob, read_f32, read_i32, read_string, read_timetag};
use super::{
    BUNDLE_TAG, Diagnostics, DiagnosticsSnapshot, Error, MAX_BUNDLE_DEPTH, Message, MessageQueue,
    Result, Timestamp, Value, tag,
};

/// What to do with a type tag outside `i`, `f`, `s`, `b`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagPolicy {
    /// Leave the argument slot unset and consume no bytes for the tag
    #[default]
    Skip,
    /// Drop the whole message and resume at its declared end
    Strict,
}

/// Parser configuration options.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserConfig {
    /// Handling of unsupported type tags.
    pub tag_policy: TagPolicy,
}

/// Decoder bound to one receiving endpoint's queue.
#[derive(Debug)]
pub struct Parser {
    config: ParserConfig,
    queue: MessageQueue,
    diagnostics: Arc<Diagnostics>,
}

impl Parser {
    /// Create a parser publishing into `queue`.
    #[must_use]
    pub fn new(queue: MessageQueue) -> Self {
        Self::with_config(queue, ParserConfig::default())
    }

    /// Create a parser with explicit configuration.
    #[must_use]
    pub fn with_config(queue: MessageQueue, config: ParserConfig) -> Self {
        Self {
            config,
            queue,
            diagnostics: Arc::new(Diagnostics::default()),
        }
    }

    /// Queue this parser publishes into.
    #[must_use]
    pub fn queue(&self) -> &MessageQueue {
        &self.queue
    }

    /// Shared handle to the decode counters.
    #[must_use]
    pub fn diagnostics(&self) -> Arc<Diagnostics> {
        Arc::clone(&self.diagnostics)
    }

    /// Current decode counters.
    #[must_use]
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        self.diagnostics.snapshot()
    }

    /// Decode a whole datagram.
    pub fn parse_packet(&self, buf: &[u8]) -> Result<()> {
        let mut pos = 0;
        self.parse(buf, &mut pos, buf.len(), Timestamp::IMMEDIATE)
    }

    /// Decode the element spanning `[*pos, end)` of `buf`.
    ///
    /// `timestamp` is applied to a bare message; bundles substitute their own
    /// time tag for everything they contain. On return `*pos == end` unless an
    /// error was returned.
    #[instrument(level = "trace", skip(self, buf), fields(len = buf.len()))]
    pub fn parse(
        &self,
        buf: &[u8],
        pos: &mut usize,
        end: usize,
        timestamp: Timestamp,
    ) -> Result<()> {
        let result = self.parse_element(buf, pos, end, timestamp, 0);
        if let Err(err) = &result {
            warn!(error = %err, "failed to decode OSC packet");
            self.diagnostics.record_decode_failure();
        }
        result
    }

    fn parse_element(
        &self,
        buf: &[u8],
        pos: &mut usize,
        end: usize,
        timestamp: Timestamp,
        depth: usize,
    ) -> Result<()> {
        let first = read_string(buf, pos)?;

        if first == BUNDLE_TAG {
            if depth >= MAX_BUNDLE_DEPTH {
                return Err(Error::NestingTooDeep {
                    max: MAX_BUNDLE_DEPTH,
                });
            }
            self.parse_bundle(buf, pos, end, depth + 1)?;
        } else {
            match self.parse_arguments(buf, pos, &first) {
                Ok(values) => {
                    trace!(address = %first, args = values.len(), "decoded message");
                    self.diagnostics.record_message();
                    self.queue
                        .enqueue(Message::from_slots(first, timestamp, values));
                }
                Err(err @ Error::UnknownTypeTag { .. }) => {
                    warn!(error = %err, "dropping message");
                    self.diagnostics.record_rejected_message();
                    *pos = end;
                }
                Err(err) => return Err(err),
            }
        }

        if *pos != end {
            warn!(
                consumed_to = *pos,
                declared_end = end,
                "parsed data size is inconsistent with the declared size"
            );
            self.diagnostics.record_size_mismatch();
            *pos = end;
        }
        Ok(())
    }

    fn parse_bundle(&self, buf: &[u8], pos: &mut usize, end: usize, depth: usize) -> Result<()> {
        let time = Timestamp::new(read_timetag(buf, pos)?);
        self.diagnostics.record_bundle();
        trace!(%time, "decoding bundle");

        while *pos < end {
            let size = read_i32(buf, pos)?;
            match usize::try_from(size) {
                Ok(len) if len % 4 == 0 => {
                    let element_end = pos.saturating_add(len);
                    self.parse_element(buf, pos, element_end, time, depth)?;
                }
                Ok(len) => {
                    warn!(size, "bundle element size is not a multiple of 4; skipping");
                    self.diagnostics.record_invalid_element_size();
                    *pos = pos.saturating_add(len);
                }
                Err(_) => {
                    // Skipping backwards would never terminate.
                    warn!(size, "negative bundle element size; abandoning bundle");
                    self.diagnostics.record_invalid_element_size();
                    *pos = end;
                }
            }
        }
        Ok(())
    }

    fn parse_arguments(
        &self,
        buf: &[u8],
        pos: &mut usize,
        address: &str,
    ) -> Result<Vec<Option<Value>>> {
        let tags = read_string(buf, pos)?;
        // First character is the ',' prefix.
        let mut chars = tags.chars();
        chars.next();

        let mut values = Vec::with_capacity(tags.len().saturating_sub(1));
        for c in chars {
            let value = match c {
                tag::INT => Value::Int(read_i32(buf, pos)?),
                tag::FLOAT => Value::Float(read_f32(buf, pos)?),
                tag::STRING => Value::String(read_string(buf, pos)?),
                tag::BLOB => Value::Blob(read_blob(buf, pos)?),
                other => match self.config.tag_policy {
                    TagPolicy::Skip => {
                        trace!(tag = %other, address, "skipping unsupported type tag");
                        self.diagnostics.record_unknown_tag();
                        values.push(None);
                        continue;
                    }
                    TagPolicy::Strict => {
                        return Err(Error::UnknownTypeTag {
                            tag: other,
                            address: address.to_owned(),
                        });
                    }
                },
            };
            values.push(Some(value));
        }
        Ok(values)
    }
}
