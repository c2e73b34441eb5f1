//! Hand-off queue between decode contexts and the polling consumer.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use super::Message;

/// Shared FIFO of decoded messages.
///
/// Cloning yields another handle to the same queue, so the receive path and
/// the consumer each hold one.
#[derive(Clone, Debug, Default)]
pub struct MessageQueue {
    inner: Arc<Mutex<VecDeque<Message>>>,
}

impl MessageQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message at the tail.
    pub fn enqueue(&self, message: Message) {
        self.inner.lock().push_back(message);
    }

    /// Pop the head message, or `None` when empty. Never blocks on data.
    #[must_use]
    pub fn dequeue(&self) -> Option<Message> {
        self.inner.lock().pop_front()
    }

    /// Take every queued message, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<Message> {
        self.inner.lock().drain(..).collect()
    }

    /// Number of queued messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Check whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
