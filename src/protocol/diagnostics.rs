use std::sync::atomic::{AtomicU64, Ordering};

/// Decode counters owned by a single parser.
///
/// Consistency violations are recovered locally by the parser; these
/// counters are how callers observe them.
#[derive(Debug, Default)]
pub struct Diagnostics {
    messages_decoded: AtomicU64,
    bundles_decoded: AtomicU64,
    size_mismatches: AtomicU64,
    invalid_element_sizes: AtomicU64,
    unknown_tags: AtomicU64,
    messages_rejected: AtomicU64,
    decode_failures: AtomicU64,
}

impl Diagnostics {
    #[inline]
    pub(crate) fn record_message(&self) {
        self.messages_decoded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_bundle(&self) {
        self.bundles_decoded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_size_mismatch(&self) {
        self.size_mismatches.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_invalid_element_size(&self) {
        self.invalid_element_sizes.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_unknown_tag(&self) {
        self.unknown_tags.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_rejected_message(&self) {
        self.messages_rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_decode_failure(&self) {
        self.decode_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy the current counter values.
    #[must_use]
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            messages_decoded: self.messages_decoded.load(Ordering::Relaxed),
            bundles_decoded: self.bundles_decoded.load(Ordering::Relaxed),
            size_mismatches: self.size_mismatches.load(Ordering::Relaxed),
            invalid_element_sizes: self.invalid_element_sizes.load(Ordering::Relaxed),
            unknown_tags: self.unknown_tags.load(Ordering::Relaxed),
            messages_rejected: self.messages_rejected.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`Diagnostics`].
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsSnapshot {
    /// Messages decoded and enqueued
    pub messages_decoded: u64,
    /// Bundle headers decoded
    pub bundles_decoded: u64,
    /// Elements whose consumed size differed from their declared end
    pub size_mismatches: u64,
    /// Bundle elements skipped because the size prefix was not a multiple of 4
    pub invalid_element_sizes: u64,
    /// Type tags skipped without producing a value
    pub unknown_tags: u64,
    /// Messages dropped for carrying an unsupported tag in strict mode
    pub messages_rejected: u64,
    /// Parse calls that failed with an error
    pub decode_failures: u64,
}

impl DiagnosticsSnapshot {
    /// Total of all consistency violations (mismatched and invalid sizes).
    #[must_use]
    pub const fn consistency_violations(&self) -> u64 {
        self.size_mismatches + self.invalid_element_sizes
    }
}
