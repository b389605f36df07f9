//! Observability and Metrics
//!
//! Counters for frame and message traffic through the codec.
//!
//! Uses atomic counters for thread-safe metrics collection, so one collector can be shared
//! across every connection's codec and dispatcher.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Metrics collector for codec operations
#[derive(Debug)]
pub struct Metrics {
    /// Frames cut from inbound streams
    pub frames_decoded: AtomicU64,
    /// Frames written to outbound streams
    pub frames_encoded: AtomicU64,
    /// Total inbound bytes (headers included)
    pub bytes_in: AtomicU64,
    /// Total outbound bytes (headers included)
    pub bytes_out: AtomicU64,
    /// Messages parsed successfully
    pub messages_parsed: AtomicU64,
    /// Messages built successfully
    pub messages_built: AtomicU64,
    /// Parse failures of any kind
    pub parse_errors: AtomicU64,
    /// Opcodes with no registered message type
    pub unsupported_opcodes: AtomicU64,
    start_time: Instant,
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub frames_decoded: u64,
    pub frames_encoded: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub messages_parsed: u64,
    pub messages_built: u64,
    pub parse_errors: u64,
    pub unsupported_opcodes: u64,
    pub uptime_secs: u64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self {
            frames_decoded: AtomicU64::new(0),
            frames_encoded: AtomicU64::new(0),
            bytes_in: AtomicU64::new(0),
            bytes_out: AtomicU64::new(0),
            messages_parsed: AtomicU64::new(0),
            messages_built: AtomicU64::new(0),
            parse_errors: AtomicU64::new(0),
            unsupported_opcodes: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record an inbound frame of `byte_count` bytes
    pub fn frame_decoded(&self, byte_count: u64) {
        self.frames_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_in.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record an outbound frame of `byte_count` bytes
    pub fn frame_encoded(&self, byte_count: u64) {
        self.frames_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_out.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn message_parsed(&self) {
        self.messages_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn message_built(&self) {
        self.messages_built.fetch_add(1, Ordering::Relaxed);
    }

    pub fn parse_error(&self) {
        self.parse_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn unsupported_opcode(&self) {
        self.unsupported_opcodes.fetch_add(1, Ordering::Relaxed);
    }

    /// Copy every counter at once
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            frames_encoded: self.frames_encoded.load(Ordering::Relaxed),
            bytes_in: self.bytes_in.load(Ordering::Relaxed),
            bytes_out: self.bytes_out.load(Ordering::Relaxed),
            messages_parsed: self.messages_parsed.load(Ordering::Relaxed),
            messages_built: self.messages_built.load(Ordering::Relaxed),
            parse_errors: self.parse_errors.load(Ordering::Relaxed),
            unsupported_opcodes: self.unsupported_opcodes.load(Ordering::Relaxed),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }

    /// Emit the current counters as one structured log line
    pub fn log_summary(&self) {
        let s = self.snapshot();
        info!(
            frames_decoded = s.frames_decoded,
            frames_encoded = s.frames_encoded,
            bytes_in = s.bytes_in,
            bytes_out = s.bytes_out,
            messages_parsed = s.messages_parsed,
            messages_built = s.messages_built,
            parse_errors = s.parse_errors,
            unsupported_opcodes = s.unsupported_opcodes,
            uptime_secs = s.uptime_secs,
            "Codec metrics"
        );
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.frames_decoded.store(0, Ordering::Relaxed);
        self.frames_encoded.store(0, Ordering::Relaxed);
        self.bytes_in.store(0, Ordering::Relaxed);
        self.bytes_out.store(0, Ordering::Relaxed);
        self.messages_parsed.store(0, Ordering::Relaxed);
        self.messages_built.store(0, Ordering::Relaxed);
        self.parse_errors.store(0, Ordering::Relaxed);
        self.unsupported_opcodes.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.frame_decoded(20);
        metrics.frame_decoded(30);
        metrics.message_parsed();
        metrics.parse_error();
        metrics.unsupported_opcode();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_decoded, 2);
        assert_eq!(snapshot.bytes_in, 50);
        assert_eq!(snapshot.messages_parsed, 1);
        assert_eq!(snapshot.parse_errors, 1);
        assert_eq!(snapshot.unsupported_opcodes, 1);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        metrics.frame_encoded(14);
        metrics.message_built();
        metrics.reset();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.frames_encoded, 0);
        assert_eq!(snapshot.bytes_out, 0);
        assert_eq!(snapshot.messages_built, 0);
    }
}
