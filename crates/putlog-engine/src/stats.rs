//! Logger counters
//!
//! Shared between the producers, the consumer thread and the admin surface.
//! All counters are relaxed atomics; a [`StatsSnapshot`] is only loosely
//! consistent across fields.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters
#[derive(Debug, Default)]
pub struct PutLogStats {
    puts: AtomicU64,
    messages: AtomicU64,
    suppressed: AtomicU64,
    overflows: AtomicU64,
    malformed: AtomicU64,
    truncated: AtomicU64,
    format_failures: AtomicU64,
    endpoint_failures: AtomicU64,
    broadcast_failures: AtomicU64,
}

impl PutLogStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// A put reached the queue
    pub fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_message(&self) {
        self.messages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_overflow(&self) {
        self.overflows.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_malformed(&self) {
        self.malformed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_truncated(&self) {
        self.truncated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_format_failure(&self) {
        self.format_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_endpoint_failure(&self) {
        self.endpoint_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broadcast_failure(&self) {
        self.broadcast_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            puts: self.puts.load(Ordering::Relaxed),
            messages: self.messages.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            overflows: self.overflows.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
            format_failures: self.format_failures.load(Ordering::Relaxed),
            endpoint_failures: self.endpoint_failures.load(Ordering::Relaxed),
            broadcast_failures: self.broadcast_failures.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Puts handed to the queue
    pub puts: u64,
    /// Messages delivered to the sinks
    pub messages: u64,
    /// Puts dropped because they did not change the value
    pub suppressed: u64,
    /// Puts dropped because the queue was full
    pub overflows: u64,
    /// Events discarded as malformed
    pub malformed: u64,
    /// Plain text messages cut at the line limit
    pub truncated: u64,
    /// Messages that could not be formatted
    pub format_failures: u64,
    /// Failed endpoint sends
    pub endpoint_failures: u64,
    /// Failed broadcast writes
    pub broadcast_failures: u64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "puts={} messages={} suppressed={} overflows={} malformed={} truncated={} \
             format_failures={} endpoint_failures={} broadcast_failures={}",
            self.puts,
            self.messages,
            self.suppressed,
            self.overflows,
            self.malformed,
            self.truncated,
            self.format_failures,
            self.endpoint_failures,
            self.broadcast_failures
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let stats = PutLogStats::new();
        stats.record_put();
        stats.record_put();
        stats.record_message();
        stats.record_overflow();

        let snap = stats.snapshot();
        assert_eq!(snap.puts, 2);
        assert_eq!(snap.messages, 1);
        assert_eq!(snap.overflows, 1);
        assert_eq!(snap.suppressed, 0);
    }

    #[test]
    fn test_snapshot_display() {
        let snap = StatsSnapshot {
            puts: 3,
            ..Default::default()
        };
        assert!(snap.to_string().starts_with("puts=3 messages=0"));
    }
}
