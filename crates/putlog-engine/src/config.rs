//! Put logger configuration

use std::time::Duration;

use putlog_core::{LogMode, DEFAULT_MAX_ARRAY_BYTES};
use serde::{Deserialize, Serialize};

/// Events buffered between the producers and the consumer thread
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Idle time after which an open record is emitted
pub const DEFAULT_BURST_TIMEOUT_SECS: f64 = 5.0;

/// Longest plain text message, excluding the newline
pub const DEFAULT_LINE_LIMIT: usize = 118;

/// Default strftime pattern for plain text messages
pub const DEFAULT_TIME_FORMAT: &str = "%d-%b-%y %H:%M:%S";

/// Name of the consumer thread
pub const DEFAULT_THREAD_NAME: &str = "caPutLog";

/// Port assumed for endpoint addresses that do not name one
pub const DEFAULT_PORT: u16 = 7011;

/// Message format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// One line of text per message
    #[default]
    Plain,
    /// One JSON object per message
    Json,
}

/// Time zone message timestamps are rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampZone {
    /// The host's local time
    #[default]
    Local,
    Utc,
}

/// Configuration for a put logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Initial logging mode
    pub mode: LogMode,
    /// Initial burst timeout in seconds
    pub burst_timeout_secs: f64,
    /// Capacity of the event queue
    pub queue_capacity: usize,
    /// Byte budget for one logged array or long string value
    pub max_array_bytes: usize,
    /// Message format
    pub format: OutputFormat,
    /// strftime pattern for plain text messages
    pub time_format: String,
    /// Time zone of plain text and JSON timestamps
    pub timestamp_zone: TimestampZone,
    /// Longest plain text message
    pub line_limit: usize,
    /// Name of the consumer thread
    pub thread_name: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            mode: LogMode::default(),
            burst_timeout_secs: DEFAULT_BURST_TIMEOUT_SECS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            max_array_bytes: DEFAULT_MAX_ARRAY_BYTES,
            format: OutputFormat::default(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            timestamp_zone: TimestampZone::default(),
            line_limit: DEFAULT_LINE_LIMIT,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Plain text messages, the classic put log
    pub fn plain() -> Self {
        Self::default()
    }

    /// JSON messages
    pub fn json() -> Self {
        Self {
            format: OutputFormat::Json,
            ..Default::default()
        }
    }

    /// Short burst window and small queue for tests
    pub fn testing() -> Self {
        Self {
            burst_timeout_secs: 0.05,
            queue_capacity: 64,
            ..Default::default()
        }
    }

    pub fn with_mode(mut self, mode: LogMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_burst_timeout(mut self, secs: f64) -> Self {
        self.burst_timeout_secs = secs;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    pub fn with_max_array_bytes(mut self, bytes: usize) -> Self {
        self.max_array_bytes = bytes;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_time_format(mut self, pattern: impl Into<String>) -> Self {
        self.time_format = pattern.into();
        self
    }

    pub fn with_timestamp_zone(mut self, zone: TimestampZone) -> Self {
        self.timestamp_zone = zone;
        self
    }

    pub fn with_line_limit(mut self, limit: usize) -> Self {
        self.line_limit = limit;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }
}

/// Resolve a requested burst timeout.
///
/// Non-positive, non-finite or unrepresentable values fall back to the
/// default.
pub fn effective_burst_timeout(secs: f64) -> Duration {
    if secs.is_finite() && secs > 0.0 {
        if let Ok(timeout) = Duration::try_from_secs_f64(secs) {
            return timeout;
        }
    }
    Duration::from_secs_f64(DEFAULT_BURST_TIMEOUT_SECS)
}
