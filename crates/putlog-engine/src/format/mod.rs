//! Message formatting
//!
//! Turns the engine's open record into the text delivered to the sinks,
//! either as one line of plain text or as a JSON object.

mod json;
mod plain;

pub use json::JsonFormatter;
pub use plain::{validate_time_format, PlainFormatter};

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use parking_lot::RwLock;
use putlog_core::{FieldValue, Metadata, PutEvent, Scalar};

use crate::config::{LoggerConfig, OutputFormat, TimestampZone};
use crate::error::FormatError;

/// Everything a formatter needs for one message
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    /// The latest put, providing the new value, the actor and the time
    pub event: &'a PutEvent,
    /// The value before the first put of the record
    pub old_value: &'a FieldValue,
    /// Present for merged numeric scalar puts
    pub burst: Option<BurstSummary<'a>>,
}

/// Extrema and size of a merged burst
#[derive(Debug, Clone, Copy)]
pub struct BurstSummary<'a> {
    pub min: &'a Scalar,
    pub max: &'a Scalar,
    /// Number of puts merged into the first one
    pub count: u32,
}

/// A formatted message, without trailing newline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMessage {
    pub text: String,
    /// Set when the text was cut at the line limit
    pub truncated: bool,
}

/// Write `timestamp` in `zone` with a strftime pattern
pub(crate) fn write_time<W: fmt::Write>(
    out: &mut W,
    timestamp: &DateTime<Utc>,
    zone: TimestampZone,
    pattern: &str,
) -> fmt::Result {
    match zone {
        TimestampZone::Local => write!(out, "{}", timestamp.with_timezone(&Local).format(pattern)),
        TimestampZone::Utc => write!(out, "{}", timestamp.format(pattern)),
    }
}

/// Formatter selected by the logger configuration
pub struct MessageFormatter {
    output: OutputFormat,
    plain: PlainFormatter,
    json: JsonFormatter,
}

impl MessageFormatter {
    pub fn new(config: &LoggerConfig, metadata: Arc<RwLock<Metadata>>) -> Result<Self, FormatError> {
        Ok(Self {
            output: config.format,
            plain: PlainFormatter::new(&config.time_format, config.line_limit, config.timestamp_zone)?,
            json: JsonFormatter::new(metadata, config.timestamp_zone),
        })
    }

    pub fn output(&self) -> OutputFormat {
        self.output
    }

    pub fn format(&self, record: &LogRecord<'_>) -> Result<FormattedMessage, FormatError> {
        match self.output {
            OutputFormat::Plain => self.plain.format(record),
            OutputFormat::Json => Ok(FormattedMessage {
                text: self.json.format(record)?,
                truncated: false,
            }),
        }
    }

    /// Change the plain text time pattern
    pub fn set_time_format(&self, pattern: &str) -> Result<(), FormatError> {
        self.plain.set_time_format(pattern)
    }

    pub fn time_format(&self) -> String {
        self.plain.time_format()
    }
}
