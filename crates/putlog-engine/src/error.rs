//! Engine-specific error types

use putlog_core::{ConfigError, ValueError};
use thiserror::Error;

/// Errors that can occur in the put logger
#[derive(Debug, Error)]
pub enum PutLogError {
    /// Queue errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// Sink errors
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Formatting errors
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Invalid event data
    #[error("Value error: {0}")]
    Value(#[from] ValueError),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Initialization found nowhere to deliver messages
    #[error("No log endpoint or broadcast variable configured")]
    NoEndpoints,

    /// The consumer thread is already running
    #[error("Put logger is already running")]
    AlreadyRunning,

    /// The consumer thread could not be started
    #[error("Failed to spawn logger thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// Event queue errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// Queue at capacity, the event was dropped
    #[error("Event queue full (capacity: {capacity})")]
    Full { capacity: usize },

    /// The consumer side is gone
    #[error("Event queue disconnected")]
    Disconnected,
}

/// Delivery errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SinkError {
    /// Address could not be parsed
    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),

    /// Connecting an endpoint failed
    #[error("Failed to connect to {address}: {reason}")]
    ConnectFailed { address: String, reason: String },

    /// Sending to an endpoint failed
    #[error("Failed to send to {target}: {reason}")]
    SendFailed { target: String, reason: String },

    /// Writing the broadcast variable failed
    #[error("Failed to write {target}: {reason}")]
    WriteFailed { target: String, reason: String },
}

/// Message formatting errors
#[derive(Debug, Error)]
pub enum FormatError {
    /// The time pattern contains an invalid conversion
    #[error("Invalid time format: {0:?}")]
    InvalidTimeFormat(String),

    /// JSON serialization failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for put logger operations
pub type PutLogResult<T> = Result<T, PutLogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversions() {
        let err: PutLogError = QueueError::Full { capacity: 1000 }.into();
        assert_eq!(err.to_string(), "Queue error: Event queue full (capacity: 1000)");

        let err: PutLogError = ConfigError::InvalidModeCode(9).into();
        assert!(matches!(err, PutLogError::Config(ConfigError::InvalidModeCode(9))));

        let err: PutLogError = SinkError::InvalidAddress(String::new()).into();
        assert_eq!(err.to_string(), "Sink error: Invalid address: \"\"");
    }
}
