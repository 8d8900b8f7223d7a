//! Error types shared by the putlog crates

use thiserror::Error;

use crate::value::FieldType;

/// Errors related to field values and put events
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("{side} value has type {actual}, field is declared as {expected}")]
    TypeMismatch {
        side: ValueSide,
        expected: FieldType,
        actual: FieldType,
    },

    #[error("array holds {logged} elements but reports a source size of {size}")]
    InconsistentArraySize { logged: usize, size: usize },
}

/// Which half of a put an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSide {
    Old,
    New,
}

impl std::fmt::Display for ValueSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSide::Old => write!(f, "old"),
            ValueSide::New => write!(f, "new"),
        }
    }
}

/// Errors related to configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid log mode code: {0} (must be -1, 0, 1 or 2)")]
    InvalidModeCode(i32),

    #[error("unknown log mode: {0}")]
    UnknownMode(String),

    #[error("metadata key must not be empty")]
    EmptyMetadataKey,
}
