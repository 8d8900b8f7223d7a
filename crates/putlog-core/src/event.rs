//! Put events
//!
//! A [`PutEvent`] is assembled from a [`PutTarget`] plus the values read
//! before and after the write. Assembly applies the logging limits (bounded
//! strings, array byte budget, bounded user and host names) and resolves
//! unreadable values to the `"Not Accessible"` placeholder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValueError, ValueSide};
use crate::identity::FieldId;
use crate::value::{FieldType, FieldValue, Scalar, ScalarKind};

/// Storage size of a user id, including the terminator
pub const MAX_USERID_SIZE: usize = 32;

/// Storage size of a host id, including the terminator
pub const MAX_HOSTID_SIZE: usize = 32;

/// The field being written and the client writing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutTarget {
    pub id: FieldId,
    /// Record name plus field, e.g. `TEMP:SETPOINT.VAL`
    pub name: String,
    pub field_type: FieldType,
    pub user: String,
    pub host: String,
}

impl PutTarget {
    pub fn new(id: FieldId, name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id,
            name: name.into(),
            field_type,
            user: String::new(),
            host: String::new(),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }
}

/// One completed put
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutEvent {
    pub id: FieldId,
    pub name: String,
    pub user: String,
    pub host: String,
    pub field_type: FieldType,
    pub old_value: FieldValue,
    pub new_value: FieldValue,
    pub timestamp: DateTime<Utc>,
}

impl PutEvent {
    /// Assemble an event from its target and the two values.
    ///
    /// `None` means the value could not be read. The placeholder is a string,
    /// so in that case the event is typed as a string field and the readable
    /// side is converted to its plain text.
    pub fn assemble(
        target: &PutTarget,
        old_value: Option<FieldValue>,
        new_value: Option<FieldValue>,
        timestamp: DateTime<Utc>,
        max_array_bytes: usize,
    ) -> Self {
        let (field_type, old_value, new_value) = match (old_value, new_value) {
            (Some(old), Some(new)) => (target.field_type, old, new),
            (old, new) => (
                FieldType::Scalar(ScalarKind::String),
                as_text_or_placeholder(old),
                as_text_or_placeholder(new),
            ),
        };

        Self {
            id: target.id,
            name: target.name.clone(),
            user: bounded(&target.user, MAX_USERID_SIZE - 1),
            host: bounded(&target.host, MAX_HOSTID_SIZE - 1),
            field_type,
            old_value: old_value.capped(max_array_bytes),
            new_value: new_value.capped(max_array_bytes),
            timestamp,
        }
    }

    /// Check that both values match the declared field type
    pub fn validate(&self) -> Result<(), ValueError> {
        check_side(ValueSide::Old, self.field_type, &self.old_value)?;
        check_side(ValueSide::New, self.field_type, &self.new_value)
    }

    /// Whether this put left the value unchanged.
    ///
    /// Arrays and long strings must also report the same source size.
    pub fn is_unchanged(&self) -> bool {
        self.old_value.same_value(&self.new_value)
            && (!self.field_type.is_array_like()
                || self.old_value.size() == self.new_value.size())
    }

    /// Whether the new value is a single numeric element
    pub fn is_numeric_scalar(&self) -> bool {
        self.field_type.is_numeric_scalar()
    }
}

fn check_side(side: ValueSide, expected: FieldType, value: &FieldValue) -> Result<(), ValueError> {
    let actual = value.field_type();
    if actual != expected {
        return Err(ValueError::TypeMismatch {
            side,
            expected,
            actual,
        });
    }
    if let FieldValue::Array(array) = value {
        if array.logged_len() > array.size() {
            return Err(ValueError::InconsistentArraySize {
                logged: array.logged_len(),
                size: array.size(),
            });
        }
    }
    Ok(())
}

fn as_text_or_placeholder(value: Option<FieldValue>) -> FieldValue {
    match value {
        Some(FieldValue::Scalar(Scalar::String(s))) => FieldValue::Scalar(Scalar::string(s)),
        Some(other) => FieldValue::Scalar(Scalar::string(other.to_plain_string())),
        None => FieldValue::not_accessible(),
    }
}

fn bounded(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
