//! # Putlog Core
//!
//! Core types and errors for the putlog audit logger.
//!
//! This crate holds everything the producer side (the write trap) and the
//! consumer side (the coalescing engine) have to agree on, without any of the
//! threading or delivery machinery.
//!
//! ## Key Types
//!
//! - [`FieldValue`]: Tagged value of a control-system field (scalar, long string or array)
//! - [`FieldType`]: Declared type of a field, used to validate events
//! - [`PutEvent`]: One completed put, carrying old and new value
//! - [`FieldId`]: Identity used to decide whether two puts target the same field
//! - [`LogMode`]: Suppression and filtering policy
//! - [`Metadata`]: Ordered user key/value pairs attached to structured messages
//! - [`Clock`]: Time abstraction for testability

pub mod clock;
pub mod error;
pub mod event;
pub mod identity;
pub mod metadata;
pub mod mode;
pub mod numfmt;
pub mod value;

// Re-export main types
pub use clock::*;
pub use error::*;
pub use event::*;
pub use identity::*;
pub use metadata::*;
pub use mode::*;
pub use value::*;
