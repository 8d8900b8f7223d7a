//! # Putlog Engine
//!
//! Put-event coalescing audit logger.
//!
//! Producers report writes to control-system fields through a [`PutTrap`].
//! Completed puts travel over a bounded queue to one consumer thread, where
//! the [`CoalescingEngine`] merges bursts of puts to the same field into a
//! single record and emits it as a plain text line or a JSON object to every
//! registered log endpoint and an optional broadcast variable.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use putlog_core::{FieldId, FieldType, PutTarget, Scalar, ScalarKind};
//! use putlog_engine::{LoggerConfig, MockConnector, PutLogger};
//!
//! let connector = Arc::new(MockConnector::new());
//! let logger = PutLogger::new(LoggerConfig::default(), connector)?;
//! logger.initialize("loghost:7011 backup", None)?;
//!
//! let trap = logger.trap();
//! let target = PutTarget::new(FieldId::from_raw(1), "R:SETPOINT", FieldType::Scalar(ScalarKind::Float64))
//!     .with_user("operator")
//!     .with_host("console1");
//! let pending = trap.on_put_begin(target, Some(Scalar::Float64(1.0).into()));
//! trap.on_put_end(pending, Some(Scalar::Float64(2.5).into()), chrono::Utc::now());
//! ```

pub mod burst;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod logger;
pub mod mock;
pub mod queue;
pub mod sink;
pub mod stats;
pub mod trap;

pub use burst::BurstState;
pub use config::*;
pub use engine::{CoalescingEngine, EngineControl, EngineState};
pub use error::*;
pub use format::{BurstSummary, FormattedMessage, LogRecord, MessageFormatter};
pub use logger::PutLogger;
pub use mock::{MockBroadcast, MockConnector, MockEndpoint};
pub use queue::{event_queue, EventReceiver, EventSender, Received};
pub use sink::{normalize_address, BroadcastVariable, EndpointConnector, LogEndpoint, SinkFanOut};
pub use stats::{PutLogStats, StatsSnapshot};
pub use trap::{PendingPut, PutTrap};
