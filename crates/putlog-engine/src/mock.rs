//! In-memory sinks for testing
//!
//! Provides endpoints, a connector and a broadcast variable that record what
//! they receive, so delivery can be checked without log servers.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use putlog_engine::{MockConnector, PutLogger, LoggerConfig};
//!
//! let connector = Arc::new(MockConnector::new());
//! let logger = PutLogger::new(LoggerConfig::testing(), connector.clone())?;
//! logger.initialize("loghost", None)?;
//!
//! // ... drive puts through logger.trap() ...
//! let sent = connector.endpoint("loghost:7011").unwrap().messages();
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::error::SinkError;
use crate::sink::{BroadcastVariable, EndpointConnector, LogEndpoint};

/// Endpoint that stores every message it is sent
#[derive(Debug)]
pub struct MockEndpoint {
    address: String,
    messages: Mutex<Vec<String>>,
    failing: AtomicBool,
    flushes: AtomicUsize,
}

impl MockEndpoint {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            messages: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            flushes: AtomicUsize::new(0),
        }
    }

    /// Make subsequent sends fail
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages received so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    /// Remove and return the messages received so far
    pub fn take_messages(&self) -> Vec<String> {
        std::mem::take(&mut *self.messages.lock())
    }

    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl LogEndpoint for MockEndpoint {
    fn address(&self) -> &str {
        &self.address
    }

    fn send(&self, text: &str) -> Result<(), SinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::SendFailed {
                target: self.address.clone(),
                reason: "mock endpoint set to fail".to_string(),
            });
        }
        self.messages.lock().push(text.to_string());
        Ok(())
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self, level: u32) -> String {
        if level > 0 {
            format!("{} (mock, {} messages)", self.address, self.messages.lock().len())
        } else {
            self.address.clone()
        }
    }
}

/// Connector that creates [`MockEndpoint`]s and keeps hold of them
#[derive(Debug, Default)]
pub struct MockConnector {
    endpoints: Mutex<HashMap<String, Arc<MockEndpoint>>>,
    refused: Mutex<HashSet<String>>,
    attempts: AtomicUsize,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make connections to `address` fail
    pub fn refuse(&self, address: impl Into<String>) {
        self.refused.lock().insert(address.into());
    }

    /// The endpoint created for a normalized address
    pub fn endpoint(&self, address: &str) -> Option<Arc<MockEndpoint>> {
        self.endpoints.lock().get(address).cloned()
    }

    /// Number of connect calls, successful or not
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl EndpointConnector for MockConnector {
    fn connect(&self, address: &str) -> Result<Arc<dyn LogEndpoint>, SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.refused.lock().contains(address) {
            return Err(SinkError::ConnectFailed {
                address: address.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        let endpoint = Arc::new(MockEndpoint::new(address));
        self.endpoints
            .lock()
            .insert(address.to_string(), Arc::clone(&endpoint));
        Ok(endpoint)
    }
}

/// Broadcast variable that stores every value written
#[derive(Debug)]
pub struct MockBroadcast {
    name: String,
    values: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl MockBroadcast {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn values(&self) -> Vec<String> {
        self.values.lock().clone()
    }

    /// The most recent value written
    pub fn last(&self) -> Option<String> {
        self.values.lock().last().cloned()
    }
}

impl BroadcastVariable for MockBroadcast {
    fn name(&self) -> &str {
        &self.name
    }

    fn write(&self, text: &str) -> Result<(), SinkError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SinkError::WriteFailed {
                target: self.name.clone(),
                reason: "mock variable set to fail".to_string(),
            });
        }
        self.values.lock().push(text.to_string());
        Ok(())
    }
}
