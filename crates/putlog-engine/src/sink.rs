//! Message delivery
//!
//! The transport itself lives outside this crate behind [`LogEndpoint`],
//! [`EndpointConnector`] and [`BroadcastVariable`]. [`SinkFanOut`] owns the
//! registered sinks and hands every message to each of them independently.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::config::DEFAULT_PORT;
use crate::error::SinkError;
use crate::stats::PutLogStats;

/// A connected log server
pub trait LogEndpoint: Send + Sync {
    /// Normalized address the endpoint was connected to
    fn address(&self) -> &str;

    /// Send one message, newline included. Best effort.
    fn send(&self, text: &str) -> Result<(), SinkError>;

    /// Push out anything buffered
    fn flush(&self) -> Result<(), SinkError> {
        Ok(())
    }

    /// Status line for reports
    fn describe(&self, _level: u32) -> String {
        self.address().to_string()
    }
}

/// Opens endpoints by address
pub trait EndpointConnector: Send + Sync {
    fn connect(&self, address: &str) -> Result<Arc<dyn LogEndpoint>, SinkError>;
}

/// A single external variable that mirrors the latest message
pub trait BroadcastVariable: Send + Sync {
    /// Name of the variable for reports
    fn name(&self) -> &str;

    /// Replace the variable's content. Best effort.
    fn write(&self, text: &str) -> Result<(), SinkError>;
}

/// Normalize an endpoint address, adding the default port when none is given
pub fn normalize_address(address: &str) -> Result<String, SinkError> {
    let address = address.trim();
    if address.is_empty() || address.chars().any(char::is_whitespace) {
        return Err(SinkError::InvalidAddress(address.to_string()));
    }

    // Bracketed IPv6 literal
    if let Some(rest) = address.strip_prefix('[') {
        return match rest.split_once(']') {
            Some((host, "")) if !host.is_empty() => Ok(format!("[{}]:{}", host, DEFAULT_PORT)),
            Some((host, port)) if !host.is_empty() => match port.strip_prefix(':') {
                Some(p) if p.parse::<u16>().is_ok() => Ok(address.to_string()),
                _ => Err(SinkError::InvalidAddress(address.to_string())),
            },
            _ => Err(SinkError::InvalidAddress(address.to_string())),
        };
    }

    match address.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && !host.contains(':') => {
            if port.parse::<u16>().is_ok() {
                Ok(address.to_string())
            } else {
                Err(SinkError::InvalidAddress(address.to_string()))
            }
        }
        Some(_) => Err(SinkError::InvalidAddress(address.to_string())),
        None => Ok(format!("{}:{}", address, DEFAULT_PORT)),
    }
}

/// Registered sinks
pub struct SinkFanOut {
    endpoints: RwLock<Arc<Vec<Arc<dyn LogEndpoint>>>>,
    broadcast: RwLock<Option<Arc<dyn BroadcastVariable>>>,
    stats: Arc<PutLogStats>,
}

impl SinkFanOut {
    pub fn new(stats: Arc<PutLogStats>) -> Self {
        Self {
            endpoints: RwLock::new(Arc::new(Vec::new())),
            broadcast: RwLock::new(None),
            stats,
        }
    }

    /// Whether an endpoint with this normalized address is registered
    pub fn contains(&self, address: &str) -> bool {
        self.endpoints.read().iter().any(|e| e.address() == address)
    }

    /// Add an endpoint. Returns `false` when its address is already present.
    pub fn add_endpoint(&self, endpoint: Arc<dyn LogEndpoint>) -> bool {
        let mut endpoints = self.endpoints.write();
        if endpoints.iter().any(|e| e.address() == endpoint.address()) {
            return false;
        }
        let mut updated = Vec::with_capacity(endpoints.len() + 1);
        updated.extend(endpoints.iter().cloned());
        updated.push(endpoint);
        *endpoints = Arc::new(updated);
        true
    }

    pub fn set_broadcast(&self, variable: Option<Arc<dyn BroadcastVariable>>) {
        *self.broadcast.write() = variable;
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.read().len()
    }

    pub fn has_broadcast(&self) -> bool {
        self.broadcast.read().is_some()
    }

    /// Deliver one message to every sink.
    ///
    /// Endpoints receive the text with a trailing newline, the broadcast
    /// variable without. Failures are logged and counted per sink.
    pub fn deliver(&self, message: &str) {
        let endpoints = Arc::clone(&self.endpoints.read());
        let broadcast = self.broadcast.read().clone();

        if !endpoints.is_empty() {
            let line = format!("{}\n", message);
            for endpoint in endpoints.iter() {
                if let Err(e) = endpoint.send(&line) {
                    self.stats.record_endpoint_failure();
                    warn!(endpoint = endpoint.address(), error = %e, "log endpoint send failed");
                }
            }
        }

        if let Some(variable) = broadcast {
            if let Err(e) = variable.write(message) {
                self.stats.record_broadcast_failure();
                warn!(variable = variable.name(), error = %e, "broadcast write failed");
            }
        }
    }

    /// Flush every endpoint
    pub fn flush_all(&self) {
        let endpoints = Arc::clone(&self.endpoints.read());
        for endpoint in endpoints.iter() {
            if let Err(e) = endpoint.flush() {
                warn!(endpoint = endpoint.address(), error = %e, "log endpoint flush failed");
            } else {
                debug!(endpoint = endpoint.address(), "log endpoint flushed");
            }
        }
    }

    /// Report lines for every sink
    pub fn describe(&self, level: u32) -> Vec<String> {
        let endpoints = Arc::clone(&self.endpoints.read());
        let mut lines: Vec<String> = endpoints.iter().map(|e| e.describe(level)).collect();
        if let Some(variable) = self.broadcast.read().as_ref() {
            lines.push(format!("broadcast variable {}", variable.name()));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBroadcast, MockEndpoint};

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("loghost").unwrap(), "loghost:7011");
        assert_eq!(normalize_address(" 10.0.0.5:9000 ").unwrap(), "10.0.0.5:9000");
        assert_eq!(normalize_address("[::1]").unwrap(), "[::1]:7011");
        assert_eq!(normalize_address("[::1]:7012").unwrap(), "[::1]:7012");
        assert!(normalize_address("").is_err());
        assert!(normalize_address("host:port").is_err());
        assert!(normalize_address("host:99999").is_err());
        assert!(normalize_address(":7011").is_err());
        assert!(normalize_address("::1").is_err());
    }

    #[test]
    fn test_deliver_to_all_sinks() {
        let stats = Arc::new(PutLogStats::new());
        let fanout = SinkFanOut::new(Arc::clone(&stats));
        let a = Arc::new(MockEndpoint::new("a:7011"));
        let b = Arc::new(MockEndpoint::new("b:7011"));
        let pv = Arc::new(MockBroadcast::new("LOG:PV"));
        assert!(fanout.add_endpoint(a.clone()));
        assert!(fanout.add_endpoint(b.clone()));
        fanout.set_broadcast(Some(pv.clone()));

        fanout.deliver("hello");

        assert_eq!(a.messages(), vec!["hello\n".to_string()]);
        assert_eq!(b.messages(), vec!["hello\n".to_string()]);
        assert_eq!(pv.values(), vec!["hello".to_string()]);
    }

    #[test]
    fn test_failing_endpoint_does_not_affect_others() {
        let stats = Arc::new(PutLogStats::new());
        let fanout = SinkFanOut::new(Arc::clone(&stats));
        let bad = Arc::new(MockEndpoint::new("bad:7011"));
        let good = Arc::new(MockEndpoint::new("good:7011"));
        let pv = Arc::new(MockBroadcast::new("LOG:PV"));
        bad.set_failing(true);
        pv.set_failing(true);
        fanout.add_endpoint(bad.clone());
        fanout.add_endpoint(good.clone());
        fanout.set_broadcast(Some(pv));

        fanout.deliver("msg");

        assert!(bad.messages().is_empty());
        assert_eq!(good.messages().len(), 1);
        let snap = stats.snapshot();
        assert_eq!(snap.endpoint_failures, 1);
        assert_eq!(snap.broadcast_failures, 1);
    }

    #[test]
    fn test_duplicate_address_rejected() {
        let fanout = SinkFanOut::new(Arc::new(PutLogStats::new()));
        assert!(fanout.add_endpoint(Arc::new(MockEndpoint::new("a:7011"))));
        assert!(!fanout.add_endpoint(Arc::new(MockEndpoint::new("a:7011"))));
        assert_eq!(fanout.endpoint_count(), 1);
        assert!(fanout.contains("a:7011"));
    }

    #[test]
    fn test_flush_and_describe() {
        let fanout = SinkFanOut::new(Arc::new(PutLogStats::new()));
        let a = Arc::new(MockEndpoint::new("a:7011"));
        fanout.add_endpoint(a.clone());
        fanout.set_broadcast(Some(Arc::new(MockBroadcast::new("LOG:PV"))));

        fanout.flush_all();
        assert_eq!(a.flush_count(), 1);

        let lines = fanout.describe(1);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("a:7011"));
        assert_eq!(lines[1], "broadcast variable LOG:PV");
    }
}
