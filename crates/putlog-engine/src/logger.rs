//! The put logger
//!
//! [`PutLogger`] ties the pieces together: it owns the sinks, the formatter
//! and the runtime settings, starts and stops the consumer thread and hands
//! out [`PutTrap`]s to the event producers. It is also the administrative
//! surface (mode, burst timeout, metadata, reports).

use std::fmt::Write;
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Mutex, RwLock};
use putlog_core::{Clock, LogMode, Metadata, SystemClock};
use putlog_logging::WorkerContextGuard;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::LoggerConfig;
use crate::engine::{CoalescingEngine, EngineControl};
use crate::error::{FormatError, PutLogError, PutLogResult};
use crate::format::MessageFormatter;
use crate::queue::event_queue;
use crate::sink::{normalize_address, BroadcastVariable, EndpointConnector, SinkFanOut};
use crate::stats::{PutLogStats, StatsSnapshot};
use crate::trap::{PutTrap, TrapShared};

/// Process-wide put logger context
pub struct PutLogger {
    config: LoggerConfig,
    instance_id: Uuid,
    control: Arc<EngineControl>,
    stats: Arc<PutLogStats>,
    metadata: Arc<RwLock<Metadata>>,
    formatter: Arc<MessageFormatter>,
    fanout: Arc<SinkFanOut>,
    connector: Arc<dyn EndpointConnector>,
    trap: Arc<TrapShared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl PutLogger {
    /// Create a stopped logger
    pub fn new(config: LoggerConfig, connector: Arc<dyn EndpointConnector>) -> PutLogResult<Self> {
        Self::with_clock(config, connector, Arc::new(SystemClock))
    }

    /// Create a stopped logger reading time from `clock`
    pub fn with_clock(
        config: LoggerConfig,
        connector: Arc<dyn EndpointConnector>,
        clock: Arc<dyn Clock>,
    ) -> PutLogResult<Self> {
        let stats = Arc::new(PutLogStats::new());
        let metadata = Arc::new(RwLock::new(Metadata::new()));
        let formatter = Arc::new(MessageFormatter::new(&config, Arc::clone(&metadata))?);
        let control = Arc::new(EngineControl::new(config.mode, config.burst_timeout_secs));
        let trap = Arc::new(TrapShared::new(
            Arc::clone(&control),
            clock,
            Arc::clone(&stats),
            config.max_array_bytes,
        ));

        Ok(Self {
            instance_id: Uuid::new_v4(),
            fanout: Arc::new(SinkFanOut::new(Arc::clone(&stats))),
            config,
            control,
            stats,
            metadata,
            formatter,
            connector,
            trap,
            worker: Mutex::new(None),
        })
    }

    /// Register the endpoints in a whitespace separated address list, attach
    /// the optional broadcast variable and start the consumer thread.
    ///
    /// In [`LogMode::Disabled`] nothing is registered or started. Addresses
    /// that fail to parse or connect are logged and skipped; it is an error
    /// if no sink at all is left.
    pub fn initialize(
        &self,
        addresses: &str,
        broadcast: Option<Arc<dyn BroadcastVariable>>,
    ) -> PutLogResult<()> {
        if !self.control.mode().is_enabled() {
            info!("put logging disabled, not starting");
            return Ok(());
        }

        for address in addresses.split_whitespace() {
            if let Err(e) = self.register_endpoint(address) {
                error!(address, error = %e, "skipping log endpoint");
            }
        }

        if broadcast.is_some() {
            self.fanout.set_broadcast(broadcast);
        }

        if self.fanout.endpoint_count() == 0 && !self.fanout.has_broadcast() {
            error!("no log endpoint or broadcast variable configured");
            return Err(PutLogError::NoEndpoints);
        }

        self.start()
    }

    /// Connect and register one endpoint.
    ///
    /// Returns `Ok(false)` when an endpoint with the same address is already
    /// registered.
    pub fn register_endpoint(&self, address: &str) -> PutLogResult<bool> {
        let address = normalize_address(address)?;
        if self.fanout.contains(&address) {
            warn!(address = %address, "log endpoint already registered");
            return Ok(false);
        }

        let endpoint = self.connector.connect(&address)?;
        if !self.fanout.add_endpoint(endpoint) {
            warn!(address = %address, "log endpoint already registered");
            return Ok(false);
        }
        info!(address = %address, "log endpoint registered");
        Ok(true)
    }

    /// Set or clear the broadcast variable
    pub fn set_broadcast(&self, variable: Option<Arc<dyn BroadcastVariable>>) {
        self.fanout.set_broadcast(variable);
    }

    /// Spawn the consumer thread
    pub fn start(&self) -> PutLogResult<()> {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return Err(PutLogError::AlreadyRunning);
        }

        let (sender, receiver) = event_queue(self.config.queue_capacity, Arc::clone(&self.stats));
        let engine = CoalescingEngine::new(
            receiver,
            Arc::clone(&self.control),
            Arc::clone(&self.formatter),
            Arc::clone(&self.fanout),
            Arc::clone(&self.stats),
        );
        self.control.clear_stop();

        let name = self.config.thread_name.clone();
        let instance_id = self.instance_id;
        let handle = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let context = WorkerContextGuard::with_instance_id(name, instance_id);
                let span = context.span();
                let _entered = span.enter();
                engine.run();
            })
            .map_err(PutLogError::Spawn)?;

        self.trap.attach(sender);
        *worker = Some(handle);
        info!(thread = %self.config.thread_name, mode = %self.control.mode(), "put logger started");
        Ok(())
    }

    /// Stop the consumer thread and wait for it.
    ///
    /// An open record that was not sent yet is lost. The worker slot stays
    /// locked until the thread has exited, so a concurrent [`Self::start`]
    /// waits and then attaches its own queue.
    pub fn stop(&self) {
        let mut worker = self.worker.lock();
        let Some(handle) = worker.take() else {
            return;
        };
        self.control.request_stop();
        self.trap.detach();
        if handle.join().is_err() {
            error!("put logger thread panicked");
        }
        drop(worker);
        info!("put logger stopped");
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    /// Handle for event producers
    pub fn trap(&self) -> PutTrap {
        PutTrap::new(Arc::clone(&self.trap))
    }

    /// Change mode and burst timeout. Takes effect with the next event.
    ///
    /// Endpoints are flushed so messages formatted under the previous
    /// settings go out first.
    pub fn configure(&self, mode: LogMode, burst_timeout_secs: f64) {
        self.control.set_mode(mode);
        let applied = self.control.set_burst_timeout(burst_timeout_secs);
        if !(burst_timeout_secs.is_finite() && burst_timeout_secs > 0.0) {
            warn!(
                requested = burst_timeout_secs,
                applied = ?applied,
                "burst timeout out of range, using default"
            );
        }
        self.fanout.flush_all();
        info!(mode = %mode, timeout = ?applied, "put logger reconfigured");
    }

    /// Change the mode by administrative code, keeping the burst timeout
    pub fn reconfigure_code(&self, code: i32) -> LogMode {
        let mode = LogMode::from_code(code);
        self.control.set_mode(mode);
        self.fanout.flush_all();
        info!(mode = %mode, "put logger mode changed");
        mode
    }

    pub fn mode(&self) -> LogMode {
        self.control.mode()
    }

    pub fn burst_timeout_secs(&self) -> f64 {
        self.control.burst_timeout().as_secs_f64()
    }

    /// Change the plain text time pattern
    pub fn set_time_format(&self, pattern: &str) -> Result<(), FormatError> {
        self.formatter.set_time_format(pattern)?;
        info!(pattern, "put log time format changed");
        Ok(())
    }

    /// Add, replace (`Some`) or remove (`None`) a metadata key
    pub fn add_metadata(&self, key: &str, value: Option<&str>) -> PutLogResult<()> {
        self.metadata.write().set(key, value)?;
        Ok(())
    }

    pub fn remove_all_metadata(&self) {
        self.metadata.write().clear();
    }

    /// Copy of the current metadata
    pub fn metadata(&self) -> Metadata {
        self.metadata.read().clone()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Human-readable status.
    ///
    /// Level 0 gives the summary line, level 1 adds the sinks and metadata,
    /// level 2 and above the counters.
    pub fn report(&self, verbosity: u32) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "put logger {}: mode {}, burst timeout {:.3}s, format {:?}, {} endpoint(s){}",
            if self.is_running() { "running" } else { "stopped" },
            self.mode(),
            self.burst_timeout_secs(),
            self.formatter.output(),
            self.fanout.endpoint_count(),
            if self.fanout.has_broadcast() { ", broadcast" } else { "" },
        );

        if verbosity >= 1 {
            for line in self.fanout.describe(verbosity) {
                let _ = writeln!(out, "  {}", line);
            }
            let metadata = self.metadata.read();
            if !metadata.is_empty() {
                let _ = writeln!(out, "  metadata:");
                for (key, value) in metadata.iter() {
                    let _ = writeln!(out, "    {} = {}", key, value);
                }
            }
        }

        if verbosity >= 2 {
            let _ = writeln!(out, "  {}", self.stats.snapshot());
        }
        out
    }
}

impl Drop for PutLogger {
    fn drop(&mut self) {
        self.stop();
    }
}
