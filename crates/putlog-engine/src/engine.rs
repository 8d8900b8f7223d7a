//! Coalescing engine
//!
//! Runs on the single consumer thread. Every receive outcome drives one step
//! of a small state machine over at most one open [`BurstState`]:
//!
//! - a timeout emits the open record if it has not been sent yet
//! - a put to the open field is merged into it (unless filtering is off)
//! - a put to another field emits the open record first and replaces it
//!
//! Settings the admin surface changes at runtime (mode, burst timeout, stop
//! flag) live in [`EngineControl`] and are read once per step.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, AtomicU64, Ordering};
use std::time::Duration;

use putlog_core::{LogMode, PutEvent};
use tracing::{debug, error, info, trace, warn};

use crate::burst::BurstState;
use crate::config::effective_burst_timeout;
use crate::format::MessageFormatter;
use crate::queue::{EventReceiver, Received};
use crate::sink::SinkFanOut;
use crate::stats::PutLogStats;

/// Runtime-adjustable engine settings
#[derive(Debug)]
pub struct EngineControl {
    mode: AtomicI32,
    burst_timeout_bits: AtomicU64,
    stop: AtomicBool,
}

impl EngineControl {
    pub fn new(mode: LogMode, burst_timeout_secs: f64) -> Self {
        Self {
            mode: AtomicI32::new(mode.code()),
            burst_timeout_bits: AtomicU64::new(
                effective_burst_timeout(burst_timeout_secs).as_secs_f64().to_bits(),
            ),
            stop: AtomicBool::new(false),
        }
    }

    pub fn mode(&self) -> LogMode {
        LogMode::try_from(self.mode.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn set_mode(&self, mode: LogMode) {
        self.mode.store(mode.code(), Ordering::Release);
    }

    pub fn burst_timeout(&self) -> Duration {
        effective_burst_timeout(f64::from_bits(self.burst_timeout_bits.load(Ordering::Acquire)))
    }

    /// Set the burst timeout, returning the value actually applied
    pub fn set_burst_timeout(&self, secs: f64) -> Duration {
        let timeout = effective_burst_timeout(secs);
        self.burst_timeout_bits
            .store(timeout.as_secs_f64().to_bits(), Ordering::Release);
        timeout
    }

    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn clear_stop(&self) {
        self.stop.store(false, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }
}

/// Engine states
#[derive(Debug)]
pub enum EngineState {
    /// No put seen yet
    AwaitingFirst,
    /// One open record
    Accumulating(BurstState),
    /// The loop has ended
    Stopped,
}

/// The consumer side of the put logger
pub struct CoalescingEngine {
    receiver: EventReceiver,
    control: Arc<EngineControl>,
    formatter: Arc<MessageFormatter>,
    fanout: Arc<SinkFanOut>,
    stats: Arc<PutLogStats>,
    state: EngineState,
}

impl CoalescingEngine {
    pub fn new(
        receiver: EventReceiver,
        control: Arc<EngineControl>,
        formatter: Arc<MessageFormatter>,
        fanout: Arc<SinkFanOut>,
        stats: Arc<PutLogStats>,
    ) -> Self {
        Self {
            receiver,
            control,
            formatter,
            fanout,
            stats,
            state: EngineState::AwaitingFirst,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Consumer loop: receive, step, check the stop flag.
    ///
    /// Returns when a stop is requested or every producer is gone. An open
    /// record that was not sent yet is discarded.
    pub fn run(mut self) {
        info!(timeout = ?self.control.burst_timeout(), "put log engine started");

        while !matches!(self.state, EngineState::Stopped) {
            let received = self.receiver.receive(self.control.burst_timeout());
            self.step(received);
            if self.control.is_stop_requested() {
                self.state = EngineState::Stopped;
            }
        }

        info!("put log engine exiting");
    }

    /// Apply one receive outcome
    pub fn step(&mut self, received: Received) {
        match received {
            Received::Event(event) => self.on_event(event),
            Received::Timeout => self.on_timeout(),
            Received::Malformed { name, error } => {
                self.stats.record_malformed();
                warn!(pv = %name, error = %error, "discarding malformed put event");
            }
            Received::Disconnected => {
                debug!("all producers gone");
                self.state = EngineState::Stopped;
            }
        }
    }

    /// Send the open record once the burst timeout passes without a put.
    ///
    /// With logging disabled the open record is dropped unsent, like the puts
    /// the trap rejects in that mode. The first put after logging is enabled
    /// again opens a fresh record.
    fn on_timeout(&mut self) {
        if !self.control.mode().is_enabled() {
            if let EngineState::Accumulating(burst) = &self.state {
                if !burst.is_sent() {
                    debug!(pv = %burst.current().name, "logging disabled, open record dropped");
                }
                self.state = EngineState::AwaitingFirst;
            }
            return;
        }

        if let EngineState::Accumulating(burst) = &mut self.state {
            if !burst.is_sent() {
                emit(&self.formatter, &self.fanout, &self.stats, self.control.mode(), burst);
                burst.mark_sent();
            }
        }
    }

    fn on_event(&mut self, event: Box<PutEvent>) {
        let mode = self.control.mode();

        if mode.suppresses_unchanged() && event.is_unchanged() {
            let continues = matches!(
                &self.state,
                EngineState::Accumulating(burst) if burst.continues_burst(&event)
            );
            if !continues {
                self.stats.record_suppressed();
                trace!(pv = %event.name, "unchanged value, put suppressed");
                return;
            }
        }

        let merge = mode.merges_bursts() && event.field_type.allows_burst_filter();
        match &mut self.state {
            EngineState::Accumulating(burst) if merge && burst.same_field(&event) => {
                burst.merge(event);
            }
            EngineState::Accumulating(burst) => {
                if !burst.is_sent() {
                    emit(&self.formatter, &self.fanout, &self.stats, mode, burst);
                }
                *burst = BurstState::adopt(event);
            }
            EngineState::AwaitingFirst => {
                self.state = EngineState::Accumulating(BurstState::adopt(event));
            }
            EngineState::Stopped => {
                debug!(pv = %event.name, "engine stopped, put dropped");
            }
        }
    }
}

/// Format the open record and hand it to the sinks
fn emit(
    formatter: &MessageFormatter,
    fanout: &SinkFanOut,
    stats: &PutLogStats,
    mode: LogMode,
    burst: &BurstState,
) {
    if mode.suppresses_unchanged() && burst.is_unchanged_single() {
        stats.record_suppressed();
        return;
    }

    let record = burst.record();
    match formatter.format(&record) {
        Ok(message) => {
            if message.truncated {
                stats.record_truncated();
                warn!(pv = %record.event.name, "put log message truncated");
            }
            fanout.deliver(&message.text);
            stats.record_message();
        }
        Err(e) => {
            stats.record_format_failure();
            error!(pv = %record.event.name, error = %e, "failed to format put log message");
        }
    }
}
