//! Producer side
//!
//! The host's write hook calls [`PutTrap::on_put_begin`] before a field is
//! written and [`PutTrap::on_put_end`] after. Both return immediately; the
//! completed event is queued for the consumer thread or dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use putlog_core::{Clock, FieldValue, PutEvent, PutTarget};
use tracing::trace;

use crate::engine::EngineControl;
use crate::queue::EventSender;
use crate::stats::PutLogStats;

/// A put between begin and end
#[derive(Debug, Clone)]
pub struct PendingPut {
    target: PutTarget,
    old_value: Option<FieldValue>,
}

impl PendingPut {
    pub fn target(&self) -> &PutTarget {
        &self.target
    }
}

pub(crate) struct TrapShared {
    control: Arc<EngineControl>,
    sender: RwLock<Option<EventSender>>,
    clock: Arc<dyn Clock>,
    stats: Arc<PutLogStats>,
    max_array_bytes: usize,
}

impl TrapShared {
    pub(crate) fn new(
        control: Arc<EngineControl>,
        clock: Arc<dyn Clock>,
        stats: Arc<PutLogStats>,
        max_array_bytes: usize,
    ) -> Self {
        Self {
            control,
            sender: RwLock::new(None),
            clock,
            stats,
            max_array_bytes,
        }
    }

    pub(crate) fn attach(&self, sender: EventSender) {
        *self.sender.write() = Some(sender);
    }

    pub(crate) fn detach(&self) {
        *self.sender.write() = None;
    }

    pub(crate) fn is_attached(&self) -> bool {
        self.sender.read().is_some()
    }
}

/// Handle given to event producers, cheap to clone
#[derive(Clone)]
pub struct PutTrap {
    shared: Arc<TrapShared>,
}

impl PutTrap {
    pub(crate) fn new(shared: Arc<TrapShared>) -> Self {
        Self { shared }
    }

    /// Capture the value before a put.
    ///
    /// Returns `None` when logging is disabled or not running, in which case
    /// the caller skips [`PutTrap::on_put_end`]. An unreadable old value is
    /// passed as `None` and logged as `"Not Accessible"`.
    pub fn on_put_begin(&self, target: PutTarget, old_value: Option<FieldValue>) -> Option<PendingPut> {
        if !self.shared.control.mode().is_enabled() || !self.shared.is_attached() {
            return None;
        }
        Some(PendingPut { target, old_value })
    }

    /// Complete a put and queue it for the consumer thread.
    ///
    /// A timestamp earlier than the current time is replaced by the current
    /// time. Does nothing for `None`.
    pub fn on_put_end(
        &self,
        pending: Option<PendingPut>,
        new_value: Option<FieldValue>,
        timestamp: DateTime<Utc>,
    ) {
        let Some(pending) = pending else {
            return;
        };

        let now = self.shared.clock.now_utc();
        let timestamp = if timestamp < now { now } else { timestamp };

        let event = PutEvent::assemble(
            &pending.target,
            pending.old_value,
            new_value,
            timestamp,
            self.shared.max_array_bytes,
        );

        let sender = self.shared.sender.read().clone();
        match sender {
            Some(sender) => {
                if sender.send(event).is_ok() {
                    self.shared.stats.record_put();
                }
            }
            None => trace!(pv = %event.name, "logger stopped, put dropped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::{event_queue, Received};
    use chrono::{Duration, TimeZone};
    use putlog_core::{
        FieldId, FieldType, LogMode, ManualClock, Scalar, ScalarKind, DEFAULT_MAX_ARRAY_BYTES,
        NOT_ACCESSIBLE,
    };

    fn setup(mode: LogMode) -> (PutTrap, Arc<TrapShared>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ));
        let shared = Arc::new(TrapShared::new(
            Arc::new(EngineControl::new(mode, 5.0)),
            clock.clone(),
            Arc::new(PutLogStats::new()),
            DEFAULT_MAX_ARRAY_BYTES,
        ));
        (PutTrap::new(Arc::clone(&shared)), shared, clock)
    }

    fn target() -> PutTarget {
        PutTarget::new(FieldId::from_raw(3), "R:X", FieldType::Scalar(ScalarKind::Int32))
    }

    fn next_event(receiver: &crate::queue::EventReceiver) -> Box<PutEvent> {
        match receiver.receive(std::time::Duration::from_millis(10)) {
            Received::Event(ev) => ev,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_not_attached_returns_none() {
        let (trap, _shared, _clock) = setup(LogMode::LogAll);
        assert!(trap.on_put_begin(target(), Some(Scalar::Int32(1).into())).is_none());
    }

    #[test]
    fn test_disabled_returns_none() {
        let (trap, shared, _clock) = setup(LogMode::Disabled);
        let (tx, _rx) = event_queue(4, Arc::new(PutLogStats::new()));
        shared.attach(tx);
        assert!(trap.on_put_begin(target(), Some(Scalar::Int32(1).into())).is_none());
    }

    #[test]
    fn test_put_is_queued_with_corrected_timestamp() {
        let (trap, shared, clock) = setup(LogMode::LogAll);
        let (tx, rx) = event_queue(4, Arc::new(PutLogStats::new()));
        shared.attach(tx);

        let pending = trap.on_put_begin(target(), Some(Scalar::Int32(1).into()));
        let stale = clock.now_utc() - Duration::seconds(30);
        trap.on_put_end(pending, Some(Scalar::Int32(2).into()), stale);

        let ev = next_event(&rx);
        assert_eq!(ev.timestamp, clock.now_utc());
        assert_eq!(ev.new_value, FieldValue::Scalar(Scalar::Int32(2)));
        assert_eq!(shared.stats.snapshot().puts, 1);

        let pending = trap.on_put_begin(target(), Some(Scalar::Int32(2).into()));
        let future = clock.now_utc() + Duration::seconds(30);
        trap.on_put_end(pending, Some(Scalar::Int32(3).into()), future);
        assert_eq!(next_event(&rx).timestamp, future);
    }

    #[test]
    fn test_unreadable_old_value() {
        let (trap, shared, clock) = setup(LogMode::LogAll);
        let (tx, rx) = event_queue(4, Arc::new(PutLogStats::new()));
        shared.attach(tx);

        let pending = trap.on_put_begin(target(), None);
        trap.on_put_end(pending, Some(Scalar::Int32(7).into()), clock.now_utc());

        let ev = next_event(&rx);
        assert_eq!(ev.old_value, FieldValue::Scalar(Scalar::string(NOT_ACCESSIBLE)));
        assert_eq!(ev.new_value, FieldValue::Scalar(Scalar::string("7")));
    }

    #[test]
    fn test_end_without_pending_is_noop() {
        let (trap, shared, clock) = setup(LogMode::LogAll);
        let (tx, rx) = event_queue(4, Arc::new(PutLogStats::new()));
        shared.attach(tx);
        trap.on_put_end(None, Some(Scalar::Int32(1).into()), clock.now_utc());
        assert!(matches!(
            rx.receive(std::time::Duration::from_millis(5)),
            Received::Timeout
        ));
    }

    #[test]
    fn test_detach_drops_puts() {
        let (trap, shared, clock) = setup(LogMode::LogAll);
        let (tx, _rx) = event_queue(4, Arc::new(PutLogStats::new()));
        shared.attach(tx);
        let pending = trap.on_put_begin(target(), Some(Scalar::Int32(1).into()));
        shared.detach();
        trap.on_put_end(pending, Some(Scalar::Int32(2).into()), clock.now_utc());
        assert_eq!(shared.stats.snapshot().puts, 0);
    }
}
