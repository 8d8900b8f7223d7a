//! Burst state
//!
//! The single open record the engine is accumulating. It keeps the latest
//! event for one field, the old value to report for it and, for numeric
//! scalars, the running extrema of the merged new values. Nothing else from
//! the burst is buffered.

use putlog_core::{FieldValue, PutEvent, Scalar};

use crate::format::{BurstSummary, LogRecord};

#[derive(Debug)]
pub struct BurstState {
    current: Box<PutEvent>,
    open_old: FieldValue,
    min: Option<Scalar>,
    max: Option<Scalar>,
    burst_count: u32,
    sent: bool,
}

impl BurstState {
    /// Start a new record from an event of a different field
    pub fn adopt(event: Box<PutEvent>) -> Self {
        let (min, max) = initial_extrema(&event);
        Self {
            open_old: event.old_value.clone(),
            current: event,
            min,
            max,
            burst_count: 0,
            sent: false,
        }
    }

    /// Whether `event` targets the same field with the same type
    pub fn same_field(&self, event: &PutEvent) -> bool {
        self.current.id == event.id && self.current.field_type == event.field_type
    }

    /// Whether `event` extends a burst that has not been sent yet
    pub fn continues_burst(&self, event: &PutEvent) -> bool {
        self.same_field(event) && !self.sent && self.burst_count > 0
    }

    /// Fold another put to the same field into this record.
    ///
    /// After the record was sent a fresh window opens: extrema restart from
    /// this event while the old value stays the last sent new value.
    pub fn merge(&mut self, event: Box<PutEvent>) {
        if self.sent {
            let (min, max) = initial_extrema(&event);
            self.min = min;
            self.max = max;
            self.burst_count = 0;
            self.sent = false;
        } else {
            self.burst_count = self.burst_count.saturating_add(1);
            if let Some(value) = event.new_value.as_scalar().filter(|_| event.is_numeric_scalar()) {
                self.min = self.min.as_ref().and_then(|m| m.min_with(value));
                self.max = self.max.as_ref().and_then(|m| m.max_with(value));
            }
        }
        self.current = event;
    }

    /// Record the current state as sent
    pub fn mark_sent(&mut self) {
        self.sent = true;
        self.open_old = self.current.new_value.clone();
        self.burst_count = 0;
    }

    pub fn is_sent(&self) -> bool {
        self.sent
    }

    pub fn burst_count(&self) -> u32 {
        self.burst_count
    }

    pub fn current(&self) -> &PutEvent {
        &self.current
    }

    pub fn open_old(&self) -> &FieldValue {
        &self.open_old
    }

    /// Whether this record would report no change
    pub fn is_unchanged_single(&self) -> bool {
        self.burst_count == 0 && self.current.is_unchanged()
    }

    /// View handed to the formatter
    pub fn record(&self) -> LogRecord<'_> {
        let burst = match (&self.min, &self.max) {
            (Some(min), Some(max)) if self.burst_count > 0 && self.current.is_numeric_scalar() => {
                Some(BurstSummary {
                    min,
                    max,
                    count: self.burst_count,
                })
            }
            _ => None,
        };
        LogRecord {
            event: &self.current,
            old_value: &self.open_old,
            burst,
        }
    }
}

fn initial_extrema(event: &PutEvent) -> (Option<Scalar>, Option<Scalar>) {
    match event.new_value.as_scalar() {
        Some(value) if event.is_numeric_scalar() => (Some(value.clone()), Some(value.clone())),
        _ => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use putlog_core::{FieldId, FieldType, PutTarget, ScalarKind, DEFAULT_MAX_ARRAY_BYTES};

    fn put(id: u64, old: f64, new: f64) -> Box<PutEvent> {
        let target = PutTarget::new(
            FieldId::from_raw(id),
            format!("REC{}:VAL", id),
            FieldType::Scalar(ScalarKind::Float64),
        );
        Box::new(PutEvent::assemble(
            &target,
            Some(Scalar::Float64(old).into()),
            Some(Scalar::Float64(new).into()),
            Utc::now(),
            DEFAULT_MAX_ARRAY_BYTES,
        ))
    }

    #[test]
    fn test_adopt_single() {
        let state = BurstState::adopt(put(1, 1.0, 2.0));
        let record = state.record();
        assert_eq!(record.old_value, &FieldValue::Scalar(Scalar::Float64(1.0)));
        assert!(record.burst.is_none());
        assert!(!state.is_sent());
    }

    #[test]
    fn test_merge_tracks_extrema() {
        let mut state = BurstState::adopt(put(1, 0.0, 5.0));
        state.merge(put(1, 5.0, -3.0));
        state.merge(put(1, -3.0, 9.0));
        state.merge(put(1, 9.0, 4.0));

        let record = state.record();
        assert_eq!(record.old_value, &FieldValue::Scalar(Scalar::Float64(0.0)));
        assert_eq!(record.event.new_value, FieldValue::Scalar(Scalar::Float64(4.0)));
        let burst = record.burst.unwrap();
        assert_eq!(burst.count, 3);
        assert_eq!(burst.min, &Scalar::Float64(-3.0));
        assert_eq!(burst.max, &Scalar::Float64(9.0));
    }

    #[test]
    fn test_merge_after_sent_opens_window() {
        let mut state = BurstState::adopt(put(1, 0.0, 5.0));
        state.merge(put(1, 5.0, 7.0));
        state.mark_sent();
        assert_eq!(state.open_old(), &FieldValue::Scalar(Scalar::Float64(7.0)));
        assert_eq!(state.burst_count(), 0);

        state.merge(put(1, 7.0, 8.0));
        assert!(!state.is_sent());
        assert_eq!(state.burst_count(), 0);
        let record = state.record();
        assert_eq!(record.old_value, &FieldValue::Scalar(Scalar::Float64(7.0)));
        assert!(record.burst.is_none());

        state.merge(put(1, 8.0, 1.0));
        let burst = state.record().burst.unwrap();
        assert_eq!(burst.min, &Scalar::Float64(1.0));
        assert_eq!(burst.max, &Scalar::Float64(8.0));
    }

    #[test]
    fn test_continues_burst() {
        let mut state = BurstState::adopt(put(1, 0.0, 5.0));
        assert!(!state.continues_burst(&put(1, 5.0, 5.0)));
        state.merge(put(1, 5.0, 6.0));
        assert!(state.continues_burst(&put(1, 6.0, 6.0)));
        assert!(!state.continues_burst(&put(2, 6.0, 6.0)));
        state.mark_sent();
        assert!(!state.continues_burst(&put(1, 6.0, 6.0)));
    }

    #[test]
    fn test_unchanged_single() {
        let state = BurstState::adopt(put(1, 3.0, 3.0));
        assert!(state.is_unchanged_single());
    }

    #[test]
    fn test_burst_count_saturates() {
        let mut state = BurstState::adopt(put(1, 0.0, 5.0));
        state.merge(put(1, 5.0, 6.0));
        state.burst_count = u32::MAX;
        state.merge(put(1, 6.0, 2.0));

        assert_eq!(state.burst_count(), u32::MAX);
        assert!(state.continues_burst(&put(1, 2.0, 3.0)));
        let burst = state.record().burst.unwrap();
        assert_eq!(burst.count, u32::MAX);
        assert_eq!(burst.min, &Scalar::Float64(2.0));
        assert_eq!(burst.max, &Scalar::Float64(6.0));
    }
}
