//! Bounded event queue between the producers and the consumer thread
//!
//! Producers never block: when the queue is full the event is dropped,
//! counted and reported. The consumer waits with a timeout so it can close
//! bursts and notice a stop request.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use putlog_core::{PutEvent, ValueError};
use tracing::{debug, warn};

use crate::error::QueueError;
use crate::stats::PutLogStats;

/// Create a connected sender/receiver pair
pub fn event_queue(capacity: usize, stats: Arc<PutLogStats>) -> (EventSender, EventReceiver) {
    let capacity = capacity.max(1);
    let (tx, rx) = crossbeam_channel::bounded(capacity);
    (
        EventSender {
            tx,
            capacity,
            stats,
        },
        EventReceiver { rx },
    )
}

/// Producer half, cheap to clone
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<Box<PutEvent>>,
    capacity: usize,
    stats: Arc<PutLogStats>,
}

impl EventSender {
    /// Enqueue without blocking
    pub fn send(&self, event: PutEvent) -> Result<(), QueueError> {
        match self.tx.try_send(Box::new(event)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(dropped)) => {
                self.stats.record_overflow();
                warn!(pv = %dropped.name, capacity = self.capacity, "event queue full, put dropped");
                Err(QueueError::Full {
                    capacity: self.capacity,
                })
            }
            Err(TrySendError::Disconnected(dropped)) => {
                debug!(pv = %dropped.name, "event queue disconnected, put dropped");
                Err(QueueError::Disconnected)
            }
        }
    }

    /// Events currently waiting
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Outcome of one timed receive
#[derive(Debug)]
pub enum Received {
    /// A well-formed event
    Event(Box<PutEvent>),
    /// Nothing arrived within the timeout
    Timeout,
    /// An event whose values do not match its declared type
    Malformed { name: String, error: ValueError },
    /// Every sender is gone
    Disconnected,
}

/// Consumer half
pub struct EventReceiver {
    rx: Receiver<Box<PutEvent>>,
}

impl EventReceiver {
    /// Wait up to `timeout` for the next event
    pub fn receive(&self, timeout: Duration) -> Received {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => match event.validate() {
                Ok(()) => Received::Event(event),
                Err(error) => Received::Malformed {
                    name: event.name.clone(),
                    error,
                },
            },
            Err(RecvTimeoutError::Timeout) => Received::Timeout,
            Err(RecvTimeoutError::Disconnected) => Received::Disconnected,
        }
    }
}
