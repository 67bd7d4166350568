use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Weak;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, TryRecvError};

use crate::error::{RunError, SortVizError, SortVizResult};

use super::events::{StateEvent, SubscriptionId};
use super::publisher::Publisher;

/// A subscription stream for state events.
///
/// Events arrive in publication order and none are dropped. Dropping the
/// stream unregisters it.
#[derive(Debug)]
pub struct StateStream {
    subscription_id: SubscriptionId,
    rx: Receiver<StateEvent>,
    publisher: Weak<Publisher>,
    unregistered: AtomicBool,
}

impl StateStream {
    pub(crate) fn new(subscription_id: SubscriptionId, rx: Receiver<StateEvent>, publisher: Weak<Publisher>) -> Self {
        Self {
            subscription_id,
            rx,
            publisher,
            unregistered: AtomicBool::new(false),
        }
    }

    /// The subscription id backing this stream.
    #[must_use]
    pub const fn subscription_id(&self) -> SubscriptionId {
        self.subscription_id
    }

    /// Explicit unregistration. Idempotent.
    ///
    /// Events already queued can still be drained; afterwards the stream
    /// reports disconnection.
    pub fn unsubscribe(&self) {
        if self.unregistered.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(publisher) = self.publisher.upgrade() {
            publisher.unsubscribe(self.subscription_id);
        }
    }

    /// Receive the next event (blocking).
    pub fn recv(&self) -> SortVizResult<StateEvent> {
        self.rx.recv().map_err(|_| SortVizError::Run(RunError::Disconnected))
    }

    /// Receive the next event with a timeout.
    pub fn recv_timeout(&self, timeout: Duration) -> SortVizResult<StateEvent> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => SortVizError::Run(RunError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            RecvTimeoutError::Disconnected => SortVizError::Run(RunError::Disconnected),
        })
    }

    /// Receive an event if one is queued.
    pub fn try_recv(&self) -> Option<StateEvent> {
        match self.rx.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Drain every queued event without blocking.
    pub fn drain(&self) -> Vec<StateEvent> {
        self.rx.try_iter().collect()
    }
}

impl Drop for StateStream {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}
