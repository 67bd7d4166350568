//! State publisher.
//!
//! Owns the authoritative [`StateView`] and fans every change out to the
//! subscribed streams. A single lock covers both the view update and the
//! fan-out, so every subscriber sees events in exactly the order they were
//! produced.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::{unbounded, Sender};

use crate::state::{ActiveSet, ArraySnapshot, Metrics, RunState, SettledSet, StateView};

use super::events::{EventPayload, StateEvent, SubscriptionId};
use super::stream::StateStream;

#[derive(Debug)]
struct Inner {
    view: StateView,
    next_sequence: u64,
    next_version: u64,
    subscribers: HashMap<SubscriptionId, Sender<StateEvent>>,
}

impl Inner {
    fn emit(&mut self, payload: EventPayload) {
        self.next_sequence += 1;
        let event = StateEvent::new(self.next_sequence, payload);
        event.apply_to(&mut self.view);

        // Unbounded channels never block the driver; a failed send means the
        // receiver is gone.
        self.subscribers.retain(|_, tx| tx.send(event.clone()).is_ok());
    }
}

/// Publishes observable state to subscribers.
#[derive(Debug)]
pub struct Publisher {
    inner: Mutex<Inner>,
}

impl Publisher {
    /// Create a publisher whose initial array is `values`.
    #[must_use]
    pub fn new(values: &[u32]) -> Arc<Self> {
        let view = StateView {
            array: ArraySnapshot::new(values, 0),
            settled: SettledSet::with_len(values.len()),
            ..StateView::default()
        };
        Arc::new(Self {
            inner: Mutex::new(Inner {
                view,
                next_sequence: 0,
                next_version: 1,
                subscribers: HashMap::new(),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open a stream of all subsequent events.
    #[must_use]
    pub fn subscribe(self: &Arc<Self>) -> StateStream {
        self.subscribe_with_view().1
    }

    /// Open a stream and capture the view it starts from, atomically.
    #[must_use]
    pub fn subscribe_with_view(self: &Arc<Self>) -> (StateView, StateStream) {
        let mut inner = self.lock();
        let (tx, rx) = unbounded();
        let id = SubscriptionId::new();
        inner.subscribers.insert(id, tx);
        let view = inner.view.clone();
        (view, StateStream::new(id, rx, Arc::downgrade(self)))
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) {
        self.lock().subscribers.remove(&id);
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().subscribers.len()
    }

    /// Copy of the current state.
    #[must_use]
    pub fn view(&self) -> StateView {
        self.lock().view.clone()
    }

    /// Current run state.
    #[must_use]
    pub fn run_state(&self) -> RunState {
        self.lock().view.run_state
    }

    /// Current counters.
    #[must_use]
    pub fn metrics(&self) -> Metrics {
        self.lock().view.metrics
    }

    /// Publish a new array snapshot.
    pub fn publish_array(&self, values: &[u32]) {
        let mut inner = self.lock();
        let version = inner.next_version;
        inner.next_version += 1;
        inner.emit(EventPayload::ArrayChanged {
            array: ArraySnapshot::new(values, version),
        });
    }

    /// Publish the highlighted indices. Unchanged highlights are not re-sent.
    pub fn publish_active(&self, active: ActiveSet) {
        let mut inner = self.lock();
        if inner.view.active == active {
            return;
        }
        inner.emit(EventPayload::ActiveChanged { active });
    }

    /// Add indices to the settled set. Already-settled indices are skipped;
    /// nothing is sent if no index is new.
    pub fn publish_settled(&self, indices: impl IntoIterator<Item = usize>) {
        let mut inner = self.lock();
        let mut fresh: Vec<usize> = Vec::new();
        for index in indices {
            if !inner.view.settled.contains(index) && !fresh.contains(&index) {
                fresh.push(index);
            }
        }
        if fresh.is_empty() {
            return;
        }
        inner.emit(EventPayload::Settled { indices: fresh });
    }

    /// Empty the settled set.
    pub fn clear_settled(&self) {
        let mut inner = self.lock();
        if inner.view.settled.is_empty() {
            return;
        }
        inner.emit(EventPayload::SettledCleared);
    }

    /// Add to the counters and publish the new totals.
    pub fn add_metrics(&self, comparisons: u64, swaps: u64) {
        let mut inner = self.lock();
        let mut metrics = inner.view.metrics;
        metrics.comparisons += comparisons;
        metrics.swaps += swaps;
        inner.emit(EventPayload::MetricsChanged { metrics });
    }

    /// Zero the counters.
    pub fn reset_metrics(&self) {
        let mut inner = self.lock();
        if inner.view.metrics == Metrics::default() {
            return;
        }
        inner.emit(EventPayload::MetricsChanged {
            metrics: Metrics::default(),
        });
    }

    /// Publish a lifecycle transition. Returns the previous state.
    pub fn publish_run_state(&self, run_state: RunState) -> RunState {
        self.publish_run_state_from(|| run_state)
    }

    /// Publish the run state returned by `read`, evaluated under the
    /// publisher lock.
    ///
    /// Several threads may change the authoritative state and then sync it
    /// here; reading inside the lock guarantees the last sync publishes the
    /// latest value instead of a stale one.
    pub fn publish_run_state_from(&self, read: impl FnOnce() -> RunState) -> RunState {
        let mut inner = self.lock();
        let previous = inner.view.run_state;
        let run_state = read();
        if previous != run_state {
            inner.emit(EventPayload::RunStateChanged { run_state });
        }
        previous
    }
}
