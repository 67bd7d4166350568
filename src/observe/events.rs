//! Event types published to state subscribers.
//!
//! Events are serializable so a renderer in another process can consume the
//! same stream.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::{ActiveSet, ArraySnapshot, Metrics, RunState, StateView};

/// Unique identifier for a subscription.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new random subscription id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

/// What changed.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    /// The array was mutated or replaced.
    ArrayChanged { array: ArraySnapshot },

    /// The highlighted indices changed.
    ActiveChanged { active: ActiveSet },

    /// Indices newly added to the settled set, in settle order.
    Settled { indices: Vec<usize> },

    /// The settled set was emptied.
    SettledCleared,

    /// Counter totals after an increment or reset.
    MetricsChanged { metrics: Metrics },

    /// The run lifecycle moved to a new phase.
    RunStateChanged { run_state: RunState },
}

/// A published state change.
#[allow(missing_docs)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateEvent {
    /// Strictly increasing per publisher, starting at 1.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl StateEvent {
    #[must_use]
    pub(crate) fn new(sequence: u64, payload: EventPayload) -> Self {
        Self {
            sequence,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Fold this event into a view.
    ///
    /// Applying every event of a stream, in order, to the view captured when
    /// the stream was opened reproduces the publisher's current view.
    pub fn apply_to(&self, view: &mut StateView) {
        match &self.payload {
            EventPayload::ArrayChanged { array } => view.array = array.clone(),
            EventPayload::ActiveChanged { active } => view.active = active.clone(),
            EventPayload::Settled { indices } => {
                for &index in indices {
                    view.settled.insert(index);
                }
            }
            EventPayload::SettledCleared => view.settled.clear(),
            EventPayload::MetricsChanged { metrics } => view.metrics = *metrics,
            EventPayload::RunStateChanged { run_state } => view.run_state = *run_state,
        }
        view.sequence = self.sequence;
    }
}
