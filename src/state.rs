//! Observable state types.
//!
//! These are the values the UI renders: the current array, the highlighted
//! ("active") indices, the indices known to be final ("settled"), the run
//! lifecycle phase and the comparison/swap counters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// No run in progress.
    #[default]
    Idle,
    /// A driver is executing.
    Running,
    /// A driver is suspended at a step boundary.
    Paused,
    /// Abort requested; the driver exits at its next check.
    Stopped,
}

impl RunState {
    /// Running or paused.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Paused)
    }

    /// Whether a driver observing this state must abort.
    #[must_use]
    pub const fn is_abort(self) -> bool {
        matches!(self, Self::Stopped | Self::Idle)
    }

    pub(crate) const fn as_u8(self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Running => 1,
            Self::Paused => 2,
            Self::Stopped => 3,
        }
    }

    pub(crate) const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Running,
            2 => Self::Paused,
            3 => Self::Stopped,
            _ => Self::Idle,
        }
    }
}

/// Comparison and swap counters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metrics {
    /// Value comparisons (digit extractions for radix sort).
    pub comparisons: u64,
    /// Exchanges and counted placements.
    pub swaps: u64,
}

/// Indices currently highlighted: none, one or a pair.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveSet(Vec<usize>);

impl ActiveSet {
    /// No highlighted index.
    #[must_use]
    pub const fn none() -> Self {
        Self(Vec::new())
    }

    /// A single highlighted index.
    #[must_use]
    pub fn one(index: usize) -> Self {
        Self(vec![index])
    }

    /// A highlighted pair.
    #[must_use]
    pub fn pair(a: usize, b: usize) -> Self {
        Self(vec![a, b])
    }

    /// Highlighted indices in publication order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Whether `index` is highlighted.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Whether nothing is highlighted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Indices that will not change again during the current run.
///
/// Grows monotonically and never holds duplicates. Iteration yields indices
/// in the order they were settled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<usize>", into = "Vec<usize>")]
pub struct SettledSet {
    order: Vec<usize>,
    mask: Vec<bool>,
}

impl PartialEq for SettledSet {
    fn eq(&self, other: &Self) -> bool {
        self.order == other.order
    }
}

impl Eq for SettledSet {}

impl From<Vec<usize>> for SettledSet {
    fn from(indices: Vec<usize>) -> Self {
        let mut set = Self::default();
        for index in indices {
            set.insert(index);
        }
        set
    }
}

impl From<SettledSet> for Vec<usize> {
    fn from(set: SettledSet) -> Self {
        set.order
    }
}

impl SettledSet {
    /// An empty set for an array of `len` elements.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            order: Vec::with_capacity(len),
            mask: vec![false; len],
        }
    }

    /// Insert an index. Returns false if it was already settled.
    pub fn insert(&mut self, index: usize) -> bool {
        if index >= self.mask.len() {
            self.mask.resize(index + 1, false);
        }
        if self.mask[index] {
            return false;
        }
        self.mask[index] = true;
        self.order.push(index);
        true
    }

    /// Whether `index` is settled.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    /// Number of settled indices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether nothing is settled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Whether every index of an array of length `len` is settled.
    #[must_use]
    pub fn covers(&self, len: usize) -> bool {
        self.order.len() == len && (0..len).all(|i| self.contains(i))
    }

    /// Indices in settle order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }

    /// Indices in settle order, as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.order
    }

    /// Indices in ascending order.
    #[must_use]
    pub fn to_sorted_vec(&self) -> Vec<usize> {
        let mut out = self.order.clone();
        out.sort_unstable();
        out
    }

    /// Forget every settled index.
    pub fn clear(&mut self) {
        self.order.clear();
        self.mask.iter_mut().for_each(|m| *m = false);
    }
}

/// Immutable, versioned copy of the array published to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArraySnapshot {
    values: Arc<[u32]>,
    version: u64,
}

impl Default for ArraySnapshot {
    fn default() -> Self {
        Self::new(&[], 0)
    }
}

impl ArraySnapshot {
    /// Wrap values with a version number.
    #[must_use]
    pub fn new(values: &[u32], version: u64) -> Self {
        Self {
            values: Arc::from(values),
            version,
        }
    }

    /// The element values.
    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Monotonic version; bumped on every publication within a controller.
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the array is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Point-in-time copy of all observable state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateView {
    /// Current array.
    pub array: ArraySnapshot,
    /// Highlighted indices.
    pub active: ActiveSet,
    /// Settled indices in settle order.
    pub settled: SettledSet,
    /// Lifecycle phase.
    pub run_state: RunState,
    /// Counters for the current run.
    pub metrics: Metrics,
    /// Sequence number of the last event applied to this view.
    pub sequence: u64,
}
