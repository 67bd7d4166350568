//! Instrumented working buffer handed to every driver.

use std::ops::Range;

use crate::observe::Publisher;
use crate::scheduler::{StepGate, StepOutcome};
use crate::state::ActiveSet;

/// Marker returned when the run was stopped at a suspension point.
///
/// Not an error: the driver unwinds with `?`, leaving the array in whatever
/// consistent partial state it had reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cancelled;

/// Result of a driver step.
pub type Step<T = ()> = Result<T, Cancelled>;

/// Whether a positional write counts toward the swap total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    /// Counted as a swap (shifts, counting/radix placements).
    Counted,
    /// Not counted (merge placements, final insertion of a held key).
    Uncounted,
}

/// A driver's private copy of the array, wired to the publisher and gate.
///
/// Every mutating or comparing method publishes the change, updates the
/// counters and then suspends at the gate.
pub struct StepContext<'a> {
    values: Vec<u32>,
    gate: &'a dyn StepGate,
    publisher: &'a Publisher,
}

impl<'a> StepContext<'a> {
    /// Take ownership of `values` as the working buffer.
    #[must_use]
    pub fn new(values: Vec<u32>, gate: &'a dyn StepGate, publisher: &'a Publisher) -> Self {
        Self {
            values,
            gate,
            publisher,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the buffer is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read-only view of the working buffer.
    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Element at `index`.
    #[must_use]
    pub fn value(&self, index: usize) -> u32 {
        self.values[index]
    }

    /// Give back the working buffer.
    #[must_use]
    pub fn into_values(self) -> Vec<u32> {
        self.values
    }

    fn suspend(&self) -> Step {
        match self.gate.wait_step() {
            StepOutcome::Proceed => Ok(()),
            StepOutcome::Abort => Err(Cancelled),
        }
    }

    /// Highlight a pair, count one comparison, suspend.
    pub fn compare(&mut self, a: usize, b: usize) -> Step {
        self.publisher.publish_active(ActiveSet::pair(a, b));
        self.publisher.add_metrics(1, 0);
        self.suspend()
    }

    /// Highlight one index, count one comparison, suspend.
    pub fn inspect(&mut self, index: usize) -> Step {
        self.publisher.publish_active(ActiveSet::one(index));
        self.publisher.add_metrics(1, 0);
        self.suspend()
    }

    /// Exchange two elements, publish, count one swap, suspend.
    pub fn swap(&mut self, a: usize, b: usize) -> Step {
        self.values.swap(a, b);
        self.publisher.publish_array(&self.values);
        self.publisher.add_metrics(0, 1);
        self.suspend()
    }

    /// Overwrite one element, publish, count it if `kind` says so, suspend.
    pub fn write(&mut self, index: usize, value: u32, kind: WriteKind) -> Step {
        self.values[index] = value;
        self.publisher.publish_array(&self.values);
        if kind == WriteKind::Counted {
            self.publisher.add_metrics(0, 1);
        }
        self.suspend()
    }

    /// Change the highlight without counting or suspending.
    pub fn highlight(&self, active: ActiveSet) {
        self.publisher.publish_active(active);
    }

    /// Mark one index final.
    pub fn settle(&self, index: usize) {
        self.publisher.publish_settled([index]);
    }

    /// Mark a range of indices final, in ascending order.
    pub fn settle_range(&self, range: Range<usize>) {
        self.publisher.publish_settled(range);
    }

    /// Mark every index final.
    pub fn settle_all(&self) {
        self.settle_range(0..self.values.len());
    }

    /// Clear the highlight at normal completion.
    pub fn finish(&self) {
        self.publisher.publish_active(ActiveSet::none());
    }
}
