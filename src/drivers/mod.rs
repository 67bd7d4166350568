//! Stepwise sorting drivers.
//!
//! Each driver sorts a [`StepContext`]'s private buffer and reports every
//! comparison and mutation through it. A driver returns [`Cancelled`] as soon
//! as the gate asks it to abort.
//!
//! Settling differs per algorithm: bubble, selection, insertion and shell
//! settle indices as they go; heap settles from the end backward; merge,
//! quick, counting and radix settle the whole range only at the end.

mod bubble;
mod context;
mod counting;
mod heap;
mod insertion;
mod merge;
mod quick;
mod radix;
mod selection;
mod shell;

pub use context::{Cancelled, Step, StepContext, WriteKind};

use crate::config::Algorithm;
use crate::observe::Publisher;
use crate::scheduler::{StepGate, Unpaced};
use crate::state::StateView;

/// Run `algorithm` over the context's buffer.
///
/// Arrays of zero or one element are already sorted: they are settled at
/// once with no comparisons or swaps.
pub fn run(algorithm: Algorithm, ctx: &mut StepContext<'_>) -> Step {
    if ctx.len() <= 1 {
        ctx.settle_all();
        ctx.finish();
        return Ok(());
    }

    match algorithm {
        Algorithm::Bubble => bubble::sort(ctx),
        Algorithm::Selection => selection::sort(ctx),
        Algorithm::Insertion => insertion::sort(ctx),
        Algorithm::Merge => merge::sort(ctx),
        Algorithm::Quick => quick::sort(ctx),
        Algorithm::Heap => heap::sort(ctx),
        Algorithm::Counting => counting::sort(ctx),
        Algorithm::Radix => radix::sort(ctx),
        Algorithm::Shell => shell::sort(ctx),
    }
}

/// Sort `values` through `gate`, publishing to `publisher`.
///
/// Returns the working buffer as the driver left it, completed or not.
pub fn sort_with(
    algorithm: Algorithm,
    values: Vec<u32>,
    gate: &dyn StepGate,
    publisher: &Publisher,
) -> (Vec<u32>, Step) {
    let mut ctx = StepContext::new(values, gate, publisher);
    let step = run(algorithm, &mut ctx);
    (ctx.into_values(), step)
}

/// Sort `values` without pacing and return the final observable state.
#[must_use]
pub fn sort_unpaced(algorithm: Algorithm, values: &[u32]) -> StateView {
    let publisher = Publisher::new(values);
    let _ = sort_with(algorithm, values.to_vec(), &Unpaced, &publisher);
    publisher.view()
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::observe::{EventPayload, StateEvent};
    use crate::scheduler::StepOutcome;
    use crate::state::Metrics;

    /// Gate that proceeds `remaining` times, then aborts forever.
    pub struct AbortAfter {
        remaining: AtomicUsize,
    }

    impl AbortAfter {
        pub fn new(steps: usize) -> Self {
            Self {
                remaining: AtomicUsize::new(steps),
            }
        }
    }

    impl StepGate for AbortAfter {
        fn wait_step(&self) -> StepOutcome {
            let left = self.remaining.load(Ordering::SeqCst);
            if left == 0 {
                return StepOutcome::Abort;
            }
            self.remaining.store(left - 1, Ordering::SeqCst);
            StepOutcome::Proceed
        }
    }

    /// Unpaced run that also returns every published event.
    pub fn trace(algorithm: Algorithm, values: &[u32]) -> (StateView, Vec<StateEvent>) {
        let publisher = Publisher::new(values);
        let stream = publisher.subscribe();
        let (_, step) = sort_with(algorithm, values.to_vec(), &Unpaced, &publisher);
        assert_eq!(step, Ok(()));
        (publisher.view(), stream.drain())
    }

    pub fn metrics(algorithm: Algorithm, values: &[u32]) -> Metrics {
        sort_unpaced(algorithm, values).metrics
    }

    pub fn settle_order(events: &[StateEvent]) -> Vec<usize> {
        events
            .iter()
            .filter_map(|e| match &e.payload {
                EventPayload::Settled { indices } => Some(indices.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn assert_sorts(algorithm: Algorithm, values: &[u32]) {
        let view = sort_unpaced(algorithm, values);
        let mut expected = values.to_vec();
        expected.sort_unstable();
        assert_eq!(view.array.values(), expected.as_slice(), "{algorithm} on {values:?}");
        assert!(view.settled.covers(values.len()), "{algorithm} settled {:?}", view.settled);
        assert!(view.active.is_empty());
    }
}
