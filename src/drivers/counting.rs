use crate::state::ActiveSet;

use super::{Step, StepContext, WriteKind};

/// Counting sort over `0..=max`.
///
/// Requires non-negative integers, which `u32` guarantees; the count table
/// has `max + 1` slots, so it suits the small value range the generator
/// produces. No comparisons are made. Every output placement is counted as
/// a swap. The array settles once reconstruction is complete.
pub(super) fn sort(ctx: &mut StepContext<'_>) -> Step {
    let max = ctx.values().iter().copied().max().unwrap_or(0);
    let mut counts = vec![0usize; max as usize + 1];
    for &value in ctx.values() {
        counts[value as usize] += 1;
    }

    let mut index = 0;
    for value in 0..=max {
        for _ in 0..counts[value as usize] {
            ctx.highlight(ActiveSet::one(index));
            ctx.write(index, value, WriteKind::Counted)?;
            index += 1;
        }
    }

    ctx.settle_all();
    ctx.finish();
    Ok(())
}
