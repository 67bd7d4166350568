use crate::state::ActiveSet;

use super::{Step, StepContext, WriteKind};

/// Top-down merge sort splitting at the floor midpoint.
///
/// Each merge decision highlights the output slot and counts a comparison.
/// Placements are writes, not swaps. Leftovers of either half are drained
/// without comparing. Nothing settles until the top-level merge is done.
pub(super) fn sort(ctx: &mut StepContext<'_>) -> Step {
    let n = ctx.len();
    sort_range(ctx, 0, n - 1)?;
    ctx.settle_all();
    ctx.finish();
    Ok(())
}

fn sort_range(ctx: &mut StepContext<'_>, lo: usize, hi: usize) -> Step {
    if lo >= hi {
        return Ok(());
    }
    let mid = lo + (hi - lo) / 2;
    sort_range(ctx, lo, mid)?;
    sort_range(ctx, mid + 1, hi)?;
    merge_halves(ctx, lo, mid, hi)
}

fn merge_halves(ctx: &mut StepContext<'_>, lo: usize, mid: usize, hi: usize) -> Step {
    let left = ctx.values()[lo..=mid].to_vec();
    let right = ctx.values()[mid + 1..=hi].to_vec();
    let (mut i, mut j, mut k) = (0, 0, lo);

    while i < left.len() && j < right.len() {
        ctx.inspect(k)?;
        let next = if left[i] <= right[j] {
            i += 1;
            left[i - 1]
        } else {
            j += 1;
            right[j - 1]
        };
        ctx.write(k, next, WriteKind::Uncounted)?;
        k += 1;
    }

    for &rest in left[i..].iter().chain(&right[j..]) {
        ctx.highlight(ActiveSet::one(k));
        ctx.write(k, rest, WriteKind::Uncounted)?;
        k += 1;
    }

    ctx.highlight(ActiveSet::none());
    Ok(())
}
