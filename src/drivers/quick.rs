use crate::state::ActiveSet;

use super::{Step, StepContext};

/// Quicksort with Lomuto partitioning around the last element.
///
/// Every element smaller than the pivot is swapped into the growing low
/// region, even when it is already in place, and the pivot placement is one
/// more swap. The array settles only after the outermost call returns.
pub(super) fn sort(ctx: &mut StepContext<'_>) -> Step {
    let n = ctx.len();
    sort_range(ctx, 0, n - 1)?;
    ctx.settle_all();
    ctx.finish();
    Ok(())
}

fn sort_range(ctx: &mut StepContext<'_>, low: usize, high: usize) -> Step {
    if low >= high {
        return Ok(());
    }
    let pivot = partition(ctx, low, high)?;
    if pivot > low {
        sort_range(ctx, low, pivot - 1)?;
    }
    sort_range(ctx, pivot + 1, high)
}

fn partition(ctx: &mut StepContext<'_>, low: usize, high: usize) -> Step<usize> {
    let pivot = ctx.value(high);
    let mut store = low;

    for j in low..high {
        ctx.compare(j, high)?;
        if ctx.value(j) < pivot {
            ctx.swap(store, j)?;
            store += 1;
        }
    }

    ctx.swap(store, high)?;
    ctx.highlight(ActiveSet::none());
    Ok(store)
}
