use super::{Step, StepContext};

/// Adjacent compare-and-swap passes, each one shorter than the last.
///
/// The last index of every pass is settled when the pass ends. A pass without
/// a swap proves the remaining prefix is ordered, so it is settled too and
/// the sort stops early.
pub(super) fn sort(ctx: &mut StepContext<'_>) -> Step {
    let n = ctx.len();

    for pass in 0..n - 1 {
        let end = n - pass - 1;
        let mut swapped = false;

        for j in 0..end {
            ctx.compare(j, j + 1)?;
            if ctx.value(j) > ctx.value(j + 1) {
                ctx.swap(j, j + 1)?;
                swapped = true;
            }
        }

        ctx.settle(end);
        if !swapped {
            ctx.settle_range(0..end);
            break;
        }
    }

    ctx.settle(0);
    ctx.finish();
    Ok(())
}
