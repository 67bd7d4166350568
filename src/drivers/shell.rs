use super::{Step, StepContext, WriteKind};

/// Gapped insertion sort with gaps n/2, n/4, ..., 1.
///
/// Only comparisons that lead to a shift are reported; the failing test that
/// ends a scan is silent. Each insertion point is settled when its element
/// lands, and the whole array once the gap reaches zero.
pub(super) fn sort(ctx: &mut StepContext<'_>) -> Step {
    let n = ctx.len();
    let mut gap = n / 2;

    while gap > 0 {
        for i in gap..n {
            let held = ctx.value(i);
            let mut j = i;

            while j >= gap && ctx.value(j - gap) > held {
                ctx.compare(j, j - gap)?;
                let shifted = ctx.value(j - gap);
                ctx.write(j, shifted, WriteKind::Counted)?;
                j -= gap;
            }

            ctx.write(j, held, WriteKind::Uncounted)?;
            ctx.settle(j);
        }
        gap /= 2;
    }

    ctx.settle_all();
    ctx.finish();
    Ok(())
}
