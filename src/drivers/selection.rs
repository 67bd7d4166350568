use super::{Step, StepContext};

/// Scan the unsorted remainder for its minimum and swap it into place.
///
/// A position already holding its minimum costs no swap. Positions settle
/// left to right.
pub(super) fn sort(ctx: &mut StepContext<'_>) -> Step {
    let n = ctx.len();

    for i in 0..n {
        let mut min = i;
        for j in i + 1..n {
            ctx.compare(min, j)?;
            if ctx.value(j) < ctx.value(min) {
                min = j;
            }
        }

        if min != i {
            ctx.swap(i, min)?;
        }
        ctx.settle(i);
    }

    ctx.finish();
    Ok(())
}
