use crate::state::ActiveSet;

use super::{Step, StepContext, WriteKind};

/// LSD radix sort, base 10.
///
/// Requires non-negative integers, which `u32` guarantees. One stable
/// counting pass runs per place value (ones, tens, ...) while the place does
/// not exceed the maximum. Each digit extraction is counted as a comparison
/// and each output placement as a swap. The array settles after the last
/// pass.
pub(super) fn sort(ctx: &mut StepContext<'_>) -> Step {
    let max = u64::from(ctx.values().iter().copied().max().unwrap_or(0));
    let mut place = 1u64;

    while max / place > 0 {
        digit_pass(ctx, place)?;
        place *= 10;
    }

    ctx.settle_all();
    ctx.finish();
    Ok(())
}

/// Stable redistribution by the digit at `place`.
///
/// Placements are written straight into the working buffer from a copy of
/// the pass input, walking the input backward to keep equal digits in order.
fn digit_pass(ctx: &mut StepContext<'_>, place: u64) -> Step {
    let digit = |value: u32| ((u64::from(value) / place) % 10) as usize;
    let input = ctx.values().to_vec();

    let mut counts = [0usize; 10];
    for (i, &value) in input.iter().enumerate() {
        counts[digit(value)] += 1;
        ctx.inspect(i)?;
    }

    for d in 1..counts.len() {
        counts[d] += counts[d - 1];
    }

    for (i, &value) in input.iter().enumerate().rev() {
        let d = digit(value);
        counts[d] -= 1;
        ctx.highlight(ActiveSet::one(i));
        ctx.write(counts[d], value, WriteKind::Counted)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::Algorithm;
    use crate::drivers::testing::{assert_sorts, metrics, settle_order, trace};
    use crate::state::Metrics;

    #[test]
    fn two_digit_values_take_two_passes() {
        let m = metrics(Algorithm::Radix, &[53, 89, 15, 10, 42]);
        assert_eq!(m, Metrics { comparisons: 10, swaps: 10 });
    }

    #[test]
    fn single_digit_values_take_one_pass() {
        let m = metrics(Algorithm::Radix, &[3, 9, 1]);
        assert_eq!(m, Metrics { comparisons: 3, swaps: 3 });
    }

    #[test]
    fn pass_is_stable() {
        // 21 and 20 share the tens digit; the ones pass must order them first.
        assert_sorts(Algorithm::Radix, &[21, 20, 11, 10]);
    }

    #[test]
    fn settles_at_the_end() {
        let (view, events) = trace(Algorithm::Radix, &[70, 45, 75, 90, 80, 24]);
        assert_eq!(settle_order(&events), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(view.array.values(), &[24, 45, 70, 75, 80, 90]);
    }

    #[test]
    fn all_zero_needs_no_pass() {
        let m = metrics(Algorithm::Radix, &[0, 0, 0]);
        assert_eq!(m, Metrics::default());
    }
}
