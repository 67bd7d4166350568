use crate::state::ActiveSet;

use super::{Step, StepContext};

/// Heap sort: build a max-heap bottom-up, then repeatedly move the root
/// behind the shrinking heap.
///
/// Each extracted slot settles as soon as the root lands there; index 0
/// settles last.
pub(super) fn sort(ctx: &mut StepContext<'_>) -> Step {
    let n = ctx.len();

    for root in (0..n / 2).rev() {
        sift_down(ctx, n, root)?;
    }

    for end in (1..n).rev() {
        ctx.swap(0, end)?;
        ctx.settle(end);
        sift_down(ctx, end, 0)?;
    }

    ctx.settle(0);
    ctx.finish();
    Ok(())
}

/// Restore the heap property below `root` within the first `len` elements.
fn sift_down(ctx: &mut StepContext<'_>, len: usize, mut root: usize) -> Step {
    loop {
        let left = 2 * root + 1;
        let right = left + 1;
        let mut largest = root;

        if left < len {
            ctx.compare(root, left)?;
            if ctx.value(left) > ctx.value(largest) {
                largest = left;
            }
        }
        if right < len {
            ctx.compare(largest, right)?;
            if ctx.value(right) > ctx.value(largest) {
                largest = right;
            }
        }

        if largest == root {
            break;
        }
        ctx.swap(root, largest)?;
        root = largest;
    }

    ctx.highlight(ActiveSet::none());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::Algorithm;
    use crate::drivers::testing::{assert_sorts, metrics, settle_order, trace};
    use crate::state::Metrics;

    #[test]
    fn settles_from_the_end_then_zero() {
        let (view, events) = trace(Algorithm::Heap, &[12, 11, 13, 5, 6, 7]);
        assert_eq!(settle_order(&events), vec![5, 4, 3, 2, 1, 0]);
        assert_eq!(view.array.values(), &[5, 6, 7, 11, 12, 13]);
    }

    #[test]
    fn two_elements() {
        // Heapify compares (0,1) and swaps; extraction swaps root and end.
        let m = metrics(Algorithm::Heap, &[10, 20]);
        assert_eq!(m, Metrics { comparisons: 1, swaps: 2 });
    }

    #[test]
    fn sorts_with_duplicates() {
        assert_sorts(Algorithm::Heap, &[30, 10, 30, 20, 10, 20, 30]);
    }
}
