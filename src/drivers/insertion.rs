use super::{Step, StepContext, WriteKind};

/// Grow a sorted prefix by shifting larger elements right past a held key.
///
/// Every backward step costs a comparison, including the one that stops the
/// scan. Each shift counts as a swap; dropping the key into its slot does
/// not. Index `i` is settled once its key has been inserted.
pub(super) fn sort(ctx: &mut StepContext<'_>) -> Step {
    let n = ctx.len();
    ctx.settle(0);

    for i in 1..n {
        let key = ctx.value(i);
        let mut j = i;

        while j > 0 {
            ctx.compare(j - 1, j)?;
            let left = ctx.value(j - 1);
            if left <= key {
                break;
            }
            ctx.write(j, left, WriteKind::Counted)?;
            j -= 1;
        }

        if j != i {
            ctx.write(j, key, WriteKind::Uncounted)?;
        }
        ctx.settle(i);
    }

    ctx.finish();
    Ok(())
}
