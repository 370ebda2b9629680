use futures::future::{BoxFuture, FutureExt};

use super::{StepContext, StepEvent};
use crate::Result;

/// Top-down merge sort. Unlike the other engines it leaves `values` untouched
/// and returns a new, sorted sequence.
pub async fn merge_sort<T>(values: &[T], ctx: &mut StepContext<'_, T>) -> Result<Vec<T>>
where
    T: Ord + Clone + Send + Sync,
{
    sort_run(values.to_vec(), 0, ctx).await
}

fn sort_run<'a, 'c, T>(
    mut values: Vec<T>,
    offset: usize,
    ctx: &'a mut StepContext<'c, T>,
) -> BoxFuture<'a, Result<Vec<T>>>
where
    T: Ord + Clone + Send + Sync + 'a,
    'c: 'a,
{
    async move {
        if values.len() <= 1 {
            return Ok(values);
        }
        let middle = values.len() / 2;
        let right = values.split_off(middle);
        let left = sort_run(values, offset, ctx).await?;
        let right = sort_run(right, offset + middle, ctx).await?;
        merge(left, right, offset, ctx).await
    }
    .boxed()
}

/// Merges two sorted runs. A step is shown for every element taken while both
/// runs still have elements; the leftover tail is appended silently. Ties take
/// from the left run, which keeps the sort stable.
async fn merge<T>(
    left: Vec<T>,
    right: Vec<T>,
    offset: usize,
    ctx: &mut StepContext<'_, T>,
) -> Result<Vec<T>>
where
    T: Ord + Clone + Send + Sync,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);

    while i < left.len() && j < right.len() {
        let from_right = right[j] < left[i];
        if from_right {
            merged.push(right[j].clone());
            j += 1;
        } else {
            merged.push(left[i].clone());
            i += 1;
        }
        let event = StepEvent::Merge {
            merged: &merged,
            left: &left[i..],
            right: &right[j..],
            offset,
            from_right,
        };
        ctx.emit(&merged, event).await?;
    }

    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    Ok(merged)
}
