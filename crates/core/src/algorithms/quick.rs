use futures::future::{BoxFuture, FutureExt};

use super::{StepContext, StepEvent};
use crate::Result;

/// Quick sort with a Lomuto partition around the rightmost element.
pub async fn quick_sort<T>(values: &mut [T], ctx: &mut StepContext<'_, T>) -> Result<()>
where
    T: Ord + Send + Sync,
{
    if values.len() < 2 {
        return Ok(());
    }
    let right = values.len() - 1;
    sort_range(values, 0, right, ctx).await
}

fn sort_range<'a, 'c, T>(
    values: &'a mut [T],
    left: usize,
    right: usize,
    ctx: &'a mut StepContext<'c, T>,
) -> BoxFuture<'a, Result<()>>
where
    T: Ord + Send + Sync + 'a,
    'c: 'a,
{
    async move {
        if left >= right {
            return Ok(());
        }
        let pivot = partition(values, left, right, ctx).await?;
        if pivot > left {
            sort_range(values, left, pivot - 1, ctx).await?;
        }
        sort_range(values, pivot + 1, right, ctx).await
    }
    .boxed()
}

/// Moves every element smaller than the pivot in front of it and returns the
/// pivot's final index. Each of those swaps is a step, including swaps of an
/// element with itself, followed by the pivot placement.
async fn partition<T>(
    values: &mut [T],
    left: usize,
    right: usize,
    ctx: &mut StepContext<'_, T>,
) -> Result<usize>
where
    T: Ord + Send + Sync,
{
    let mut store = left;
    for j in left..right {
        if values[j] < values[right] {
            values.swap(store, j);
            ctx.emit(values, StepEvent::Swap { a: store, b: j }).await?;
            store += 1;
        }
    }
    values.swap(store, right);
    ctx.emit(values, StepEvent::Swap { a: store, b: right })
        .await?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::algorithms::testing::{record, Recorded};
    use crate::Algorithm;

    #[tokio::test]
    async fn partitions_around_rightmost_pivot() {
        let (sorted, recorder) = record(Algorithm::Quick, vec![3_u32, 1, 2]).await;

        assert_eq!(sorted, vec![1, 2, 3]);
        assert_eq!(
            recorder.events,
            vec![Recorded::Swap(0, 1), Recorded::Swap(1, 2)]
        );
    }

    #[tokio::test]
    async fn sorted_input_only_swaps_in_place() {
        let (sorted, recorder) = record(Algorithm::Quick, vec![1_u32, 2, 3]).await;

        assert_eq!(sorted, vec![1, 2, 3]);
        assert_eq!(
            recorder.events,
            vec![
                Recorded::Swap(0, 0),
                Recorded::Swap(1, 1),
                Recorded::Swap(2, 2),
                Recorded::Swap(0, 0),
                Recorded::Swap(1, 1),
            ]
        );
        assert_eq!(recorder.reordering, 0);
    }
}
