use super::{StepContext, StepEvent};
use crate::Result;

/// Moves the minimum of the unsorted remainder to its front. Only swaps that
/// actually move an element are shown; the scans are not.
pub async fn selection_sort<T>(values: &mut [T], ctx: &mut StepContext<'_, T>) -> Result<()>
where
    T: Ord + Send + Sync,
{
    let len = values.len();
    for i in 0..len.saturating_sub(1) {
        let mut min = i;
        for j in i + 1..len {
            if values[j] < values[min] {
                min = j;
            }
        }
        if min != i {
            values.swap(i, min);
            ctx.emit(values, StepEvent::Swap { a: i, b: min }).await?;
        }
    }
    Ok(())
}
