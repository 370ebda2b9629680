use super::{StepContext, StepEvent};
use crate::Result;

/// Repeatedly swaps adjacent out-of-order pairs. There is no early exit, so
/// every pass runs even when the slice is already sorted.
pub async fn bubble_sort<T>(values: &mut [T], ctx: &mut StepContext<'_, T>) -> Result<()>
where
    T: Ord + Send + Sync,
{
    let len = values.len();
    for pass in 0..len.saturating_sub(1) {
        for j in 0..len - pass - 1 {
            if values[j] > values[j + 1] {
                values.swap(j, j + 1);
                ctx.emit(values, StepEvent::Swap { a: j, b: j + 1 }).await?;
            }
        }
    }
    Ok(())
}
