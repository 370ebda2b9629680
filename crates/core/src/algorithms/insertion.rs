use super::{StepContext, StepEvent};
use crate::Result;

/// Shifts larger elements up one slot until the key fits. Every shift is a
/// step, and so is writing the key back, even when it did not move.
pub async fn insertion_sort<T>(values: &mut [T], ctx: &mut StepContext<'_, T>) -> Result<()>
where
    T: Ord + Clone + Send + Sync,
{
    for i in 1..values.len() {
        let key = values[i].clone();
        let mut j = i;
        while j > 0 && values[j - 1] > key {
            values[j] = values[j - 1].clone();
            ctx.emit(values, StepEvent::Shift { from: j - 1, to: j })
                .await?;
            j -= 1;
        }
        values[j] = key;
        ctx.emit(values, StepEvent::Place { index: j, origin: i })
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::algorithms::testing::{record, Recorded};
    use crate::Algorithm;

    #[tokio::test]
    async fn shifts_then_places_each_key() {
        let (sorted, recorder) = record(Algorithm::Insertion, vec![3_u32, 1, 2]).await;

        assert_eq!(sorted, vec![1, 2, 3]);
        assert_eq!(
            recorder.events,
            vec![
                Recorded::Shift(0, 1),
                Recorded::Place(0, 1),
                Recorded::Shift(1, 2),
                Recorded::Place(1, 2),
            ]
        );
        assert_eq!(recorder.reordering, 4);
    }

    #[tokio::test]
    async fn sorted_input_only_places_keys_in_place() {
        let (_, recorder) = record(Algorithm::Insertion, vec![1_u32, 2, 3]).await;
        assert_eq!(
            recorder.events,
            vec![Recorded::Place(1, 1), Recorded::Place(2, 2)]
        );
        assert_eq!(recorder.reordering, 0);
    }
}
