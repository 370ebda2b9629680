//! The five instrumented sorting engines.
//!
//! Every engine performs its textbook algorithm on a working copy and, after
//! each visually meaningful mutation, hands a [`StepEvent`] to a
//! [`StepObserver`] and then waits on the [`Pacer`] before continuing.

mod bubble;
mod insertion;
mod merge;
mod quick;
mod selection;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use bubble::bubble_sort;
pub use insertion::insertion_sort;
pub use merge::merge_sort;
pub use quick::quick_sort;
pub use selection::selection_sort;

use crate::{Pacer, Result, SortVizError};

/// Supported sorting engines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Bubble,
    Selection,
    Insertion,
    Quick,
    Merge,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Quick,
        Algorithm::Merge,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Quick => "quick",
            Algorithm::Merge => "merge",
        }
    }

    /// Whether equal values keep their input order.
    pub fn is_stable(self) -> bool {
        matches!(
            self,
            Algorithm::Bubble | Algorithm::Insertion | Algorithm::Merge
        )
    }

    /// Short description of what a single animation step shows.
    pub fn step_description(self) -> &'static str {
        match self {
            Algorithm::Bubble => "swap of an adjacent out-of-order pair",
            Algorithm::Selection => "swap placing the minimum of the remainder",
            Algorithm::Insertion => "shift of an element while inserting the key",
            Algorithm::Quick => "partition swap or pivot placement",
            Algorithm::Merge => "element pushed into the merge result",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SortVizError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Algorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == wanted)
            .ok_or_else(|| SortVizError::UnknownAlgorithm(s.to_string()))
    }
}

/// What one animation frame should highlight. Borrowed from the engine for
/// the duration of a single observer call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepEvent<'a, T> {
    /// Two elements were swapped.
    Swap { a: usize, b: usize },
    /// The element at `from` was copied one slot up to `to`.
    Shift { from: usize, to: usize },
    /// The insertion key taken from `origin` was written to `index`.
    Place { index: usize, origin: usize },
    /// An element was pushed into a merge result. `offset` is where the merged
    /// sub-range starts in the full sequence.
    Merge {
        merged: &'a [T],
        left: &'a [T],
        right: &'a [T],
        offset: usize,
        from_right: bool,
    },
}

impl<T> StepEvent<'_, T> {
    /// Whether the step moved an element relative to the others.
    pub fn changes_order(&self) -> bool {
        match *self {
            StepEvent::Swap { a, b } => a != b,
            StepEvent::Shift { .. } => true,
            StepEvent::Place { index, origin } => index != origin,
            StepEvent::Merge { from_right, .. } => from_right,
        }
    }
}

/// Consumer of the steps emitted by an engine.
pub trait StepObserver<T> {
    fn on_step(&mut self, values: &[T], event: &StepEvent<'_, T>) -> Result<()>;
}

/// Observer that ignores every step.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl<T> StepObserver<T> for NullObserver {
    fn on_step(&mut self, _values: &[T], _event: &StepEvent<'_, T>) -> Result<()> {
        Ok(())
    }
}

/// Observer plus pacer handed to an engine for one run.
pub struct StepContext<'a, T> {
    observer: &'a mut (dyn StepObserver<T> + Send),
    pacer: Pacer,
    steps: u64,
}

impl<'a, T> StepContext<'a, T> {
    pub fn new(observer: &'a mut (dyn StepObserver<T> + Send), pacer: Pacer) -> Self {
        Self {
            observer,
            pacer,
            steps: 0,
        }
    }

    /// Shows one step and waits for the pacer before returning. Nothing is
    /// shown once the run has been cancelled.
    pub async fn emit(&mut self, values: &[T], event: StepEvent<'_, T>) -> Result<()> {
        if self.pacer.token().is_cancelled() {
            return Err(SortVizError::Cancelled);
        }
        self.steps += 1;
        self.observer.on_step(values, &event)?;
        self.pacer.pause().await
    }

    /// Number of steps emitted so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn pacer(&self) -> &Pacer {
        &self.pacer
    }
}

impl<T> fmt::Debug for StepContext<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepContext")
            .field("pacer", &self.pacer)
            .field("steps", &self.steps)
            .finish()
    }
}

/// Runs `algorithm` over the working copy and returns the sorted sequence.
pub async fn run_algorithm<T>(
    algorithm: Algorithm,
    mut values: Vec<T>,
    ctx: &mut StepContext<'_, T>,
) -> Result<Vec<T>>
where
    T: Ord + Clone + Send + Sync,
{
    tracing::debug!(%algorithm, len = values.len(), "running engine");
    match algorithm {
        Algorithm::Bubble => bubble_sort(&mut values, ctx).await?,
        Algorithm::Selection => selection_sort(&mut values, ctx).await?,
        Algorithm::Insertion => insertion_sort(&mut values, ctx).await?,
        Algorithm::Quick => quick_sort(&mut values, ctx).await?,
        Algorithm::Merge => return merge_sort(&values, ctx).await,
    }
    Ok(values)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Owned copy of a [`StepEvent`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum Recorded<T> {
        Swap(usize, usize),
        Shift(usize, usize),
        Place(usize, usize),
        Merge {
            merged: Vec<T>,
            left: Vec<T>,
            right: Vec<T>,
            offset: usize,
        },
    }

    #[derive(Debug)]
    pub struct Recorder<T> {
        pub events: Vec<Recorded<T>>,
        pub reordering: usize,
    }

    impl<T> Default for Recorder<T> {
        fn default() -> Self {
            Self {
                events: Vec::new(),
                reordering: 0,
            }
        }
    }

    impl<T: Clone> StepObserver<T> for Recorder<T> {
        fn on_step(&mut self, _values: &[T], event: &StepEvent<'_, T>) -> Result<()> {
            if event.changes_order() {
                self.reordering += 1;
            }
            self.events.push(match *event {
                StepEvent::Swap { a, b } => Recorded::Swap(a, b),
                StepEvent::Shift { from, to } => Recorded::Shift(from, to),
                StepEvent::Place { index, origin } => Recorded::Place(index, origin),
                StepEvent::Merge {
                    merged,
                    left,
                    right,
                    offset,
                    ..
                } => Recorded::Merge {
                    merged: merged.to_vec(),
                    left: left.to_vec(),
                    right: right.to_vec(),
                    offset,
                },
            });
            Ok(())
        }
    }

    /// Runs an engine with zero delay and records every step.
    pub async fn record<T>(algorithm: Algorithm, values: Vec<T>) -> (Vec<T>, Recorder<T>)
    where
        T: Ord + Clone + Send + Sync,
    {
        let mut recorder = Recorder::default();
        let sorted = {
            let mut ctx = StepContext::new(&mut recorder, Pacer::fixed(0));
            run_algorithm(algorithm, values, &mut ctx)
                .await
                .expect("zero-delay run cannot fail")
        };
        (sorted, recorder)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::testing::{record, Recorded, Recorder};
    use super::*;

    /// Value whose ordering ignores the tag, to observe stability.
    #[derive(Debug, Clone)]
    struct Tagged {
        key: u32,
        tag: usize,
    }

    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.key == other.key
        }
    }

    impl Eq for Tagged {}

    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> Ordering {
            self.key.cmp(&other.key)
        }
    }

    fn tagged(keys: &[u32]) -> Vec<Tagged> {
        keys.iter()
            .enumerate()
            .map(|(tag, &key)| Tagged { key, tag })
            .collect()
    }

    fn is_stable(sorted: &[Tagged]) -> bool {
        sorted
            .windows(2)
            .all(|pair| pair[0].key != pair[1].key || pair[0].tag < pair[1].tag)
    }

    fn random_inputs() -> Vec<Vec<u32>> {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        (0..60)
            .map(|len| (0..len).map(|_| rng.gen_range(0..12)).collect())
            .collect()
    }

    #[test]
    fn parses_algorithm_names() {
        assert_eq!("Quick".parse::<Algorithm>().unwrap(), Algorithm::Quick);
        assert_eq!(" merge ".parse::<Algorithm>().unwrap(), Algorithm::Merge);
        assert!(matches!(
            "bogo".parse::<Algorithm>(),
            Err(SortVizError::UnknownAlgorithm(_))
        ));
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn self_swaps_and_in_place_keys_do_not_reorder() {
        let self_swap: StepEvent<'_, u32> = StepEvent::Swap { a: 2, b: 2 };
        let swap: StepEvent<'_, u32> = StepEvent::Swap { a: 1, b: 2 };
        let kept: StepEvent<'_, u32> = StepEvent::Place { index: 3, origin: 3 };
        let shift: StepEvent<'_, u32> = StepEvent::Shift { from: 0, to: 1 };

        assert!(!self_swap.changes_order());
        assert!(swap.changes_order());
        assert!(!kept.changes_order());
        assert!(shift.changes_order());
    }

    #[test]
    fn step_events_serialize_with_kind_tag() {
        let event: StepEvent<'_, u32> = StepEvent::Swap { a: 1, b: 4 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"kind":"swap","a":1,"b":4}"#);
    }

    #[tokio::test]
    async fn every_engine_sorts_a_permutation() {
        for input in random_inputs() {
            let mut expected = input.clone();
            expected.sort();
            for algorithm in Algorithm::ALL {
                let (sorted, _) = record(algorithm, input.clone()).await;
                assert_eq!(sorted, expected, "{algorithm} on {input:?}");
            }
        }
    }

    #[tokio::test]
    async fn stable_engines_keep_equal_values_in_order() {
        for input in random_inputs() {
            for algorithm in Algorithm::ALL.into_iter().filter(|a| a.is_stable()) {
                let (sorted, _) = record(algorithm, tagged(&input)).await;
                assert!(is_stable(&sorted), "{algorithm} on {input:?}");
            }
        }
    }

    #[tokio::test]
    async fn selection_sort_is_not_stable() {
        let (sorted, _) = record(Algorithm::Selection, tagged(&[2, 2, 1])).await;
        let tags: Vec<_> = sorted.iter().map(|v| v.tag).collect();
        assert_eq!(tags, vec![2, 1, 0]);
        assert!(!is_stable(&sorted));
    }

    #[tokio::test]
    async fn sorted_input_needs_no_reordering_steps() {
        let input: Vec<u32> = vec![1, 2, 3, 5, 8, 13, 21];
        for algorithm in Algorithm::ALL {
            let (sorted, recorder) = record(algorithm, input.clone()).await;
            assert_eq!(sorted, input, "{algorithm}");
            assert_eq!(recorder.reordering, 0, "{algorithm}");
        }

        let (_, selection) = record(Algorithm::Selection, input.clone()).await;
        assert!(selection.events.is_empty());
    }

    #[tokio::test]
    async fn trivial_inputs_produce_no_steps() {
        for algorithm in Algorithm::ALL {
            let (sorted, recorder) = record(algorithm, Vec::<u32>::new()).await;
            assert!(sorted.is_empty());
            assert!(recorder.events.is_empty(), "{algorithm}");

            let (sorted, recorder) = record(algorithm, vec![42_u32]).await;
            assert_eq!(sorted, vec![42]);
            assert!(recorder.events.is_empty(), "{algorithm}");
        }
    }

    #[tokio::test]
    async fn repeated_runs_are_identical() {
        let input: Vec<u32> = vec![9, 4, 7, 4, 1, 8, 2, 2, 6];
        for algorithm in Algorithm::ALL {
            let (first, first_steps) = record(algorithm, input.clone()).await;
            let (second, second_steps) = record(algorithm, input.clone()).await;
            assert_eq!(first, second);
            assert_eq!(first_steps.events, second_steps.events, "{algorithm}");
        }
    }

    #[tokio::test]
    async fn all_engines_sort_the_reference_input() {
        for algorithm in Algorithm::ALL {
            let (sorted, _) = record(algorithm, vec![5_u32, 3, 1, 4, 2]).await;
            assert_eq!(sorted, vec![1, 2, 3, 4, 5], "{algorithm}");
        }
    }

    #[tokio::test]
    async fn bubble_sort_on_sorted_input_swaps_nothing() {
        let (sorted, recorder) = record(Algorithm::Bubble, vec![1_u32, 2, 3]).await;
        assert_eq!(sorted, vec![1, 2, 3]);
        assert!(!recorder
            .events
            .iter()
            .any(|event| matches!(event, Recorded::Swap(..))));
    }

    #[tokio::test]
    async fn context_counts_emitted_steps() {
        let mut observer = NullObserver;
        let mut ctx = StepContext::new(&mut observer, Pacer::fixed(0));
        let sorted = run_algorithm(Algorithm::Bubble, vec![3_u32, 2, 1], &mut ctx)
            .await
            .unwrap();
        assert_eq!(sorted, vec![1, 2, 3]);
        assert_eq!(ctx.steps(), 3);
    }

    #[tokio::test]
    async fn cancelled_pacer_aborts_the_run() {
        let mut recorder = Recorder::default();
        let pacer = Pacer::fixed(0);
        pacer.token().cancel();

        let steps = {
            let mut ctx = StepContext::new(&mut recorder, pacer);
            let err = run_algorithm(Algorithm::Quick, vec![3_u32, 2, 1], &mut ctx)
                .await
                .unwrap_err();
            assert!(err.is_cancelled());
            ctx.steps()
        };
        assert_eq!(steps, 0);
        assert!(recorder.events.is_empty());
    }

    #[tokio::test]
    async fn cancelled_run_shows_no_further_steps() {
        let mut recorder = Recorder::default();
        let pacer = Pacer::fixed(0);
        let token = pacer.token().clone();

        let mut ctx = StepContext::new(&mut recorder, pacer);
        let swap: StepEvent<'_, u32> = StepEvent::Swap { a: 0, b: 1 };
        ctx.emit(&[2, 1], swap).await.unwrap();
        token.cancel();
        let swap: StepEvent<'_, u32> = StepEvent::Swap { a: 1, b: 2 };
        let err = ctx.emit(&[1, 3, 2], swap).await.unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(ctx.steps(), 1);
        drop(ctx);

        assert_eq!(recorder.events, vec![Recorded::Swap(0, 1)]);
    }
}
