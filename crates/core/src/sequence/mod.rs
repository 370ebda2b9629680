use rand::Rng;

use crate::{config::validate_size, Result, SurfaceConfig};

/// Generates `size` uniformly distributed bar heights that fit the surface.
///
/// Values fall in `[min_value, height - margin)`.
pub fn generate<R: Rng + ?Sized>(
    size: usize,
    surface: &SurfaceConfig,
    rng: &mut R,
) -> Result<Vec<u32>> {
    validate_size(size)?;
    surface.validate()?;

    let range = surface.min_value..surface.value_ceiling();
    let values = (0..size).map(|_| rng.gen_range(range.clone())).collect();
    Ok(values)
}

/// Comma separated text listing of the values, as shown under the chart.
pub fn listing(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Single source of truth for the sequence between animation runs.
///
/// Every [`SequenceStore::set`] starts a new generation; a run that was started
/// against an older generation cannot commit its result any more.
#[derive(Debug, Default, Clone)]
pub struct SequenceStore {
    values: Vec<u32>,
    generation: u64,
}

impl SequenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the sequence and returns the new generation.
    pub fn set(&mut self, values: Vec<u32>) -> u64 {
        self.values = values;
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            len = self.values.len(),
            "sequence replaced"
        );
        self.generation
    }

    pub fn current(&self) -> &[u32] {
        &self.values
    }

    /// Working copy for an engine, tagged with the generation it came from.
    pub fn snapshot(&self) -> (u64, Vec<u32>) {
        (self.generation, self.values.clone())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Writes a finished run back. Returns `false` when the sequence was
    /// replaced after the run took its snapshot or the length changed.
    pub fn commit(&mut self, generation: u64, values: Vec<u32>) -> bool {
        if generation != self.generation || values.len() != self.values.len() {
            tracing::warn!(
                run_generation = generation,
                current_generation = self.generation,
                "discarding result of a stale sort run"
            );
            return false;
        }
        self.values = values;
        true
    }
}
