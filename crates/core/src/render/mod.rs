//! Step renderer: draws the sequence as proportioned bars on a [`Surface`] and
//! overdraws the elements touched by the latest algorithm step.

mod raster;

use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

pub use raster::{CellGrid, FrameBuffer};

use crate::{sequence::listing, Result, SortVizError, StepEvent, StepObserver};

/// Colour roles used by the renderer. Surfaces pick the concrete palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarColor {
    /// Every bar of a plain frame (skyblue).
    Base,
    /// First index of a compared/swapped pair (red).
    First,
    /// Second index of a compared/swapped pair (green).
    Second,
    /// Merge result produced so far (orange).
    Merged,
    /// Unconsumed part of the left merge run (blue).
    LeftRun,
    /// Unconsumed part of the right merge run (green).
    RightRun,
}

/// A single filled rectangle anchored to the bottom of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub index: usize,
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub color: BarColor,
}

/// Where the three groups of a merge frame are drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeOverlay {
    /// All groups start at index 0, overlapping each other.
    #[default]
    Approximate,
    /// Groups are drawn at the indices of the sub-range being merged.
    Positioned,
}

/// Drawing target for the renderer.
pub trait Surface: Send {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn clear(&mut self);
    fn fill_bar(&mut self, bar: Bar);
    /// Called once per frame after all bars were drawn.
    fn present(&mut self, listing: &str) -> Result<()>;
}

#[derive(Debug)]
pub struct StepRenderer<S> {
    surface: S,
    baseline: Vec<u32>,
    listing: String,
    overlay: MergeOverlay,
}

impl<S: Surface> StepRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self::with_overlay(surface, MergeOverlay::default())
    }

    pub fn with_overlay(surface: S, overlay: MergeOverlay) -> Self {
        Self {
            surface,
            baseline: Vec::new(),
            listing: String::new(),
            overlay,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The last sequence drawn by [`StepRenderer::render_full`].
    pub fn baseline(&self) -> &[u32] {
        &self.baseline
    }

    /// Text listing of the values shown by the most recent frame.
    pub fn listing(&self) -> &str {
        &self.listing
    }

    pub fn overlay(&self) -> MergeOverlay {
        self.overlay
    }

    pub fn set_overlay(&mut self, overlay: MergeOverlay) {
        self.overlay = overlay;
    }

    /// Clears the surface and draws one uniformly coloured bar per value.
    pub fn render_full(&mut self, values: &[u32]) -> Result<()> {
        self.draw_baseline(values);
        self.present()
    }

    /// Full frame with the bars at `a` and `b` overdrawn in the highlight
    /// colours. Indices must be inside `values`.
    pub fn render_highlighted(&mut self, values: &[u32], a: usize, b: usize) -> Result<()> {
        self.draw_baseline(values);
        let width = self.bar_width(values.len());
        self.fill(a, values[a], width, BarColor::First);
        self.fill(b, values[b], width, BarColor::Second);
        self.present()
    }

    /// Draws the baseline and overlays an in-progress merge: the result so far
    /// and the unconsumed remainders of both runs. `offset` is the index of the
    /// merged sub-range within the baseline.
    pub fn render_merge_frame(
        &mut self,
        merged: &[u32],
        left: &[u32],
        right: &[u32],
        offset: usize,
    ) -> Result<()> {
        self.surface.clear();
        let len = self.baseline.len().max(merged.len() + left.len() + right.len());
        let width = self.bar_width(len);
        for (index, &value) in self.baseline.iter().enumerate() {
            self.surface
                .fill_bar(bar(index, value, width, BarColor::Base));
        }

        let (merged_at, left_at, right_at) = match self.overlay {
            MergeOverlay::Approximate => (0, 0, 0),
            MergeOverlay::Positioned => {
                let left_at = offset + merged.len();
                (offset, left_at, left_at + left.len())
            }
        };
        self.fill_group(merged_at, merged, width, BarColor::Merged);
        self.fill_group(left_at, left, width, BarColor::LeftRun);
        self.fill_group(right_at, right, width, BarColor::RightRun);

        self.listing = listing(&self.baseline);
        self.surface.present(&self.listing)
    }

    fn draw_baseline(&mut self, values: &[u32]) {
        self.baseline.clear();
        self.baseline.extend_from_slice(values);
        self.surface.clear();
        let width = self.bar_width(values.len());
        for (index, &value) in values.iter().enumerate() {
            self.surface
                .fill_bar(bar(index, value, width, BarColor::Base));
        }
    }

    fn fill_group(&mut self, start: usize, values: &[u32], width: f32, color: BarColor) {
        for (k, &value) in values.iter().enumerate() {
            self.fill(start + k, value, width, color);
        }
    }

    fn fill(&mut self, index: usize, value: u32, width: f32, color: BarColor) {
        self.surface.fill_bar(bar(index, value, width, color));
    }

    fn present(&mut self) -> Result<()> {
        self.listing = listing(&self.baseline);
        self.surface.present(&self.listing)
    }

    fn bar_width(&self, len: usize) -> f32 {
        if len == 0 {
            0.0
        } else {
            self.surface.width() / len as f32
        }
    }
}

fn bar(index: usize, value: u32, width: f32, color: BarColor) -> Bar {
    Bar {
        index,
        x: index as f32 * width,
        width,
        height: value as f32,
        color,
    }
}

/// Renderer handle shared between the session and the task running an engine.
pub struct SharedRenderer<S> {
    inner: Arc<Mutex<StepRenderer<S>>>,
}

impl<S> Clone for SharedRenderer<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Surface> SharedRenderer<S> {
    pub fn new(renderer: StepRenderer<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(renderer)),
        }
    }

    pub fn lock(&self) -> Result<MutexGuard<'_, StepRenderer<S>>> {
        self.inner
            .lock()
            .map_err(|_| SortVizError::msg("step renderer has been poisoned"))
    }

    pub fn render_full(&self, values: &[u32]) -> Result<()> {
        self.lock()?.render_full(values)
    }
}

impl<S> std::fmt::Debug for SharedRenderer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedRenderer").finish()
    }
}

impl<S: Surface> StepObserver<u32> for StepRenderer<S> {
    fn on_step(&mut self, values: &[u32], event: &StepEvent<'_, u32>) -> Result<()> {
        match *event {
            StepEvent::Swap { a, b } => self.render_highlighted(values, a, b),
            StepEvent::Shift { from, to } => self.render_highlighted(values, from, to),
            StepEvent::Place { index, origin } => self.render_highlighted(values, index, origin),
            StepEvent::Merge {
                merged,
                left,
                right,
                offset,
                ..
            } => self.render_merge_frame(merged, left, right, offset),
        }
    }
}

impl<S: Surface> StepObserver<u32> for SharedRenderer<S> {
    fn on_step(&mut self, values: &[u32], event: &StepEvent<'_, u32>) -> Result<()> {
        self.lock()?.on_step(values, event)
    }
}
