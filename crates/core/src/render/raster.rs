use super::{Bar, BarColor, Surface};
use crate::Result;

/// In-memory surface that keeps the bars of the current frame.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    width: f32,
    height: f32,
    bars: Vec<Bar>,
    frames: u64,
    last_listing: String,
}

impl FrameBuffer {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Bars in draw order; later entries paint over earlier ones.
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_listing(&self) -> &str {
        &self.last_listing
    }

    pub fn rasterize(&self, cols: usize, rows: usize) -> CellGrid {
        CellGrid::rasterize(&self.bars, self.width, self.height, cols, rows)
    }
}

impl Surface for FrameBuffer {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.bars.clear();
    }

    fn fill_bar(&mut self, bar: Bar) {
        self.bars.push(bar);
    }

    fn present(&mut self, listing: &str) -> Result<()> {
        self.frames += 1;
        self.last_listing.clear();
        self.last_listing.push_str(listing);
        Ok(())
    }
}

/// Character-cell approximation of a frame. Row 0 is the top of the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    cols: usize,
    rows: usize,
    cells: Vec<Option<BarColor>>,
}

impl CellGrid {
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; cols * rows],
        }
    }

    /// Scales bars drawn on a `width` x `height` surface onto the grid. Every
    /// bar covers at least one column; bars drawn later win.
    pub fn rasterize(bars: &[Bar], width: f32, height: f32, cols: usize, rows: usize) -> Self {
        let mut grid = Self::new(cols, rows);
        if cols == 0 || rows == 0 || width <= 0.0 || height <= 0.0 {
            return grid;
        }

        let sx = cols as f32 / width;
        let sy = rows as f32 / height;
        for bar in bars {
            let start = ((bar.x * sx).floor() as usize).min(cols - 1);
            let end = (((bar.x + bar.width) * sx).floor() as usize).clamp(start + 1, cols);
            let filled = ((bar.height * sy).round() as usize).min(rows);
            for row in rows - filled..rows {
                for col in start..end {
                    grid.cells[row * cols + col] = Some(bar.color);
                }
            }
        }
        grid
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<BarColor> {
        self.cells.get(row * self.cols + col).copied().flatten()
    }

    pub fn row(&self, row: usize) -> &[Option<BarColor>] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(index: usize, x: f32, width: f32, height: f32, color: BarColor) -> Bar {
        Bar {
            index,
            x,
            width,
            height,
            color,
        }
    }

    #[test]
    fn fills_columns_from_the_bottom() {
        let bars = [
            bar(0, 0.0, 50.0, 100.0, BarColor::Base),
            bar(1, 50.0, 50.0, 50.0, BarColor::First),
        ];
        let grid = CellGrid::rasterize(&bars, 100.0, 100.0, 4, 4);

        assert_eq!(grid.cell(0, 0), Some(BarColor::Base));
        assert_eq!(grid.cell(1, 3), Some(BarColor::Base));
        assert_eq!(grid.cell(2, 1), None);
        assert_eq!(grid.cell(3, 2), Some(BarColor::First));
        assert_eq!(
            grid.row(3),
            &[
                Some(BarColor::Base),
                Some(BarColor::Base),
                Some(BarColor::First),
                Some(BarColor::First)
            ]
        );
    }

    #[test]
    fn narrow_bars_still_cover_a_column() {
        let bars = [bar(0, 0.0, 1.0, 10.0, BarColor::Base)];
        let grid = CellGrid::rasterize(&bars, 100.0, 10.0, 10, 2);
        assert_eq!(grid.cell(0, 1), Some(BarColor::Base));
        assert_eq!(grid.cell(1, 1), None);
    }

    #[test]
    fn empty_grid_for_degenerate_sizes() {
        let grid = CellGrid::rasterize(&[], 0.0, 10.0, 0, 0);
        assert_eq!(grid.cols(), 0);
        assert_eq!(grid.rows(), 0);
    }
}
