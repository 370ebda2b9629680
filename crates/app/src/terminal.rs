use std::io::{self, Stdout, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color, Stylize},
    terminal::{self, ClearType},
};
use sort_visualiser_core::{Bar, BarColor, FrameBuffer, Result, Surface};

/// Rows kept below the chart for the value listing.
const LISTING_ROWS: u16 = 3;

/// Surface that records bars into a [`FrameBuffer`] and paints every
/// presented frame onto the terminal as coloured block characters.
pub struct TerminalSurface {
    frame: FrameBuffer,
    out: Stdout,
    cols: u16,
    rows: u16,
}

impl TerminalSurface {
    pub fn new(width: f32, height: f32) -> Self {
        let (cols, rows) = terminal::size().unwrap_or((80, 24));
        Self {
            frame: FrameBuffer::new(width, height),
            out: io::stdout(),
            cols,
            rows,
        }
    }

    fn chart_rows(&self) -> u16 {
        self.rows.saturating_sub(LISTING_ROWS).max(1)
    }
}

impl Surface for TerminalSurface {
    fn width(&self) -> f32 {
        self.frame.width()
    }

    fn height(&self) -> f32 {
        self.frame.height()
    }

    fn clear(&mut self) {
        self.frame.clear();
    }

    fn fill_bar(&mut self, bar: Bar) {
        self.frame.fill_bar(bar);
    }

    fn present(&mut self, listing: &str) -> Result<()> {
        self.frame.present(listing)?;
        let chart_rows = self.chart_rows();
        let grid = self
            .frame
            .rasterize(usize::from(self.cols), usize::from(chart_rows));

        queue!(
            self.out,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::All)
        )?;
        for row in 0..grid.rows() {
            queue!(self.out, cursor::MoveTo(0, row as u16))?;
            for cell in grid.row(row) {
                match cell {
                    Some(color) => queue!(
                        self.out,
                        style::PrintStyledContent("█".with(palette(*color)))
                    )?,
                    None => queue!(self.out, style::Print(' '))?,
                }
            }
        }

        let width = usize::from(self.cols);
        let mut text: String = listing
            .chars()
            .take(width * usize::from(LISTING_ROWS - 1))
            .collect();
        if text.len() < listing.len() {
            text.push('…');
        }
        queue!(
            self.out,
            cursor::MoveTo(0, chart_rows + 1),
            style::Print(text)
        )?;
        self.out.flush()?;
        Ok(())
    }
}

fn palette(color: BarColor) -> Color {
    match color {
        BarColor::Base => Color::Rgb {
            r: 135,
            g: 206,
            b: 235,
        },
        BarColor::First => Color::Red,
        BarColor::Second | BarColor::RightRun => Color::Green,
        BarColor::Merged => Color::Rgb {
            r: 255,
            g: 165,
            b: 0,
        },
        BarColor::LeftRun => Color::Blue,
    }
}

/// Switches to the alternate screen for the lifetime of the guard.
pub struct ScreenGuard;

impl ScreenGuard {
    pub fn enter() -> Result<Self> {
        let mut out = io::stdout();
        queue!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        out.flush()?;
        Ok(Self)
    }
}

impl Drop for ScreenGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = queue!(out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = out.flush();
    }
}
