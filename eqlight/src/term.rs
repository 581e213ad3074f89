use std::io::{self, Stdout, Write};

use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style::Print};
use eq_viz::{ColorContext, ColorStrategy, FrameSink, Rgb, SinkError, VisualFrame};

const FILLED: &str = "█";

fn to_term(color: Rgb) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Bar display drawn in place on the alternate screen: `max_height` rows of
/// cells top-down, a persistent footer row, and a status line showing the
/// live smoothing factor. Owns the terminal modes and restores them on drop.
pub struct TermSink {
    out: Stdout,
    bars: usize,
    max_height: u16,
    colors: Box<dyn ColorStrategy + Send>,
}

impl TermSink {
    pub fn new(
        bars: usize,
        max_height: u16,
        colors: Box<dyn ColorStrategy + Send>,
    ) -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, cursor::Hide)?;
        Ok(Self {
            out,
            bars,
            max_height,
            colors,
        })
    }
}

impl FrameSink for TermSink {
    fn render(&mut self, frame: &VisualFrame, smoothing: f32) -> Result<(), SinkError> {
        // Top row is the tallest; `row` is the 1-based height a cell stands
        // for, so screen line 0 carries row == max_height.
        for row in (1..=self.max_height).rev() {
            queue!(
                self.out,
                cursor::MoveTo(0, self.max_height - row),
                Clear(ClearType::CurrentLine)
            )?;
            for (band_index, &height) in frame.heights.iter().enumerate() {
                if height >= row {
                    let color = self.colors.color(&ColorContext {
                        band_index,
                        num_bands: self.bars,
                        row,
                        height,
                        max_height: self.max_height,
                    });
                    queue!(self.out, SetForegroundColor(to_term(color)), Print(FILLED))?;
                } else {
                    queue!(self.out, Print(" "))?;
                }
            }
        }

        queue!(
            self.out,
            cursor::MoveTo(0, self.max_height),
            ResetColor,
            Print(FILLED.repeat(self.bars)),
            cursor::MoveTo(0, self.max_height + 1),
            Clear(ClearType::CurrentLine),
            Print(format!("Smoothing: {smoothing:.2}  [+/- adjust, q quit]")),
        )?;
        self.out.flush()?;
        Ok(())
    }
}

impl Drop for TermSink {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
