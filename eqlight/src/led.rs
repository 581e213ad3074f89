use std::io::{self, Stdout, Write};

use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};
use eq_viz::{LedStrip, Rgb, SinkError};

/// Development stand-in for the strip hardware: one terminal row of colored
/// cells below the bar display. `show` flushes the staged colors like a real
/// strip latches after its data line goes idle.
pub struct PreviewStrip {
    out: Stdout,
    pixels: Vec<Rgb>,
    screen_row: u16,
}

impl PreviewStrip {
    pub fn new(len: usize, screen_row: u16) -> Self {
        Self {
            out: io::stdout(),
            pixels: vec![Rgb::BLACK; len],
            screen_row,
        }
    }
}

impl LedStrip for PreviewStrip {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn set(&mut self, index: usize, color: Rgb) {
        if let Some(px) = self.pixels.get_mut(index) {
            *px = color;
        }
    }

    fn show(&mut self) -> Result<(), SinkError> {
        queue!(
            self.out,
            cursor::MoveTo(0, self.screen_row),
            Clear(ClearType::CurrentLine)
        )?;
        for px in &self.pixels {
            queue!(
                self.out,
                SetForegroundColor(Color::Rgb {
                    r: px.r,
                    g: px.g,
                    b: px.b,
                }),
                Print("■")
            )?;
        }
        queue!(self.out, ResetColor)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Strip backend for `--no-led`: accepts everything, drives nothing.
pub struct NullStrip {
    len: usize,
}

impl NullStrip {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl LedStrip for NullStrip {
    fn len(&self) -> usize {
        self.len
    }

    fn set(&mut self, _index: usize, _color: Rgb) {}

    fn show(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}
