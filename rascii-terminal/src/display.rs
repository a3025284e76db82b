/// ASCII display for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use rascii_core::Surface;
use std::io::Write;

use crate::error::{AppError, Result};

/// Character luminosity ramp (darkest to lightest)
pub const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Ramp character for a luminance in 0..=1. Out-of-range values clamp.
pub fn glyph(luminance: f32) -> char {
    let max = LUMINOSITY_RAMP.len() - 1;
    let index = (luminance.clamp(0.0, 1.0) * max as f32) as usize;
    LUMINOSITY_RAMP[index.min(max)]
}

/// Writes surfaces to a terminal as rows of ramp characters
pub struct AsciiDisplay<W: Write> {
    out: W,
    width: usize,
    height: usize,
    buffer: String,
}

impl<W: Write> AsciiDisplay<W> {
    pub fn new(out: W, width: usize, height: usize) -> Self {
        Self {
            out,
            width,
            height,
            // one glyph per pixel plus a newline per row
            buffer: String::with_capacity(width * height + height),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Hide the cursor and clear the screen.
    pub fn prepare(&mut self) -> Result<()> {
        self.out.queue(cursor::Hide)?;
        self.out.queue(Clear(ClearType::All))?;
        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out.flush()?;
        Ok(())
    }

    /// Convert `surface` into the text buffer, one line per row.
    pub fn compose(&mut self, surface: &Surface) -> Result<&str> {
        if surface.width() != self.width || surface.height() != self.height {
            return Err(AppError::SizeMismatch {
                width: self.width,
                height: self.height,
                surface_width: surface.width(),
                surface_height: surface.height(),
            });
        }

        self.buffer.clear();
        for row in surface.rows() {
            self.buffer.extend(row.iter().map(|color| glyph(color.luminance())));
            self.buffer.push('\n');
        }
        Ok(&self.buffer)
    }

    /// Compose and present one frame. Each row is positioned explicitly
    /// since raw mode does not return the carriage on `\n`.
    pub fn draw(&mut self, surface: &Surface) -> Result<()> {
        self.compose(surface)?;
        for (y, line) in self.buffer.lines().enumerate() {
            self.out.queue(cursor::MoveTo(0, row(y)))?;
            self.out.queue(Print(line))?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Yellow overlay on the row below the frame.
    pub fn status_line(&mut self, text: &str) -> Result<()> {
        self.out.queue(cursor::MoveTo(0, row(self.height)))?;
        self.out.queue(SetForegroundColor(Color::Yellow))?;
        self.out.queue(Print(text))?;
        self.out.queue(ResetColor)?;
        self.out.queue(Clear(ClearType::UntilNewLine))?;
        self.out.flush()?;
        Ok(())
    }

    /// Restore colors and the cursor.
    pub fn cleanup(&mut self) -> Result<()> {
        self.out.queue(ResetColor)?;
        self.out.queue(cursor::Show)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn row(y: usize) -> u16 {
    u16::try_from(y).unwrap_or(u16::MAX)
}
