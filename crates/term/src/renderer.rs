//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! Draws are diffed against the previous frame so a mostly-static board only
//! re-emits the cells that changed (lit pads, status text, overlays).

use std::io::{self, Write as _};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand as _,
};

use crate::fb::{Cell, FrameBuffer, Rgb, Style};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    prev: Option<FrameBuffer>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            prev: None,
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    /// Draw a framebuffer, swapping it into internal state.
    ///
    /// Callers keep one `FrameBuffer` and pass it in every frame; the
    /// renderer diffs against the previous frame and then swaps buffers so
    /// the caller can reuse the old allocation.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let mut style: Option<Style> = None;

        let full = match &self.prev {
            Some(prev) => prev.width() != fb.width() || prev.height() != fb.height(),
            None => true,
        };

        if full {
            self.stdout
                .queue(terminal::Clear(terminal::ClearType::All))?;
            for y in 0..fb.height() {
                self.stdout.queue(cursor::MoveTo(0, y))?;
                for x in 0..fb.width() {
                    let cell = fb.get(x, y).unwrap_or_default();
                    self.emit(cell, &mut style)?;
                }
            }
        } else {
            let prev = self.prev.take().unwrap();
            for y in 0..fb.height() {
                self.flush_row_diff(y, prev.row(y), fb.row(y), &mut style)?;
            }
            self.prev = Some(prev);
        }

        self.stdout.queue(ResetColor)?;
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout.flush()?;

        // Swap the drawn frame into `prev` so the caller's buffer can be
        // reused without cloning.
        match &mut self.prev {
            Some(prev) => std::mem::swap(prev, fb),
            None => self.prev = Some(std::mem::replace(fb, FrameBuffer::new(0, 0))),
        }
        Ok(())
    }

    /// Emit the changed runs of one row.
    fn flush_row_diff(
        &mut self,
        y: u16,
        prev: &[Cell],
        next: &[Cell],
        style: &mut Option<Style>,
    ) -> Result<()> {
        let mut run_open = false;
        for (x, (old, new)) in prev.iter().zip(next).enumerate() {
            if old == new {
                run_open = false;
                continue;
            }
            if !run_open {
                self.stdout.queue(cursor::MoveTo(x as u16, y))?;
                run_open = true;
            }
            self.emit(*new, style)?;
        }
        Ok(())
    }

    fn emit(&mut self, cell: Cell, style: &mut Option<Style>) -> Result<()> {
        if *style != Some(cell.style) {
            self.apply_style(cell.style)?;
            *style = Some(cell.style);
        }
        self.stdout.queue(Print(cell.ch))?;
        Ok(())
    }

    fn apply_style(&mut self, style: Style) -> Result<()> {
        self.stdout.queue(SetAttribute(Attribute::Reset))?;
        self.stdout
            .queue(SetForegroundColor(rgb_to_color(style.fg)))?;
        self.stdout
            .queue(SetBackgroundColor(rgb_to_color(style.bg)))?;
        if style.bold {
            self.stdout.queue(SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            self.stdout.queue(SetAttribute(Attribute::Dim))?;
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn rgb_to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_conversion() {
        let rgb = Rgb::new(1, 2, 3);
        assert_eq!(rgb_to_color(rgb), Color::Rgb { r: 1, g: 2, b: 3 });
    }
}
