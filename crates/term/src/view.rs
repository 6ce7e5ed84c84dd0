//! GameView: maps engine state into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use tui_simon_core::engine::GameEngine;
use tui_simon_types::{GamePhase, Signal, VisualMode};

use crate::fb::{FrameBuffer, Rgb, Style};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Resting pads keep this fraction of their lit color.
const RESTING_PAD_BRIGHTNESS: u8 = 35;

#[derive(Debug, Clone, Copy)]
struct Layout {
    start_x: u16,
    start_y: u16,
    frame_w: u16,
    frame_h: u16,
}

/// A lightweight terminal renderer for the signal board.
pub struct GameView {
    /// Pad width in terminal columns.
    pad_w: u16,
    /// Pad height in terminal rows.
    pad_h: u16,
    /// Gap between pads, both axes.
    pad_gap: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 8x4 pads read as roughly square in typical terminal glyphs.
        Self {
            pad_w: 8,
            pad_h: 4,
            pad_gap: 2,
        }
    }
}

impl GameView {
    pub fn new(pad_w: u16, pad_h: u16) -> Self {
        Self {
            pad_w,
            pad_h,
            pad_gap: 2,
        }
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is resized only
    /// when the terminal size changes.
    pub fn render_into(&self, engine: &GameEngine, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Style::default().cell(' '));

        let layout = self.layout(viewport);

        self.draw_title(fb, &layout);
        self.draw_border(fb, &layout);
        self.draw_pads(fb, engine, &layout);
        self.draw_side_panel(fb, engine, viewport, &layout);
        self.draw_status(fb, engine, viewport, &layout);

        // Overlays draw on top of the board.
        if let Some(overlay) = engine.level_overlay() {
            let text = format!("LEVEL {}", overlay.level);
            if overlay.shrinking {
                self.draw_overlay_band(fb, &layout, 1, &text, Style::default(), 0);
            } else {
                let style = Style::new(Rgb::new(255, 255, 255), Rgb::new(40, 40, 70)).bold();
                self.draw_overlay_band(fb, &layout, 3, &text, style, 0);
            }
        }
        if let Some(overlay) = engine.game_over_overlay() {
            let style = Style::new(Rgb::new(255, 230, 230), Rgb::new(110, 20, 20)).bold();
            self.draw_overlay_band(fb, &layout, 3, "GAME OVER", style, overlay.shake);
        }
    }

    fn layout(&self, viewport: Viewport) -> Layout {
        let frame_w = 2 * self.pad_w + self.pad_gap + 2;
        let frame_h = 2 * self.pad_h + self.pad_gap + 2;
        Layout {
            start_x: viewport.width.saturating_sub(frame_w) / 2,
            start_y: viewport.height.saturating_sub(frame_h) / 2,
            frame_w,
            frame_h,
        }
    }

    /// Top-left corner of a pad, by signal index (reading order).
    fn pad_origin(&self, layout: &Layout, index: usize) -> (u16, u16) {
        let col = (index % 2) as u16;
        let row = (index / 2) as u16;
        (
            layout.start_x + 1 + col * (self.pad_w + self.pad_gap),
            layout.start_y + 1 + row * (self.pad_h + self.pad_gap),
        )
    }

    fn draw_title(&self, fb: &mut FrameBuffer, layout: &Layout) {
        if layout.start_y == 0 {
            return;
        }
        let style = Style::new(Rgb::new(200, 200, 210), Rgb::new(0, 0, 0)).bold();
        fb.put_str_centered(
            layout.start_x,
            layout.frame_w,
            layout.start_y - 1,
            "S I M O N",
            style,
        );
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: &Layout) {
        let style = Style::new(Rgb::new(130, 130, 145), Rgb::new(0, 0, 0));
        let (x, y, w, h) = (
            layout.start_x,
            layout.start_y,
            layout.frame_w,
            layout.frame_h,
        );
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_pads(&self, fb: &mut FrameBuffer, engine: &GameEngine, layout: &Layout) {
        let lit = engine.lit_signal();

        for signal in Signal::ALL {
            let (px, py) = self.pad_origin(layout, signal.index());
            let is_lit = lit == Some(signal);

            let bg = if is_lit {
                signal_color(signal)
            } else {
                signal_color(signal).scaled(RESTING_PAD_BRIGHTNESS)
            };
            let pad = Style::new(bg, bg);
            fb.fill_rect(px, py, self.pad_w, self.pad_h, ' ', pad);

            // Key hint in the pad center.
            let label = char::from(b'1' + signal.index() as u8);
            let label_fg = if is_lit {
                Rgb::new(20, 20, 20)
            } else {
                Rgb::new(220, 220, 220)
            };
            let mut style = Style::new(label_fg, bg);
            if is_lit {
                style = style.bold();
            }
            fb.put_char(
                px + self.pad_w / 2,
                py + self.pad_h / 2,
                label,
                style,
            );
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        engine: &GameEngine,
        viewport: Viewport,
        layout: &Layout,
    ) {
        let panel_x = layout.start_x.saturating_add(layout.frame_w).saturating_add(3);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 8 {
            return;
        }

        let label = Style::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold();
        let value = Style::new(Rgb::new(190, 190, 190), Rgb::new(0, 0, 0));

        let mut y = layout.start_y;
        fb.put_str(panel_x, y, "LEVEL", label);
        y = y.saturating_add(1);
        let level = if engine.level() > 0 {
            format!("{}", engine.level())
        } else {
            "-".to_string()
        };
        fb.put_str(panel_x, y, &level, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, &format!("{}", engine.completed_rounds()), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "BEST", label);
        y = y.saturating_add(1);
        fb.put_str(panel_x, y, &format!("{}", engine.high_score()), value);
        y = y.saturating_add(2);

        // Entered-so-far dots, only while the player is reproducing.
        if engine.phase() == GamePhase::AwaitingInput {
            fb.put_str(panel_x, y, "INPUT", label);
            y = y.saturating_add(1);
            let mut dots = String::new();
            for i in 0..engine.sequence().len() {
                dots.push(if i < engine.progress_len() { '●' } else { '○' });
                if dots.chars().count() as u16 >= panel_w {
                    break;
                }
            }
            fb.put_str(panel_x, y, &dots, value);
        }
    }

    fn draw_status(
        &self,
        fb: &mut FrameBuffer,
        engine: &GameEngine,
        viewport: Viewport,
        layout: &Layout,
    ) {
        let status_y = layout.start_y + layout.frame_h + 1;
        let style = Style::new(Rgb::new(210, 210, 210), Rgb::new(0, 0, 0));
        fb.put_str_centered(0, viewport.width, status_y, engine.status_line(), style);

        if engine.visual_mode() == VisualMode::PreGame {
            let help = Style::new(Rgb::new(140, 140, 150), Rgb::new(0, 0, 0)).dimmed();
            fb.put_str_centered(
                0,
                viewport.width,
                status_y + 2,
                "[ENTER] start   [1-4] or [G/R/B/Y] pads   [Q] quit",
                help,
            );
        }
    }

    /// A horizontal band over the board center with centered text.
    fn draw_overlay_band(
        &self,
        fb: &mut FrameBuffer,
        layout: &Layout,
        band_h: u16,
        text: &str,
        style: Style,
        shake: i16,
    ) {
        let band_w = layout.frame_w.saturating_add(4);
        let band_x = layout.start_x.saturating_sub(2).saturating_add_signed(shake);
        let band_y = layout.start_y + layout.frame_h / 2 - band_h / 2;

        fb.fill_rect(band_x, band_y, band_w, band_h, ' ', style);
        fb.put_str_centered(band_x, band_w, band_y + band_h / 2, text, style);
    }
}

/// Lit color for each signal pad.
fn signal_color(signal: Signal) -> Rgb {
    match signal {
        Signal::Green => Rgb::new(60, 200, 90),
        Signal::Red => Rgb::new(225, 70, 60),
        Signal::Blue => Rgb::new(70, 120, 230),
        Signal::Yellow => Rgb::new(235, 200, 60),
    }
}
