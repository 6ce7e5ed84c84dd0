//! Terminal rendering module.
//!
//! A small game-oriented rendering layer: the view draws the board into a
//! plain framebuffer of styled cells, and the renderer flushes framebuffers
//! to the terminal with diffed updates. The view is pure (no I/O) so it can
//! be unit-tested; only the renderer touches the terminal.

pub mod fb;
pub mod renderer;
pub mod view;

pub use tui_simon_core as core;
pub use tui_simon_types as types;

pub use fb::{Cell, FrameBuffer, Rgb, Style};
pub use renderer::TerminalRenderer;
pub use view::{GameView, Viewport};
