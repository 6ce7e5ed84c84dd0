//! Input module - terminal key events to game actions.
//!
//! Simon input is one discrete event per selection: a press either starts a
//! game or selects a signal. There is no held-key or auto-repeat handling.

pub mod map;

pub use tui_simon_types as types;

pub use map::{handle_key_event, should_quit};
