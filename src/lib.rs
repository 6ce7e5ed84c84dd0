//! TUI Simon (workspace facade crate).
//!
//! This package keeps the `tui_simon::{core,input,term,audio,store,types}`
//! public API stable while the implementation lives in dedicated crates
//! under `crates/`.

pub use tui_simon_audio as audio;
pub use tui_simon_core as core;
pub use tui_simon_input as input;
pub use tui_simon_store as store;
pub use tui_simon_term as term;
pub use tui_simon_types as types;
