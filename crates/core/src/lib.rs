//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules and state management.
//! It has **zero dependencies** on UI, audio, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical sequences
//! - **Testable**: Unit tests drive whole games through timers
//! - **Portable**: Can run in any environment (terminal, GUI, headless)
//!
//! # Module Structure
//!
//! - [`engine`]: The round lifecycle state machine (announce, playback,
//!   input, advance or terminate) with all presentation timers
//! - [`session`]: Per-game aggregate: sequence, player progress, level
//! - [`rng`]: Seeded uniform signal generation
//!
//! # Game Rules
//!
//! - The sequence grows by exactly one uniformly-drawn signal per round and
//!   never shrinks or reorders
//! - Playback is strictly sequential: each signal's activate/hold/gap cycle
//!   completes before the next begins
//! - Player input is checked incrementally against the sequence prefix; the
//!   first divergence ends the game
//! - Reproducing the full sequence completes the round, updates the high
//!   score if beaten, and schedules the next round after a confirmation beat
//!
//! # Example
//!
//! ```
//! use tui_simon_core::GameEngine;
//! use tui_simon_types::{GamePhase, ANNOUNCE_MS};
//!
//! let mut game = GameEngine::new(12345, 0);
//! game.start_game();
//! assert_eq!(game.phase(), GamePhase::Announcing);
//! assert_eq!(game.sequence().len(), 1);
//!
//! // Waits are timer state, not blocking calls.
//! game.tick(ANNOUNCE_MS);
//! assert_eq!(game.phase(), GamePhase::Playback);
//! ```
//!
//! # Timing
//!
//! The engine uses a fixed timestep system: call
//! [`GameEngine::tick`](engine::GameEngine::tick) every frame with elapsed
//! milliseconds. All phase durations live in `tui-simon-types`.

pub mod engine;
pub mod rng;
pub mod session;

pub use tui_simon_types as types;

// Re-export commonly used types for convenience
pub use engine::{GameEngine, GameOverOverlay, LevelOverlay};
pub use rng::{SignalSource, SimpleRng};
pub use session::{GameSession, PressOutcome};
