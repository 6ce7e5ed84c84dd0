//! Key mapping from terminal events to game actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use tui_simon_types::{GameAction, Signal};

/// Map keyboard input to game actions.
///
/// Each signal answers to its board position (1-4, reading order) and to its
/// color initial.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    match key.code {
        // Signals
        KeyCode::Char('1') | KeyCode::Char('g') | KeyCode::Char('G') => {
            Some(GameAction::Press(Signal::Green))
        }
        KeyCode::Char('2') | KeyCode::Char('r') | KeyCode::Char('R') => {
            Some(GameAction::Press(Signal::Red))
        }
        KeyCode::Char('3') | KeyCode::Char('b') | KeyCode::Char('B') => {
            Some(GameAction::Press(Signal::Blue))
        }
        KeyCode::Char('4') | KeyCode::Char('y') | KeyCode::Char('Y') => {
            Some(GameAction::Press(Signal::Yellow))
        }

        // Start / restart
        KeyCode::Enter | KeyCode::Char(' ') => Some(GameAction::Start),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
