//! Game session - the per-game aggregate.
//!
//! A session holds the growing sequence, the player's progress within the
//! current round, and the level counter. It is reset wholesale on restart and
//! never destroyed mid-game, only superseded.

use tui_simon_types::Signal;

/// Verdict for one recorded player press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    /// Press matched; more signals remain in this round
    Partial,
    /// Press matched and reproduced the full sequence
    Complete,
    /// Press diverged from the stored sequence
    Mismatch,
}

/// Aggregate state for a single game.
///
/// Invariants: the player progress never grows past the sequence, and the
/// sequence only ever gains exactly one signal per round.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    sequence: Vec<Signal>,
    progress: Vec<Signal>,
    level: u32,
    playing: bool,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a fresh game and mark it live.
    pub fn reset(&mut self) {
        self.sequence.clear();
        self.progress.clear();
        self.level = 0;
        self.playing = true;
    }

    /// Mark the game as over. Sequence and progress stay readable.
    pub fn end(&mut self) {
        self.playing = false;
    }

    /// Advance to the next round: bump the level, clear the player progress,
    /// extend the sequence by exactly one signal.
    pub fn begin_round(&mut self, signal: Signal) {
        self.level += 1;
        self.progress.clear();
        self.sequence.push(signal);
    }

    /// Record one player press and judge it against the sequence prefix.
    pub fn record_press(&mut self, signal: Signal) -> PressOutcome {
        self.progress.push(signal);
        let index = self.progress.len() - 1;

        if self.sequence.get(index) != Some(&signal) {
            return PressOutcome::Mismatch;
        }

        if self.progress.len() == self.sequence.len() {
            PressOutcome::Complete
        } else {
            PressOutcome::Partial
        }
    }

    pub fn sequence(&self) -> &[Signal] {
        &self.sequence
    }

    pub fn progress_len(&self) -> usize {
        self.progress.len()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn playing(&self) -> bool {
        self.playing
    }

    /// Rounds cleared so far in this game (the current-score display).
    pub fn completed_rounds(&self) -> u32 {
        self.level.saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_clears_everything() {
        let mut session = GameSession::new();
        session.begin_round(Signal::Red);
        session.reset();

        assert!(session.sequence().is_empty());
        assert_eq!(session.progress_len(), 0);
        assert_eq!(session.level(), 0);
        assert!(session.playing());
    }

    #[test]
    fn test_begin_round_extends_by_one_and_preserves_prefix() {
        let mut session = GameSession::new();
        session.reset();

        session.begin_round(Signal::Green);
        session.begin_round(Signal::Yellow);
        session.begin_round(Signal::Green);

        assert_eq!(session.level(), 3);
        assert_eq!(
            session.sequence(),
            &[Signal::Green, Signal::Yellow, Signal::Green]
        );
        assert_eq!(session.completed_rounds(), 2);
    }

    #[test]
    fn test_press_verdicts() {
        let mut session = GameSession::new();
        session.reset();
        session.begin_round(Signal::Blue);
        session.begin_round(Signal::Red);

        assert_eq!(session.record_press(Signal::Blue), PressOutcome::Partial);
        assert_eq!(session.record_press(Signal::Red), PressOutcome::Complete);
    }

    #[test]
    fn test_first_divergence_is_a_mismatch() {
        let mut session = GameSession::new();
        session.reset();
        session.begin_round(Signal::Blue);
        session.begin_round(Signal::Red);
        session.begin_round(Signal::Green);

        assert_eq!(session.record_press(Signal::Blue), PressOutcome::Partial);
        assert_eq!(session.record_press(Signal::Yellow), PressOutcome::Mismatch);
    }

    #[test]
    fn test_progress_resets_each_round() {
        let mut session = GameSession::new();
        session.reset();
        session.begin_round(Signal::Blue);
        assert_eq!(session.record_press(Signal::Blue), PressOutcome::Complete);

        session.begin_round(Signal::Green);
        assert_eq!(session.progress_len(), 0);
        assert_eq!(session.record_press(Signal::Blue), PressOutcome::Partial);
        assert_eq!(session.record_press(Signal::Green), PressOutcome::Complete);
    }
}
