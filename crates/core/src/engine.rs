//! Game engine - the round lifecycle state machine.
//!
//! The engine owns the session and the high score and is the sole authority
//! on advance/terminate decisions. Every presentation beat (announcement,
//! per-signal activation, confirmation delay, game-over hold) is a phase
//! timer advanced by [`GameEngine::tick`]; nothing blocks. Rendering reads
//! engine state each frame; tones and high-score persistence are queued as
//! [`Effect`] requests and drained by the caller.

use arrayvec::ArrayVec;

use tui_simon_types::{
    Effect, GameAction, GamePhase, Signal, VisualMode, ANNOUNCE_MS, GAME_OVER_OVERLAY_MS,
    GAME_OVER_SHAKE_END_MS, GAME_OVER_SHAKE_START_MS, GAME_OVER_TONE_DELAY_MS, LEVEL_OVERLAY_MS,
    LEVEL_OVERLAY_SHRINK_AT_MS, ROUND_COMPLETE_DELAY_MS, SIGNAL_ACTIVE_MS, SIGNAL_GAP_MS,
};

use crate::rng::SignalSource;
use crate::session::{GameSession, PressOutcome};

/// Upper bound on effects queued between drains.
const EFFECT_QUEUE_CAP: usize = 16;

/// Effects drained from the engine once per loop iteration.
pub type EffectQueue = ArrayVec<Effect, EFFECT_QUEUE_CAP>;

/// Level announcement presentation, queried by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelOverlay {
    pub level: u32,
    /// True once the big number is collapsing into the level indicator.
    pub shrinking: bool,
}

/// Game-over presentation, queried by the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOverOverlay {
    /// Horizontal shake offset in cells.
    pub shake: i16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Announcing {
        elapsed_ms: u32,
    },
    Playback {
        index: usize,
        elapsed_ms: u32,
        in_gap: bool,
    },
    AwaitingInput,
    RoundComplete {
        elapsed_ms: u32,
    },
    GameOver {
        elapsed_ms: u32,
        tone_fired: bool,
    },
}

/// The game engine.
///
/// Constructed once per process with a seed and the stored high score, then
/// driven by `apply_action` / `tick` from the event loop.
#[derive(Debug, Clone)]
pub struct GameEngine {
    session: GameSession,
    phase: Phase,
    signals: SignalSource,
    high_score: u32,
    /// Player activation pulse: signal plus remaining ms. Runs on its own
    /// timer, independent of the phase machine, so it can outlive a
    /// transition into GameOver.
    input_pulse: Option<(Signal, u32)>,
    effects: EffectQueue,
}

impl GameEngine {
    pub fn new(seed: u32, high_score: u32) -> Self {
        Self {
            session: GameSession::new(),
            phase: Phase::Idle,
            signals: SignalSource::new(seed),
            high_score,
            input_pulse: None,
            effects: EffectQueue::new(),
        }
    }

    /// Start (or restart) a game. Any game in progress is abandoned.
    pub fn start_game(&mut self) {
        self.session.reset();
        self.input_pulse = None;
        self.next_round();
    }

    pub fn apply_action(&mut self, action: GameAction) {
        match action {
            GameAction::Start => self.start_game(),
            GameAction::Press(signal) => self.submit_signal(signal),
        }
    }

    /// Record one player press.
    ///
    /// A no-op unless the engine is currently accepting input; the input
    /// surface never produces invalid signals, so there is nothing to error.
    pub fn submit_signal(&mut self, signal: Signal) {
        if !self.accepting_input() {
            return;
        }

        // Fire-and-forget activation pulse; the verdict below never waits
        // for it.
        self.input_pulse = Some((signal, SIGNAL_ACTIVE_MS));
        self.push_effect(Effect::PlayTone(signal));

        match self.session.record_press(signal) {
            PressOutcome::Mismatch => self.end_game(),
            PressOutcome::Complete => {
                let level = self.session.level();
                if level > self.high_score {
                    self.high_score = level;
                    self.push_effect(Effect::SaveHighScore(level));
                }
                self.phase = Phase::RoundComplete { elapsed_ms: 0 };
            }
            PressOutcome::Partial => {}
        }
    }

    /// Advance all timers by `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u32) {
        if let Some((signal, remaining)) = self.input_pulse {
            self.input_pulse = (remaining > elapsed_ms).then(|| (signal, remaining - elapsed_ms));
        }

        match self.phase {
            Phase::Idle | Phase::AwaitingInput => {}
            Phase::Announcing { elapsed_ms: spent } => {
                let spent = spent + elapsed_ms;
                if spent >= ANNOUNCE_MS {
                    self.begin_playback();
                } else {
                    self.phase = Phase::Announcing { elapsed_ms: spent };
                }
            }
            Phase::Playback {
                index,
                elapsed_ms: spent,
                in_gap,
            } => self.step_playback(index, spent + elapsed_ms, in_gap),
            Phase::RoundComplete { elapsed_ms: spent } => {
                let spent = spent + elapsed_ms;
                if spent >= ROUND_COMPLETE_DELAY_MS {
                    self.next_round();
                } else {
                    self.phase = Phase::RoundComplete { elapsed_ms: spent };
                }
            }
            Phase::GameOver {
                elapsed_ms: spent,
                tone_fired,
            } => {
                let spent = spent.saturating_add(elapsed_ms);
                let mut tone_fired = tone_fired;
                if !tone_fired && spent >= GAME_OVER_TONE_DELAY_MS {
                    self.push_effect(Effect::PlayGameOverTone);
                    tone_fired = true;
                }
                self.phase = Phase::GameOver {
                    elapsed_ms: spent,
                    tone_fired,
                };
            }
        }
    }

    /// Drain the queued side-effect requests.
    pub fn take_effects(&mut self) -> EffectQueue {
        std::mem::take(&mut self.effects)
    }

    // -- observable state, read by the view each frame --

    pub fn phase(&self) -> GamePhase {
        match self.phase {
            Phase::Idle => GamePhase::Idle,
            Phase::Announcing { .. } => GamePhase::Announcing,
            Phase::Playback { .. } => GamePhase::Playback,
            Phase::AwaitingInput => GamePhase::AwaitingInput,
            Phase::RoundComplete { .. } => GamePhase::RoundComplete,
            Phase::GameOver { .. } => GamePhase::GameOver,
        }
    }

    pub fn level(&self) -> u32 {
        self.session.level()
    }

    /// Rounds cleared so far this game (the current-score display).
    pub fn completed_rounds(&self) -> u32 {
        self.session.completed_rounds()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn sequence(&self) -> &[Signal] {
        self.session.sequence()
    }

    /// Signals the player has already entered this round.
    pub fn progress_len(&self) -> usize {
        self.session.progress_len()
    }

    pub fn is_playing(&self) -> bool {
        self.session.playing()
    }

    pub fn accepting_input(&self) -> bool {
        self.session.playing() && matches!(self.phase, Phase::AwaitingInput)
    }

    /// Which signal the board should light up right now, if any.
    pub fn lit_signal(&self) -> Option<Signal> {
        if let Some((signal, _)) = self.input_pulse {
            return Some(signal);
        }
        match self.phase {
            Phase::Playback {
                index,
                in_gap: false,
                ..
            } => self.session.sequence().get(index).copied(),
            _ => None,
        }
    }

    pub fn visual_mode(&self) -> VisualMode {
        match self.phase {
            Phase::Idle => VisualMode::PreGame,
            Phase::GameOver { elapsed_ms, .. } => {
                if elapsed_ms >= GAME_OVER_OVERLAY_MS {
                    VisualMode::PreGame
                } else {
                    VisualMode::GameOver
                }
            }
            _ => VisualMode::InGame,
        }
    }

    pub fn status_line(&self) -> &'static str {
        match self.phase {
            Phase::Idle => "Press ENTER to start",
            Phase::Announcing { .. } | Phase::Playback { .. } => "Watch the sequence...",
            Phase::AwaitingInput => "Your turn!",
            Phase::RoundComplete { .. } => "Well done! Get ready for the next level...",
            Phase::GameOver { .. } => "Game over! Press ENTER to play again",
        }
    }

    pub fn level_overlay(&self) -> Option<LevelOverlay> {
        match self.phase {
            Phase::Announcing { elapsed_ms } if elapsed_ms < LEVEL_OVERLAY_MS => {
                Some(LevelOverlay {
                    level: self.session.level(),
                    shrinking: elapsed_ms >= LEVEL_OVERLAY_SHRINK_AT_MS,
                })
            }
            _ => None,
        }
    }

    pub fn game_over_overlay(&self) -> Option<GameOverOverlay> {
        match self.phase {
            Phase::GameOver { elapsed_ms, .. } if elapsed_ms < GAME_OVER_OVERLAY_MS => {
                let shaking = (GAME_OVER_SHAKE_START_MS..GAME_OVER_SHAKE_END_MS)
                    .contains(&elapsed_ms);
                let shake = if shaking {
                    match (elapsed_ms / 60) % 4 {
                        1 => 1,
                        3 => -1,
                        _ => 0,
                    }
                } else {
                    0
                };
                Some(GameOverOverlay { shake })
            }
            _ => None,
        }
    }

    // -- internals --

    fn next_round(&mut self) {
        let signal = self.signals.draw();
        self.session.begin_round(signal);
        self.phase = Phase::Announcing { elapsed_ms: 0 };
    }

    fn begin_playback(&mut self) {
        self.phase = Phase::Playback {
            index: 0,
            elapsed_ms: 0,
            in_gap: false,
        };
        if let Some(&first) = self.session.sequence().first() {
            self.push_effect(Effect::PlayTone(first));
        }
    }

    fn step_playback(&mut self, mut index: usize, mut spent: u32, mut in_gap: bool) {
        // Consume the whole elapsed span, carrying remainders across phase
        // boundaries so playback does not stretch with tick jitter.
        loop {
            if !in_gap {
                if spent < SIGNAL_ACTIVE_MS {
                    break;
                }
                spent -= SIGNAL_ACTIVE_MS;
                in_gap = true;
            } else if spent < SIGNAL_GAP_MS {
                break;
            } else {
                spent -= SIGNAL_GAP_MS;
                let next = index + 1;
                if next >= self.session.sequence().len() {
                    self.phase = Phase::AwaitingInput;
                    return;
                }
                index = next;
                in_gap = false;
                let signal = self.session.sequence()[index];
                self.push_effect(Effect::PlayTone(signal));
            }
        }

        self.phase = Phase::Playback {
            index,
            elapsed_ms: spent,
            in_gap,
        };
    }

    fn end_game(&mut self) {
        self.session.end();
        self.phase = Phase::GameOver {
            elapsed_ms: 0,
            tone_fired: false,
        };
    }

    fn push_effect(&mut self, effect: Effect) {
        // The cap is sized well above what one step can produce.
        let _ = self.effects.try_push(effect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_simon_types::TICK_MS;

    /// Advance the engine in fixed ticks summing exactly to `ms`.
    fn advance(engine: &mut GameEngine, mut ms: u32) {
        while ms > 0 {
            let step = ms.min(TICK_MS);
            engine.tick(step);
            ms -= step;
        }
    }

    fn playback_ms(sequence_len: usize) -> u32 {
        sequence_len as u32 * (SIGNAL_ACTIVE_MS + SIGNAL_GAP_MS)
    }

    /// Drive a freshly-announced round through announcement and playback.
    fn reach_input(engine: &mut GameEngine) {
        assert_eq!(engine.phase(), GamePhase::Announcing);
        advance(engine, ANNOUNCE_MS);
        assert_eq!(engine.phase(), GamePhase::Playback);
        advance(engine, playback_ms(engine.sequence().len()));
        assert_eq!(engine.phase(), GamePhase::AwaitingInput);
    }

    /// Reproduce the stored sequence correctly, leaving RoundComplete.
    fn complete_round(engine: &mut GameEngine) {
        let sequence = engine.sequence().to_vec();
        for signal in sequence {
            engine.submit_signal(signal);
        }
        assert_eq!(engine.phase(), GamePhase::RoundComplete);
    }

    /// A signal different from `signal`.
    fn wrong(signal: Signal) -> Signal {
        Signal::ALL
            .into_iter()
            .find(|other| *other != signal)
            .unwrap()
    }

    #[test]
    fn test_idle_until_started() {
        let mut engine = GameEngine::new(12345, 0);
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert!(!engine.is_playing());

        // Presses before start are silently ignored.
        engine.submit_signal(Signal::Red);
        assert_eq!(engine.phase(), GamePhase::Idle);
        assert!(engine.take_effects().is_empty());
    }

    #[test]
    fn test_start_game_enters_round_one() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();

        assert_eq!(engine.phase(), GamePhase::Announcing);
        assert!(engine.is_playing());
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.sequence().len(), 1);
        assert_eq!(engine.completed_rounds(), 0);
        assert!(!engine.accepting_input());
    }

    #[test]
    fn test_announcement_then_playback_then_input() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();
        let _ = engine.take_effects();

        advance(&mut engine, ANNOUNCE_MS);
        assert_eq!(engine.phase(), GamePhase::Playback);
        let effects = engine.take_effects();
        assert_eq!(effects.as_slice(), &[Effect::PlayTone(engine.sequence()[0])]);

        advance(&mut engine, playback_ms(1));
        assert_eq!(engine.phase(), GamePhase::AwaitingInput);
        assert!(engine.accepting_input());
        assert_eq!(engine.status_line(), "Your turn!");
    }

    #[test]
    fn test_playback_activates_signals_in_stored_order_without_overlap() {
        let mut engine = GameEngine::new(99, 0);
        engine.start_game();
        reach_input(&mut engine);
        complete_round(&mut engine);
        advance(&mut engine, ROUND_COMPLETE_DELAY_MS);
        reach_input(&mut engine);
        complete_round(&mut engine);
        advance(&mut engine, ROUND_COMPLETE_DELAY_MS);

        // Level 3: replay and record every lit signal transition.
        assert_eq!(engine.sequence().len(), 3);
        let expected = engine.sequence().to_vec();
        advance(&mut engine, ANNOUNCE_MS);

        let mut observed = Vec::new();
        let mut lit_before = None;
        let mut remaining = playback_ms(3);
        while remaining > 0 {
            let lit = engine.lit_signal();
            if lit != lit_before {
                // Activations always alternate with dark gaps, so every
                // transition to Some is a fresh activation.
                if let Some(signal) = lit {
                    observed.push(signal);
                }
                lit_before = lit;
            }
            engine.tick(TICK_MS);
            remaining = remaining.saturating_sub(TICK_MS);
        }

        assert_eq!(observed, expected);
        assert_eq!(engine.phase(), GamePhase::AwaitingInput);
    }

    #[test]
    fn test_playback_tones_match_sequence() {
        let mut engine = GameEngine::new(4242, 0);
        engine.start_game();
        reach_input(&mut engine);
        complete_round(&mut engine);
        advance(&mut engine, ROUND_COMPLETE_DELAY_MS);

        let expected: Vec<Effect> = engine.sequence().iter().map(|s| Effect::PlayTone(*s)).collect();
        let _ = engine.take_effects();
        advance(&mut engine, ANNOUNCE_MS + playback_ms(2));

        let tones: Vec<Effect> = engine
            .take_effects()
            .into_iter()
            .filter(|e| matches!(e, Effect::PlayTone(_)))
            .collect();
        assert_eq!(tones, expected);
    }

    #[test]
    fn test_sequence_extension_preserves_prefix() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();

        let mut previous = engine.sequence().to_vec();
        for _ in 0..6 {
            reach_input(&mut engine);
            complete_round(&mut engine);
            advance(&mut engine, ROUND_COMPLETE_DELAY_MS);

            let current = engine.sequence().to_vec();
            assert_eq!(current.len(), previous.len() + 1);
            assert_eq!(&current[..previous.len()], previous.as_slice());
            previous = current;
        }
        assert_eq!(engine.level(), 7);
    }

    #[test]
    fn test_partial_correct_input_stays_awaiting() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();
        reach_input(&mut engine);
        complete_round(&mut engine);
        advance(&mut engine, ROUND_COMPLETE_DELAY_MS);
        reach_input(&mut engine);

        let first = engine.sequence()[0];
        engine.submit_signal(first);
        assert_eq!(engine.phase(), GamePhase::AwaitingInput);
        assert_eq!(engine.progress_len(), 1);
    }

    #[test]
    fn test_completion_schedules_exactly_one_next_round() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();
        reach_input(&mut engine);
        complete_round(&mut engine);

        assert!(!engine.accepting_input());
        assert_eq!(engine.level(), 1);

        // One confirmation delay, then a single new round - even if we keep
        // ticking long past the boundary.
        advance(&mut engine, ROUND_COMPLETE_DELAY_MS + 500);
        assert_eq!(engine.level(), 2);
        assert_eq!(engine.sequence().len(), 2);
        assert_eq!(engine.phase(), GamePhase::Announcing);
    }

    #[test]
    fn test_mismatch_ends_game_and_freezes_sequence() {
        let mut engine = GameEngine::new(12345, 7);
        engine.start_game();
        reach_input(&mut engine);
        complete_round(&mut engine);
        advance(&mut engine, ROUND_COMPLETE_DELAY_MS);
        reach_input(&mut engine);

        let sequence = engine.sequence().to_vec();
        engine.submit_signal(sequence[0]);
        engine.submit_signal(wrong(sequence[1]));

        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert!(!engine.is_playing());
        assert_eq!(engine.sequence(), sequence.as_slice());
        assert_eq!(engine.high_score(), 7);

        // Input after the mismatch is ignored and mutates nothing.
        engine.submit_signal(sequence[0]);
        advance(&mut engine, 5_000);
        assert_eq!(engine.sequence(), sequence.as_slice());
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.level(), 2);
    }

    #[test]
    fn test_high_score_updates_exactly_at_completion() {
        let mut engine = GameEngine::new(12345, 5);
        engine.start_game();

        for expected_level in 1..=7u32 {
            reach_input(&mut engine);
            let _ = engine.take_effects();
            complete_round(&mut engine);

            // The update happens at the completing press, not later.
            let expected = expected_level.max(5);
            assert_eq!(engine.high_score(), expected);

            let saves: Vec<Effect> = engine
                .take_effects()
                .into_iter()
                .filter(|e| matches!(e, Effect::SaveHighScore(_)))
                .collect();
            if expected_level > 5 {
                assert_eq!(saves, vec![Effect::SaveHighScore(expected_level)]);
            } else {
                assert!(saves.is_empty());
            }

            advance(&mut engine, ROUND_COMPLETE_DELAY_MS);
        }
        assert_eq!(engine.high_score(), 7);
    }

    #[test]
    fn test_game_over_tone_fires_once_after_lead_in() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();
        reach_input(&mut engine);

        let first = engine.sequence()[0];
        engine.submit_signal(wrong(first));
        let _ = engine.take_effects();

        advance(&mut engine, GAME_OVER_TONE_DELAY_MS - TICK_MS);
        assert!(engine.take_effects().is_empty());

        advance(&mut engine, TICK_MS);
        assert_eq!(engine.take_effects().as_slice(), &[Effect::PlayGameOverTone]);

        advance(&mut engine, 5_000);
        assert!(engine.take_effects().is_empty());
    }

    #[test]
    fn test_input_pulse_survives_game_over_transition() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();
        reach_input(&mut engine);

        let pressed = wrong(engine.sequence()[0]);
        engine.submit_signal(pressed);

        // The pulse keeps the pad lit while the game-over presentation runs.
        assert_eq!(engine.phase(), GamePhase::GameOver);
        assert_eq!(engine.lit_signal(), Some(pressed));

        advance(&mut engine, SIGNAL_ACTIVE_MS);
        assert_eq!(engine.lit_signal(), None);
    }

    #[test]
    fn test_visual_mode_lifecycle() {
        let mut engine = GameEngine::new(12345, 0);
        assert_eq!(engine.visual_mode(), VisualMode::PreGame);

        engine.start_game();
        assert_eq!(engine.visual_mode(), VisualMode::InGame);

        reach_input(&mut engine);
        let first = engine.sequence()[0];
        engine.submit_signal(wrong(first));
        assert_eq!(engine.visual_mode(), VisualMode::GameOver);
        assert!(engine.game_over_overlay().is_some());

        // After the presentation collapses the idle screen returns, with the
        // reached level still readable.
        advance(&mut engine, GAME_OVER_OVERLAY_MS);
        assert_eq!(engine.visual_mode(), VisualMode::PreGame);
        assert!(engine.game_over_overlay().is_none());
        assert_eq!(engine.level(), 1);
    }

    #[test]
    fn test_level_overlay_shrinks_then_clears() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();

        let overlay = engine.level_overlay().unwrap();
        assert_eq!(overlay.level, 1);
        assert!(!overlay.shrinking);

        advance(&mut engine, LEVEL_OVERLAY_SHRINK_AT_MS);
        assert!(engine.level_overlay().unwrap().shrinking);

        advance(&mut engine, LEVEL_OVERLAY_MS - LEVEL_OVERLAY_SHRINK_AT_MS);
        assert!(engine.level_overlay().is_none());
        assert_eq!(engine.phase(), GamePhase::Announcing);
    }

    #[test]
    fn test_restart_supersedes_finished_game() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();
        reach_input(&mut engine);
        let first = engine.sequence()[0];
        engine.submit_signal(wrong(first));
        assert_eq!(engine.phase(), GamePhase::GameOver);

        engine.apply_action(GameAction::Start);
        assert_eq!(engine.phase(), GamePhase::Announcing);
        assert!(engine.is_playing());
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.sequence().len(), 1);
        assert_eq!(engine.progress_len(), 0);
        assert_eq!(engine.lit_signal(), None);
    }

    #[test]
    fn test_restart_mid_game_abandons_progress() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();
        reach_input(&mut engine);
        complete_round(&mut engine);
        advance(&mut engine, ROUND_COMPLETE_DELAY_MS);
        assert_eq!(engine.level(), 2);

        engine.start_game();
        assert_eq!(engine.level(), 1);
        assert_eq!(engine.sequence().len(), 1);
    }

    #[test]
    fn test_presses_ignored_during_playback() {
        let mut engine = GameEngine::new(12345, 0);
        engine.start_game();
        advance(&mut engine, ANNOUNCE_MS);
        assert_eq!(engine.phase(), GamePhase::Playback);

        engine.submit_signal(Signal::Green);
        assert_eq!(engine.progress_len(), 0);
        assert_eq!(engine.phase(), GamePhase::Playback);
    }
}
