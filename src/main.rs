//! Terminal Simon runner (default binary).
//!
//! This is the gameplay entrypoint. It uses crossterm for input and a
//! framebuffer-based renderer, and drives the engine on a fixed timestep.
//! Audio and score persistence are best-effort collaborators: if either is
//! unavailable the game keeps running.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};

use tui_simon::audio::AudioOutput;
use tui_simon::core::GameEngine;
use tui_simon::input::{handle_key_event, should_quit};
use tui_simon::store::{self, ScoreStore};
use tui_simon::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_simon::types::{Effect, TICK_MS};

fn main() -> Result<()> {
    env_logger::init();

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer) -> Result<()> {
    let store = ScoreStore::new(store::default_path());
    let mut engine = GameEngine::new(wall_clock_seed(), store.load());

    let audio = match AudioOutput::new() {
        Ok(audio) => Some(audio),
        Err(err) => {
            log::warn!("audio disabled: {err:#}");
            None
        }
    };

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);

    let tick_duration = Duration::from_millis(u64::from(TICK_MS));
    let mut last_tick = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        view.render_into(&engine, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        engine.apply_action(action);
                    }
                }
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Tick with the measured elapsed time, clamped so a suspended
        // terminal does not fast-forward whole presentations.
        if last_tick.elapsed() >= tick_duration {
            let elapsed_ms = last_tick.elapsed().as_millis().min(250) as u32;
            last_tick = Instant::now();
            engine.tick(elapsed_ms);
        }

        // Drain side-effect requests into the collaborators.
        for effect in engine.take_effects() {
            match effect {
                Effect::PlayTone(signal) => {
                    if let Some(audio) = &audio {
                        audio.play_signal(signal);
                    }
                }
                Effect::PlayGameOverTone => {
                    if let Some(audio) = &audio {
                        audio.play_game_over();
                    }
                }
                Effect::SaveHighScore(score) => {
                    if let Err(err) = store.save(score) {
                        log::warn!("failed to persist high score: {err:#}");
                    }
                }
            }
        }
    }
}

/// Seed the sequence generator from the wall clock.
fn wall_clock_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u32)
        .unwrap_or(1)
}
