//! Procedural tone sources.
//!
//! Each signal gets a steady two-voice tone (base sine plus an octave voice
//! detuned a hair for richness); game over gets a two-voice descending
//! glide. Envelopes ramp in and out so tones never click.

use std::f32::consts::TAU;
use std::time::Duration;

use rodio::Source;

use tui_simon_types::{Signal, GAME_OVER_TONE_MS, SIGNAL_TONE_MS};

const SAMPLE_RATE: u32 = 44_100;

/// Attack time shared by both tones.
const ATTACK_MS: f32 = 100.0;

/// Peak amplitude of the signal tone envelope.
const SIGNAL_PEAK: f32 = 0.25;

// +2 cents: 2^(2/1200).
const OCTAVE_DETUNE: f32 = 1.001_156;

/// Steady tone pitch for each signal (C4, E4, G4, C5).
pub fn signal_frequency(signal: Signal) -> f32 {
    match signal {
        Signal::Green => 261.63,
        Signal::Red => 329.63,
        Signal::Blue => 392.00,
        Signal::Yellow => 523.25,
    }
}

fn ms_to_samples(ms: u32) -> u32 {
    (u64::from(ms) * u64::from(SAMPLE_RATE) / 1000) as u32
}

/// Steady per-signal tone.
#[derive(Debug, Clone)]
pub struct SignalTone {
    freq_hz: f32,
    sample_idx: u32,
    total_samples: u32,
}

impl SignalTone {
    pub fn new(signal: Signal) -> Self {
        Self {
            freq_hz: signal_frequency(signal),
            sample_idx: 0,
            total_samples: ms_to_samples(SIGNAL_TONE_MS),
        }
    }
}

impl Iterator for SignalTone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.sample_idx >= self.total_samples {
            return None;
        }
        let t = self.sample_idx as f32 / SAMPLE_RATE as f32;
        let ms = t * 1000.0;

        // Linear attack to the peak, then a long decay to silence.
        let total_ms = SIGNAL_TONE_MS as f32;
        let env = if ms < ATTACK_MS {
            SIGNAL_PEAK * ms / ATTACK_MS
        } else {
            SIGNAL_PEAK * (total_ms - ms) / (total_ms - ATTACK_MS)
        };

        let base = (TAU * self.freq_hz * t).sin();
        let octave = (TAU * self.freq_hz * 2.0 * OCTAVE_DETUNE * t).sin();

        self.sample_idx += 1;
        Some((base + octave) * 0.5 * env)
    }
}

impl Source for SignalTone {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(u64::from(SIGNAL_TONE_MS)))
    }
}

/// Descending game-over tone: an exponential glide from C5 down to C4, with
/// a second voice a fifth above (1.5x) following the same glide.
#[derive(Debug, Clone)]
pub struct GameOverTone {
    phase_lo: f32,
    phase_hi: f32,
    sample_idx: u32,
    total_samples: u32,
}

/// Glide start pitch (C5).
const GLIDE_START_HZ: f32 = 523.25;

impl GameOverTone {
    pub fn new() -> Self {
        Self {
            phase_lo: 0.0,
            phase_hi: 0.0,
            sample_idx: 0,
            total_samples: ms_to_samples(GAME_OVER_TONE_MS),
        }
    }

    fn envelope(ms: f32) -> f32 {
        // 0 -> 0.2 over the attack, sag to 0.1 by 800ms, out by 1000ms.
        if ms < ATTACK_MS {
            0.2 * ms / ATTACK_MS
        } else if ms < 800.0 {
            0.2 - 0.1 * (ms - ATTACK_MS) / (800.0 - ATTACK_MS)
        } else {
            0.1 * (GAME_OVER_TONE_MS as f32 - ms) / (GAME_OVER_TONE_MS as f32 - 800.0)
        }
    }
}

impl Default for GameOverTone {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for GameOverTone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.sample_idx >= self.total_samples {
            return None;
        }
        let t = self.sample_idx as f32 / SAMPLE_RATE as f32;
        let ms = t * 1000.0;

        // One octave down over the full duration.
        let glide = GLIDE_START_HZ * 0.5_f32.powf(ms / GAME_OVER_TONE_MS as f32);
        self.phase_lo = (self.phase_lo + TAU * glide / SAMPLE_RATE as f32) % TAU;
        self.phase_hi = (self.phase_hi + TAU * glide * 1.5 / SAMPLE_RATE as f32) % TAU;

        let env = Self::envelope(ms);
        self.sample_idx += 1;
        Some((self.phase_lo.sin() + self.phase_hi.sin()) * 0.5 * env)
    }
}

impl Source for GameOverTone {
    fn current_frame_len(&self) -> Option<usize> {
        None
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(u64::from(GAME_OVER_TONE_MS)))
    }
}
