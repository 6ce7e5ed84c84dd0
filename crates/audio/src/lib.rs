//! Audio module - procedural tone playback.
//!
//! All sounds are synthesized on the fly (no asset files) and played
//! fire-and-forget on detached sinks. Audio is best-effort throughout: when
//! no output device is available the game simply runs silently.

pub mod tone;

use anyhow::Result;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

use tui_simon_types::Signal;

pub use tone::{signal_frequency, GameOverTone, SignalTone};

/// Handle to the system audio output.
pub struct AudioOutput {
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl AudioOutput {
    /// Open the default output device.
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }

    /// Sound the steady tone for a signal.
    pub fn play_signal(&self, signal: Signal) {
        self.play(SignalTone::new(signal));
    }

    /// Sound the descending game-over tone.
    pub fn play_game_over(&self) {
        self.play(GameOverTone::new());
    }

    fn play(&self, source: impl Source<Item = f32> + Send + 'static) {
        let Ok(sink) = Sink::try_new(&self.handle) else {
            log::warn!("audio sink unavailable, dropping tone");
            return;
        };
        sink.append(source);
        sink.detach();
    }
}
