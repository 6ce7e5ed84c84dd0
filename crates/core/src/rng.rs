//! RNG module - uniform signal generation
//!
//! Every round appends one signal drawn uniformly, independently of history.
//! A small LCG keeps the draws deterministic for a given seed.

use tui_simon_types::Signal;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// The low bits of an LCG cycle with a very short period, so the range
    /// is derived from the high half of the state.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() >> 16) * max) >> 16
    }

    /// Current internal state
    pub fn state(&self) -> u32 {
        self.state
    }
}

/// Uniform signal source backing the sequence generator
#[derive(Debug, Clone)]
pub struct SignalSource {
    rng: SimpleRng,
}

impl SignalSource {
    /// Create a new source with the given seed
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
        }
    }

    /// Draw the next signal
    pub fn draw(&mut self) -> Signal {
        let index = self.rng.next_range(Signal::ALL.len() as u32) as usize;
        Signal::ALL[index]
    }

    /// Current RNG state (for replaying a game with the same sequence)
    pub fn state(&self) -> u32 {
        self.rng.state()
    }
}

impl Default for SignalSource {
    fn default() -> Self {
        Self::new(1)
    }
}
