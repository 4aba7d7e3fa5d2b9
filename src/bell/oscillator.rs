//! Bell glow oscillator
//!
//! Intensity ramps linearly from 0 to 1, then fades back to 0, forever.
//! Reaching the peak opens the perfect window, which is tracked by the
//! time it opened rather than by a flag, so it closes on its own.

use crate::core::config::SimulationConfig;
use crate::core::types::Millis;

/// Tolerance for landing exactly on a bound after float accumulation
const BOUND_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rising,
    Decaying,
}

#[derive(Debug, Clone)]
pub struct Oscillator {
    intensity: f64,
    direction: Direction,
    /// Oscillator clock (ms), advanced only by `advance`
    clock_ms: f64,
    window_opened_at: Option<f64>,
    rise_per_ms: f64,
    decay_per_ms: f64,
    window_ms: f64,
}

impl Oscillator {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            intensity: 0.0,
            direction: Direction::Rising,
            clock_ms: 0.0,
            window_opened_at: None,
            rise_per_ms: config.rise_per_second / 1000.0,
            decay_per_ms: config.decay_per_second / 1000.0,
            window_ms: config.perfect_window_ms as f64,
        }
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// When the most recent perfect window opened, if any peak was reached yet
    pub fn window_opened_at(&self) -> Option<f64> {
        self.window_opened_at
    }

    /// Advance the oscillator, bouncing off both bounds as often as needed
    pub fn advance(&mut self, delta_ms: f64) {
        let mut remaining = delta_ms.max(0.0);

        while remaining > 0.0 {
            match self.direction {
                Direction::Rising => {
                    let to_peak = (1.0 - self.intensity) / self.rise_per_ms;
                    if remaining + BOUND_EPSILON >= to_peak {
                        remaining = (remaining - to_peak).max(0.0);
                        self.clock_ms = snap(self.clock_ms + to_peak);
                        self.intensity = 1.0;
                        self.direction = Direction::Decaying;
                        self.window_opened_at = Some(self.clock_ms);
                    } else {
                        self.intensity += self.rise_per_ms * remaining;
                        self.clock_ms += remaining;
                        remaining = 0.0;
                    }
                }
                Direction::Decaying => {
                    let to_floor = self.intensity / self.decay_per_ms;
                    if remaining + BOUND_EPSILON >= to_floor {
                        remaining = (remaining - to_floor).max(0.0);
                        self.clock_ms = snap(self.clock_ms + to_floor);
                        self.intensity = 0.0;
                        self.direction = Direction::Rising;
                    } else {
                        self.intensity -= self.decay_per_ms * remaining;
                        self.clock_ms += remaining;
                        remaining = 0.0;
                    }
                }
            }
        }
    }

    /// Whether the perfect window covers the given instant
    pub fn is_window_open(&self, now: Millis) -> bool {
        self.is_window_open_at(now as f64)
    }

    pub fn is_window_open_at(&self, now: f64) -> bool {
        match self.window_opened_at {
            Some(opened) => {
                now + BOUND_EPSILON >= opened && now + BOUND_EPSILON < opened + self.window_ms
            }
            None => false,
        }
    }
}

/// Pull a bound crossing back onto the whole millisecond it drifted from
fn snap(ms: f64) -> f64 {
    let whole = ms.round();
    if (ms - whole).abs() < 1e-6 {
        whole
    } else {
        ms
    }
}
