//! The bell timing mini-game
//!
//! A press is classified against the oscillator at the moment it happens.
//! Perfect presses build a streak whose milestones pay out visitor bursts.

pub mod oscillator;
pub mod streak;

pub use oscillator::{Direction, Oscillator};
pub use streak::{ClickQuality, RewardTier, StreakCounter, StreakUpdate};

use crate::core::config::SimulationConfig;
use crate::core::types::Millis;

/// Everything a resolved press produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    pub quality: ClickQuality,
    /// Visible streak after this press
    pub streak: u32,
    /// Unbroken perfect run after this press
    pub run: u32,
    pub milestone: Option<RewardTier>,
    /// Visitor-equivalents earned, before attraction bonuses
    pub visitors: u32,
    pub automatic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BellResponse {
    Accepted(ActionOutcome),
    /// Manual press landed too soon after the previous one
    Settling,
    /// The session has ended
    Closed,
}

#[derive(Debug, Clone)]
pub struct Bell {
    oscillator: Oscillator,
    streak: StreakCounter,
    good_threshold: f64,
    settle_ms: Millis,
    last_manual_press: Option<Millis>,
}

impl Bell {
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            oscillator: Oscillator::new(config),
            streak: StreakCounter::new(),
            good_threshold: config.good_threshold,
            settle_ms: config.settle_ms,
            last_manual_press: None,
        }
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    pub fn streak(&self) -> u32 {
        self.streak.streak()
    }

    pub fn step(&mut self, delta_ms: Millis) {
        self.oscillator.advance(delta_ms as f64);
    }

    pub fn classify(&self, now: Millis) -> ClickQuality {
        if self.oscillator.is_window_open(now) {
            ClickQuality::Perfect
        } else if self.oscillator.intensity() > self.good_threshold {
            ClickQuality::Good
        } else {
            ClickQuality::Normal
        }
    }

    /// Resolve a player press
    pub fn press(&mut self, now: Millis) -> BellResponse {
        if let Some(last) = self.last_manual_press {
            if now.saturating_sub(last) < self.settle_ms {
                return BellResponse::Settling;
            }
        }
        self.last_manual_press = Some(now);

        let quality = self.classify(now);
        let update = self.streak.register(quality);
        let visitors = match update.milestone {
            Some(tier) => tier.visitor_multiplier(),
            None => quality.visitor_multiplier(),
        };

        BellResponse::Accepted(ActionOutcome {
            quality,
            streak: update.streak,
            run: update.run,
            milestone: update.milestone,
            visitors,
            automatic: false,
        })
    }

    /// Resolve an auto-bell ring; always one visitor, streak untouched
    pub fn auto_press(&self) -> ActionOutcome {
        ActionOutcome {
            quality: ClickQuality::Normal,
            streak: self.streak.streak(),
            run: self.streak.run(),
            milestone: None,
            visitors: 1,
            automatic: true,
        }
    }

    /// Drop the streak and settle state, keeping the oscillator phase
    pub fn reset_streak(&mut self) {
        self.streak.reset();
        self.last_manual_press = None;
    }
}
