//! Perfect-press streak and the reward ladder

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickQuality {
    Normal,
    Good,
    Perfect,
}

impl ClickQuality {
    /// Visitors granted when no milestone fires
    pub fn visitor_multiplier(&self) -> u32 {
        match self {
            ClickQuality::Normal | ClickQuality::Good => 1,
            ClickQuality::Perfect => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardTier {
    Caravan,
    Special,
    Frenzy,
}

impl RewardTier {
    pub fn visitor_multiplier(&self) -> u32 {
        match self {
            RewardTier::Caravan => 8,
            RewardTier::Special => 15,
            RewardTier::Frenzy => 100,
        }
    }
}

/// Result of feeding one press into the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    /// Visible streak after the press; zero right after a milestone
    pub streak: u32,
    /// Unbroken perfect presses since the last miss or frenzy
    pub run: u32,
    pub milestone: Option<RewardTier>,
}

/// Counts consecutive perfect presses.
///
/// The visible streak restarts after every payout, while the unbroken run
/// keeps going so that the 10th and 20th perfect presses in a row reach
/// the higher tiers. A miss clears both.
#[derive(Debug, Clone, Default)]
pub struct StreakCounter {
    streak: u32,
    run: u32,
}

impl StreakCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn run(&self) -> u32 {
        self.run
    }

    pub fn register(&mut self, quality: ClickQuality) -> StreakUpdate {
        if quality != ClickQuality::Perfect {
            self.streak = 0;
            self.run = 0;
            return StreakUpdate {
                streak: 0,
                run: 0,
                milestone: None,
            };
        }

        self.streak += 1;
        self.run += 1;
        let run = self.run;

        let milestone = match run {
            5 => Some(RewardTier::Caravan),
            10 => Some(RewardTier::Special),
            20 => Some(RewardTier::Frenzy),
            _ => None,
        };

        if milestone.is_some() {
            self.streak = 0;
        }
        if milestone == Some(RewardTier::Frenzy) {
            self.run = 0;
        }

        StreakUpdate {
            streak: self.streak,
            run,
            milestone,
        }
    }

    pub fn reset(&mut self) {
        self.streak = 0;
        self.run = 0;
    }
}
