//! Progression accounting - the park's running totals
//!
//! Pure aggregation. Nothing here calls into upgrade or achievement logic;
//! those read `stats()` and act on the result.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::bell::{ClickQuality, RewardTier};
use crate::core::error::{Result, TycoonError};
use crate::core::types::{GamePhase, Millis, Rarity, SpeciesId, ZoneId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progression {
    pub currency: u64,
    pub lifetime_earned: u64,
    pub visitors_attracted: u64,
    pub visitors_departed: u64,
    pub creatures_captured: u64,
    pub rare_captured: u64,
    pub shiny_captured: u64,
    pub average_satisfaction: f64,
    pub unlocked_zones: BTreeSet<ZoneId>,
    pub phase: GamePhase,
    #[serde(default)]
    pub species_captured: BTreeSet<SpeciesId>,
    #[serde(default)]
    pub bell_rings: u64,
    #[serde(default)]
    pub perfect_clicks: u64,
    #[serde(default)]
    pub caravans: u64,
    #[serde(default)]
    pub specials: u64,
    #[serde(default)]
    pub frenzies: u64,
    #[serde(default)]
    pub play_time_ms: Millis,
}

/// Read-only view handed to unlock and achievement checks
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProgressionStats {
    pub currency: u64,
    pub lifetime_earned: u64,
    pub visitors_attracted: u64,
    pub visitors_departed: u64,
    pub creatures_captured: u64,
    pub rare_captured: u64,
    pub shiny_captured: u64,
    pub average_satisfaction: f64,
    pub zones_unlocked: usize,
    pub distinct_species: usize,
    pub phase: GamePhase,
    pub bell_rings: u64,
    pub perfect_clicks: u64,
    pub caravans: u64,
    pub specials: u64,
    pub frenzies: u64,
    pub play_time_ms: Millis,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Progression {
    /// Fresh totals with only the center zone open
    pub fn new(starting_currency: u64) -> Self {
        Self {
            currency: starting_currency,
            lifetime_earned: 0,
            visitors_attracted: 0,
            visitors_departed: 0,
            creatures_captured: 0,
            rare_captured: 0,
            shiny_captured: 0,
            average_satisfaction: 0.0,
            unlocked_zones: BTreeSet::from([ZoneId::Center]),
            phase: GamePhase::Foundation,
            species_captured: BTreeSet::new(),
            bell_rings: 0,
            perfect_clicks: 0,
            caravans: 0,
            specials: 0,
            frenzies: 0,
            play_time_ms: 0,
        }
    }

    pub fn credit_currency(&mut self, amount: u64) {
        self.currency = self.currency.saturating_add(amount);
        self.lifetime_earned = self.lifetime_earned.saturating_add(amount);
    }

    /// Spend if affordable. Leaves the balance untouched on failure.
    pub fn debit_currency(&mut self, amount: u64) -> bool {
        self.try_debit(amount).is_ok()
    }

    pub fn try_debit(&mut self, amount: u64) -> Result<()> {
        if amount > self.currency {
            return Err(TycoonError::InsufficientFunds {
                needed: amount,
                available: self.currency,
            });
        }
        self.currency -= amount;
        Ok(())
    }

    pub fn record_visitors_attracted(&mut self, count: u64) {
        self.visitors_attracted += count;
    }

    pub fn record_capture(&mut self, rarity: Rarity, shiny: bool) {
        self.creatures_captured += 1;
        if rarity.is_rare() {
            self.rare_captured += 1;
        }
        if shiny {
            self.shiny_captured += 1;
        }
    }

    pub fn record_species(&mut self, species: SpeciesId) {
        self.species_captured.insert(species);
    }

    /// Fold one departure into the running satisfaction mean
    pub fn record_visitor_departure(&mut self, satisfaction: f64) {
        self.visitors_departed += 1;
        let n = self.visitors_departed as f64;
        let mean = (self.average_satisfaction * (n - 1.0) + satisfaction) / n;
        self.average_satisfaction = mean.clamp(0.0, 1.0);
    }

    pub fn record_bell(&mut self, quality: ClickQuality, milestone: Option<RewardTier>) {
        self.bell_rings += 1;
        if quality == ClickQuality::Perfect {
            self.perfect_clicks += 1;
        }
        match milestone {
            Some(RewardTier::Caravan) => self.caravans += 1,
            Some(RewardTier::Special) => self.specials += 1,
            Some(RewardTier::Frenzy) => self.frenzies += 1,
            None => {}
        }
    }

    pub fn record_play_time(&mut self, delta: Millis) {
        self.play_time_ms = self.play_time_ms.saturating_add(delta);
    }

    /// Returns false if the zone was already open
    pub fn unlock_zone(&mut self, zone: ZoneId) -> bool {
        self.unlocked_zones.insert(zone)
    }

    pub fn is_zone_unlocked(&self, zone: ZoneId) -> bool {
        self.unlocked_zones.contains(&zone)
    }

    /// Move to the next phase; `None` once at the final tier
    pub fn advance_phase(&mut self) -> Option<GamePhase> {
        let next = self.phase.next()?;
        self.phase = next;
        Some(next)
    }

    pub fn stats(&self) -> ProgressionStats {
        ProgressionStats {
            currency: self.currency,
            lifetime_earned: self.lifetime_earned,
            visitors_attracted: self.visitors_attracted,
            visitors_departed: self.visitors_departed,
            creatures_captured: self.creatures_captured,
            rare_captured: self.rare_captured,
            shiny_captured: self.shiny_captured,
            average_satisfaction: self.average_satisfaction,
            zones_unlocked: self.unlocked_zones.len(),
            distinct_species: self.species_captured.len(),
            phase: self.phase,
            bell_rings: self.bell_rings,
            perfect_clicks: self.perfect_clicks,
            caravans: self.caravans,
            specials: self.specials,
            frenzies: self.frenzies,
            play_time_ms: self.play_time_ms,
        }
    }
}
