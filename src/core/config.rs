//! Simulation configuration with documented constants
//!
//! All tuning numbers for the park are collected here. The defaults are the
//! canonical rule set; a TOML file may override any subset of them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{Result, TycoonError};
use crate::core::types::Rarity;

/// Base capture probability per rarity tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatchRates {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub ultra_rare: f64,
    pub legendary: f64,
}

impl CatchRates {
    pub fn for_rarity(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Uncommon => self.uncommon,
            Rarity::Rare => self.rare,
            Rarity::UltraRare => self.ultra_rare,
            Rarity::Legendary => self.legendary,
        }
    }
}

impl Default for CatchRates {
    fn default() -> Self {
        Self {
            common: 0.8,
            uncommon: 0.6,
            rare: 0.4,
            ultra_rare: 0.2,
            legendary: 0.1,
        }
    }
}

/// Configuration for the park simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === CLOCK ===
    /// Interval of the authoritative simulation tick (ms)
    pub tick_interval_ms: u64,

    /// Interval of the bell oscillator step (ms)
    ///
    /// 100 ms gives the 10 Hz cadence the glow animation was tuned for.
    pub oscillator_step_ms: u64,

    // === BELL ===
    /// Intensity gained per second while the glow ramps up
    ///
    /// At 1.0 the glow goes from dark to peak in one second.
    pub rise_per_second: f64,

    /// Intensity lost per second while the glow fades
    ///
    /// At 0.5 the fade takes two seconds, so one full cycle lasts three.
    pub decay_per_second: f64,

    /// How long the perfect window stays open after the peak (ms)
    pub perfect_window_ms: u64,

    /// Intensity above which a non-perfect press counts as good
    pub good_threshold: f64,

    /// Manual presses within this long of the previous press are rejected (ms)
    pub settle_ms: u64,

    // === VISITORS ===
    /// Hard cap on concurrently active visitors
    pub roster_cap: usize,

    /// Shortest stay budget drawn for a visitor (seconds)
    pub min_stay_secs: f64,

    /// Longest stay budget drawn for a visitor (seconds)
    pub max_stay_secs: f64,

    /// Chance per tick that a visitor looks for a creature
    pub encounter_chance: f64,

    /// Entry fee paid by a regular visitor on departure
    pub base_entry_fee: u64,

    /// Revenue added per creature level on capture
    pub level_value_bonus: u64,

    // === CREATURES ===
    /// Chance that an encountered creature is shiny
    pub shiny_chance: f64,

    /// Value multiplier for shiny creatures
    pub shiny_value_multiplier: u64,

    /// Base capture probability per rarity
    pub catch_rates: CatchRates,

    /// Default regeneration rate for population entries (creatures per hour)
    pub default_regen_per_hour: f64,

    /// Fraction of total zone capacity under which a zone counts as depleted
    pub low_population_threshold: f64,

    // === REWARDS ===
    /// Number of waves a frenzy is delivered in
    pub frenzy_waves: u32,

    /// Visitors per frenzy wave
    pub frenzy_wave_size: u32,

    /// Spacing between frenzy waves (ms)
    pub frenzy_wave_spacing_ms: u64,

    // === AUTOMATION ===
    /// Auto-bell interval at level zero (ms); each level shortens it
    pub auto_bell_base_ms: u64,

    /// Interval reduction per auto-bell level (ms)
    pub auto_bell_step_ms: u64,

    /// Fastest the auto-bell may ring (ms)
    pub auto_bell_floor_ms: u64,

    /// Interval between automatic saves (ms)
    pub auto_save_interval_ms: u64,

    // === ECONOMY ===
    /// Currency a fresh park starts with
    pub starting_currency: u64,

    // === EVENTS ===
    /// Undrained events kept by a session; the oldest are dropped past this
    pub event_buffer_cap: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
            oscillator_step_ms: 100,

            rise_per_second: 1.0,
            decay_per_second: 0.5,
            perfect_window_ms: 300,
            good_threshold: 0.5,
            settle_ms: 300,

            roster_cap: 10,
            min_stay_secs: 30.0,
            max_stay_secs: 120.0,
            encounter_chance: 0.1,
            base_entry_fee: 500,
            level_value_bonus: 10,

            shiny_chance: 0.001,
            shiny_value_multiplier: 50,
            catch_rates: CatchRates::default(),
            default_regen_per_hour: 0.1,
            low_population_threshold: 0.2,

            frenzy_waves: 10,
            frenzy_wave_size: 10,
            frenzy_wave_spacing_ms: 1000,

            auto_bell_base_ms: 2000,
            auto_bell_step_ms: 200,
            auto_bell_floor_ms: 500,
            auto_save_interval_ms: 30_000,

            starting_currency: 1000,

            event_buffer_cap: 4096,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig =
            toml::from_str(content).map_err(|e| TycoonError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Auto-bell interval for a purchased auto-bell level
    pub fn auto_bell_interval_ms(&self, level: u32) -> u64 {
        self.auto_bell_base_ms
            .saturating_sub(self.auto_bell_step_ms.saturating_mul(level as u64))
            .max(self.auto_bell_floor_ms)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 || self.oscillator_step_ms == 0 {
            return Err(TycoonError::Config("clock intervals must be positive".into()));
        }

        // The oscillator must be able to leave both bounds
        if self.rise_per_second <= 0.0 || self.decay_per_second <= 0.0 {
            return Err(TycoonError::Config("oscillator rates must be positive".into()));
        }

        if !(0.0..=1.0).contains(&self.good_threshold) {
            return Err(TycoonError::Config(format!(
                "good_threshold ({}) must be within [0, 1]",
                self.good_threshold
            )));
        }

        if self.min_stay_secs > self.max_stay_secs || self.min_stay_secs < 0.0 {
            return Err(TycoonError::Config(format!(
                "stay range [{}, {}] is empty",
                self.min_stay_secs, self.max_stay_secs
            )));
        }

        let probabilities = [
            ("encounter_chance", self.encounter_chance),
            ("shiny_chance", self.shiny_chance),
            ("catch_rates.common", self.catch_rates.common),
            ("catch_rates.uncommon", self.catch_rates.uncommon),
            ("catch_rates.rare", self.catch_rates.rare),
            ("catch_rates.ultra_rare", self.catch_rates.ultra_rare),
            ("catch_rates.legendary", self.catch_rates.legendary),
            ("low_population_threshold", self.low_population_threshold),
        ];
        for (name, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(TycoonError::Config(format!(
                    "{} ({}) must be within [0, 1]",
                    name, value
                )));
            }
        }

        if self.roster_cap == 0 {
            return Err(TycoonError::Config("roster_cap must be at least 1".into()));
        }

        if self.event_buffer_cap == 0 {
            return Err(TycoonError::Config("event_buffer_cap must be at least 1".into()));
        }

        Ok(())
    }
}
