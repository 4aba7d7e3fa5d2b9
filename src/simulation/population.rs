//! Zone populations and capture resolution
//!
//! Each zone holds a stock count per species. Captures take one away,
//! breeding puts one back stochastically. Stock always stays within
//! [0, capacity].

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::config::SimulationConfig;
use crate::core::types::{Millis, Rarity, SpeciesId, ZoneId};
use crate::data::species::{Species, SpeciesCatalog};
use crate::data::zones::ZoneDefinition;

/// Stock of one species in one zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZonePopulation {
    pub species_id: SpeciesId,
    pub current: u32,
    pub capacity: u32,
    /// Expected births per hour while breeding is enabled
    pub regen_per_hour: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ZoneState {
    #[serde(default)]
    pub breeding_enabled: bool,
    pub entries: Vec<ZonePopulation>,
}

impl ZoneState {
    pub fn total_current(&self) -> u32 {
        self.entries.iter().map(|e| e.current).sum()
    }

    pub fn total_capacity(&self) -> u32 {
        self.entries.iter().map(|e| e.capacity).sum()
    }

    fn entry_mut(&mut self, species: SpeciesId) -> Option<&mut ZonePopulation> {
        self.entries.iter_mut().find(|e| e.species_id == species)
    }
}

/// A creature taken by a visitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapturedCreature {
    pub species_id: SpeciesId,
    pub species_name: String,
    pub rarity: Rarity,
    pub value: u64,
    pub level: u32,
    pub shiny: bool,
    pub captured_at: Millis,
    pub zone: ZoneId,
}

/// Per-zone populations of the whole park
#[derive(Debug, Clone)]
pub struct Populations {
    zones: BTreeMap<ZoneId, ZoneState>,
    breeding_multiplier: f64,
}

impl Populations {
    pub fn from_definitions(definitions: &[ZoneDefinition], regen_per_hour: f64) -> Self {
        let zones = definitions
            .iter()
            .map(|def| {
                let entries = def
                    .initial
                    .iter()
                    .map(|p| ZonePopulation {
                        species_id: p.species,
                        current: p.count.min(p.capacity),
                        capacity: p.capacity,
                        regen_per_hour,
                    })
                    .collect();
                (
                    def.id,
                    ZoneState {
                        breeding_enabled: false,
                        entries,
                    },
                )
            })
            .collect();

        Self {
            zones,
            breeding_multiplier: 1.0,
        }
    }

    /// Rebuild from persisted zone states, clamping any out-of-range stock
    pub fn from_snapshot(mut zones: BTreeMap<ZoneId, ZoneState>) -> Self {
        for state in zones.values_mut() {
            for entry in &mut state.entries {
                entry.current = entry.current.min(entry.capacity);
            }
        }
        Self {
            zones,
            breeding_multiplier: 1.0,
        }
    }

    pub fn snapshot(&self) -> BTreeMap<ZoneId, ZoneState> {
        self.zones.clone()
    }

    pub fn zone(&self, zone: ZoneId) -> Option<&ZoneState> {
        self.zones.get(&zone)
    }

    pub fn zones(&self) -> impl Iterator<Item = (ZoneId, &ZoneState)> {
        self.zones.iter().map(|(id, state)| (*id, state))
    }

    /// Current stock, zero when the species has no entry in the zone
    pub fn stock(&self, zone: ZoneId, species: SpeciesId) -> u32 {
        self.zones
            .get(&zone)
            .and_then(|z| z.entries.iter().find(|e| e.species_id == species))
            .map_or(0, |e| e.current)
    }

    pub fn breeding_multiplier(&self) -> f64 {
        self.breeding_multiplier
    }

    pub fn set_breeding_multiplier(&mut self, multiplier: f64) {
        self.breeding_multiplier = multiplier.max(0.0);
    }

    pub fn enable_breeding(&mut self, zone: ZoneId) {
        if let Some(state) = self.zones.get_mut(&zone) {
            state.breeding_enabled = true;
        }
    }

    pub fn disable_breeding(&mut self, zone: ZoneId) {
        if let Some(state) = self.zones.get_mut(&zone) {
            state.breeding_enabled = false;
        }
    }

    pub fn is_breeding(&self, zone: ZoneId) -> bool {
        self.zones.get(&zone).is_some_and(|z| z.breeding_enabled)
    }

    /// Add stock, never beyond capacity. Returns how many were added.
    pub fn restock(&mut self, zone: ZoneId, species: SpeciesId, count: u32) -> u32 {
        let Some(entry) = self.zones.get_mut(&zone).and_then(|z| z.entry_mut(species)) else {
            return 0;
        };
        let added = count.min(entry.capacity - entry.current);
        entry.current += added;
        added
    }

    /// Zones whose total stock is below the configured share of capacity
    pub fn low_population_zones(&self, threshold: f64) -> Vec<ZoneId> {
        self.zones
            .iter()
            .filter(|(_, state)| {
                let capacity = state.total_capacity();
                capacity > 0 && (state.total_current() as f64) < capacity as f64 * threshold
            })
            .map(|(id, _)| *id)
            .collect()
    }

    /// Weighted pick among the species allowed in a zone.
    ///
    /// `rare_bonus` scales the weight of rare and rarer species by `1 + bonus`.
    pub fn select_species<'a, R: Rng + ?Sized>(
        catalog: &'a SpeciesCatalog,
        zone: ZoneId,
        rare_bonus: f64,
        rng: &mut R,
    ) -> Option<&'a Species> {
        let weighted: Vec<(&Species, f64)> = catalog
            .in_zone(zone)
            .map(|s| {
                let mut weight = s.weight_in(zone);
                if s.rarity.is_rare() {
                    weight *= 1.0 + rare_bonus;
                }
                (s, weight.max(0.0))
            })
            .collect();

        let total: f64 = weighted.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return None;
        }

        let mut roll = rng.gen::<f64>() * total;
        for (species, weight) in &weighted {
            if roll < *weight {
                return Some(*species);
            }
            roll -= weight;
        }
        // Float rounding can leave the roll just past the last bucket
        weighted
            .iter()
            .rev()
            .find(|(_, w)| *w > 0.0)
            .map(|(s, _)| *s)
    }

    /// Roll a capture. Misses, escapes, and empty stock all yield `None`.
    pub fn attempt_capture<R: Rng + ?Sized>(
        &mut self,
        species: &Species,
        zone: ZoneId,
        catch_bonus: f64,
        config: &SimulationConfig,
        now: Millis,
        rng: &mut R,
    ) -> Option<CapturedCreature> {
        let entry = self
            .zones
            .get_mut(&zone)
            .and_then(|z| z.entry_mut(species.id))?;
        if entry.current == 0 {
            return None;
        }

        let level = rng.gen_range(species.min_level..=species.max_level.max(species.min_level));
        let shiny = rng.gen_bool(config.shiny_chance.clamp(0.0, 1.0));
        let value = if shiny {
            species.base_value.saturating_mul(config.shiny_value_multiplier)
        } else {
            species.base_value
        };

        let mut chance = config.catch_rates.for_rarity(species.rarity) + catch_bonus;
        if shiny {
            chance /= 2.0;
        }
        if !rng.gen_bool(chance.clamp(0.0, 1.0)) {
            return None;
        }

        entry.current -= 1;
        Some(CapturedCreature {
            species_id: species.id,
            species_name: species.name.clone(),
            rarity: species.rarity,
            value,
            level,
            shiny,
            captured_at: now,
            zone,
        })
    }

    /// One stochastic birth per under-capacity entry in a breeding zone
    pub fn regenerate<R: Rng + ?Sized>(&mut self, zone: ZoneId, delta_secs: f64, rng: &mut R) {
        let multiplier = self.breeding_multiplier;
        let Some(state) = self.zones.get_mut(&zone) else {
            return;
        };
        if !state.breeding_enabled {
            return;
        }
        for entry in &mut state.entries {
            if entry.current >= entry.capacity {
                continue;
            }
            let chance = (entry.regen_per_hour * multiplier * delta_secs / 3600.0).clamp(0.0, 1.0);
            if rng.gen_bool(chance) {
                entry.current += 1;
            }
        }
    }

    pub fn regenerate_all<R: Rng + ?Sized>(&mut self, delta_secs: f64, rng: &mut R) {
        let zones: Vec<ZoneId> = self.zones.keys().copied().collect();
        for zone in zones {
            self.regenerate(zone, delta_secs, rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::zones::default_zones;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn park() -> Populations {
        Populations::from_definitions(&default_zones(), 0.1)
    }

    fn sure_catch_config() -> SimulationConfig {
        SimulationConfig {
            shiny_chance: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_stock() {
        let pops = park();
        assert_eq!(pops.stock(ZoneId::Center, SpeciesId(29)), 15);
        assert_eq!(pops.stock(ZoneId::East, SpeciesId(29)), 0);
        assert!(!pops.is_breeding(ZoneId::Center));
    }

    #[test]
    fn test_capture_on_empty_stock_never_mutates() {
        let catalog = SpeciesCatalog::with_defaults();
        let chansey = catalog.get(SpeciesId(113)).unwrap();
        let mut pops = park();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let before = pops.snapshot();
        for _ in 0..50 {
            let caught = pops.attempt_capture(chansey, ZoneId::Center, 1.0, &sure_catch_config(), 0, &mut rng);
            assert!(caught.is_none());
        }
        assert_eq!(pops.snapshot(), before);
    }

    #[test]
    fn test_guaranteed_capture_decrements() {
        let catalog = SpeciesCatalog::with_defaults();
        let nido = catalog.get(SpeciesId(29)).unwrap();
        let mut pops = park();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let caught = pops
            .attempt_capture(nido, ZoneId::Center, 1.0, &sure_catch_config(), 1234, &mut rng)
            .unwrap();
        assert_eq!(caught.species_id, SpeciesId(29));
        assert!((22..=36).contains(&caught.level));
        assert_eq!(caught.value, 50);
        assert_eq!(caught.captured_at, 1234);
        assert_eq!(caught.zone, ZoneId::Center);
        assert_eq!(pops.stock(ZoneId::Center, SpeciesId(29)), 14);
    }

    #[test]
    fn test_zero_catch_rate_never_decrements() {
        let catalog = SpeciesCatalog::with_defaults();
        let nido = catalog.get(SpeciesId(29)).unwrap();
        let mut config = sure_catch_config();
        config.catch_rates.common = 0.0;
        let mut pops = park();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            assert!(pops.attempt_capture(nido, ZoneId::Center, 0.0, &config, 0, &mut rng).is_none());
        }
        assert_eq!(pops.stock(ZoneId::Center, SpeciesId(29)), 15);
    }

    #[test]
    fn test_shiny_value_multiplier() {
        let catalog = SpeciesCatalog::with_defaults();
        let nido = catalog.get(SpeciesId(29)).unwrap();
        let config = SimulationConfig {
            shiny_chance: 1.0,
            ..Default::default()
        };
        let mut pops = park();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        // Bonus of 2.0 keeps the halved chance at 1.0
        let caught = pops
            .attempt_capture(nido, ZoneId::Center, 2.0, &config, 0, &mut rng)
            .unwrap();
        assert!(caught.shiny);
        assert_eq!(caught.value, 2500);
    }

    #[test]
    fn test_selection_stays_in_zone() {
        let catalog = SpeciesCatalog::with_defaults();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..500 {
            let species = Populations::select_species(&catalog, ZoneId::East, 0.0, &mut rng).unwrap();
            assert!(species.allowed_in(ZoneId::East));
        }
        assert!(Populations::select_species(&SpeciesCatalog::new(), ZoneId::East, 0.0, &mut rng).is_none());
    }

    #[test]
    fn test_rare_bonus_shifts_selection() {
        let catalog = SpeciesCatalog::with_defaults();
        let count_rare = |bonus: f64| {
            let mut rng = ChaCha8Rng::seed_from_u64(9);
            (0..5000)
                .filter(|_| {
                    Populations::select_species(&catalog, ZoneId::Center, bonus, &mut rng)
                        .is_some_and(|s| s.rarity.is_rare())
                })
                .count()
        };
        assert!(count_rare(4.0) > count_rare(0.0));
    }

    #[test]
    fn test_regeneration_requires_breeding_and_respects_capacity() {
        let mut pops = park();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        // Disabled: nothing changes even with huge deltas
        pops.regenerate(ZoneId::West, 1.0e9, &mut rng);
        assert_eq!(pops.stock(ZoneId::West, SpeciesId(114)), 2);

        pops.enable_breeding(ZoneId::West);
        for _ in 0..10 {
            // Probability clamps to 1, so every call adds exactly one below capacity
            pops.regenerate(ZoneId::West, 1.0e9, &mut rng);
        }
        assert_eq!(pops.stock(ZoneId::West, SpeciesId(114)), 5);
        assert_eq!(pops.stock(ZoneId::West, SpeciesId(128)), 8);
    }

    #[test]
    fn test_regeneration_from_empty_stock() {
        let mut pops = park();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let catalog = SpeciesCatalog::with_defaults();
        let tangela = catalog.get(SpeciesId(114)).unwrap();
        let mut config = sure_catch_config();
        config.catch_rates.rare = 1.0;
        while pops.attempt_capture(tangela, ZoneId::West, 0.0, &config, 0, &mut rng).is_some() {}
        assert_eq!(pops.stock(ZoneId::West, SpeciesId(114)), 0);

        pops.enable_breeding(ZoneId::West);
        pops.regenerate(ZoneId::West, 1.0e9, &mut rng);
        assert_eq!(pops.stock(ZoneId::West, SpeciesId(114)), 1);
    }

    #[test]
    fn test_restock_clamps() {
        let mut pops = park();
        assert_eq!(pops.restock(ZoneId::Center, SpeciesId(29), 100), 15);
        assert_eq!(pops.stock(ZoneId::Center, SpeciesId(29)), 30);
        assert_eq!(pops.restock(ZoneId::Center, SpeciesId(999), 5), 0);
    }

    #[test]
    fn test_low_population_zones() {
        let mut pops = park();
        assert!(pops.low_population_zones(0.2).is_empty());

        let catalog = SpeciesCatalog::with_defaults();
        let mut config = sure_catch_config();
        config.catch_rates.rare = 1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for id in [114, 128] {
            let species = catalog.get(SpeciesId(id)).unwrap();
            while pops.attempt_capture(species, ZoneId::West, 0.0, &config, 0, &mut rng).is_some() {}
        }
        assert_eq!(pops.low_population_zones(0.2), vec![ZoneId::West]);
    }
}
