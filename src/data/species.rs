//! Species catalog - read-only reference data for capturable creatures

use ahash::AHashMap;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::core::error::{Result, TycoonError};
use crate::core::types::{Rarity, SpeciesId, ZoneId};

/// Immutable description of a creature species
#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    pub rarity: Rarity,
    pub base_value: u64,
    /// Selection weight in every allowed zone without an override
    pub spawn_weight: f64,
    pub zones: Vec<ZoneId>,
    /// Per-zone weight overrides
    pub zone_weights: BTreeMap<ZoneId, f64>,
    pub min_level: u32,
    pub max_level: u32,
}

impl Species {
    pub fn new(
        id: u32,
        name: &str,
        rarity: Rarity,
        base_value: u64,
        spawn_weight: f64,
        zones: &[ZoneId],
        levels: (u32, u32),
    ) -> Self {
        Self {
            id: SpeciesId(id),
            name: name.to_string(),
            rarity,
            base_value,
            spawn_weight,
            zones: zones.to_vec(),
            zone_weights: BTreeMap::new(),
            min_level: levels.0,
            max_level: levels.1,
        }
    }

    pub fn allowed_in(&self, zone: ZoneId) -> bool {
        self.zones.contains(&zone)
    }

    /// Spawn weight in a zone, zero when the species does not live there
    pub fn weight_in(&self, zone: ZoneId) -> f64 {
        if !self.allowed_in(zone) {
            return 0.0;
        }
        self.zone_weights
            .get(&zone)
            .copied()
            .unwrap_or(self.spawn_weight)
    }
}

/// Collection of all known species
#[derive(Debug, Clone, Default)]
pub struct SpeciesCatalog {
    species: Vec<Species>,
    index: AHashMap<SpeciesId, usize>,
}

impl SpeciesCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a species, replacing any previous entry with the same id
    pub fn add(&mut self, species: Species) {
        if let Some(&idx) = self.index.get(&species.id) {
            self.species[idx] = species;
        } else {
            self.index.insert(species.id, self.species.len());
            self.species.push(species);
        }
    }

    pub fn get(&self, id: SpeciesId) -> Option<&Species> {
        self.index.get(&id).map(|&idx| &self.species[idx])
    }

    /// Species allowed in a zone, in catalog order
    pub fn in_zone(&self, zone: ZoneId) -> impl Iterator<Item = &Species> {
        self.species.iter().filter(move |s| s.allowed_in(zone))
    }

    pub fn all(&self) -> &[Species] {
        &self.species
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// The safari roster the park opens with
    pub fn with_defaults() -> Self {
        use Rarity::*;
        use ZoneId::*;

        let all_zones = [Center, East, North, West];
        let mut catalog = Self::new();
        let defaults = [
            Species::new(29, "Nidoran♀", Common, 50, 0.2, &[Center], (22, 36)),
            Species::new(32, "Nidoran♂", Common, 50, 0.2, &[Center], (14, 22)),
            Species::new(102, "Exeggcute", Common, 75, 0.15, &[Center], (24, 25)),
            Species::new(111, "Rhyhorn", Common, 100, 0.15, &[Center], (20, 25)),
            Species::new(30, "Nidorina", Uncommon, 200, 0.1, &[Center], (31, 31)),
            Species::new(33, "Nidorino", Uncommon, 200, 0.1, &[Center], (23, 31)),
            Species::new(46, "Paras", Uncommon, 150, 0.12, &[Center], (27, 27)),
            Species::new(47, "Parasect", Uncommon, 250, 0.08, &[Center], (27, 32)),
            Species::new(48, "Venonat", Uncommon, 180, 0.1, &[Center], (22, 22)),
            Species::new(113, "Chansey", Rare, 1000, 0.02, &[Center], (7, 23)),
            Species::new(114, "Tangela", Rare, 800, 0.04, &[Center, West], (22, 22)),
            Species::new(123, "Scyther", Rare, 1200, 0.04, &[Center], (23, 23)),
            Species::new(127, "Pinsir", Rare, 1100, 0.04, &[Center], (23, 23)),
            Species::new(84, "Doduo", Common, 120, 0.2, &[East], (26, 26)),
            Species::new(104, "Cubone", Uncommon, 300, 0.1, &[East], (19, 19)),
            Species::new(105, "Marowak", Uncommon, 500, 0.05, &[East], (24, 24)),
            Species::new(115, "Kangaskhan", Rare, 1500, 0.04, &[East, North], (25, 33)),
            Species::new(128, "Tauros", Rare, 2000, 0.1, &[East, North, West], (21, 28)),
            Species::new(49, "Venomoth", Uncommon, 400, 0.05, &[North], (32, 32)),
            Species::new(144, "Articuno", Legendary, 50000, 0.001, &all_zones, (50, 50)),
            Species::new(145, "Zapdos", Legendary, 50000, 0.001, &all_zones, (50, 50)),
            Species::new(146, "Moltres", Legendary, 50000, 0.001, &all_zones, (50, 50)),
        ];
        for species in defaults {
            catalog.add(species);
        }
        catalog
    }

    /// Load a catalog from a TOML file
    pub fn load_from_toml(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a catalog from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        let toml_data: TomlCatalog =
            toml::from_str(content).map_err(|e| TycoonError::Config(e.to_string()))?;

        let mut catalog = Self::new();
        for entry in toml_data.species {
            catalog.add(entry.into_species()?);
        }
        Ok(catalog)
    }
}

/// TOML representation of a species file
#[derive(Debug, Deserialize)]
struct TomlCatalog {
    species: Vec<TomlSpecies>,
}

/// TOML representation of a single species
#[derive(Debug, Deserialize)]
struct TomlSpecies {
    id: u32,
    name: String,
    rarity: String,
    base_value: u64,
    spawn_weight: f64,
    zones: Vec<String>,
    #[serde(default)]
    zone_weights: BTreeMap<String, f64>,
    min_level: u32,
    max_level: u32,
}

impl TomlSpecies {
    fn into_species(self) -> Result<Species> {
        let rarity = Rarity::parse(&self.rarity).ok_or_else(|| {
            TycoonError::Config(format!("{}: invalid rarity '{}'", self.name, self.rarity))
        })?;

        let zones = self
            .zones
            .iter()
            .map(|z| parse_zone(&self.name, z))
            .collect::<Result<Vec<_>>>()?;

        let mut zone_weights = BTreeMap::new();
        for (zone, weight) in &self.zone_weights {
            zone_weights.insert(parse_zone(&self.name, zone)?, *weight);
        }

        if self.min_level > self.max_level {
            return Err(TycoonError::Config(format!(
                "{}: min_level {} exceeds max_level {}",
                self.name, self.min_level, self.max_level
            )));
        }
        if self.spawn_weight < 0.0 || zone_weights.values().any(|w| *w < 0.0) {
            return Err(TycoonError::Config(format!(
                "{}: spawn weights must not be negative",
                self.name
            )));
        }

        Ok(Species {
            id: SpeciesId(self.id),
            name: self.name,
            rarity,
            base_value: self.base_value,
            spawn_weight: self.spawn_weight,
            zones,
            zone_weights,
            min_level: self.min_level,
            max_level: self.max_level,
        })
    }
}

fn parse_zone(species: &str, zone: &str) -> Result<ZoneId> {
    ZoneId::parse(zone)
        .ok_or_else(|| TycoonError::Config(format!("{}: invalid zone '{}'", species, zone)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_every_zone() {
        let catalog = SpeciesCatalog::with_defaults();
        for zone in ZoneId::ALL {
            assert!(catalog.in_zone(zone).count() > 0, "{} has no species", zone);
        }
        assert_eq!(catalog.get(SpeciesId(29)).unwrap().name, "Nidoran♀");
    }

    #[test]
    fn test_weight_outside_zone_is_zero() {
        let catalog = SpeciesCatalog::with_defaults();
        let doduo = catalog.get(SpeciesId(84)).unwrap();
        assert!(doduo.weight_in(ZoneId::East) > 0.0);
        assert_eq!(doduo.weight_in(ZoneId::Center), 0.0);
    }

    #[test]
    fn test_parse_toml_catalog() {
        let content = r#"
            [[species]]
            id = 1
            name = "Glowmoth"
            rarity = "ultra_rare"
            base_value = 5000
            spawn_weight = 0.05
            zones = ["north", "west"]
            zone_weights = { west = 0.2 }
            min_level = 30
            max_level = 40
        "#;
        let catalog = SpeciesCatalog::parse_toml(content).unwrap();
        let moth = catalog.get(SpeciesId(1)).unwrap();
        assert_eq!(moth.rarity, Rarity::UltraRare);
        assert!((moth.weight_in(ZoneId::North) - 0.05).abs() < 1e-9);
        assert!((moth.weight_in(ZoneId::West) - 0.2).abs() < 1e-9);
        assert_eq!(moth.weight_in(ZoneId::Center), 0.0);
    }

    #[test]
    fn test_parse_toml_rejects_bad_rarity() {
        let content = r#"
            [[species]]
            id = 1
            name = "Oddity"
            rarity = "mythic"
            base_value = 1
            spawn_weight = 0.1
            zones = ["center"]
            min_level = 1
            max_level = 2
        "#;
        assert!(matches!(
            SpeciesCatalog::parse_toml(content),
            Err(TycoonError::Config(_))
        ));
    }

    #[test]
    fn test_add_replaces_same_id() {
        let mut catalog = SpeciesCatalog::new();
        catalog.add(Species::new(5, "A", Rarity::Common, 10, 1.0, &[ZoneId::Center], (1, 1)));
        catalog.add(Species::new(5, "B", Rarity::Rare, 10, 1.0, &[ZoneId::Center], (1, 1)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(SpeciesId(5)).unwrap().name, "B");
    }
}
