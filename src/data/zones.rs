//! Zone definitions and their opening populations

use crate::core::types::{SpeciesId, ZoneId};

/// Opening stock for one species in a zone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialPopulation {
    pub species: SpeciesId,
    pub count: u32,
    pub capacity: u32,
}

/// A zone of the park
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneDefinition {
    pub id: ZoneId,
    pub name: String,
    pub initial: Vec<InitialPopulation>,
}

impl ZoneDefinition {
    fn new(id: ZoneId, name: &str, initial: &[(u32, u32, u32)]) -> Self {
        Self {
            id,
            name: name.to_string(),
            initial: initial
                .iter()
                .map(|&(species, count, capacity)| InitialPopulation {
                    species: SpeciesId(species),
                    count,
                    capacity,
                })
                .collect(),
        }
    }

    pub fn total_capacity(&self) -> u32 {
        self.initial.iter().map(|p| p.capacity).sum()
    }
}

/// All zones in the park
pub fn default_zones() -> Vec<ZoneDefinition> {
    vec![
        ZoneDefinition::new(
            ZoneId::Center,
            "Center Area",
            &[
                (29, 15, 30),  // Nidoran♀
                (32, 15, 30),  // Nidoran♂
                (102, 10, 20), // Exeggcute
                (111, 8, 15),  // Rhyhorn
                (46, 5, 12),   // Paras
                (48, 5, 12),   // Venonat
            ],
        ),
        ZoneDefinition::new(
            ZoneId::East,
            "East Grassland",
            &[
                (84, 12, 25), // Doduo
                (104, 6, 15), // Cubone
                (128, 3, 8),  // Tauros
            ],
        ),
        ZoneDefinition::new(
            ZoneId::North,
            "North Mountains",
            &[
                (115, 4, 10), // Kangaskhan
                (128, 2, 6),  // Tauros
            ],
        ),
        ZoneDefinition::new(
            ZoneId::West,
            "West Forest",
            &[
                (114, 2, 5), // Tangela
                (128, 3, 8), // Tauros
            ],
        ),
    ]
}
