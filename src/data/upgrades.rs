//! Upgrade catalog - purchasable park improvements

use ahash::AHashMap;

use crate::core::types::ZoneId;
use crate::simulation::progression::ProgressionStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpgradeCategory {
    Marketing,
    Creatures,
    Facilities,
    Research,
}

/// What one level of an upgrade does
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    /// Each level raises the auto-bell level by one
    AutoBell,
    /// More visitors per bell press
    VisitorAttraction { percent: u32 },
    /// Entry fees and capture revenue
    RevenueMultiplier { percent: u32 },
    /// Enables breeding everywhere and speeds it up
    BreedingProgram { percent: u32 },
    /// Selection weight of rare, ultra rare and legendary species
    RareSpawnRate { percent: u32 },
    SatisfactionBonus { percent: u32 },
    /// Added to every capture probability
    CatchRate { percent: u32 },
    UnlockZone(ZoneId),
}

/// Gate that must pass before an upgrade can be bought
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnlockCondition {
    Always,
    CreaturesCaptured(u64),
    SatisfactionAtLeast(f64),
    DistinctSpecies(usize),
}

impl UnlockCondition {
    pub fn is_met(&self, stats: &ProgressionStats) -> bool {
        match *self {
            UnlockCondition::Always => true,
            UnlockCondition::CreaturesCaptured(target) => stats.creatures_captured >= target,
            UnlockCondition::SatisfactionAtLeast(target) => {
                stats.visitors_departed > 0 && stats.average_satisfaction >= target
            }
            UnlockCondition::DistinctSpecies(target) => stats.distinct_species >= target,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeDefinition {
    pub id: String,
    pub name: String,
    pub category: UpgradeCategory,
    pub max_level: u32,
    pub base_cost: u64,
    /// Cost growth factor per level
    pub cost_scaling: f64,
    pub effect: UpgradeEffect,
    pub unlock: UnlockCondition,
}

impl UpgradeDefinition {
    /// Price of buying the given level (1-based)
    pub fn cost_for_level(&self, level: u32) -> u64 {
        let exponent = level.saturating_sub(1) as i32;
        (self.base_cost as f64 * self.cost_scaling.powi(exponent)).floor() as u64
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpgradeCatalog {
    upgrades: Vec<UpgradeDefinition>,
    index: AHashMap<String, usize>,
}

impl UpgradeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, upgrade: UpgradeDefinition) {
        if let Some(&idx) = self.index.get(&upgrade.id) {
            self.upgrades[idx] = upgrade;
        } else {
            self.index.insert(upgrade.id.clone(), self.upgrades.len());
            self.upgrades.push(upgrade);
        }
    }

    pub fn get(&self, id: &str) -> Option<&UpgradeDefinition> {
        self.index.get(id).map(|&idx| &self.upgrades[idx])
    }

    pub fn all(&self) -> &[UpgradeDefinition] {
        &self.upgrades
    }

    pub fn by_category(&self, category: UpgradeCategory) -> impl Iterator<Item = &UpgradeDefinition> {
        self.upgrades.iter().filter(move |u| u.category == category)
    }

    pub fn with_defaults() -> Self {
        use UpgradeCategory::*;
        use UpgradeEffect::*;

        let entries = [
            ("auto_bell", "Auto-Bell Ringer", Marketing, 4, 1000, 3.0, AutoBell, UnlockCondition::Always),
            ("billboard", "Billboard Campaign", Marketing, 4, 2000, 4.0, VisitorAttraction { percent: 25 }, UnlockCondition::Always),
            ("breeding_program", "Basic Breeding Program", Creatures, 4, 3000, 2.0, BreedingProgram { percent: 100 }, UnlockCondition::Always),
            ("rest_house", "Rest House Comfort", Facilities, 4, 4000, 2.0, SatisfactionBonus { percent: 15 }, UnlockCondition::Always),
            ("research_lab", "Research Lab", Research, 1, 8000, 1.0, CatchRate { percent: 10 }, UnlockCondition::CreaturesCaptured(50)),
            ("item_shop", "Item Shop Expansion", Facilities, 4, 7000, 3.0, RevenueMultiplier { percent: 25 }, UnlockCondition::Always),
            ("rare_permit", "Rare Creature Permit", Creatures, 4, 10000, 3.0, RareSpawnRate { percent: 50 }, UnlockCondition::Always),
            ("unlock_area_east", "Unlock East Area", Facilities, 1, 5000, 1.0, UnlockZone(ZoneId::East), UnlockCondition::Always),
            ("unlock_area_north", "Unlock North Area", Facilities, 1, 25000, 1.0, UnlockZone(ZoneId::North), UnlockCondition::SatisfactionAtLeast(0.85)),
            ("unlock_area_west", "Unlock West Area", Facilities, 1, 100000, 1.0, UnlockZone(ZoneId::West), UnlockCondition::DistinctSpecies(20)),
        ];

        let mut catalog = Self::new();
        for (id, name, category, max_level, base_cost, cost_scaling, effect, unlock) in entries {
            catalog.add(UpgradeDefinition {
                id: id.to_string(),
                name: name.to_string(),
                category,
                max_level,
                base_cost,
                cost_scaling,
                effect,
                unlock,
            });
        }
        catalog
    }
}
