//! Read-only reference tables: species, zones, upgrades, achievements

pub mod achievements;
pub mod species;
pub mod upgrades;
pub mod zones;

pub use achievements::{default_achievements, AchievementDefinition, Requirement, Reward};
pub use species::{Species, SpeciesCatalog};
pub use upgrades::{UnlockCondition, UpgradeCatalog, UpgradeCategory, UpgradeDefinition, UpgradeEffect};
pub use zones::{default_zones, InitialPopulation, ZoneDefinition};
