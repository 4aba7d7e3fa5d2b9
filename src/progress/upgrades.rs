//! Purchased upgrade levels and the effects they add up to

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::error::{Result, TycoonError};
use crate::data::upgrades::{UpgradeCatalog, UpgradeEffect};
use crate::simulation::progression::{Progression, ProgressionStats};

/// Aggregate of every purchased level and permanent bonus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEffects {
    pub auto_bell_level: u32,
    /// Extra visitors per bell press, as a fraction of the base count
    pub attraction_bonus: f64,
    pub revenue_multiplier: f64,
    pub breeding_enabled: bool,
    pub breeding_multiplier: f64,
    pub rare_spawn_bonus: f64,
    pub satisfaction_bonus: f64,
    pub catch_bonus: f64,
}

impl Default for ActiveEffects {
    fn default() -> Self {
        Self {
            auto_bell_level: 0,
            attraction_bonus: 0.0,
            revenue_multiplier: 1.0,
            breeding_enabled: false,
            breeding_multiplier: 1.0,
            rare_spawn_bonus: 0.0,
            satisfaction_bonus: 0.0,
            catch_bonus: 0.0,
        }
    }
}

impl ActiveEffects {
    /// Stack `levels` copies of an effect
    pub fn apply(&mut self, effect: UpgradeEffect, levels: u32) {
        let scaled = |percent: u32| (percent as f64 / 100.0) * levels as f64;
        match effect {
            UpgradeEffect::AutoBell => self.auto_bell_level += levels,
            UpgradeEffect::VisitorAttraction { percent } => self.attraction_bonus += scaled(percent),
            UpgradeEffect::RevenueMultiplier { percent } => self.revenue_multiplier += scaled(percent),
            UpgradeEffect::BreedingProgram { percent } => {
                self.breeding_enabled = true;
                self.breeding_multiplier += scaled(percent);
            }
            UpgradeEffect::RareSpawnRate { percent } => self.rare_spawn_bonus += scaled(percent),
            UpgradeEffect::SatisfactionBonus { percent } => self.satisfaction_bonus += scaled(percent),
            UpgradeEffect::CatchRate { percent } => self.catch_bonus += scaled(percent),
            // Applied once at purchase time
            UpgradeEffect::UnlockZone(_) => {}
        }
    }

    /// Scale a visitor count by the attraction bonus.
    ///
    /// The fractional part becomes the chance of one more visitor.
    pub fn attract<R: Rng + ?Sized>(&self, base: u32, rng: &mut R) -> u32 {
        if self.attraction_bonus <= 0.0 {
            return base;
        }
        let scaled = base as f64 * (1.0 + self.attraction_bonus);
        let whole = scaled.floor();
        let extra = if rng.gen_bool((scaled - whole).clamp(0.0, 1.0)) { 1 } else { 0 };
        whole as u32 + extra
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseReceipt {
    pub id: String,
    pub level: u32,
    pub cost: u64,
    pub effect: UpgradeEffect,
}

/// Which upgrades are unlocked and how many levels of each are owned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpgradeLedger {
    levels: BTreeMap<String, u32>,
    unlocked: BTreeSet<String>,
}

impl UpgradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, id: &str) -> u32 {
        self.levels.get(id).copied().unwrap_or(0)
    }

    pub fn levels(&self) -> impl Iterator<Item = (&str, u32)> {
        self.levels.iter().map(|(id, level)| (id.as_str(), *level))
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Upgrades owned at level one or higher
    pub fn distinct_purchased(&self) -> u32 {
        self.levels.values().filter(|&&l| l > 0).count() as u32
    }

    /// Unlock every upgrade whose condition now holds; returns the new ones
    pub fn refresh_unlocks(&mut self, catalog: &UpgradeCatalog, stats: &ProgressionStats) -> Vec<String> {
        let mut newly = Vec::new();
        for upgrade in catalog.all() {
            if !self.unlocked.contains(&upgrade.id) && upgrade.unlock.is_met(stats) {
                self.unlocked.insert(upgrade.id.clone());
                newly.push(upgrade.id.clone());
            }
        }
        newly
    }

    /// Buy the next level of an upgrade. Any failure leaves all state unchanged.
    pub fn purchase(
        &mut self,
        catalog: &UpgradeCatalog,
        id: &str,
        progression: &mut Progression,
    ) -> Result<PurchaseReceipt> {
        let upgrade = catalog
            .get(id)
            .ok_or_else(|| TycoonError::UnknownUpgrade(id.to_string()))?;

        if !self.unlocked.contains(id) && !upgrade.unlock.is_met(&progression.stats()) {
            return Err(TycoonError::UpgradeLocked(id.to_string()));
        }

        let current = self.level(id);
        if current >= upgrade.max_level {
            return Err(TycoonError::UpgradeMaxed(id.to_string()));
        }

        let level = current + 1;
        let cost = upgrade.cost_for_level(level);
        progression.try_debit(cost)?;

        self.unlocked.insert(id.to_string());
        self.levels.insert(id.to_string(), level);
        tracing::info!("Purchased {} level {} for {}", id, level, cost);

        Ok(PurchaseReceipt {
            id: id.to_string(),
            level,
            cost,
            effect: upgrade.effect,
        })
    }

    /// Fold owned levels plus any permanent bonuses into one effect set
    pub fn effects(&self, catalog: &UpgradeCatalog, bonuses: &[UpgradeEffect]) -> ActiveEffects {
        let mut effects = ActiveEffects::default();
        for (id, &level) in &self.levels {
            if let Some(upgrade) = catalog.get(id) {
                effects.apply(upgrade.effect, level.min(upgrade.max_level));
            }
        }
        for bonus in bonuses {
            effects.apply(*bonus, 1);
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ZoneId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_purchase_debits_and_levels() {
        let catalog = UpgradeCatalog::with_defaults();
        let mut ledger = UpgradeLedger::new();
        let mut progression = Progression::new(5000);

        let receipt = ledger.purchase(&catalog, "auto_bell", &mut progression).unwrap();
        assert_eq!(receipt.level, 1);
        assert_eq!(receipt.cost, 1000);
        assert_eq!(progression.currency, 4000);

        let receipt = ledger.purchase(&catalog, "auto_bell", &mut progression).unwrap();
        assert_eq!(receipt.cost, 3000);
        assert_eq!(ledger.level("auto_bell"), 2);
        assert_eq!(progression.currency, 1000);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let catalog = UpgradeCatalog::with_defaults();
        let mut ledger = UpgradeLedger::new();
        let mut progression = Progression::new(999);

        let err = ledger.purchase(&catalog, "auto_bell", &mut progression).unwrap_err();
        assert!(matches!(err, TycoonError::InsufficientFunds { needed: 1000, available: 999 }));
        assert_eq!(progression.currency, 999);
        assert_eq!(ledger.level("auto_bell"), 0);
        assert_eq!(ledger, UpgradeLedger::new());
    }

    #[test]
    fn test_unknown_locked_and_maxed() {
        let catalog = UpgradeCatalog::with_defaults();
        let mut ledger = UpgradeLedger::new();
        let mut progression = Progression::new(1_000_000);

        assert!(matches!(
            ledger.purchase(&catalog, "time_machine", &mut progression),
            Err(TycoonError::UnknownUpgrade(_))
        ));
        assert!(matches!(
            ledger.purchase(&catalog, "research_lab", &mut progression),
            Err(TycoonError::UpgradeLocked(_))
        ));

        ledger.purchase(&catalog, "unlock_area_east", &mut progression).unwrap();
        assert!(matches!(
            ledger.purchase(&catalog, "unlock_area_east", &mut progression),
            Err(TycoonError::UpgradeMaxed(_))
        ));
        assert_eq!(progression.currency, 1_000_000 - 5000);
    }

    #[test]
    fn test_refresh_unlocks_reports_once() {
        let catalog = UpgradeCatalog::with_defaults();
        let mut ledger = UpgradeLedger::new();
        let mut stats = ProgressionStats::default();

        let first = ledger.refresh_unlocks(&catalog, &stats);
        assert!(first.contains(&"auto_bell".to_string()));
        assert!(!first.contains(&"research_lab".to_string()));
        assert!(ledger.refresh_unlocks(&catalog, &stats).is_empty());

        stats.creatures_captured = 50;
        assert_eq!(ledger.refresh_unlocks(&catalog, &stats), vec!["research_lab".to_string()]);
    }

    #[test]
    fn test_effects_stack_levels_and_bonuses() {
        let catalog = UpgradeCatalog::with_defaults();
        let mut ledger = UpgradeLedger::new();
        let mut progression = Progression::new(1_000_000);
        ledger.purchase(&catalog, "item_shop", &mut progression).unwrap();
        ledger.purchase(&catalog, "item_shop", &mut progression).unwrap();
        ledger.purchase(&catalog, "breeding_program", &mut progression).unwrap();
        ledger.purchase(&catalog, "auto_bell", &mut progression).unwrap();

        let effects = ledger.effects(
            &catalog,
            &[UpgradeEffect::RevenueMultiplier { percent: 10 }, UpgradeEffect::UnlockZone(ZoneId::West)],
        );
        assert!((effects.revenue_multiplier - 1.6).abs() < 1e-9);
        assert!(effects.breeding_enabled);
        assert!((effects.breeding_multiplier - 2.0).abs() < 1e-9);
        assert_eq!(effects.auto_bell_level, 1);
        assert_eq!(effects.catch_bonus, 0.0);
        assert_eq!(ledger.distinct_purchased(), 3);
    }

    #[test]
    fn test_attract_without_bonus_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let effects = ActiveEffects::default();
        assert_eq!(effects.attract(8, &mut rng), 8);

        let boosted = ActiveEffects {
            attraction_bonus: 0.25,
            ..Default::default()
        };
        // 8 * 1.25 is whole, so no roll can change it
        assert_eq!(boosted.attract(8, &mut rng), 10);
        let one = boosted.attract(1, &mut rng);
        assert!(one == 1 || one == 2);
    }
}
