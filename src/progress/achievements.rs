//! Achievement tracking

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::data::achievements::{AchievementDefinition, Reward};
use crate::data::upgrades::UpgradeEffect;
use crate::simulation::progression::ProgressionStats;

/// Ids of achievements already earned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementTracker {
    unlocked: BTreeSet<String>,
}

impl AchievementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn unlocked_count(&self) -> usize {
        self.unlocked.len()
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &str> {
        self.unlocked.iter().map(String::as_str)
    }

    /// Mark every newly satisfied achievement and return it. Each id is
    /// reported once per save, never again.
    pub fn check<'a>(
        &mut self,
        table: &'a [AchievementDefinition],
        stats: &ProgressionStats,
        upgrades_purchased: u32,
    ) -> Vec<&'a AchievementDefinition> {
        let mut newly = Vec::new();
        for achievement in table {
            if self.unlocked.contains(&achievement.id) {
                continue;
            }
            if achievement.requirement.is_met(stats, upgrades_purchased) {
                self.unlocked.insert(achievement.id.clone());
                newly.push(achievement);
            }
        }
        newly
    }

    /// Permanent effects granted by earned achievements
    pub fn bonus_effects(&self, table: &[AchievementDefinition]) -> Vec<UpgradeEffect> {
        table
            .iter()
            .filter(|a| self.unlocked.contains(&a.id))
            .filter_map(|a| match a.reward {
                Reward::Bonus(effect) => Some(effect),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::achievements::default_achievements;

    #[test]
    fn test_unlocks_exactly_once() {
        let table = default_achievements();
        let mut tracker = AchievementTracker::new();
        let stats = ProgressionStats {
            visitors_attracted: 1,
            ..Default::default()
        };

        let first: Vec<&str> = tracker.check(&table, &stats, 0).iter().map(|a| a.id.as_str()).collect();
        assert_eq!(first, vec!["first_steps"]);
        assert!(tracker.check(&table, &stats, 0).is_empty());
        assert!(tracker.is_unlocked("first_steps"));
    }

    #[test]
    fn test_bonus_effects_only_from_unlocked() {
        let table = default_achievements();
        let mut tracker = AchievementTracker::new();
        assert!(tracker.bonus_effects(&table).is_empty());

        let stats = ProgressionStats {
            creatures_captured: 50,
            ..Default::default()
        };
        tracker.check(&table, &stats, 0);
        assert_eq!(
            tracker.bonus_effects(&table),
            vec![UpgradeEffect::RevenueMultiplier { percent: 10 }]
        );
    }
}
