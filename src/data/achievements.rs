//! Achievement requirement table

use crate::data::upgrades::UpgradeEffect;
use crate::simulation::progression::ProgressionStats;

/// Threshold an achievement waits for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Requirement {
    VisitorsAttracted(u64),
    CurrencyEarned(u64),
    CreaturesCaptured(u64),
    RareCaptured(u64),
    ShinyCaptured(u64),
    /// Average satisfaction, judged only once visitors have left
    SatisfactionAtLeast(f64),
    ZonesUnlocked(usize),
    UpgradesPurchased(u32),
    BellRings(u64),
    PerfectClicks(u64),
    Caravans(u64),
    Frenzies(u64),
}

impl Requirement {
    pub fn is_met(&self, stats: &ProgressionStats, upgrades_purchased: u32) -> bool {
        self.progress(stats, upgrades_purchased) >= 1.0
    }

    /// Completion fraction in [0, 1]
    pub fn progress(&self, stats: &ProgressionStats, upgrades_purchased: u32) -> f64 {
        fn ratio(current: f64, target: f64) -> f64 {
            if target <= 0.0 {
                1.0
            } else {
                (current / target).clamp(0.0, 1.0)
            }
        }

        match *self {
            Requirement::VisitorsAttracted(t) => ratio(stats.visitors_attracted as f64, t as f64),
            Requirement::CurrencyEarned(t) => ratio(stats.lifetime_earned as f64, t as f64),
            Requirement::CreaturesCaptured(t) => ratio(stats.creatures_captured as f64, t as f64),
            Requirement::RareCaptured(t) => ratio(stats.rare_captured as f64, t as f64),
            Requirement::ShinyCaptured(t) => ratio(stats.shiny_captured as f64, t as f64),
            Requirement::SatisfactionAtLeast(t) => {
                if stats.visitors_departed == 0 {
                    0.0
                } else {
                    ratio(stats.average_satisfaction, t)
                }
            }
            Requirement::ZonesUnlocked(t) => ratio(stats.zones_unlocked as f64, t as f64),
            Requirement::UpgradesPurchased(t) => ratio(upgrades_purchased as f64, t as f64),
            Requirement::BellRings(t) => ratio(stats.bell_rings as f64, t as f64),
            Requirement::PerfectClicks(t) => ratio(stats.perfect_clicks as f64, t as f64),
            Requirement::Caravans(t) => ratio(stats.caravans as f64, t as f64),
            Requirement::Frenzies(t) => ratio(stats.frenzies as f64, t as f64),
        }
    }
}

/// What unlocking an achievement grants
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reward {
    Currency(u64),
    /// Permanent effect stacked with purchased upgrades
    Bonus(UpgradeEffect),
    /// Bragging rights only
    Title,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AchievementDefinition {
    pub id: String,
    pub name: String,
    pub requirement: Requirement,
    pub reward: Reward,
}

pub fn default_achievements() -> Vec<AchievementDefinition> {
    use Requirement::*;

    let entries = [
        ("first_steps", "First Steps", VisitorsAttracted(1), Reward::Currency(200)),
        ("nest_egg", "Nest Egg", CurrencyEarned(1000), Reward::Currency(300)),
        ("population_control", "Population Control", CreaturesCaptured(50), Reward::Bonus(UpgradeEffect::RevenueMultiplier { percent: 10 })),
        ("customer_service", "Customer Service", SatisfactionAtLeast(0.9), Reward::Title),
        ("area_explorer", "Area Explorer", ZonesUnlocked(4), Reward::Bonus(UpgradeEffect::RevenueMultiplier { percent: 25 })),
        ("rare_finder", "Rare Finder", RareCaptured(1), Reward::Title),
        ("shiny_hunter", "Shiny Hunter", ShinyCaptured(1), Reward::Bonus(UpgradeEffect::RevenueMultiplier { percent: 100 })),
        ("bell_ringer", "Bell Ringer", BellRings(100), Reward::Currency(500)),
        ("bell_master", "Bell Master", PerfectClicks(10), Reward::Title),
        ("caravan_leader", "Caravan Leader", Caravans(1), Reward::Currency(1000)),
        ("frenzy", "Trainer Frenzy", Frenzies(1), Reward::Currency(5000)),
        ("tycoon_status", "Tycoon Status", CurrencyEarned(100_000), Reward::Title),
        ("world_famous", "World Famous", VisitorsAttracted(1000), Reward::Bonus(UpgradeEffect::VisitorAttraction { percent: 50 })),
        ("master_breeder", "Master Breeder", UpgradesPurchased(4), Reward::Bonus(UpgradeEffect::BreedingProgram { percent: 200 })),
    ];

    entries
        .into_iter()
        .map(|(id, name, requirement, reward)| AchievementDefinition {
            id: id.to_string(),
            name: name.to_string(),
            requirement,
            reward,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_unique() {
        let table = default_achievements();
        let mut ids: Vec<&str> = table.iter().map(|a| a.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), table.len());
    }

    #[test]
    fn test_progress_is_clamped() {
        let stats = ProgressionStats {
            visitors_attracted: 5000,
            ..Default::default()
        };
        assert_eq!(Requirement::VisitorsAttracted(1000).progress(&stats, 0), 1.0);
        assert!((Requirement::CurrencyEarned(1000).progress(&stats, 0)).abs() < 1e-9);
        assert!(Requirement::UpgradesPurchased(4).is_met(&stats, 4));
        assert!(!Requirement::UpgradesPurchased(4).is_met(&stats, 3));
    }

    #[test]
    fn test_satisfaction_needs_departures() {
        let mut stats = ProgressionStats {
            average_satisfaction: 1.0,
            ..Default::default()
        };
        assert!(!Requirement::SatisfactionAtLeast(0.9).is_met(&stats, 0));
        stats.visitors_departed = 1;
        assert!(Requirement::SatisfactionAtLeast(0.9).is_met(&stats, 0));
    }
}
