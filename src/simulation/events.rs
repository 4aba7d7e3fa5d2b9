//! Notifications emitted by the session, once per occurrence

use crate::bell::RewardTier;
use crate::core::types::{Rarity, SpeciesId, VisitorId, ZoneId};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    CreatureCaptured {
        visitor: VisitorId,
        species: SpeciesId,
        species_name: String,
        rarity: Rarity,
        shiny: bool,
        zone: ZoneId,
        /// Revenue credited for the capture
        revenue: u64,
    },
    StreakMilestone {
        tier: RewardTier,
        visitors: u32,
    },
    VisitorsArrived {
        zone: ZoneId,
        count: u32,
        /// Requests beyond the roster cap
        dropped: u32,
    },
    VisitorDeparted {
        visitor: VisitorId,
        name: String,
        satisfaction: f64,
        entry_fee: u64,
        captures: usize,
    },
    UpgradePurchased {
        id: String,
        level: u32,
        cost: u64,
    },
    UpgradeUnlocked {
        id: String,
    },
    ZoneUnlocked {
        zone: ZoneId,
    },
    AchievementUnlocked {
        id: String,
        name: String,
    },
}
