//! Upgrade purchases and achievement tracking
//!
//! Both read progression stats and never get called back by progression.

pub mod achievements;
pub mod upgrades;

pub use achievements::AchievementTracker;
pub use upgrades::{ActiveEffects, PurchaseReceipt, UpgradeLedger};
