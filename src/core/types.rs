//! Core type definitions used throughout the codebase

use derive_more::Display;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session clock time in milliseconds since the session started
pub type Millis = u64;

/// Opaque identifier for a visitor
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct VisitorId(pub Uuid);

impl VisitorId {
    /// Build an id from RNG bytes so seeded sessions stay reproducible
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

/// Catalog identifier for a creature species
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[display(fmt = "#{}", _0)]
pub struct SpeciesId(pub u32);

/// A partition of the park with its own population and unlock gate
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneId {
    #[display(fmt = "center")]
    Center,
    #[display(fmt = "east")]
    East,
    #[display(fmt = "north")]
    North,
    #[display(fmt = "west")]
    West,
}

impl ZoneId {
    pub const ALL: [ZoneId; 4] = [ZoneId::Center, ZoneId::East, ZoneId::North, ZoneId::West];

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "center" => Some(ZoneId::Center),
            "east" => Some(ZoneId::East),
            "north" => Some(ZoneId::North),
            "west" => Some(ZoneId::West),
            _ => None,
        }
    }
}

/// Creature rarity tier
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    #[display(fmt = "common")]
    Common,
    #[display(fmt = "uncommon")]
    Uncommon,
    #[display(fmt = "rare")]
    Rare,
    #[display(fmt = "ultra_rare")]
    UltraRare,
    #[display(fmt = "legendary")]
    Legendary,
}

impl Rarity {
    /// Rare, ultra rare and legendary captures count toward the rare bucket
    pub fn is_rare(&self) -> bool {
        matches!(self, Rarity::Rare | Rarity::UltraRare | Rarity::Legendary)
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "ultra_rare" => Some(Rarity::UltraRare),
            "legendary" => Some(Rarity::Legendary),
            _ => None,
        }
    }
}

/// Ordinal progression tier of the park
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum GamePhase {
    #[default]
    Foundation = 1,
    Expansion = 2,
    Optimization = 3,
    Mastery = 4,
}

impl GamePhase {
    /// The following phase, or `None` at the final tier
    pub fn next(&self) -> Option<Self> {
        match self {
            GamePhase::Foundation => Some(GamePhase::Expansion),
            GamePhase::Expansion => Some(GamePhase::Optimization),
            GamePhase::Optimization => Some(GamePhase::Mastery),
            GamePhase::Mastery => None,
        }
    }
}
