//! Visitor display names

use rand::seq::SliceRandom;
use rand::Rng;

use crate::simulation::visitors::{VisitorCategory, VisitorRank};

fn first_names(category: VisitorCategory) -> &'static [&'static str] {
    match category {
        VisitorCategory::Casual => &["Alex", "Sam", "Riley", "Casey", "Jordan", "Taylor", "Morgan", "Jamie"],
        VisitorCategory::Collector => &["Professor", "Dr.", "Scholar", "Curator", "Archivist", "Sage", "Keeper", "Elder"],
        VisitorCategory::Speedrunner => &["Flash", "Dash", "Bolt", "Rush", "Swift", "Turbo", "Blitz", "Rocket"],
        VisitorCategory::ShinyHunter => &["Shimmer", "Gleam", "Sparkle", "Glitter", "Aurora", "Chrome", "Crystal", "Silver"],
    }
}

fn last_names(category: VisitorCategory) -> &'static [&'static str] {
    match category {
        VisitorCategory::Casual => &["Walker", "Rivers", "Woods", "Fields", "Stone", "Hill", "Brook", "Reed"],
        VisitorCategory::Collector => &["Archives", "Codex", "Index", "Registry", "Vault", "Library", "Gallery", "Compendium"],
        VisitorCategory::Speedrunner => &["Runner", "Racer", "Pacer", "Sprinter", "Dasher", "Blazer", "Charger", "Flyer"],
        VisitorCategory::ShinyHunter => &["Hunter", "Seeker", "Finder", "Tracker", "Chaser", "Scout", "Ranger", "Sleuth"],
    }
}

fn rank_titles(rank: VisitorRank) -> &'static [&'static str] {
    match rank {
        VisitorRank::Regular => &[],
        VisitorRank::Rare => &["Ace", "Pro", "Expert", "Skilled"],
        VisitorRank::Epic => &["Elite", "Master", "Champion", "Hero"],
        VisitorRank::Legendary => &["Mythical", "Divine", "Cosmic", "Supreme"],
    }
}

/// "First Last", prefixed with a title for ranked visitors
pub fn generate_name<R: Rng + ?Sized>(category: VisitorCategory, rank: VisitorRank, rng: &mut R) -> String {
    let first = first_names(category).choose(rng).copied().unwrap_or("Trainer");
    let last = last_names(category).choose(rng).copied().unwrap_or("");

    let base = if last.is_empty() {
        first.to_string()
    } else {
        format!("{} {}", first, last)
    };

    match rank_titles(rank).choose(rng) {
        Some(title) => format!("{} {}", title, base),
        None => base,
    }
}
