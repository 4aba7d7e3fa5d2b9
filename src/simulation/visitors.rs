//! Visitor lifecycle: arrival, encounters, departure
//!
//! A visitor is `Active` until its stay budget runs out, then departs
//! exactly once. Departure pays the entry fee and feeds the satisfaction
//! average; the record is removed from the roster in the same step.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{Millis, VisitorId, ZoneId};
use crate::data::species::SpeciesCatalog;
use crate::progress::upgrades::ActiveEffects;
use crate::simulation::events::GameEvent;
use crate::simulation::names::generate_name;
use crate::simulation::population::{CapturedCreature, Populations};
use crate::simulation::progression::Progression;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitorCategory {
    Casual,
    Collector,
    Speedrunner,
    ShinyHunter,
}

impl VisitorCategory {
    pub const ALL: [VisitorCategory; 4] = [
        VisitorCategory::Casual,
        VisitorCategory::Collector,
        VisitorCategory::Speedrunner,
        VisitorCategory::ShinyHunter,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitorRank {
    Regular,
    Rare,
    Epic,
    Legendary,
}

impl VisitorRank {
    pub fn fee_multiplier(&self) -> f64 {
        match self {
            VisitorRank::Regular => 1.0,
            VisitorRank::Rare => 1.75,
            VisitorRank::Epic => 2.5,
            VisitorRank::Legendary => 4.0,
        }
    }

    /// Added to every capture probability of this visitor
    pub fn catch_bonus(&self) -> f64 {
        match self {
            VisitorRank::Regular => 0.0,
            VisitorRank::Rare => 0.15,
            VisitorRank::Epic => 0.25,
            VisitorRank::Legendary => 0.4,
        }
    }

    /// Rank for a special-wave visitor: rare 20, epic 8, legendary 2
    pub fn roll_special<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll = rng.gen_range(0..30);
        if roll < 20 {
            VisitorRank::Rare
        } else if roll < 28 {
            VisitorRank::Epic
        } else {
            VisitorRank::Legendary
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Visitor {
    pub id: VisitorId,
    pub name: String,
    pub category: VisitorCategory,
    pub rank: VisitorRank,
    pub zone: ZoneId,
    pub entry_fee: u64,
    pub captures: Vec<CapturedCreature>,
    pub satisfaction: f64,
    pub elapsed_secs: f64,
    /// Drawn once at arrival, never changed
    pub stay_budget_secs: f64,
    pub active: bool,
}

impl Visitor {
    pub fn should_depart(&self) -> bool {
        self.elapsed_secs > self.stay_budget_secs
    }
}

/// Satisfaction on departure, before upgrade bonuses
pub fn base_satisfaction(captures: &[CapturedCreature]) -> f64 {
    if captures.is_empty() {
        return 0.5;
    }
    let mut satisfaction = (0.6 + 0.2 * captures.len() as f64).min(1.0);
    let rare = captures.iter().filter(|c| c.rarity.is_rare()).count();
    satisfaction = (satisfaction + 0.1 * rare as f64).min(1.0);
    satisfaction
}

pub fn final_satisfaction(captures: &[CapturedCreature], bonus: f64) -> f64 {
    (base_satisfaction(captures) * (1.0 + bonus)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpawnReport {
    pub spawned: u32,
    pub dropped: u32,
}

/// What a visitor tick reads and writes outside the roster
pub struct TickContext<'a> {
    pub populations: &'a mut Populations,
    pub catalog: &'a SpeciesCatalog,
    pub progression: &'a mut Progression,
    pub effects: &'a ActiveEffects,
    pub config: &'a SimulationConfig,
    pub now: Millis,
    pub events: &'a mut Vec<GameEvent>,
}

#[derive(Debug, Clone)]
pub struct VisitorRoster {
    visitors: Vec<Visitor>,
    cap: usize,
}

impl VisitorRoster {
    pub fn new(cap: usize) -> Self {
        Self {
            visitors: Vec::new(),
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.visitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn visitors(&self) -> &[Visitor] {
        &self.visitors
    }

    pub fn get(&self, id: VisitorId) -> Option<&Visitor> {
        self.visitors.iter().find(|v| v.id == id)
    }

    pub fn clear(&mut self) {
        self.visitors.clear();
    }

    /// Create up to `count` visitors in a zone. Requests past the roster cap
    /// are dropped, not queued.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        count: u32,
        zone: ZoneId,
        special: bool,
        config: &SimulationConfig,
        effects: &ActiveEffects,
        rng: &mut R,
    ) -> SpawnReport {
        let room = self.cap.saturating_sub(self.visitors.len()) as u32;
        let spawned = count.min(room);
        let dropped = count - spawned;

        for _ in 0..spawned {
            let visitor = self.create_visitor(zone, special, config, effects, rng);
            tracing::debug!(
                "{} ({:?}, {:?}) arrived in {} for {:.0}s",
                visitor.name,
                visitor.category,
                visitor.rank,
                zone,
                visitor.stay_budget_secs
            );
            self.visitors.push(visitor);
        }
        if dropped > 0 {
            tracing::debug!("Roster full, dropped {} of {} visitors", dropped, count);
        }

        SpawnReport { spawned, dropped }
    }

    fn create_visitor<R: Rng + ?Sized>(
        &self,
        zone: ZoneId,
        special: bool,
        config: &SimulationConfig,
        effects: &ActiveEffects,
        rng: &mut R,
    ) -> Visitor {
        let id = VisitorId::generate(rng);
        let category = *VisitorCategory::ALL.choose(rng).unwrap_or(&VisitorCategory::Casual);
        let rank = if special {
            VisitorRank::roll_special(rng)
        } else {
            VisitorRank::Regular
        };
        let name = generate_name(category, rank, rng);
        let stay_budget_secs = rng.gen_range(config.min_stay_secs..=config.max_stay_secs);
        let entry_fee =
            (config.base_entry_fee as f64 * rank.fee_multiplier() * effects.revenue_multiplier).floor() as u64;

        Visitor {
            id,
            name,
            category,
            rank,
            zone,
            entry_fee,
            captures: Vec::new(),
            satisfaction: 0.5,
            elapsed_secs: 0.0,
            stay_budget_secs,
            active: true,
        }
    }

    /// Age every visitor by `delta_secs`. Each visitor is fully processed
    /// (aging, encounter, departure) before the next one.
    pub fn tick<R: Rng + ?Sized>(&mut self, delta_secs: f64, ctx: &mut TickContext<'_>, rng: &mut R) {
        let mut i = 0;
        while i < self.visitors.len() {
            let visitor = &mut self.visitors[i];
            visitor.elapsed_secs += delta_secs;

            if rng.gen_bool(ctx.config.encounter_chance) {
                encounter(visitor, ctx, rng);
            }

            if visitor.should_depart() {
                let visitor = self.visitors.remove(i);
                finalize_departure(visitor, ctx);
            } else {
                i += 1;
            }
        }
    }
}

fn encounter<R: Rng + ?Sized>(visitor: &mut Visitor, ctx: &mut TickContext<'_>, rng: &mut R) {
    let Some(species) =
        Populations::select_species(ctx.catalog, visitor.zone, ctx.effects.rare_spawn_bonus, rng)
    else {
        return;
    };

    let catch_bonus = ctx.effects.catch_bonus + visitor.rank.catch_bonus();
    let Some(creature) =
        ctx.populations
            .attempt_capture(species, visitor.zone, catch_bonus, ctx.config, ctx.now, rng)
    else {
        return;
    };

    let revenue = ((creature.value + creature.level as u64 * ctx.config.level_value_bonus) as f64
        * ctx.effects.revenue_multiplier)
        .floor() as u64;
    ctx.progression.credit_currency(revenue);
    ctx.progression.record_capture(creature.rarity, creature.shiny);
    ctx.progression.record_species(creature.species_id);

    if creature.shiny || creature.rarity.is_rare() {
        tracing::info!(
            "{} caught {}{} ({}) in {}",
            visitor.name,
            if creature.shiny { "shiny " } else { "" },
            creature.species_name,
            creature.rarity,
            creature.zone
        );
    }

    ctx.events.push(GameEvent::CreatureCaptured {
        visitor: visitor.id,
        species: creature.species_id,
        species_name: creature.species_name.clone(),
        rarity: creature.rarity,
        shiny: creature.shiny,
        zone: creature.zone,
        revenue,
    });
    visitor.captures.push(creature);
}

/// Terminal accounting for a visitor. Takes ownership so it cannot run twice.
pub fn finalize_departure(mut visitor: Visitor, ctx: &mut TickContext<'_>) {
    visitor.active = false;
    visitor.satisfaction = final_satisfaction(&visitor.captures, ctx.effects.satisfaction_bonus);

    ctx.progression.record_visitor_departure(visitor.satisfaction);
    ctx.progression.credit_currency(visitor.entry_fee);

    tracing::debug!(
        "{} departed after {:.0}s with {} captures, satisfaction {:.2}",
        visitor.name,
        visitor.elapsed_secs,
        visitor.captures.len(),
        visitor.satisfaction
    );

    ctx.events.push(GameEvent::VisitorDeparted {
        visitor: visitor.id,
        name: visitor.name,
        satisfaction: visitor.satisfaction,
        entry_fee: visitor.entry_fee,
        captures: visitor.captures.len(),
    });
}
