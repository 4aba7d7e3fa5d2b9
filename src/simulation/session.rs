//! Park session - owns all game state and drives it from the scheduler
//!
//! A session advances only when told to. `advance(delta_ms)` releases every
//! scheduled item that falls due, in time order:
//! 1. SimulationTick: visitors age, encounter, depart; populations breed;
//!    unlocks and achievements are checked
//! 2. OscillatorStep: the bell glow moves
//! 3. AutoBell: one flat visitor per ring once the upgrade is owned
//! 4. SpawnWave: one batch of a frenzy burst
//! 5. AutoSave: snapshot to the attached store, if any
//!
//! Recurring items put themselves back on the queue.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::bell::{ActionOutcome, Bell, BellResponse, RewardTier};
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, TycoonError};
use crate::core::types::{GamePhase, Millis, SpeciesId, ZoneId};
use crate::data::achievements::{default_achievements, AchievementDefinition, Reward};
use crate::data::species::SpeciesCatalog;
use crate::data::upgrades::{UpgradeCatalog, UpgradeEffect};
use crate::data::zones::{default_zones, ZoneDefinition};
use crate::persistence::snapshot::{SaveData, CURRENT_SCHEMA_VERSION};
use crate::persistence::storage::{save_game, SaveStore};
use crate::progress::achievements::AchievementTracker;
use crate::progress::upgrades::{ActiveEffects, PurchaseReceipt, UpgradeLedger};
use crate::simulation::events::GameEvent;
use crate::simulation::population::Populations;
use crate::simulation::progression::{Progression, ProgressionStats};
use crate::simulation::scheduler::{ScheduledWork, Scheduler};
use crate::simulation::visitors::{SpawnReport, TickContext, VisitorRoster};

/// Read-only reference tables a session runs against
#[derive(Debug, Clone)]
pub struct ParkCatalogs {
    pub species: SpeciesCatalog,
    pub zones: Vec<ZoneDefinition>,
    pub upgrades: UpgradeCatalog,
    pub achievements: Vec<AchievementDefinition>,
}

impl Default for ParkCatalogs {
    fn default() -> Self {
        Self {
            species: SpeciesCatalog::with_defaults(),
            zones: default_zones(),
            upgrades: UpgradeCatalog::with_defaults(),
            achievements: default_achievements(),
        }
    }
}

/// A running park.
///
/// Notifications pile up until `drain_events` takes them. Front ends should
/// drain once per frame; a session that is never drained keeps only the
/// newest `event_buffer_cap` events.
pub struct ParkSession {
    config: SimulationConfig,
    catalogs: ParkCatalogs,
    scheduler: Scheduler,
    bell: Bell,
    roster: VisitorRoster,
    populations: Populations,
    progression: Progression,
    upgrades: UpgradeLedger,
    achievements: AchievementTracker,
    effects: ActiveEffects,
    rng: ChaCha8Rng,
    events: Vec<GameEvent>,
    store: Option<Box<dyn SaveStore>>,
    auto_bell_scheduled: bool,
    ended: bool,
}

impl ParkSession {
    /// Fresh park with the built-in catalogs
    pub fn new(config: SimulationConfig, seed: u64) -> Result<Self> {
        Self::with_catalogs(config, ParkCatalogs::default(), seed)
    }

    pub fn with_catalogs(config: SimulationConfig, catalogs: ParkCatalogs, seed: u64) -> Result<Self> {
        config.validate()?;
        let populations = Populations::from_definitions(&catalogs.zones, config.default_regen_per_hour);
        let progression = Progression::new(config.starting_currency);
        tracing::info!("Opening a new park (seed {})", seed);
        Ok(Self::assemble(
            config,
            catalogs,
            populations,
            progression,
            UpgradeLedger::new(),
            AchievementTracker::new(),
            seed,
        ))
    }

    /// Resume from a snapshot. Scheduled bursts are never part of a
    /// snapshot, so a restored session starts with none pending.
    pub fn restore(config: SimulationConfig, catalogs: ParkCatalogs, data: SaveData, seed: u64) -> Result<Self> {
        config.validate()?;
        if data.schema_version != CURRENT_SCHEMA_VERSION {
            return Err(TycoonError::VersionMismatch {
                found: data.schema_version,
                current: CURRENT_SCHEMA_VERSION,
            });
        }
        tracing::info!(
            "Restoring park saved at {} with {} currency",
            data.timestamp,
            data.progression.currency
        );
        Ok(Self::assemble(
            config,
            catalogs,
            Populations::from_snapshot(data.populations),
            data.progression,
            data.upgrades,
            data.achievements,
            seed,
        ))
    }

    fn assemble(
        config: SimulationConfig,
        catalogs: ParkCatalogs,
        populations: Populations,
        progression: Progression,
        upgrades: UpgradeLedger,
        achievements: AchievementTracker,
        seed: u64,
    ) -> Self {
        let mut session = Self {
            bell: Bell::new(&config),
            roster: VisitorRoster::new(config.roster_cap),
            scheduler: Scheduler::new(),
            effects: ActiveEffects::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            events: Vec::new(),
            store: None,
            auto_bell_scheduled: false,
            ended: false,
            config,
            catalogs,
            populations,
            progression,
            upgrades,
            achievements,
        };

        session
            .scheduler
            .schedule_after(session.config.tick_interval_ms, ScheduledWork::SimulationTick);
        session
            .scheduler
            .schedule_after(session.config.oscillator_step_ms, ScheduledWork::OscillatorStep);
        session
            .scheduler
            .schedule_after(session.config.auto_save_interval_ms, ScheduledWork::AutoSave);
        session.refresh_effects();
        session
    }

    /// Auto-save into this store from now on
    pub fn attach_store(&mut self, store: Box<dyn SaveStore>) {
        self.store = Some(store);
    }

    pub fn detach_store(&mut self) -> Option<Box<dyn SaveStore>> {
        self.store.take()
    }

    pub fn now(&self) -> Millis {
        self.scheduler.now()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn catalogs(&self) -> &ParkCatalogs {
        &self.catalogs
    }

    pub fn bell(&self) -> &Bell {
        &self.bell
    }

    pub fn roster(&self) -> &VisitorRoster {
        &self.roster
    }

    pub fn populations(&self) -> &Populations {
        &self.populations
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn stats(&self) -> ProgressionStats {
        self.progression.stats()
    }

    pub fn upgrades(&self) -> &UpgradeLedger {
        &self.upgrades
    }

    pub fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    pub fn effects(&self) -> &ActiveEffects {
        &self.effects
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Queued frenzy waves not yet delivered
    pub fn pending_waves(&self) -> usize {
        self.scheduler
            .count_pending(|w| matches!(w, ScheduledWork::SpawnWave { .. }))
    }

    pub fn pending_work(&self) -> usize {
        self.scheduler.pending()
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run everything that falls due within the next `delta_ms`
    pub fn advance(&mut self, delta_ms: Millis) {
        if self.ended {
            return;
        }
        let until = self.scheduler.now().saturating_add(delta_ms);
        while let Some((_, work)) = self.scheduler.pop_due(until) {
            self.run(work);
        }
        self.scheduler.advance_to(until);
        self.trim_events();
    }

    fn trim_events(&mut self) {
        let excess = self.events.len().saturating_sub(self.config.event_buffer_cap);
        if excess > 0 {
            self.events.drain(..excess);
            tracing::debug!("Event buffer full, dropped {} oldest events", excess);
        }
    }

    fn run(&mut self, work: ScheduledWork) {
        match work {
            ScheduledWork::SimulationTick => {
                self.simulation_tick();
                self.scheduler
                    .schedule_after(self.config.tick_interval_ms, ScheduledWork::SimulationTick);
            }
            ScheduledWork::OscillatorStep => {
                self.bell.step(self.config.oscillator_step_ms);
                self.scheduler
                    .schedule_after(self.config.oscillator_step_ms, ScheduledWork::OscillatorStep);
            }
            ScheduledWork::AutoBell => {
                let outcome = self.bell.auto_press();
                self.spawn_batch(outcome.visitors, false);
                let interval = self.config.auto_bell_interval_ms(self.effects.auto_bell_level);
                self.scheduler.schedule_after(interval, ScheduledWork::AutoBell);
            }
            ScheduledWork::SpawnWave { count } => {
                self.spawn_batch(count, false);
            }
            ScheduledWork::AutoSave => {
                self.auto_save();
                self.scheduler
                    .schedule_after(self.config.auto_save_interval_ms, ScheduledWork::AutoSave);
            }
        }
    }

    fn simulation_tick(&mut self) {
        let delta_secs = self.config.tick_interval_ms as f64 / 1000.0;
        let mut ctx = TickContext {
            populations: &mut self.populations,
            catalog: &self.catalogs.species,
            progression: &mut self.progression,
            effects: &self.effects,
            config: &self.config,
            now: self.scheduler.now(),
            events: &mut self.events,
        };
        self.roster.tick(delta_secs, &mut ctx, &mut self.rng);

        self.populations.regenerate_all(delta_secs, &mut self.rng);
        self.progression.record_play_time(self.config.tick_interval_ms);
        self.check_progress();
    }

    /// Press the bell now
    pub fn ring_bell(&mut self) -> BellResponse {
        if self.ended {
            return BellResponse::Closed;
        }
        let response = self.bell.press(self.scheduler.now());
        if let BellResponse::Accepted(outcome) = response {
            self.progression.record_bell(outcome.quality, outcome.milestone);
            if let Some(tier) = outcome.milestone {
                tracing::info!("Streak milestone {:?} after {} perfect presses", tier, outcome.run);
                self.events.push(GameEvent::StreakMilestone {
                    tier,
                    visitors: outcome.visitors,
                });
            }
            self.deliver(outcome);
            self.trim_events();
        }
        response
    }

    fn deliver(&mut self, outcome: ActionOutcome) {
        match outcome.milestone {
            Some(RewardTier::Frenzy) => {
                for wave in 0..self.config.frenzy_waves {
                    let delay = wave as u64 * self.config.frenzy_wave_spacing_ms;
                    self.scheduler.schedule_after(
                        delay,
                        ScheduledWork::SpawnWave {
                            count: self.config.frenzy_wave_size,
                        },
                    );
                }
            }
            Some(RewardTier::Special) => {
                let count = self.effects.attract(outcome.visitors, &mut self.rng);
                self.spawn_batch(count, true);
            }
            _ => {
                let count = self.effects.attract(outcome.visitors, &mut self.rng);
                self.spawn_batch(count, false);
            }
        }
    }

    /// Spawn into one uniformly chosen unlocked zone
    fn spawn_batch(&mut self, count: u32, special: bool) -> SpawnReport {
        if count == 0 {
            return SpawnReport::default();
        }
        let zones: Vec<ZoneId> = self.progression.unlocked_zones.iter().copied().collect();
        let zone = zones.choose(&mut self.rng).copied().unwrap_or(ZoneId::Center);

        let report = self.roster.spawn(
            count,
            zone,
            special,
            &self.config,
            &self.effects,
            &mut self.rng,
        );
        self.progression.record_visitors_attracted(report.spawned as u64);
        self.events.push(GameEvent::VisitorsArrived {
            zone,
            count: report.spawned,
            dropped: report.dropped,
        });
        report
    }

    /// Buy the next level of an upgrade
    pub fn purchase_upgrade(&mut self, id: &str) -> Result<PurchaseReceipt> {
        let receipt = self
            .upgrades
            .purchase(&self.catalogs.upgrades, id, &mut self.progression)?;

        self.events.push(GameEvent::UpgradePurchased {
            id: receipt.id.clone(),
            level: receipt.level,
            cost: receipt.cost,
        });
        if let UpgradeEffect::UnlockZone(zone) = receipt.effect {
            if self.progression.unlock_zone(zone) {
                tracing::info!("Zone {} unlocked", zone);
                self.events.push(GameEvent::ZoneUnlocked { zone });
            }
        }
        self.refresh_effects();
        self.trim_events();
        Ok(receipt)
    }

    pub fn advance_phase(&mut self) -> Option<GamePhase> {
        self.progression.advance_phase()
    }

    pub fn restock(&mut self, zone: ZoneId, species: SpeciesId, count: u32) -> u32 {
        self.populations.restock(zone, species, count)
    }

    pub fn low_population_zones(&self) -> Vec<ZoneId> {
        self.populations
            .low_population_zones(self.config.low_population_threshold)
    }

    fn check_progress(&mut self) {
        let stats = self.progression.stats();

        for id in self.upgrades.refresh_unlocks(&self.catalogs.upgrades, &stats) {
            self.events.push(GameEvent::UpgradeUnlocked { id });
        }

        let newly: Vec<AchievementDefinition> = self
            .achievements
            .check(&self.catalogs.achievements, &stats, self.upgrades.distinct_purchased())
            .into_iter()
            .cloned()
            .collect();

        let mut bonus_earned = false;
        for achievement in newly {
            tracing::info!("Achievement unlocked: {}", achievement.name);
            match achievement.reward {
                Reward::Currency(amount) => self.progression.credit_currency(amount),
                Reward::Bonus(_) => bonus_earned = true,
                Reward::Title => {}
            }
            self.events.push(GameEvent::AchievementUnlocked {
                id: achievement.id,
                name: achievement.name,
            });
        }
        if bonus_earned {
            self.refresh_effects();
        }
    }

    /// Recompute effects from owned upgrades and achievement bonuses
    fn refresh_effects(&mut self) {
        let bonuses = self.achievements.bonus_effects(&self.catalogs.achievements);
        self.effects = self.upgrades.effects(&self.catalogs.upgrades, &bonuses);

        self.populations
            .set_breeding_multiplier(self.effects.breeding_multiplier);
        if self.effects.breeding_enabled {
            for zone in &self.progression.unlocked_zones {
                self.populations.enable_breeding(*zone);
            }
        }

        if self.effects.auto_bell_level > 0 && !self.auto_bell_scheduled && !self.ended {
            let interval = self.config.auto_bell_interval_ms(self.effects.auto_bell_level);
            self.scheduler.schedule_after(interval, ScheduledWork::AutoBell);
            self.auto_bell_scheduled = true;
        }
    }

    /// Snapshot of everything that persists
    pub fn snapshot(&self, timestamp: u64) -> SaveData {
        SaveData {
            schema_version: CURRENT_SCHEMA_VERSION,
            timestamp,
            progression: self.progression.clone(),
            populations: self.populations.snapshot(),
            upgrades: self.upgrades.clone(),
            achievements: self.achievements.clone(),
        }
    }

    /// Save to the attached store right away
    pub fn save_now(&mut self) -> Result<()> {
        if self.store.is_none() {
            return Err(TycoonError::Storage("no save store attached".into()));
        }
        let data = self.snapshot(epoch_millis());
        match self.store.as_deref_mut() {
            Some(store) => save_game(store, &data),
            None => Ok(()),
        }
    }

    fn auto_save(&mut self) {
        if self.store.is_none() {
            return;
        }
        if let Err(e) = self.save_now() {
            tracing::warn!("Auto-save failed, continuing unsaved: {}", e);
        }
    }

    /// Stop the session. Pending bursts are discarded, not delivered later.
    pub fn end_session(&mut self) {
        let dropped = self.pending_waves();
        self.scheduler.cancel_all();
        self.bell.reset_streak();
        self.auto_bell_scheduled = false;
        self.ended = true;
        tracing::info!(
            "Session ended at {} ms, {} pending waves discarded",
            self.scheduler.now(),
            dropped
        );
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1)
        .max(1)
}
