//! Property tests for stock bounds and the streak ladder
//!
//! - Stock stays within [0, capacity] under any mix of captures,
//!   regeneration, and restocking
//! - Milestones fire only on the 5th, 10th and 20th perfect press of a run

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use safari_tycoon::bell::{ClickQuality, RewardTier, StreakCounter};
use safari_tycoon::core::types::{SpeciesId, ZoneId};
use safari_tycoon::core::SimulationConfig;
use safari_tycoon::data::{default_zones, SpeciesCatalog};
use safari_tycoon::simulation::Populations;

#[derive(Debug, Clone)]
enum Op {
    Capture { zone: usize, catch_bonus: f64 },
    Regenerate { zone: usize, delta_secs: f64 },
    Restock { zone: usize, entry: usize, count: u32 },
    ToggleBreeding { zone: usize, on: bool },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..4, 0.0f64..1.0).prop_map(|(zone, catch_bonus)| Op::Capture { zone, catch_bonus }),
        (0usize..4, 0.0f64..1.0e7).prop_map(|(zone, delta_secs)| Op::Regenerate { zone, delta_secs }),
        (0usize..4, 0usize..6, 0u32..50).prop_map(|(zone, entry, count)| Op::Restock { zone, entry, count }),
        (0usize..4, any::<bool>()).prop_map(|(zone, on)| Op::ToggleBreeding { zone, on }),
    ]
}

fn assert_bounded(populations: &Populations) -> Result<(), TestCaseError> {
    for (zone, state) in populations.zones() {
        for entry in &state.entries {
            prop_assert!(
                entry.current <= entry.capacity,
                "{} {} at {}/{}",
                zone,
                entry.species_id,
                entry.current,
                entry.capacity
            );
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn stock_stays_within_capacity(
        seed in any::<u64>(),
        ops in proptest::collection::vec(op(), 1..200),
    ) {
        let catalog = SpeciesCatalog::with_defaults();
        let config = SimulationConfig::default();
        let mut populations = Populations::from_definitions(&default_zones(), config.default_regen_per_hour);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        for op in ops {
            match op {
                Op::Capture { zone, catch_bonus } => {
                    let zone = ZoneId::ALL[zone];
                    if let Some(species) = Populations::select_species(&catalog, zone, 0.0, &mut rng) {
                        let before = populations.stock(zone, species.id);
                        let caught = populations.attempt_capture(species, zone, catch_bonus, &config, 0, &mut rng);
                        let after = populations.stock(zone, species.id);
                        match caught {
                            Some(_) => prop_assert_eq!(after + 1, before),
                            None => prop_assert_eq!(after, before),
                        }
                    }
                }
                Op::Regenerate { zone, delta_secs } => {
                    populations.regenerate(ZoneId::ALL[zone], delta_secs, &mut rng);
                }
                Op::Restock { zone, entry, count } => {
                    let zone = ZoneId::ALL[zone];
                    let species = populations
                        .zone(zone)
                        .and_then(|z| z.entries.get(entry))
                        .map(|e| e.species_id)
                        .unwrap_or(SpeciesId(0));
                    populations.restock(zone, species, count);
                }
                Op::ToggleBreeding { zone, on } => {
                    if on {
                        populations.enable_breeding(ZoneId::ALL[zone]);
                    } else {
                        populations.disable_breeding(ZoneId::ALL[zone]);
                    }
                }
            }
            assert_bounded(&populations)?;
        }
    }

    #[test]
    fn milestones_follow_the_run(
        presses in proptest::collection::vec(prop_oneof![
            8 => Just(ClickQuality::Perfect),
            1 => Just(ClickQuality::Good),
            1 => Just(ClickQuality::Normal),
        ], 1..120),
    ) {
        let mut counter = StreakCounter::new();
        let mut run = 0u32;
        let mut last_payout = 0u32;

        for quality in presses {
            let update = counter.register(quality);
            if quality != ClickQuality::Perfect {
                run = 0;
                last_payout = 0;
                prop_assert_eq!(update.milestone, None);
                prop_assert_eq!(update.streak, 0);
                continue;
            }

            run += 1;
            let expected = match run {
                5 => Some(RewardTier::Caravan),
                10 => Some(RewardTier::Special),
                20 => Some(RewardTier::Frenzy),
                _ => None,
            };
            prop_assert_eq!(update.milestone, expected);
            prop_assert_eq!(update.run, run);
            if expected.is_some() {
                prop_assert_eq!(update.streak, 0);
                last_payout = run;
            } else {
                prop_assert_eq!(update.streak, run - last_payout);
            }
            if run == 20 {
                run = 0;
                last_payout = 0;
            }
        }
    }
}
