//! Headless Park Runner
//!
//! Runs a seeded park session with scripted bell presses and prints a
//! summary. Useful for balancing and for checking saves end to end.

use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

use safari_tycoon::bell::{BellResponse, ClickQuality};
use safari_tycoon::core::{Result, SimulationConfig};
use safari_tycoon::data::SpeciesCatalog;
use safari_tycoon::persistence::{load_with_fallback, FileSaveStore};
use safari_tycoon::simulation::{GameEvent, ParkCatalogs, ParkSession};

/// Headless Park Runner - scripted bell sessions
#[derive(Parser, Debug)]
#[command(name = "park_runner")]
#[command(about = "Run a seeded safari park session without a UI")]
struct Args {
    /// Simulated seconds to run
    #[arg(long, default_value_t = 600)]
    seconds: u64,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Press the bell every N ms instead of aiming for the perfect window
    #[arg(long)]
    press_every_ms: Option<u64>,

    /// TOML file overriding simulation constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML species catalog replacing the built-in one
    #[arg(long)]
    species: Option<PathBuf>,

    /// Directory for save files; enables auto-save
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Resume from the save in --save-dir if one exists
    #[arg(long)]
    resume: bool,

    /// Buy the cheapest affordable upgrade after every tick
    #[arg(long)]
    buy: bool,

    /// Output format: json or text
    #[arg(long, default_value = "text")]
    format: String,
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    seconds: u64,
    presses: u64,
    perfect_presses: u64,
    settling_rejections: u64,
    currency: u64,
    lifetime_earned: u64,
    visitors_attracted: u64,
    visitors_departed: u64,
    creatures_captured: u64,
    rare_captured: u64,
    shiny_captured: u64,
    average_satisfaction: f64,
    caravans: u64,
    specials: u64,
    frenzies: u64,
    zones_unlocked: usize,
    upgrades_owned: u32,
    achievements: usize,
    low_population_zones: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("safari_tycoon=info")),
        )
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(summary) => {
            print_summary(&summary, &args.format);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<RunSummary> {
    let seed = args.seed.unwrap_or_else(rand::random);

    let config = match &args.config {
        Some(path) => SimulationConfig::load_from_toml(path)?,
        None => SimulationConfig::default(),
    };

    let mut catalogs = ParkCatalogs::default();
    if let Some(path) = &args.species {
        catalogs.species = SpeciesCatalog::load_from_toml(path)?;
    }

    let store = args.save_dir.as_ref().map(|dir| FileSaveStore::new(dir.clone()));
    let saved = match (&store, args.resume) {
        (Some(store), true) => load_with_fallback(store)?,
        _ => None,
    };

    let mut session = match saved {
        Some(data) => ParkSession::restore(config, catalogs, data, seed)?,
        None => ParkSession::with_catalogs(config, catalogs, seed)?,
    };
    if let Some(store) = store {
        session.attach_store(Box::new(store));
    }

    let step = session.config().oscillator_step_ms;
    let end = session.now() + args.seconds * 1000;
    let mut presses = 0;
    let mut perfect_presses = 0;
    let mut settling_rejections = 0;
    let mut last_window = session.bell().oscillator().window_opened_at();
    let mut last_press = session.now();

    while session.now() < end {
        session.advance(step);

        let window = session.bell().oscillator().window_opened_at();
        let should_press = match args.press_every_ms {
            Some(interval) => session.now() - last_press >= interval,
            None => window != last_window,
        };
        last_window = window;

        if should_press {
            last_press = session.now();
            match session.ring_bell() {
                BellResponse::Accepted(outcome) => {
                    presses += 1;
                    if outcome.quality == ClickQuality::Perfect {
                        perfect_presses += 1;
                    }
                }
                BellResponse::Settling => settling_rejections += 1,
                BellResponse::Closed => break,
            }
        }

        if args.buy {
            buy_cheapest(&mut session);
        }

        for event in session.drain_events() {
            if let GameEvent::AchievementUnlocked { name, .. } = event {
                tracing::info!("Achievement: {}", name);
            }
        }
    }

    if args.save_dir.is_some() {
        session.save_now()?;
    }

    let stats = session.stats();
    let summary = RunSummary {
        seed,
        seconds: args.seconds,
        presses,
        perfect_presses,
        settling_rejections,
        currency: stats.currency,
        lifetime_earned: stats.lifetime_earned,
        visitors_attracted: stats.visitors_attracted,
        visitors_departed: stats.visitors_departed,
        creatures_captured: stats.creatures_captured,
        rare_captured: stats.rare_captured,
        shiny_captured: stats.shiny_captured,
        average_satisfaction: stats.average_satisfaction,
        caravans: stats.caravans,
        specials: stats.specials,
        frenzies: stats.frenzies,
        zones_unlocked: stats.zones_unlocked,
        upgrades_owned: session.upgrades().distinct_purchased(),
        achievements: session.achievements().unlocked_count(),
        low_population_zones: session
            .low_population_zones()
            .iter()
            .map(|z| z.to_string())
            .collect(),
    };

    session.end_session();
    Ok(summary)
}

/// Greedy shopping: the cheapest next level the park can afford
fn buy_cheapest(session: &mut ParkSession) {
    let currency = session.progression().currency;
    let cheapest = session
        .catalogs()
        .upgrades
        .all()
        .iter()
        .filter_map(|u| {
            let level = session.upgrades().level(&u.id);
            let available = session.upgrades().is_unlocked(&u.id) && level < u.max_level;
            available.then(|| (u.cost_for_level(level + 1), u.id.clone()))
        })
        .filter(|(cost, _)| *cost <= currency)
        .min();

    if let Some((_, id)) = cheapest {
        if let Err(e) = session.purchase_upgrade(&id) {
            tracing::debug!("Could not buy {}: {}", id, e);
        }
    }
}

fn print_summary(summary: &RunSummary, format: &str) {
    match format {
        "json" => match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error: {}", e),
        },
        _ => {
            println!("Park Summary");
            println!("============");
            println!("Seed: {}  Duration: {}s", summary.seed, summary.seconds);
            println!(
                "Presses: {} ({} perfect, {} rejected while settling)",
                summary.presses, summary.perfect_presses, summary.settling_rejections
            );
            println!(
                "Milestones: {} caravans, {} special waves, {} frenzies",
                summary.caravans, summary.specials, summary.frenzies
            );
            println!(
                "Visitors: {} attracted, {} departed, satisfaction {:.2}",
                summary.visitors_attracted, summary.visitors_departed, summary.average_satisfaction
            );
            println!(
                "Captures: {} ({} rare, {} shiny)",
                summary.creatures_captured, summary.rare_captured, summary.shiny_captured
            );
            println!(
                "Currency: {} (lifetime {})",
                summary.currency, summary.lifetime_earned
            );
            println!(
                "Zones: {}  Upgrades: {}  Achievements: {}",
                summary.zones_unlocked, summary.upgrades_owned, summary.achievements
            );
            if !summary.low_population_zones.is_empty() {
                println!("Depleted zones: {}", summary.low_population_zones.join(", "));
            }
        }
    }
}
