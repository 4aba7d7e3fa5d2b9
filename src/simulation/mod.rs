//! Park simulation - scheduler, populations, visitors, accounting
//!
//! `ParkSession` owns every piece of mutable state and advances it from a
//! single scheduler. Nothing here is global.

pub mod events;
pub mod names;
pub mod population;
pub mod progression;
pub mod scheduler;
pub mod session;
pub mod visitors;

pub use events::GameEvent;
pub use population::{CapturedCreature, Populations, ZonePopulation, ZoneState};
pub use progression::{Progression, ProgressionStats};
pub use scheduler::{ScheduledWork, Scheduler};
pub use session::{ParkCatalogs, ParkSession};
pub use visitors::{Visitor, VisitorCategory, VisitorRank, VisitorRoster};
