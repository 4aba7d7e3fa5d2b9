//! Safari Tycoon - simulation core of an incremental safari park game

pub mod bell;
pub mod core;
pub mod data;
pub mod persistence;
pub mod progress;
pub mod simulation;
