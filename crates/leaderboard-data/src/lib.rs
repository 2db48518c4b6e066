//! Data layer for the attendance leaderboard.
//!
//! Validates the raw attendance payload into a typed dataset, ranks it, and
//! derives the trend series and table model shown on the leaderboard.

pub mod aggregator;
pub mod dashboard;
pub mod reader;

pub use leaderboard_core as core;
