//! Runtime layer for the attendance leaderboard.
//!
//! Resolves where the dataset lives, fetches it once per session and keeps
//! the resulting snapshot behind an explicit load state.

pub mod data_manager;
pub mod source;

pub use leaderboard_core as core;
pub use leaderboard_data as data;
