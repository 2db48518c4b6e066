//! Core types for the attendance leaderboard.
//!
//! Holds the typed attendance rows and dataset, the error taxonomy, number
//! formatting helpers and the command-line settings shared by the other
//! crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
