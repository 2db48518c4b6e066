use clap::Parser;

use crate::error::{LeaderboardError, Result};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Attendance leaderboard: ranks members by attendance and derives trend series
#[derive(Parser, Debug, Clone)]
#[command(
    name = "attendance-leaderboard",
    about = "Attendance leaderboard over a spreadsheet-backed endpoint",
    version
)]
pub struct Settings {
    /// Dataset location: a JSON file path or an http(s) endpoint URL
    #[arg(long, env = "LEADERBOARD_SOURCE")]
    pub source: String,

    /// Leaderboard view
    #[arg(long, default_value = "total", value_parser = ["total", "monthly"])]
    pub view: String,

    /// Month key for the monthly view, e.g. "06/2024" (first month if omitted)
    #[arg(long)]
    pub month: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Maximum fetch attempts for transport failures (1-10)
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_attempts: u32,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments and resolve them.
    pub fn load() -> Result<Self> {
        Settings::parse().resolve()
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Settings::try_parse_from(args)
            .map_err(|e| LeaderboardError::Config(e.to_string()))?
            .resolve()
    }

    /// Apply `--debug` and reject flag combinations clap cannot express.
    pub fn resolve(mut self) -> Result<Self> {
        if self.source.trim().is_empty() {
            return Err(LeaderboardError::Config(
                "--source must not be empty".to_string(),
            ));
        }

        if self.month.is_some() && self.view != "monthly" {
            return Err(LeaderboardError::Config(
                "--month is only meaningful with --view monthly".to_string(),
            ));
        }

        // --debug overrides log level.
        if self.debug {
            self.log_level = "DEBUG".to_string();
        }

        Ok(self)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
