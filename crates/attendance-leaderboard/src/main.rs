mod bootstrap;
mod output;

use anyhow::{Context, Result};
use leaderboard_core::settings::Settings;
use leaderboard_data::dashboard::{build_dashboard, ViewSelection};
use leaderboard_runtime::data_manager::DataManager;
use leaderboard_runtime::source::DatasetSource;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load()?;

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!(
        "Attendance Leaderboard v{} starting",
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!(
        "Source: {}, View: {}, Format: {}",
        settings.source,
        settings.view,
        settings.format
    );

    let source = DatasetSource::parse(&settings.source)?;
    let mut manager = DataManager::new(source, settings.max_attempts);
    let snapshot = manager
        .load()
        .await
        .with_context(|| format!("failed to load attendance data from {}", manager.source()))?;

    let selection =
        ViewSelection::resolve(&snapshot.dataset, &settings.view, settings.month.as_deref())?;
    let dashboard = build_dashboard(&snapshot.dataset, selection);

    tracing::debug!("Snapshot fetched at {}", snapshot.fetched_at.to_rfc3339());

    match settings.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&dashboard)?),
        _ => print!("{}", output::render_dashboard(&dashboard)),
    }

    Ok(())
}
