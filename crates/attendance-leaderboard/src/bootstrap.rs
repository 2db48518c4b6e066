use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to an [`EnvFilter`] directive.
///
/// Unrecognised names fall through unchanged so that raw directives such as
/// `leaderboard_runtime=trace` still work.
fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Build the filter for `log_level`, falling back to `info`.
fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialise the global `tracing` subscriber.
///
/// Logs go to stderr; stdout is reserved for the report.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(layer)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
