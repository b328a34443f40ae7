//! Arena demo entry point.
use std::path::Path;

use anyhow::{Context, Result};
use botsim_client::Simulation;
use botsim_client::config::ClientConfig;
use runtime::RuntimeConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let client = ClientConfig::from_env();
    let _guard = setup_logging(client.log_dir.as_deref(), client.session_id.as_deref())?;

    let runtime = RuntimeConfig::load().context("failed to load runtime configuration")?;
    let ticks = client.ticks;

    let mut simulation = Simulation::builder()
        .runtime(runtime)
        .client(client)
        .build()?;
    let summary = simulation.run(ticks);

    println!(
        "{} ticks, {} decisions, {} state changes; red alive: {}, blue alive: {}",
        summary.ticks,
        summary.decisions,
        summary.state_changes,
        summary.red_alive,
        summary.blue_alive
    );
    Ok(())
}

/// Setup logging to stderr and, with a log directory, to a session file.
///
/// The returned guard flushes the file writer on drop.
fn setup_logging(log_dir: Option<&Path>, session_id: Option<&str>) -> Result<Option<WorkerGuard>> {
    use std::time::{SystemTime, UNIX_EPOCH};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
        return Ok(None);
    };

    // Create session ID if not provided
    let session_id = match session_id {
        Some(id) => id.to_owned(),
        None => {
            let timestamp = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            format!("session_{timestamp}")
        }
    };

    let session_log_dir = log_dir.join(&session_id);
    std::fs::create_dir_all(&session_log_dir)
        .with_context(|| format!("failed to create {}", session_log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&session_log_dir, "botsim.log");
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    tracing::info!("Logging initialized: session={}", session_id);
    tracing::info!("Log file: {}/botsim.log", session_log_dir.display());

    Ok(Some(guard))
}
