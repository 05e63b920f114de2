use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "storefront.log";

/// Where log files go: the platform data dir, or the temp dir as a last resort.
pub fn log_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "organic-storefront", "organic-storefront")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| std::env::temp_dir().join("organic-storefront"))
}

/// Install a file-backed subscriber. The terminal belongs to the TUI, so
/// nothing is written to stdout/stderr. `RUST_LOG` overrides `default_level`.
///
/// Keep the returned guard alive for the life of the process.
pub fn init(default_level: &str) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;
    let (writer, guard) = non_blocking(rolling::daily(&dir, LOG_FILE_PREFIX));

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false).with_target(false))
        .try_init()?;

    Ok(guard)
}
