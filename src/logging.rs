//! Logging configuration using tracing
//!
//! The terminal belongs to the UI, so everything goes to a daily-rotated file.

use std::path::PathBuf;

use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the logging subsystem
///
/// Logs are written to `<data_local_dir>/cmon/logs/`. The level comes from the
/// `CMON_LOG` environment variable, falling back to `default_level`.
///
/// ```bash
/// CMON_LOG=debug cmon
/// ```
pub fn init(default_level: &str) -> Result<PathBuf> {
    let log_dir = get_log_directory();
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "cmon.log");

    let env_filter = EnvFilter::try_from_env("CMON_LOG")
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .try_init()?;

    tracing::info!("Competitor Monitor starting");
    tracing::info!("Log directory: {}", log_dir.display());

    Ok(log_dir)
}

fn get_log_directory() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("cmon").join("logs")
}
