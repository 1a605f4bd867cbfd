//! Tracing subscriber setup shared by the binaries

use std::fs::OpenOptions;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use whyhere_common::config::LoggingConfig;

/// Install the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `crate_name` and `tower_http` log at
/// the configured level. With `logging.file` set, output is appended there
/// instead of stderr.
pub fn init_tracing(config: &LoggingConfig, crate_name: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{crate_name}={level},whyhere_common={level},tower_http={level}",
            crate_name = crate_name,
            level = config.level
        )
        .into()
    });

    match &config.file {
        Some(path) => {
            let log_file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(Arc::new(log_file)).with_ansi(false))
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }

    Ok(())
}
