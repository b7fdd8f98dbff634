//! Tracing subscriber setup
//!
//! `RUST_LOG` overrides the configured level when set. With a log file
//! configured, output is appended to the file without ANSI colours;
//! otherwise it goes to stderr.

use anyhow::{Context, Result};
use humcap_common::config::LoggingConfig;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber
pub fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},tower_http={level}",
            level = logging.level.to_ascii_lowercase()
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);

    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
        None => {
            registry
                .with(fmt::layer())
                .try_init()
                .context("Failed to install tracing subscriber")?;
        }
    }

    Ok(())
}
