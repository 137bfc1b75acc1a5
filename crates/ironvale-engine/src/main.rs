//! # Ironvale
//!
//! Headless runner: `ironvale [config.toml]`.
//!
//! Reads `ironvale.toml` from the working directory, falling back to defaults,
//! unless another path is given, in which case that file must load. Then
//! simulates the configured number of ticks, optionally resuming from and
//! writing a snapshot, and logs a summary.
//! Log verbosity follows `RUST_LOG` (default `ironvale=info`).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::{Context, Result};
use ironvale_engine::{EngineConfig, Runner, CONFIG_FILE};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("ironvale=info".parse()?))
        .init();

    info!("Ironvale starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let mut runner = match std::env::args().nth(1) {
        Some(path) => Runner::from_config_file(&path)
            .with_context(|| format!("failed to start from {path}"))?,
        None => {
            let mut config = EngineConfig::load_from(CONFIG_FILE);
            config.validate();
            match config.resume_from.clone() {
                Some(snapshot) => Runner::resume(config, snapshot).context("failed to resume")?,
                None => Runner::new(config).context("failed to build arena")?,
            }
        },
    };
    let summary = runner.run();

    if let Some(path) = runner.config().checkpoint_to.clone() {
        runner
            .save_checkpoint(&path)
            .with_context(|| format!("failed to write checkpoint {}", path.display()))?;
    }

    info!(
        defeats = summary.defeats,
        currency = summary.currency_collected,
        "Ironvale run complete"
    );
    Ok(())
}
