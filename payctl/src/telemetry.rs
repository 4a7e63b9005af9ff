//! Telemetry initialization (tracing, fmt subscriber).
//!
//! Sets up tracing-subscriber with an `EnvFilter` (honouring `RUST_LOG`,
//! defaulting to `info`) and a console fmt layer. The gateway has no
//! distributed-tracing export; structured logs are its observability
//! surface.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize tracing for the process.
///
/// Safe to call once at startup; returns an error if a global subscriber
/// is already installed.
pub fn init_telemetry() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!("Telemetry initialized");
    Ok(())
}
