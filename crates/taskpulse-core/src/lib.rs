//! Shared foundation for the TaskPulse client: configuration, common
//! error types, the session lifecycle, and tracing setup.

pub mod config;
pub mod error;
pub mod session;

pub use config::{BackendConfig, Config, ValidationResult, WeatherConfig};
pub use error::{ConfigError, NetworkError, ReqwestErrorExt};
pub use session::{Session, SessionStore};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("TaskPulse core initialized");
    Ok(())
}
