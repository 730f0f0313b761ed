pub mod config;
pub mod error;
pub mod i18n;
pub mod preferences;

pub use config::{Config, DayBoundary, ProviderConfig, ValidationResult, WeatherConfig};
pub use error::{AppError, NetworkError, PreferenceError, ReqwestErrorExt, WeatherError};
pub use i18n::{translations, Translations};
pub use preferences::{
    FilePreferenceStore, Language, MemoryPreferenceStore, PreferenceEvent, PreferenceStore,
    Preferences, SystemDefaults, Theme,
};

use anyhow::Result;

/// Initialize logging (`RUST_LOG`, default `warn`). Output goes to stderr
/// so it never interleaves with the rendered forecast.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Meteo core initialized");
    Ok(())
}
