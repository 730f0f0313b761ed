//! Weather lookup for Meteo
//!
//! Fetches current conditions and the 3-hourly forecast from OpenWeatherMap
//! and folds the forecast into daily summaries.

pub mod aggregate;
pub mod error;
pub mod provider;
pub mod service;
pub mod types;

pub use aggregate::{aggregate_daily, aggregate_daily_in, summarize_payload, MAX_FORECAST_DAYS};
pub use error::WeatherError;
pub use provider::WeatherProvider;
pub use service::{ForecastService, WeatherReport, WeatherRequest};
pub use types::*;
