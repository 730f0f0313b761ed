//! Request handling around the provider: validates input, fetches, and
//! hands well-formed samples to the aggregator.

use meteo_core::{DayBoundary, Language};
use tracing::instrument;

use crate::aggregate::summarize_payload;
use crate::error::WeatherError;
use crate::provider::WeatherProvider;
use crate::types::{CurrentConditions, DailyForecast};

/// Language used when a request does not specify one.
pub const DEFAULT_LANGUAGE: Language = Language::Fr;

/// A lookup as received from a caller; both fields may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeatherRequest {
    pub city: Option<String>,
    pub lang: Option<Language>,
}

impl WeatherRequest {
    pub fn new(city: impl Into<String>, lang: Language) -> Self {
        Self {
            city: Some(city.into()),
            lang: Some(lang),
        }
    }

    /// The trimmed city, or `MissingCity` if absent or blank.
    ///
    /// # Errors
    /// Returns [`WeatherError::MissingCity`] when no usable city was given.
    pub fn city(&self) -> Result<&str, WeatherError> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or(WeatherError::MissingCity)
    }

    pub fn lang(&self) -> Language {
        self.lang.unwrap_or(DEFAULT_LANGUAGE)
    }
}

/// Full result of one lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: DailyForecast,
}

#[derive(Debug, Clone)]
pub struct ForecastService {
    provider: WeatherProvider,
    day_boundary: DayBoundary,
}

impl ForecastService {
    pub fn new(provider: WeatherProvider, day_boundary: DayBoundary) -> Self {
        Self {
            provider,
            day_boundary,
        }
    }

    /// Daily forecast (at most 5 days) for the requested city.
    ///
    /// # Errors
    /// `MissingCity` for blank input, otherwise whatever the provider or
    /// payload decoding reports.
    #[instrument(skip(self), level = "info")]
    pub async fn forecast(&self, request: &WeatherRequest) -> Result<DailyForecast, WeatherError> {
        let city = request.city()?;
        let payload = self.provider.fetch_forecast(city, request.lang()).await?;
        let forecast = summarize_payload(payload, self.day_boundary)?;
        tracing::info!(
            "Forecast for {}: {} days",
            forecast.city,
            forecast.forecasts.len()
        );
        Ok(forecast)
    }

    /// Current conditions for the requested city.
    ///
    /// # Errors
    /// `MissingCity` for blank input, otherwise whatever the provider or
    /// payload decoding reports.
    #[instrument(skip(self), level = "info")]
    pub async fn current(&self, request: &WeatherRequest) -> Result<CurrentConditions, WeatherError> {
        let city = request.city()?;
        let payload = self.provider.fetch_current(city, request.lang()).await?;
        CurrentConditions::try_from(payload)
    }

    /// Current conditions and forecast together. Both requests are in flight
    /// at once; the first failure wins.
    ///
    /// # Errors
    /// See [`Self::forecast`] and [`Self::current`].
    pub async fn report(&self, request: &WeatherRequest) -> Result<WeatherReport, WeatherError> {
        request.city()?;
        let (current, forecast) = tokio::try_join!(self.current(request), self.forecast(request))?;
        Ok(WeatherReport { current, forecast })
    }
}
