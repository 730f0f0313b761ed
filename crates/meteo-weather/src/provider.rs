//! OpenWeatherMap client for current conditions and the 5-day forecast.

use std::sync::Arc;
use std::time::Duration;

use meteo_core::{Language, ProviderConfig};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::instrument;

use crate::error::WeatherError;
use crate::types::{CurrentPayload, ForecastPayload};

const USER_AGENT: &str = concat!("meteo/", env!("CARGO_PKG_VERSION"));

/// Error body the provider sends alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl WeatherProvider {
    /// Build a provider from configuration. A missing API key is sent as an
    /// empty string; the provider answers 401, reported as `InvalidApiKey`.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
        })
    }

    /// Provider pointed at an arbitrary base URL (mock servers, proxies).
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, WeatherError> {
        Self::new(&ProviderConfig {
            base_url: base_url.to_string(),
            api_key: Some(api_key.to_string()),
            ..ProviderConfig::default()
        })
    }

    /// Fetch the 3-hourly forecast for `city`.
    ///
    /// # Errors
    /// Fails on network errors, non-success statuses and payloads that do
    /// not match the expected shape.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        city: &str,
        lang: Language,
    ) -> Result<ForecastPayload, WeatherError> {
        let payload: ForecastPayload = self.get("forecast", city, lang).await?;
        tracing::info!(
            "Fetched {} forecast samples for {}",
            payload.list.len(),
            payload.city.name
        );
        Ok(payload)
    }

    /// Fetch current conditions for `city`.
    ///
    /// # Errors
    /// Fails on network errors, non-success statuses and payloads that do
    /// not match the expected shape.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current(
        &self,
        city: &str,
        lang: Language,
    ) -> Result<CurrentPayload, WeatherError> {
        let payload: CurrentPayload = self.get("weather", city, lang).await?;
        tracing::info!("Fetched current weather for {}", payload.name);
        Ok(payload)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        lang: Language,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", lang.code()),
            ])
            .send()
            .await?;

        self.handle_response(response, city).await
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        city: &str,
    ) -> Result<T, WeatherError> {
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| {
                tracing::warn!("Provider payload did not match: {}", e);
                WeatherError::from(e)
            });
        }

        tracing::warn!("Provider returned {} for {}", status, city);
        match status {
            StatusCode::UNAUTHORIZED => Err(WeatherError::InvalidApiKey),
            StatusCode::NOT_FOUND => Err(WeatherError::CityNotFound(city.to_string())),
            _ => {
                let message = serde_json::from_str::<ProviderErrorBody>(&body)
                    .map(|b| b.message)
                    .unwrap_or(body);
                Err(WeatherError::Upstream {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}
