use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WeatherError;

/// One 3-hourly forecast observation from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity in percent
    pub humidity: u8,
    /// Provider units (m/s with `units=metric`)
    pub wind_speed: f64,
    /// Provider icon code, e.g. `01d`
    pub icon: String,
    pub description: String,
}

/// Aggregated forecast for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Mean of every sample of the day, unrounded
    pub temperature: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub icon: String,
    pub description: String,
}

/// Daily summaries paired with the provider's city label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub city: String,
    pub forecasts: Vec<DailySummary>,
}

/// Current conditions for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub city: String,
    pub temperature: f64,
    pub description: String,
    pub humidity: u8,
    pub wind_speed: f64,
    pub icon: String,
}

// Provider payloads (OpenWeatherMap 2.5). Only the fields we use are
// declared; a missing one fails deserialization.

#[derive(Debug, Clone, Deserialize)]
pub struct MainBlock {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindBlock {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConditionBlock {
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CityBlock {
    pub name: String,
    /// Offset from UTC in seconds
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub dt: DateTime<Utc>,
    pub main: MainBlock,
    pub weather: Vec<ConditionBlock>,
    pub wind: WindBlock,
}

/// Body of `GET /forecast`
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    pub list: Vec<ForecastEntry>,
    pub city: CityBlock,
}

/// Body of `GET /weather`
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentPayload {
    pub name: String,
    pub main: MainBlock,
    pub weather: Vec<ConditionBlock>,
    pub wind: WindBlock,
    #[serde(default)]
    pub timezone: i32,
}

/// The provider sends `weather` as a list; the first entry is the primary condition.
fn primary_condition(
    conditions: Vec<ConditionBlock>,
    context: impl FnOnce() -> String,
) -> Result<ConditionBlock, WeatherError> {
    conditions
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::Decode(format!("empty weather list in {}", context())))
}

impl ForecastEntry {
    pub fn into_sample(self) -> Result<ForecastSample, WeatherError> {
        let dt = self.dt;
        let condition = primary_condition(self.weather, || format!("forecast entry {}", dt))?;
        Ok(ForecastSample {
            timestamp: self.dt,
            temperature: self.main.temp,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            icon: condition.icon,
            description: condition.description,
        })
    }
}

impl ForecastPayload {
    /// Convert every entry, failing on the first malformed one.
    pub fn into_samples(self) -> Result<Vec<ForecastSample>, WeatherError> {
        self.list.into_iter().map(ForecastEntry::into_sample).collect()
    }
}

impl TryFrom<CurrentPayload> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(payload: CurrentPayload) -> Result<Self, Self::Error> {
        let city = payload.name;
        let condition = primary_condition(payload.weather, || format!("current weather for {}", city))?;
        Ok(Self {
            city,
            temperature: payload.main.temp,
            description: condition.description,
            humidity: payload.main.humidity,
            wind_speed: payload.wind.speed,
            icon: condition.icon,
        })
    }
}
