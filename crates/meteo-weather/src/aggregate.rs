//! Folding the 3-hourly forecast feed into daily summaries.
//!
//! Samples are grouped by the calendar date they fall on in a reference time
//! zone (UTC unless told otherwise). Each day reports the mean, minimum and
//! maximum of all its temperatures, plus humidity, wind, icon and
//! description taken together from the single sample closest to noon.

use std::collections::BTreeMap;

use chrono::{FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use meteo_core::DayBoundary;

use crate::error::WeatherError;
use crate::types::{DailyForecast, DailySummary, ForecastPayload, ForecastSample};

/// Maximum number of days in an aggregated forecast.
pub const MAX_FORECAST_DAYS: usize = 5;

const NOON: u32 = 12;

/// Larger than any real hour-to-noon distance.
const NO_SAMPLE_DISTANCE: u32 = 24;

struct DailyBucket<'a> {
    temperatures: Vec<f64>,
    min_temp: f64,
    max_temp: f64,
    noon_distance: u32,
    representative: &'a ForecastSample,
}

impl<'a> DailyBucket<'a> {
    fn open(first: &'a ForecastSample) -> Self {
        Self {
            temperatures: Vec::new(),
            min_temp: f64::INFINITY,
            max_temp: f64::NEG_INFINITY,
            noon_distance: NO_SAMPLE_DISTANCE,
            representative: first,
        }
    }

    fn add(&mut self, sample: &'a ForecastSample, hour: u32) {
        self.temperatures.push(sample.temperature);
        self.min_temp = self.min_temp.min(sample.temperature);
        self.max_temp = self.max_temp.max(sample.temperature);

        // Strictly closer only: on a tie the earlier sample keeps the slot.
        let distance = hour.abs_diff(NOON);
        if distance < self.noon_distance {
            self.noon_distance = distance;
            self.representative = sample;
        }
    }

    fn summarize(self, date: NaiveDate) -> DailySummary {
        let average = self.temperatures.iter().sum::<f64>() / self.temperatures.len() as f64;
        let rep = self.representative;
        DailySummary {
            date,
            temperature: average,
            min_temp: self.min_temp,
            max_temp: self.max_temp,
            humidity: rep.humidity,
            wind_speed: rep.wind_speed,
            icon: rep.icon.clone(),
            description: rep.description.clone(),
        }
    }
}

/// Aggregate samples into at most [`MAX_FORECAST_DAYS`] daily summaries,
/// with day boundaries at UTC midnight.
pub fn aggregate_daily(samples: &[ForecastSample]) -> Vec<DailySummary> {
    aggregate_daily_in(samples, &Utc)
}

/// Aggregate samples with day boundaries and hours taken in `tz`.
///
/// Input order does not affect grouping; it only decides which of two
/// equally-near-noon samples represents the day (the first one wins).
/// The result is sorted by ascending date.
pub fn aggregate_daily_in<Tz: TimeZone>(samples: &[ForecastSample], tz: &Tz) -> Vec<DailySummary> {
    let mut buckets: BTreeMap<NaiveDate, DailyBucket<'_>> = BTreeMap::new();

    for sample in samples {
        let local = sample.timestamp.with_timezone(tz);
        buckets
            .entry(local.date_naive())
            .or_insert_with(|| DailyBucket::open(sample))
            .add(sample, local.hour());
    }

    let days = buckets.len();
    let summaries: Vec<DailySummary> = buckets
        .into_iter()
        .take(MAX_FORECAST_DAYS)
        .map(|(date, bucket)| bucket.summarize(date))
        .collect();

    tracing::debug!(
        "Aggregated {} samples into {} days ({} kept)",
        samples.len(),
        days,
        summaries.len()
    );
    summaries
}

/// Turn a provider payload into a [`DailyForecast`], passing the city label
/// through unchanged.
///
/// # Errors
/// Returns [`WeatherError::Decode`] if an entry has no weather condition.
pub fn summarize_payload(
    payload: ForecastPayload,
    boundary: DayBoundary,
) -> Result<DailyForecast, WeatherError> {
    let city = payload.city.name.clone();
    let offset_secs = payload.city.timezone;
    let samples = payload.into_samples()?;

    let forecasts = match boundary {
        DayBoundary::Utc => aggregate_daily(&samples),
        DayBoundary::City => match FixedOffset::east_opt(offset_secs) {
            Some(offset) => aggregate_daily_in(&samples, &offset),
            None => {
                tracing::warn!(
                    "Provider offset {}s for {} is out of range, using UTC days",
                    offset_secs,
                    city
                );
                aggregate_daily(&samples)
            }
        },
    };

    Ok(DailyForecast { city, forecasts })
}
