//! Maps service errors to `meteo_core::AppError` for consistent user-facing messages.

use meteo_core::{AppError, PreferenceError, ReqwestErrorExt, WeatherError as CoreWeatherError};
use meteo_weather::WeatherError;

pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}

impl IntoAppError for WeatherError {
    fn into_app_error(self) -> AppError {
        match self {
            WeatherError::MissingCity => AppError::Weather(CoreWeatherError::MissingCity),
            WeatherError::CityNotFound(city) => {
                AppError::Weather(CoreWeatherError::CityNotFound(city))
            }
            WeatherError::InvalidApiKey => AppError::Weather(CoreWeatherError::InvalidApiKey),
            WeatherError::Upstream { status, .. } if status >= 500 => {
                AppError::Weather(CoreWeatherError::ServiceUnavailable)
            }
            WeatherError::Upstream { status, message } => {
                AppError::Weather(CoreWeatherError::ApiError { status, message })
            }
            WeatherError::Network(e) => AppError::Network(e.into_network_error()),
            WeatherError::Decode(msg) => AppError::Weather(CoreWeatherError::Decode(msg)),
        }
    }
}

impl IntoAppError for PreferenceError {
    fn into_app_error(self) -> AppError {
        AppError::Preference(self)
    }
}
