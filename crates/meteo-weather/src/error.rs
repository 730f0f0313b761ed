//! Weather lookup error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("City parameter is required")]
    MissingCity,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Provider returned {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected provider payload: {0}")]
    Decode(String),
}

impl WeatherError {
    /// HTTP status a request handler should answer with.
    ///
    /// Client input problems are 400, provider failures keep the provider's
    /// status, anything else is a 500.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCity => 400,
            Self::CityNotFound(_) => 404,
            Self::InvalidApiKey => 401,
            Self::Upstream { status, .. } => *status,
            Self::Network(_) | Self::Decode(_) => 500,
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Decode(e.to_string())
    }
}
