//! Centralized error types for the Meteo application.
//!
//! Every error carries a technical `Display` for logs and a localized
//! `user_message()` for the terminal.

use thiserror::Error;

use crate::preferences::Language;

/// Pick the French or English variant of a message.
fn localized(lang: Language, fr: &'static str, en: &'static str) -> &'static str {
    match lang {
        Language::Fr => fr,
        Language::En => en,
    }
}

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Preference error: {0}")]
    Preference(#[from] PreferenceError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    /// Returns a message suitable for display to the user in their language.
    pub fn user_message(&self, lang: Language) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(lang),
            AppError::Preference(e) => e.user_message(lang),
            AppError::Weather(e) => e.user_message(lang),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self, lang: Language) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => localized(
                lang,
                "Connexion impossible. Vérifiez votre accès internet.",
                "Unable to connect. Check your internet connection.",
            ),
            NetworkError::Timeout => localized(
                lang,
                "La requête a expiré. Réessayez.",
                "The request timed out. Please try again.",
            ),
            NetworkError::InvalidResponse(_) => localized(
                lang,
                "Réponse inattendue du serveur.",
                "Received an unexpected response.",
            ),
        }
    }
}

/// Errors from the persistent preference store.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("Failed to read preferences: {0}")]
    Read(String),

    #[error("Failed to write preferences: {0}")]
    Write(String),

    #[error("Preferences file is malformed: {0}")]
    Parse(String),
}

impl PreferenceError {
    pub fn user_message(&self, lang: Language) -> &'static str {
        match self {
            PreferenceError::Read(_) | PreferenceError::Parse(_) => localized(
                lang,
                "Préférences illisibles. Valeurs par défaut utilisées.",
                "Could not read preferences. Using defaults.",
            ),
            PreferenceError::Write(_) => localized(
                lang,
                "Impossible d'enregistrer vos préférences.",
                "Failed to save your preferences.",
            ),
        }
    }
}

/// Weather lookup errors as seen by the application.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City parameter is required")]
    MissingCity,

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Weather API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Unexpected provider payload: {0}")]
    Decode(String),
}

impl WeatherError {
    pub fn user_message(&self, lang: Language) -> &'static str {
        match self {
            WeatherError::MissingCity => localized(
                lang,
                "Veuillez saisir une ville.",
                "Please enter a city.",
            ),
            WeatherError::CityNotFound(_) => localized(
                lang,
                "Ville introuvable. Vérifiez l'orthographe.",
                "City not found. Check the spelling.",
            ),
            WeatherError::ApiError { .. } | WeatherError::Decode(_) => localized(
                lang,
                "Erreur lors de la récupération des données météo",
                "Error retrieving weather data",
            ),
            WeatherError::InvalidApiKey => localized(
                lang,
                "La clé d'API météo est invalide. Vérifiez la configuration.",
                "Weather API key is invalid. Check settings.",
            ),
            WeatherError::ServiceUnavailable => localized(
                lang,
                "Service météo indisponible. Réessayez plus tard.",
                "Weather service unavailable. Please try again later.",
            ),
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
