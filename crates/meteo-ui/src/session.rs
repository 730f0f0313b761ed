//! Interactive state: the active preferences, the last city looked up and
//! its report.
//!
//! Preference changes arrive as events on a subscription. A language change
//! re-fetches the last city so descriptions come back in the new language.

use std::sync::mpsc::{Receiver, TryRecvError};

use meteo_core::{AppError, Language, PreferenceEvent, Preferences, Theme};
use meteo_weather::{ForecastService, WeatherReport, WeatherRequest};

use crate::error_mapping::IntoAppError;

/// What changed while draining preference events.
#[derive(Debug)]
pub enum SessionUpdate {
    ThemeChanged(Theme),
    LanguageChanged(Language),
    /// The last city was fetched again after a language change.
    Refreshed,
    RefreshFailed(AppError),
}

pub struct Session {
    preferences: Preferences,
    events: Receiver<PreferenceEvent>,
    service: ForecastService,
    last_city: Option<String>,
    last_report: Option<WeatherReport>,
}

impl Session {
    pub fn new(mut preferences: Preferences, service: ForecastService) -> Self {
        let events = preferences.subscribe();
        Self {
            preferences,
            events,
            service,
            last_city: None,
            last_report: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme()
    }

    pub fn language(&self) -> Language {
        self.preferences.language()
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.last_report.as_ref()
    }

    /// Look up `city` in the current language.
    ///
    /// A failed lookup clears the previous report; the last successful city
    /// is kept for language refreshes.
    ///
    /// # Errors
    /// Returns the lookup failure mapped to an [`AppError`].
    pub async fn search(&mut self, city: &str) -> Result<&WeatherReport, AppError> {
        let request = WeatherRequest::new(city, self.language());
        match self.service.report(&request).await {
            Ok(report) => {
                tracing::info!("Loaded weather for {}", report.forecast.city);
                self.last_city = Some(city.trim().to_string());
                Ok(&*self.last_report.insert(report))
            }
            Err(e) => {
                tracing::warn!("Lookup for '{}' failed ({}): {}", city, e.status_code(), e);
                self.last_report = None;
                Err(e.into_app_error())
            }
        }
    }

    /// # Errors
    /// Returns an error if the new theme could not be saved; the session
    /// still switches.
    pub fn toggle_theme(&mut self) -> Result<Theme, AppError> {
        self.preferences
            .toggle_theme()
            .map_err(IntoAppError::into_app_error)
    }

    /// # Errors
    /// Returns an error if the new language could not be saved; the session
    /// still switches.
    pub fn toggle_language(&mut self) -> Result<Language, AppError> {
        self.preferences
            .toggle_language()
            .map_err(IntoAppError::into_app_error)
    }

    /// Drain pending preference events. Several language changes in a row
    /// cause a single re-fetch, in whatever language is active by then.
    pub async fn pump_events(&mut self) -> Vec<SessionUpdate> {
        let mut updates = Vec::new();
        let mut language_changed = false;

        loop {
            match self.events.try_recv() {
                Ok(PreferenceEvent::ThemeChanged(theme)) => {
                    updates.push(SessionUpdate::ThemeChanged(theme));
                }
                Ok(PreferenceEvent::LanguageChanged(language)) => {
                    language_changed = true;
                    updates.push(SessionUpdate::LanguageChanged(language));
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }

        if language_changed {
            if let Some(city) = self.last_city.clone() {
                tracing::debug!("Language changed, refreshing {}", city);
                match self.search(&city).await {
                    Ok(_) => updates.push(SessionUpdate::Refreshed),
                    Err(e) => updates.push(SessionUpdate::RefreshFailed(e)),
                }
            }
        }

        updates
    }
}
