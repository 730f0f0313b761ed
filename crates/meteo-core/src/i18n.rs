//! User-facing strings in French and English.

use crate::preferences::Language;

/// One set of interface strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translations {
    pub app_title: &'static str,
    pub enter_city: &'static str,
    pub search: &'static str,
    pub loading: &'static str,
    pub error: &'static str,
    pub placeholder: &'static str,
    pub humidity: &'static str,
    pub wind: &'static str,
    pub current: &'static str,
    pub forecast: &'static str,
    pub min: &'static str,
    pub max: &'static str,
    pub theme_changed: &'static str,
    pub language_changed: &'static str,
    pub help: &'static str,
    pub goodbye: &'static str,
    pub weekdays: [&'static str; 7],
}

static FR: Translations = Translations {
    app_title: "Application Météo",
    enter_city: "Entrez une ville",
    search: "Rechercher",
    loading: "Chargement...",
    error: "Erreur lors de la récupération des données météo",
    placeholder: "Paris, New York, Tokyo...",
    humidity: "Humidité",
    wind: "Vent",
    current: "Maintenant",
    forecast: "Prévisions sur 5 jours",
    min: "min",
    max: "max",
    theme_changed: "Thème",
    language_changed: "Langue : français",
    help: "Commandes : <ville>, :theme, :lang, :quit",
    goodbye: "À bientôt !",
    weekdays: ["lun.", "mar.", "mer.", "jeu.", "ven.", "sam.", "dim."],
};

static EN: Translations = Translations {
    app_title: "Weather App",
    enter_city: "Enter a city",
    search: "Search",
    loading: "Loading...",
    error: "Error retrieving weather data",
    placeholder: "Paris, New York, Tokyo...",
    humidity: "Humidity",
    wind: "Wind",
    current: "Now",
    forecast: "5-day forecast",
    min: "low",
    max: "high",
    theme_changed: "Theme",
    language_changed: "Language: English",
    help: "Commands: <city>, :theme, :lang, :quit",
    goodbye: "Goodbye!",
    weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
};

/// Strings for the given language.
pub fn translations(lang: Language) -> &'static Translations {
    match lang {
        Language::Fr => &FR,
        Language::En => &EN,
    }
}

impl Translations {
    /// Short weekday name, Monday = 0.
    pub fn weekday(&self, days_from_monday: u32) -> &'static str {
        self.weekdays[(days_from_monday % 7) as usize]
    }
}
