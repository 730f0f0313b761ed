//! Theme and language preferences, persisted through a key-value store.
//!
//! `Preferences` is an explicit state object handed to whoever needs it. It
//! loads once at startup, writes back on every change and notifies
//! subscribers so they can react (e.g. re-fetch when the language changes).

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;

const THEME_KEY: &str = "theme";
const LANGUAGE_KEY: &str = "language";

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display and provider language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    pub fn toggle(self) -> Self {
        match self {
            Language::Fr => Language::En,
            Language::En => Language::Fr,
        }
    }

    /// Two-letter code, also the `lang` query value sent to the provider.
    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }

    /// Parse an exact language code (`fr` or `en`).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "fr" => Some(Language::Fr),
            "en" => Some(Language::En),
            _ => None,
        }
    }

    /// Map a locale tag such as `fr-CA` or `fr_FR.UTF-8` to a language.
    /// French locales map to French, everything else to English.
    pub fn from_locale_tag(tag: &str) -> Self {
        let primary = tag
            .split(['-', '_', '.'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if primary == "fr" {
            Language::Fr
        } else {
            Language::En
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Persistent key-value storage for preferences.
pub trait PreferenceStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError>;
}

/// Preferences kept in a flat TOML table on disk.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store located in the application config directory.
    pub fn in_dir(config_dir: &Path) -> Self {
        Self::new(config_dir.join("preferences.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<BTreeMap<String, String>, PreferenceError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| PreferenceError::Read(e.to_string()))?;
        toml::from_str(&contents).map_err(|e| PreferenceError::Parse(e.to_string()))
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let _guard = self.lock.lock();
        Ok(self.read_table()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let _guard = self.lock.lock();
        // Only a malformed file is replaced; a failed read keeps the other keys.
        let mut table = match self.read_table() {
            Ok(table) => table,
            Err(PreferenceError::Parse(e)) => {
                tracing::warn!("Replacing malformed {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        table.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| PreferenceError::Write(e.to_string()))?;
        }
        let contents =
            toml::to_string(&table).map_err(|e| PreferenceError::Write(e.to_string()))?;
        std::fs::write(&self.path, contents).map_err(|e| PreferenceError::Write(e.to_string()))
    }
}

/// Volatile store, useful for tests and `--no-persist` style runs.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Fallbacks used when nothing has been saved yet.
#[derive(Debug, Clone, Default)]
pub struct SystemDefaults {
    pub prefers_dark: bool,
    pub locale: Option<String>,
}

impl SystemDefaults {
    /// Read hints from the environment: `LC_ALL`/`LANG` for the locale and
    /// `COLORFGBG` for a dark terminal background.
    pub fn detect() -> Self {
        let locale = std::env::var("LC_ALL")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| std::env::var("LANG").ok().filter(|v| !v.is_empty()));
        let prefers_dark = std::env::var("COLORFGBG")
            .map(|v| colorfgbg_is_dark(&v))
            .unwrap_or(false);
        Self {
            prefers_dark,
            locale,
        }
    }

    fn theme(&self) -> Theme {
        if self.prefers_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn language(&self) -> Language {
        self.locale
            .as_deref()
            .map(Language::from_locale_tag)
            .unwrap_or(Language::En)
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); ANSI backgrounds
/// 0-6 and 8 are dark.
fn colorfgbg_is_dark(value: &str) -> bool {
    value
        .rsplit(';')
        .next()
        .and_then(|bg| bg.trim().parse::<u8>().ok())
        .map(|bg| bg <= 6 || bg == 8)
        .unwrap_or(false)
}

/// Change notifications emitted by [`Preferences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceEvent {
    ThemeChanged(Theme),
    LanguageChanged(Language),
}

/// Current theme and language, backed by a [`PreferenceStore`].
pub struct Preferences {
    store: Box<dyn PreferenceStore>,
    theme: Theme,
    language: Language,
    subscribers: Vec<Sender<PreferenceEvent>>,
}

impl fmt::Debug for Preferences {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preferences")
            .field("theme", &self.theme)
            .field("language", &self.language)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl Preferences {
    /// Load saved preferences, falling back to `defaults` for anything
    /// missing, unreadable or unrecognized.
    pub fn load(store: Box<dyn PreferenceStore>, defaults: &SystemDefaults) -> Self {
        let theme = match store.get(THEME_KEY) {
            Ok(Some(saved)) => Theme::from_name(&saved).unwrap_or_else(|| {
                tracing::warn!("Ignoring unknown saved theme '{}'", saved);
                defaults.theme()
            }),
            Ok(None) => defaults.theme(),
            Err(e) => {
                tracing::warn!("Failed to read theme preference: {}", e);
                defaults.theme()
            }
        };

        let language = match store.get(LANGUAGE_KEY) {
            Ok(Some(saved)) => Language::from_code(&saved).unwrap_or_else(|| {
                tracing::warn!("Ignoring unknown saved language '{}'", saved);
                defaults.language()
            }),
            Ok(None) => defaults.language(),
            Err(e) => {
                tracing::warn!("Failed to read language preference: {}", e);
                defaults.language()
            }
        };

        tracing::debug!("Loaded preferences: theme={}, language={}", theme, language);

        Self {
            store,
            theme,
            language,
            subscribers: Vec::new(),
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Register for change events. Dropped receivers are pruned lazily.
    pub fn subscribe(&mut self) -> Receiver<PreferenceEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Switch between light and dark, save and notify.
    ///
    /// # Errors
    /// Returns an error if the new value could not be saved; the in-memory
    /// theme is still switched.
    pub fn toggle_theme(&mut self) -> Result<Theme, PreferenceError> {
        self.set_theme(self.theme.toggle())?;
        Ok(self.theme)
    }

    /// Switch between French and English, save and notify.
    ///
    /// # Errors
    /// Returns an error if the new value could not be saved; the in-memory
    /// language is still switched.
    pub fn toggle_language(&mut self) -> Result<Language, PreferenceError> {
        self.set_language(self.language.toggle())?;
        Ok(self.language)
    }

    /// # Errors
    /// Returns an error if the theme could not be saved.
    pub fn set_theme(&mut self, theme: Theme) -> Result<(), PreferenceError> {
        if theme == self.theme {
            return Ok(());
        }
        self.theme = theme;
        self.notify(PreferenceEvent::ThemeChanged(theme));
        self.store.set(THEME_KEY, theme.as_str())
    }

    /// # Errors
    /// Returns an error if the language could not be saved.
    pub fn set_language(&mut self, language: Language) -> Result<(), PreferenceError> {
        if language == self.language {
            return Ok(());
        }
        self.language = language;
        self.notify(PreferenceEvent::LanguageChanged(language));
        self.store.set(LANGUAGE_KEY, language.code())
    }

    fn notify(&mut self, event: PreferenceEvent) {
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Store handle that can be shared between the test and `Preferences`.
    struct SharedStore(Arc<MemoryPreferenceStore>);

    impl PreferenceStore for SharedStore {
        fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
            self.0.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), PreferenceError> {
            self.0.set(key, value)
        }
    }

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>, PreferenceError> {
            Err(PreferenceError::Read("unavailable".into()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), PreferenceError> {
            Err(PreferenceError::Write("read-only".into()))
        }
    }

    fn defaults(prefers_dark: bool, locale: &str) -> SystemDefaults {
        SystemDefaults {
            prefers_dark,
            locale: Some(locale.to_string()),
        }
    }

    #[test]
    fn test_locale_tag_mapping() {
        assert_eq!(Language::from_locale_tag("fr"), Language::Fr);
        assert_eq!(Language::from_locale_tag("fr-CA"), Language::Fr);
        assert_eq!(Language::from_locale_tag("fr_FR.UTF-8"), Language::Fr);
        assert_eq!(Language::from_locale_tag("en-US"), Language::En);
        assert_eq!(Language::from_locale_tag("de_DE"), Language::En);
        assert_eq!(Language::from_locale_tag(""), Language::En);
    }

    #[test]
    fn test_colorfgbg_detection() {
        assert!(colorfgbg_is_dark("15;0"));
        assert!(colorfgbg_is_dark("15;default;0"));
        assert!(!colorfgbg_is_dark("0;15"));
        assert!(!colorfgbg_is_dark("garbage"));
    }

    #[test]
    fn test_load_uses_system_defaults_when_nothing_saved() {
        let prefs = Preferences::load(
            Box::new(MemoryPreferenceStore::new()),
            &defaults(true, "fr_FR.UTF-8"),
        );
        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.language(), Language::Fr);

        let prefs = Preferences::load(Box::new(MemoryPreferenceStore::new()), &defaults(false, "en_GB"));
        assert_eq!(prefs.theme(), Theme::Light);
        assert_eq!(prefs.language(), Language::En);
    }

    #[test]
    fn test_load_prefers_saved_values() {
        let store = MemoryPreferenceStore::new();
        store.set("theme", "dark").unwrap();
        store.set("language", "en").unwrap();

        let prefs = Preferences::load(Box::new(store), &defaults(false, "fr_FR"));
        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.language(), Language::En);
    }

    #[test]
    fn test_load_ignores_unknown_saved_language() {
        let store = MemoryPreferenceStore::new();
        store.set("language", "de").unwrap();

        let prefs = Preferences::load(Box::new(store), &defaults(false, "fr-BE"));
        assert_eq!(prefs.language(), Language::Fr);
    }

    #[test]
    fn test_load_survives_store_errors() {
        let prefs = Preferences::load(Box::new(FailingStore), &defaults(true, "en"));
        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.language(), Language::En);
    }

    #[test]
    fn test_toggles_save_and_notify() {
        let shared = Arc::new(MemoryPreferenceStore::new());
        let mut prefs = Preferences::load(Box::new(SharedStore(shared.clone())), &defaults(false, "fr"));
        let events = prefs.subscribe();

        assert_eq!(prefs.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(prefs.toggle_language().unwrap(), Language::En);

        assert_eq!(shared.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(shared.get("language").unwrap().as_deref(), Some("en"));

        let received: Vec<_> = events.try_iter().collect();
        assert_eq!(
            received,
            vec![
                PreferenceEvent::ThemeChanged(Theme::Dark),
                PreferenceEvent::LanguageChanged(Language::En),
            ]
        );
    }

    #[test]
    fn test_setting_same_value_is_silent() {
        let mut prefs = Preferences::load(Box::new(MemoryPreferenceStore::new()), &defaults(false, "fr"));
        let events = prefs.subscribe();

        prefs.set_language(Language::Fr).unwrap();
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let mut prefs = Preferences::load(Box::new(MemoryPreferenceStore::new()), &defaults(false, "fr"));
        drop(prefs.subscribe());
        let live = prefs.subscribe();

        prefs.toggle_theme().unwrap();
        assert_eq!(prefs.subscribers.len(), 1);
        assert_eq!(live.try_recv().unwrap(), PreferenceEvent::ThemeChanged(Theme::Dark));
    }

    #[test]
    fn test_failed_save_still_switches_in_memory() {
        let mut prefs = Preferences::load(Box::new(FailingStore), &defaults(false, "fr"));
        assert!(prefs.toggle_language().is_err());
        assert_eq!(prefs.language(), Language::En);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::in_dir(dir.path());

        assert_eq!(store.get("theme").unwrap(), None);
        store.set("theme", "dark").unwrap();
        store.set("language", "en").unwrap();

        let reopened = FilePreferenceStore::in_dir(dir.path());
        assert_eq!(reopened.get("theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(reopened.get("language").unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_file_store_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::in_dir(dir.path());
        std::fs::write(store.path(), "this is = = not toml").unwrap();

        assert!(matches!(store.get("theme"), Err(PreferenceError::Parse(_))));
        // Saving replaces the corrupt file.
        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_file_store_set_propagates_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilePreferenceStore::in_dir(dir.path());
        // A directory in place of the file cannot be read as text.
        std::fs::create_dir(store.path()).unwrap();

        assert!(matches!(store.set("theme", "dark"), Err(PreferenceError::Read(_))));
        assert!(store.path().is_dir());
    }
}
