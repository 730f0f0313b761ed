use anyhow::{Context, Result};
use clap::Parser;
use meteo_core::{Config, FilePreferenceStore, Preferences, SystemDefaults};
use meteo_ui::Session;
use meteo_weather::{ForecastService, WeatherProvider};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    meteo_core::init()?;

    let config = Config::load_validated(args.config.as_deref())?;

    let store = FilePreferenceStore::in_dir(&config.config_dir);
    tracing::debug!("Preferences stored in {}", store.path().display());
    let mut preferences = Preferences::load(Box::new(store), &SystemDefaults::detect());
    if let Some(theme) = args.theme {
        if let Err(e) = preferences.set_theme(theme) {
            tracing::warn!("Could not save theme: {}", e);
        }
    }
    if let Some(lang) = args.lang {
        if let Err(e) = preferences.set_language(lang) {
            tracing::warn!("Could not save language: {}", e);
        }
    }

    let provider =
        WeatherProvider::new(&config.provider).context("Failed to create weather client")?;
    let service = ForecastService::new(provider, config.weather.day_boundary);
    let mut session = Session::new(preferences, service);

    tracing::info!("Meteo started");

    let mut stdout = std::io::stdout();
    if args.once {
        if let Some(city) = args.city.as_deref() {
            meteo_ui::print_once(&mut session, &mut stdout, city).await?;
        }
        return Ok(());
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    meteo_ui::run(&mut session, stdin, &mut stdout, args.city.as_deref()).await
}
