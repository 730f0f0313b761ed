use std::path::PathBuf;

use clap::builder::{styling::AnsiColor, Styles};
use clap::Parser;
use meteo_core::{Language, Theme};

const ABOUT: &str = "Current weather and 5-day forecast in the terminal";

const LONG_ABOUT: &str = "
Current conditions and a 5-day forecast for any city, from OpenWeatherMap.

Set your API key in the config file or in OPENWEATHERMAP_API_KEY. Theme and
language are remembered between runs; toggle them with :theme and :lang.
";

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default())
    .usage(AnsiColor::Green.on_default())
    .literal(AnsiColor::Green.on_default())
    .placeholder(AnsiColor::Green.on_default());

fn parse_language(value: &str) -> Result<Language, String> {
    Language::from_code(value).ok_or_else(|| format!("unknown language '{}' (fr, en)", value))
}

fn parse_theme(value: &str) -> Result<Theme, String> {
    Theme::from_name(value).ok_or_else(|| format!("unknown theme '{}' (light, dark)", value))
}

#[derive(Parser, Debug)]
#[command(version, styles = STYLES, about = ABOUT, long_about = LONG_ABOUT)]
pub struct Args {
    #[arg(help = "City to look up on start (e.g. Paris, \"New York\")")]
    pub city: Option<String>,

    #[arg(long, value_parser = parse_language, help = "Interface and description language: fr or en")]
    pub lang: Option<Language>,

    #[arg(long, value_parser = parse_theme, help = "Color theme: light or dark")]
    pub theme: Option<Theme>,

    #[arg(long, value_name = "PATH", help = "Configuration file to use instead of the default")]
    pub config: Option<PathBuf>,

    #[arg(long, requires = "city", help = "Print the lookup for CITY and exit")]
    pub once: bool,
}
