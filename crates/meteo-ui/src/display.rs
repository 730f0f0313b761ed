//! Presentation of weather results in the terminal.
//!
//! This is the only place temperatures are rounded. Colors follow the
//! weather condition family of the icon code, its day/night suffix and the
//! active theme.

use std::io::Write;

use chrono::{Datelike, NaiveDate};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use meteo_core::{translations, Language, Theme, Translations};
use meteo_weather::{CurrentConditions, DailyForecast, DailySummary, WeatherReport};

const WHITE: Color = Color::Rgb { r: 255, g: 255, b: 255 };
const GRAY_300: Color = Color::Rgb { r: 209, g: 213, b: 219 };
const GRAY_400: Color = Color::Rgb { r: 156, g: 163, b: 175 };
const GRAY_700: Color = Color::Rgb { r: 55, g: 65, b: 81 };
const GRAY_800: Color = Color::Rgb { r: 31, g: 41, b: 55 };
const GRAY_900: Color = Color::Rgb { r: 17, g: 24, b: 39 };
const BLUE_300: Color = Color::Rgb { r: 147, g: 197, b: 253 };
const BLUE_600: Color = Color::Rgb { r: 37, g: 99, b: 235 };
const YELLOW_300: Color = Color::Rgb { r: 253, g: 224, b: 71 };

/// Metres per second to kilometres per hour.
const MS_TO_KMH: f64 = 3.6;

/// Condition family derived from a provider icon code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    ClearDay,
    ClearNight,
    Clouds,
    Rain,
    Storm,
    Snow,
    Mist,
    Plain,
}

impl Palette {
    /// `01` clear, `02`-`04` clouds, `09`/`10` rain, `11` storm, `13` snow,
    /// `50` mist; a trailing `n` marks night.
    pub fn for_icon(icon: &str) -> Self {
        let night = icon.ends_with('n');
        match icon.get(..2) {
            Some("01") if night => Palette::ClearNight,
            Some("01") => Palette::ClearDay,
            Some("02" | "03" | "04") => Palette::Clouds,
            Some("09" | "10") => Palette::Rain,
            Some("11") => Palette::Storm,
            Some("13") => Palette::Snow,
            Some("50") => Palette::Mist,
            _ => Palette::Plain,
        }
    }

    pub fn background(self, theme: Theme) -> Color {
        match (self, theme) {
            (Palette::ClearDay, Theme::Light) => YELLOW_300,
            (Palette::ClearDay, Theme::Dark) => BLUE_600,
            (Palette::ClearNight, Theme::Light) => GRAY_800,
            (Palette::ClearNight, Theme::Dark) => GRAY_900,
            (Palette::Clouds, Theme::Light) => GRAY_300,
            (Palette::Clouds, Theme::Dark) => GRAY_700,
            (Palette::Rain, Theme::Light) => BLUE_300,
            (Palette::Rain, Theme::Dark) => GRAY_800,
            (Palette::Storm, _) => GRAY_900,
            (Palette::Snow, Theme::Light) => GRAY_300,
            (Palette::Snow, Theme::Dark) => GRAY_700,
            (Palette::Mist, Theme::Light) => GRAY_400,
            (Palette::Mist, Theme::Dark) => GRAY_700,
            (Palette::Plain, Theme::Light) => WHITE,
            (Palette::Plain, Theme::Dark) => GRAY_800,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Palette::ClearDay => "☀",
            Palette::ClearNight => "☾",
            Palette::Clouds => "☁",
            Palette::Rain => "☂",
            Palette::Storm => "⚡",
            Palette::Snow => "❄",
            Palette::Mist => "≋",
            Palette::Plain => "·",
        }
    }
}

/// Light text is needed on dark themes, storms and night icons.
pub fn is_dark_background(theme: Theme, icon: &str) -> bool {
    theme == Theme::Dark || icon.starts_with("11") || icon.ends_with('n')
}

fn foreground(theme: Theme, icon: &str) -> Color {
    if is_dark_background(theme, icon) {
        WHITE
    } else {
        GRAY_800
    }
}

/// Round to the nearest whole degree, halves upward.
pub fn round_degrees(celsius: f64) -> i64 {
    (celsius + 0.5).floor() as i64
}

/// Wind in km/h from the provider's m/s, one decimal.
pub fn format_wind(metres_per_second: f64) -> String {
    format!("{:.1} km/h", metres_per_second * MS_TO_KMH)
}

pub fn format_day(date: NaiveDate, lang: Language) -> String {
    let weekday = translations(lang).weekday(date.weekday().num_days_from_monday());
    match lang {
        Language::Fr => format!("{} {}", weekday, date.format("%d/%m")),
        Language::En => format!("{} {}", weekday, date.format("%m/%d")),
    }
}

/// One rendered line and the icon whose colors it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub icon: Option<String>,
    pub bold: bool,
}

impl Line {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
            bold: false,
        }
    }

    fn heading(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
            bold: true,
        }
    }

    fn colored(text: impl Into<String>, icon: &str) -> Self {
        Self {
            text: text.into(),
            icon: Some(icon.to_string()),
            bold: false,
        }
    }
}

pub fn render_current(current: &CurrentConditions, lang: Language) -> Vec<Line> {
    let t = translations(lang);
    let glyph = Palette::for_icon(&current.icon).glyph();
    vec![
        Line::heading(format!("{} · {}", current.city, t.current)),
        Line::colored(
            format!(
                " {} {}°C  {}  {} {}%  {} {} ",
                glyph,
                round_degrees(current.temperature),
                current.description,
                t.humidity,
                current.humidity,
                t.wind,
                format_wind(current.wind_speed)
            ),
            &current.icon,
        ),
    ]
}

fn forecast_row(day: &DailySummary, t: &Translations, lang: Language) -> Line {
    let glyph = Palette::for_icon(&day.icon).glyph();
    Line::colored(
        format!(
            " {:<10} {} {:>3}°C  ({} {}° / {} {}°)  {} {}%  {} {}  {} ",
            format_day(day.date, lang),
            glyph,
            round_degrees(day.temperature),
            t.min,
            round_degrees(day.min_temp),
            t.max,
            round_degrees(day.max_temp),
            t.humidity,
            day.humidity,
            t.wind,
            format_wind(day.wind_speed),
            day.description
        ),
        &day.icon,
    )
}

pub fn render_forecast(forecast: &DailyForecast, lang: Language) -> Vec<Line> {
    let t = translations(lang);
    let mut lines = vec![Line::heading(format!("{} · {}", forecast.city, t.forecast))];
    lines.extend(forecast.forecasts.iter().map(|day| forecast_row(day, t, lang)));
    lines
}

pub fn render_report(report: &WeatherReport, lang: Language) -> Vec<Line> {
    let mut lines = render_current(&report.current, lang);
    lines.push(Line::plain(""));
    lines.extend(render_forecast(&report.forecast, lang));
    lines
}

/// Write lines with theme colors.
///
/// # Errors
/// Returns any error from the underlying writer.
pub fn write_lines<W: Write>(out: &mut W, lines: &[Line], theme: Theme) -> std::io::Result<()> {
    for line in lines {
        if line.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        match &line.icon {
            Some(icon) => {
                let palette = Palette::for_icon(icon);
                queue!(
                    out,
                    SetBackgroundColor(palette.background(theme)),
                    SetForegroundColor(foreground(theme, icon)),
                    Print(&line.text),
                )?;
            }
            None => queue!(out, Print(&line.text))?,
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor, Print("\n"))?;
    }
    out.flush()
}
