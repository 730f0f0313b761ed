//! Line-oriented terminal front end.

use std::io::Write;

use anyhow::Result;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use meteo_core::{translations, AppError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::display::{render_report, write_lines};
use crate::session::{Session, SessionUpdate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    ToggleTheme,
    ToggleLanguage,
    Help,
    Quit,
    Empty,
}

impl Command {
    /// Anything that is not a `:` command is a city name.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input {
            "" => Command::Empty,
            ":theme" | ":t" => Command::ToggleTheme,
            ":lang" | ":l" => Command::ToggleLanguage,
            ":help" | ":h" | ":?" => Command::Help,
            ":quit" | ":q" | ":exit" => Command::Quit,
            city => Command::Search(city.to_string()),
        }
    }
}

fn write_notice<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    queue!(out, Print(text), Print("\n"))?;
    out.flush()
}

fn write_error<W: Write>(out: &mut W, session: &Session, err: &AppError) -> std::io::Result<()> {
    let t = translations(session.language());
    queue!(
        out,
        SetForegroundColor(Color::Red),
        Print(format!("{}: {}", t.error, err.user_message(session.language()))),
        ResetColor,
        Print("\n"),
    )?;
    out.flush()
}

fn write_report<W: Write>(out: &mut W, session: &Session) -> std::io::Result<()> {
    match session.report() {
        Some(report) => write_lines(out, &render_report(report, session.language()), session.theme()),
        None => Ok(()),
    }
}

async fn search<W: Write>(session: &mut Session, out: &mut W, city: &str) -> std::io::Result<()> {
    write_notice(out, translations(session.language()).loading)?;
    match session.search(city).await {
        Ok(_) => write_report(out, session),
        Err(e) => write_error(out, session, &e),
    }
}

async fn apply_updates<W: Write>(session: &mut Session, out: &mut W) -> std::io::Result<()> {
    let mut redraw = false;
    for update in session.pump_events().await {
        let t = translations(session.language());
        match update {
            SessionUpdate::ThemeChanged(theme) => {
                write_notice(out, &format!("{}: {}", t.theme_changed, theme))?;
                redraw = true;
            }
            SessionUpdate::LanguageChanged(_) => write_notice(out, t.language_changed)?,
            SessionUpdate::Refreshed => redraw = true,
            SessionUpdate::RefreshFailed(e) => write_error(out, session, &e)?,
        }
    }
    if redraw {
        write_report(out, session)?;
    }
    Ok(())
}

/// Look up one city, print it and return.
///
/// # Errors
/// Returns an error if the lookup fails or output cannot be written.
pub async fn print_once<W: Write>(session: &mut Session, out: &mut W, city: &str) -> Result<()> {
    session.search(city).await?;
    write_report(out, session)?;
    Ok(())
}

/// Read commands from `input` until `:quit` or end of input.
///
/// # Errors
/// Returns an error if reading input or writing output fails. Lookup and
/// preference failures are reported inline and do not stop the loop.
pub async fn run<R, W>(
    session: &mut Session,
    input: R,
    out: &mut W,
    initial_city: Option<&str>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    {
        let t = translations(session.language());
        write_notice(out, t.app_title)?;
        write_notice(out, t.help)?;
    }

    if let Some(city) = initial_city {
        search(session, out, city).await?;
    }

    let mut lines = input.lines();
    loop {
        let t = translations(session.language());
        queue!(out, Print(format!("{} ({}) > ", t.enter_city, t.placeholder)))?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Help => write_notice(out, t.help)?,
            Command::Quit => {
                write_notice(out, t.goodbye)?;
                break;
            }
            Command::ToggleTheme => {
                if let Err(e) = session.toggle_theme() {
                    write_error(out, session, &e)?;
                }
                apply_updates(session, out).await?;
            }
            Command::ToggleLanguage => {
                if let Err(e) = session.toggle_language() {
                    write_error(out, session, &e)?;
                }
                apply_updates(session, out).await?;
            }
            Command::Search(city) => search(session, out, &city).await?,
        }
    }

    tracing::debug!("Input loop finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_core::{DayBoundary, MemoryPreferenceStore, Preferences, SystemDefaults};
    use meteo_weather::{ForecastService, WeatherProvider};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("  "), Command::Empty);
        assert_eq!(Command::parse(":theme"), Command::ToggleTheme);
        assert_eq!(Command::parse(":l"), Command::ToggleLanguage);
        assert_eq!(Command::parse(":q"), Command::Quit);
        assert_eq!(Command::parse(":?"), Command::Help);
        assert_eq!(
            Command::parse("  New York "),
            Command::Search("New York".into())
        );
    }

    fn session(uri: &str) -> Session {
        let defaults = SystemDefaults {
            prefers_dark: false,
            locale: Some("en_GB.UTF-8".into()),
        };
        let preferences = Preferences::load(Box::new(MemoryPreferenceStore::new()), &defaults);
        let service = ForecastService::new(
            WeatherProvider::with_base_url(uri, "k").unwrap(),
            DayBoundary::Utc,
        );
        Session::new(preferences, service)
    }

    async fn mount_tokyo(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Tokyo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Tokyo",
                "main": {"temp": 26.6, "humidity": 70},
                "weather": [{"icon": "10d", "description": "light rain"}],
                "wind": {"speed": 4.0}
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Tokyo"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "list": [
                    {"dt": 1718445600, "main": {"temp": 25.0, "humidity": 72},
                     "weather": [{"icon": "10d", "description": "light rain"}], "wind": {"speed": 4.0}}
                ],
                "city": {"name": "Tokyo"}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_run_searches_and_quits() {
        let server = MockServer::start().await;
        mount_tokyo(&server).await;

        let mut session = session(&server.uri());
        let mut out = Vec::new();
        run(&mut session, &b"Tokyo\n:quit\nParis\n"[..], &mut out, None)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Weather App"));
        assert!(text.contains("27°C"));
        assert!(text.contains("Goodbye!"));
        // Nothing after :quit is looked up.
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_run_reports_lookup_errors_inline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut session = session(&server.uri());
        let mut out = Vec::new();
        run(&mut session, &b"Atlantis\n"[..], &mut out, None)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("City not found. Check the spelling."));
    }

    #[tokio::test]
    async fn test_initial_city_and_language_toggle() {
        let server = MockServer::start().await;
        mount_tokyo(&server).await;

        let mut session = session(&server.uri());
        let mut out = Vec::new();
        run(&mut session, &b":lang\n"[..], &mut out, Some("Tokyo"))
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Langue : français"));
        assert!(text.contains("Prévisions sur 5 jours"));
        assert_eq!(server.received_requests().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_print_once_propagates_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut session = session(&server.uri());
        let mut out = Vec::new();
        assert!(print_once(&mut session, &mut out, "Tokyo").await.is_err());
        assert!(out.is_empty());
    }
}
