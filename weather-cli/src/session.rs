//! The interactive session: language selection, initial lookup, then the
//! menu loop until the user exits.

use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono_tz::Tz;
use weather_core::{
    Endpoint, ForecastReport, Language, RetryPolicy, Translations, WeatherProvider, WeatherQuery,
    WeatherReport, present,
};

use crate::{
    console::Console,
    prompt::{DEFAULT_RANGE_ERROR, read_city, read_option},
};

/// Keys every session needs, whatever the menu variant.
const SESSION_KEYS: &[&str] = &[
    "select_city",
    "error",
    "api_error",
    "fetch_failed",
    "option_error",
    "menu_head",
];

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub endpoint: Endpoint,
    pub languages_dir: PathBuf,
    pub timezone: Tz,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    ShowCurrent,
    Notifications,
    ShowSun,
    ShowForecast,
    ChangeCity,
    Exit,
}

impl MenuAction {
    fn label_key(&self) -> &'static str {
        match self {
            MenuAction::ShowCurrent => "menu_current",
            MenuAction::Notifications => "menu_notifications",
            MenuAction::ShowSun => "menu_sun",
            MenuAction::ShowForecast => "menu_forecast",
            MenuAction::ChangeCity => "menu_change_city",
            MenuAction::Exit => "menu_exit",
        }
    }

    /// Menu entries, in display order, for the given endpoint.
    fn menu(endpoint: Endpoint) -> &'static [MenuAction] {
        match endpoint {
            Endpoint::Current => &[
                MenuAction::ShowCurrent,
                MenuAction::Notifications,
                MenuAction::ChangeCity,
                MenuAction::Exit,
            ],
            Endpoint::Forecast => &[
                MenuAction::ShowCurrent,
                MenuAction::ShowSun,
                MenuAction::ShowForecast,
                MenuAction::ChangeCity,
                MenuAction::Exit,
            ],
        }
    }
}

/// Every translation key a session on `endpoint` may look up.
pub fn required_keys(endpoint: Endpoint) -> Vec<&'static str> {
    let mut keys: Vec<&'static str> = SESSION_KEYS.to_vec();
    keys.extend(MenuAction::menu(endpoint).iter().map(MenuAction::label_key));
    keys.extend_from_slice(present::CURRENT_KEYS);

    if endpoint == Endpoint::Forecast {
        keys.extend_from_slice(present::SUN_KEYS);
        keys.extend_from_slice(present::FORECAST_KEYS);
    }

    keys
}

pub struct Session<'a, C: Console> {
    console: &'a mut C,
    provider: &'a dyn WeatherProvider,
    options: SessionOptions,
}

impl<'a, C: Console> Session<'a, C> {
    pub fn new(
        console: &'a mut C,
        provider: &'a dyn WeatherProvider,
        options: SessionOptions,
    ) -> Self {
        Self { console, provider, options }
    }

    pub async fn run(&mut self) -> Result<()> {
        let language = self.select_language()?;
        let t = self.load_translations(language)?;

        let Some(mut report) = self.fetch_report(language, &t).await? else {
            bail!("no weather data could be retrieved");
        };

        let menu = MenuAction::menu(self.options.endpoint);
        let max = u32::try_from(menu.len())?;

        loop {
            self.print_menu(&t, menu)?;

            let option = read_option(&mut *self.console, max, t.get("option_error")?)?;
            let action = menu[(option - 1) as usize];
            tracing::debug!(?action, "menu selection");

            match action {
                MenuAction::Exit => break,
                MenuAction::ShowCurrent => {
                    let lines = present::current_lines(&t, &report)?;
                    self.print_lines(&lines)?;
                }
                MenuAction::Notifications => self.console.print_line("")?,
                MenuAction::ShowSun => {
                    let sun = &forecast_of(&report)?.sun;
                    let lines = present::sun_lines(&t, sun, self.options.timezone)?;
                    self.print_lines(&lines)?;
                }
                MenuAction::ShowForecast => {
                    let lines = present::forecast_lines(&t, forecast_of(&report)?)?;
                    self.print_lines(&lines)?;
                }
                MenuAction::ChangeCity => {
                    if let Some(next) = self.fetch_report(language, &t).await? {
                        report = next;
                    }
                }
            }
        }

        Ok(())
    }

    fn select_language(&mut self) -> Result<Language> {
        self.console.print_line("")?;
        self.console.print_line("Select a language and press enter: ")?;
        for (idx, language) in Language::all().iter().enumerate() {
            self.console.print_line(&format!("{} - {}", idx + 1, language.native_name()))?;
        }

        let max = u32::try_from(Language::all().len())?;
        let option = read_option(&mut *self.console, max, DEFAULT_RANGE_ERROR)?;
        self.console.print_line("")?;

        Ok(Language::from_option(option).unwrap_or(Language::English))
    }

    /// Loads and checks the table; any failure is shown to the user and ends
    /// the session.
    fn load_translations(&mut self, language: Language) -> Result<Translations> {
        let loaded = Translations::load(&self.options.languages_dir, language).and_then(|t| {
            t.require(&required_keys(self.options.endpoint))?;
            Ok(t)
        });

        match loaded {
            Ok(t) => Ok(t),
            Err(err) => {
                self.console.print_line(&err.to_string())?;
                Err(err.into())
            }
        }
    }

    /// Prompts for a city and fetches it, retrying within the policy.
    ///
    /// Returns `None` once every attempt has failed.
    async fn fetch_report(
        &mut self,
        language: Language,
        t: &Translations,
    ) -> Result<Option<WeatherReport>> {
        let retry = self.options.retry;
        let mut failed = 0;

        loop {
            let city = read_city(&mut *self.console, t)?;
            let query = WeatherQuery { city, language, endpoint: self.options.endpoint };

            match self.provider.fetch(&query).await {
                Ok(report) => return Ok(Some(report)),
                Err(err) => {
                    failed += 1;
                    tracing::debug!(attempt = failed, error = %err, "weather lookup failed");
                    self.console.print_line(&t.format("api_error", &[&err])?)?;

                    if !retry.allows_retry(failed) {
                        self.console.print_line(t.get("fetch_failed")?)?;
                        return Ok(None);
                    }

                    let delay = retry.delay_after(failed);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
    }

    fn print_menu(&mut self, t: &Translations, menu: &[MenuAction]) -> Result<()> {
        self.console.print_line("")?;
        self.console.print_line(t.get("menu_head")?)?;
        for (idx, action) in menu.iter().enumerate() {
            self.console
                .print_line(&format!("{} - {}", idx + 1, t.get(action.label_key())?))?;
        }
        Ok(())
    }

    fn print_lines(&mut self, lines: &[String]) -> Result<()> {
        for line in lines {
            self.console.print_line(line)?;
        }
        Ok(())
    }
}

fn forecast_of(report: &WeatherReport) -> Result<&ForecastReport> {
    match report {
        WeatherReport::Forecast(forecast) => Ok(forecast),
        other => bail!("this option needs forecast data, not {} data", other.endpoint()),
    }
}
