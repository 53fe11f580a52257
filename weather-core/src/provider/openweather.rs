use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::{
    config::{Config, DEFAULT_CURRENT_URL, DEFAULT_FORECAST_URL},
    model::{
        CurrentReport, Endpoint, ForecastReport, ForecastSlot, Snapshot, SunTimes, WeatherReport,
    },
};

use super::{FetchError, WeatherProvider, WeatherQuery};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    current_url: String,
    forecast_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            current_url: DEFAULT_CURRENT_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.api_key()?.to_owned();
        let http = build_client(config.timeout())?;

        Ok(Self {
            api_key,
            current_url: config.endpoint_url(Endpoint::Current).to_owned(),
            forecast_url: config.endpoint_url(Endpoint::Forecast).to_owned(),
            http,
        })
    }

    /// Point both endpoints somewhere else, e.g. a local mock server.
    pub fn with_urls(
        mut self,
        current_url: impl Into<String>,
        forecast_url: impl Into<String>,
    ) -> Self {
        self.current_url = current_url.into();
        self.forecast_url = forecast_url.into();
        self
    }

    fn url_for(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Current => &self.current_url,
            Endpoint::Forecast => &self.forecast_url,
        }
    }

    async fn fetch_body(&self, query: &WeatherQuery) -> Result<String, FetchError> {
        let url = self.url_for(query.endpoint);
        tracing::debug!(
            url,
            city = query.city.as_str(),
            lang = query.language.code(),
            "requesting OpenWeather {}",
            query.endpoint
        );

        let res = self
            .http
            .get(url)
            .query(&[
                ("q", query.city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", query.language.code()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        tracing::debug!(%status, bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                city: query.city.to_string(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }

    builder.build().context("Failed to build HTTP client")
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

fn snapshot(main: OwMain, weather: Vec<OwWeather>) -> Result<Snapshot, FetchError> {
    let description = weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| FetchError::Parse("`weather` array is empty".to_string()))?;

    Ok(Snapshot {
        description,
        temperature_c: main.temp,
        temp_min_c: main.temp_min,
        temp_max_c: main.temp_max,
        humidity_pct: main.humidity,
    })
}

/// Validate a current-weather body into a report.
pub fn parse_current(body: &str) -> Result<WeatherReport, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)?;

    Ok(WeatherReport::Current(CurrentReport {
        city: parsed.name,
        snapshot: snapshot(parsed.main, parsed.weather)?,
    }))
}

/// Validate a 5-day/3-hour forecast body into a report.
pub fn parse_forecast(body: &str) -> Result<WeatherReport, FetchError> {
    let parsed: OwForecastResponse = serde_json::from_str(body)?;

    if parsed.list.is_empty() {
        return Err(FetchError::Parse("forecast `list` is empty".to_string()));
    }

    let slots = parsed
        .list
        .into_iter()
        .map(|entry| {
            Ok(ForecastSlot {
                time: unix_to_utc(entry.dt)?,
                label: entry.dt_txt,
                snapshot: snapshot(entry.main, entry.weather)?,
            })
        })
        .collect::<Result<Vec<_>, FetchError>>()?;

    Ok(WeatherReport::Forecast(ForecastReport {
        city: parsed.city.name,
        slots,
        sun: SunTimes {
            sunrise: unix_to_utc(parsed.city.sunrise)?,
            sunset: unix_to_utc(parsed.city.sunset)?,
        },
    }))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReport, FetchError> {
        let body = self.fetch_body(query).await?;

        match query.endpoint {
            Endpoint::Current => parse_current(&body),
            Endpoint::Forecast => parse_forecast(&body),
        }
    }
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>, FetchError> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .ok_or_else(|| FetchError::Parse(format!("timestamp {ts} is out of range")))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
