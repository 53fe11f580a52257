use crate::{
    Config,
    i18n::Language,
    model::{CityName, Endpoint, WeatherReport},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub use reqwest::StatusCode;

pub mod openweather;

/// What the user asked for: a city, in a language, from one endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: CityName,
    pub language: Language,
    pub endpoint: Endpoint,
}

#[derive(Debug, Error)]
pub enum FetchError {
    /// Never carries the request URL, whose query holds the API key.
    #[error("{0}")]
    Transport(reqwest::Error),

    #[error("{status} for city '{city}': {body}")]
    Status {
        status: StatusCode,
        city: String,
        body: String,
    },

    #[error("unexpected response from weather service: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.without_url())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Parse(err.to_string())
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherReport, FetchError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(Box::new(provider))
}
