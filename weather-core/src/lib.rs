//! Core library for the `weather` console.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Translation tables for the console text
//! - Typed weather reports and the OpenWeather provider
//! - Retry policy for failed lookups
//! - Presenters that render reports as localized lines
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod i18n;
pub mod model;
pub mod present;
pub mod provider;
pub mod retry;

pub use config::Config;
pub use i18n::{Language, TranslationError, Translations};
pub use model::{
    CityName, CurrentReport, Endpoint, ForecastReport, ForecastSlot, Snapshot, SunTimes,
    WeatherReport,
};
pub use provider::{FetchError, WeatherProvider, WeatherQuery};
pub use retry::RetryPolicy;
