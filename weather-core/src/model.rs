use chrono::{DateTime, Utc};
use thiserror::Error;

/// Which provider endpoint a session talks to.
///
/// `Current` returns a single snapshot; `Forecast` returns the multi-day list
/// and unlocks the sunrise/sunset and forecast menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endpoint {
    #[default]
    Current,
    Forecast,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Forecast => "forecast",
        }
    }

    pub const fn all() -> &'static [Endpoint] {
        &[Endpoint::Current, Endpoint::Forecast]
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Endpoint {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "current" => Ok(Endpoint::Current),
            "forecast" => Ok(Endpoint::Forecast),
            _ => Err(anyhow::anyhow!(
                "Unknown endpoint '{value}'. Supported endpoints: current, forecast."
            )),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("city name must not be empty")]
pub struct CityNameError;

/// A city name as typed by the user, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityName(String);

impl CityName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for CityName {
    type Error = CityNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(CityNameError)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl std::fmt::Display for CityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One weather reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub description: String,
    pub temperature_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentReport {
    pub city: String,
    pub snapshot: Snapshot,
}

/// A timestamped entry of the forecast list.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSlot {
    pub time: DateTime<Utc>,
    /// Provider-formatted timestamp text, e.g. `2024-05-01 12:00:00`.
    pub label: String,
    pub snapshot: Snapshot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    pub city: String,
    /// Chronological; the provider rejects empty lists.
    pub slots: Vec<ForecastSlot>,
    pub sun: SunTimes,
}

/// Validated provider response, tagged by payload shape.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherReport {
    Current(CurrentReport),
    Forecast(ForecastReport),
}

impl WeatherReport {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            WeatherReport::Current(_) => Endpoint::Current,
            WeatherReport::Forecast(_) => Endpoint::Forecast,
        }
    }

    pub fn city(&self) -> &str {
        match self {
            WeatherReport::Current(report) => &report.city,
            WeatherReport::Forecast(report) => &report.city,
        }
    }

    /// The reading shown as "today": the snapshot itself, or the first
    /// forecast slot.
    pub fn headline(&self) -> Option<&Snapshot> {
        match self {
            WeatherReport::Current(report) => Some(&report.snapshot),
            WeatherReport::Forecast(report) => report.slots.first().map(|slot| &slot.snapshot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn city_name_is_trimmed() {
        let city = CityName::try_from("  Madrid \t").unwrap();
        assert_eq!(city.as_str(), "Madrid");
    }

    #[test]
    fn blank_city_name_is_rejected() {
        assert_eq!(CityName::try_from("   "), Err(CityNameError));
        assert_eq!(CityName::try_from(""), Err(CityNameError));
    }

    #[test]
    fn endpoint_as_str_roundtrip() {
        for endpoint in Endpoint::all() {
            let parsed = Endpoint::try_from(endpoint.as_str()).expect("roundtrip should succeed");
            assert_eq!(*endpoint, parsed);
        }
    }

    #[test]
    fn unknown_endpoint_error() {
        let err = Endpoint::try_from("hourly").unwrap_err();
        assert!(err.to_string().contains("Unknown endpoint"));
    }
}
