//! Text rendering of weather reports through a translation table.
//!
//! Every function returns the lines to print instead of printing them.

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    i18n::Translations,
    model::{ForecastReport, SunTimes, WeatherReport},
};

/// Keys used by [`current_lines`].
pub const CURRENT_KEYS: &[&str] = &[
    "today_head",
    "today_weather",
    "today_temp",
    "today_min",
    "today_max",
    "today_humidity",
];

/// Keys used by [`sun_lines`].
pub const SUN_KEYS: &[&str] = &["sun_head", "sunrise", "sunset"];

/// Keys used by [`forecast_lines`].
pub const FORECAST_KEYS: &[&str] = &["forecast_head", "forecast_entry"];

/// Today's conditions. Min/max are only shown for a single-snapshot report.
pub fn current_lines(t: &Translations, report: &WeatherReport) -> Result<Vec<String>> {
    let snapshot = report
        .headline()
        .ok_or_else(|| anyhow!("weather report for {} has no readings", report.city()))?;

    let mut lines = vec![
        t.format("today_head", &[&report.city()])?,
        t.format("today_weather", &[&snapshot.description])?,
        t.format("today_temp", &[&snapshot.temperature_c])?,
    ];

    if let WeatherReport::Current(_) = report {
        lines.push(t.format("today_min", &[&snapshot.temp_min_c])?);
        lines.push(t.format("today_max", &[&snapshot.temp_max_c])?);
    }

    lines.push(t.format("today_humidity", &[&snapshot.humidity_pct])?);
    Ok(lines)
}

/// Sunrise and sunset as 24-hour `HH:MM` in `tz`.
pub fn sun_lines(t: &Translations, sun: &SunTimes, tz: Tz) -> Result<Vec<String>> {
    Ok(vec![
        t.format("sun_head", &[&tz.name()])?,
        t.format("sunrise", &[&clock_time(sun.sunrise, tz)])?,
        t.format("sunset", &[&clock_time(sun.sunset, tz)])?,
    ])
}

/// One line per forecast slot, in provider order.
pub fn forecast_lines(t: &Translations, report: &ForecastReport) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(report.slots.len() + 1);
    lines.push(t.format("forecast_head", &[&report.city])?);

    for slot in &report.slots {
        let s = &slot.snapshot;
        lines.push(t.format(
            "forecast_entry",
            &[&slot.label, &s.description, &s.temperature_c, &s.humidity_pct],
        )?);
    }

    Ok(lines)
}

pub fn clock_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CurrentReport, ForecastSlot, Snapshot};
    use chrono_tz::Europe::Madrid;

    fn translations() -> Translations {
        Translations::parse(
            "today_head=Weather in {}\n\
             today_weather=Description: {}\n\
             today_temp=Temperature: {}ºC\n\
             today_min=Minimum: {}ºC\n\
             today_max=Maximum: {}ºC\n\
             today_humidity=Humidity: {}%\n\
             sun_head=Sun times ({})\n\
             sunrise=Sunrise: {}\n\
             sunset=Sunset: {}\n\
             forecast_head=Forecast for {}\n\
             forecast_entry={} | {} | {}ºC | {}%\n",
        )
        .unwrap()
    }

    fn snapshot(description: &str, temp: f64, humidity: u8) -> Snapshot {
        Snapshot {
            description: description.to_string(),
            temperature_c: temp,
            temp_min_c: temp - 2.0,
            temp_max_c: temp + 3.5,
            humidity_pct: humidity,
        }
    }

    fn at(ts: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(ts, 0).unwrap()
    }

    fn forecast() -> ForecastReport {
        ForecastReport {
            city: "Madrid".into(),
            slots: vec![
                ForecastSlot {
                    time: at(1_700_006_400),
                    label: "2023-11-15 00:00:00".into(),
                    snapshot: snapshot("clear sky", 9.5, 70),
                },
                ForecastSlot {
                    time: at(1_700_017_200),
                    label: "2023-11-15 03:00:00".into(),
                    snapshot: snapshot("few clouds", 7.25, 75),
                },
            ],
            sun: SunTimes { sunrise: at(1_700_000_000), sunset: at(1_700_040_000) },
        }
    }

    #[test]
    fn current_lines_for_single_snapshot() {
        let report = WeatherReport::Current(CurrentReport {
            city: "Madrid".into(),
            snapshot: snapshot("cielo claro", 21.5, 40),
        });

        let lines = current_lines(&translations(), &report).unwrap();

        assert_eq!(
            lines,
            vec![
                "Weather in Madrid",
                "Description: cielo claro",
                "Temperature: 21.5ºC",
                "Minimum: 19.5ºC",
                "Maximum: 25ºC",
                "Humidity: 40%",
            ]
        );
    }

    #[test]
    fn current_lines_for_forecast_use_first_slot() {
        let report = WeatherReport::Forecast(forecast());

        let lines = current_lines(&translations(), &report).unwrap();

        assert_eq!(
            lines,
            vec![
                "Weather in Madrid",
                "Description: clear sky",
                "Temperature: 9.5ºC",
                "Humidity: 70%",
            ]
        );
    }

    #[test]
    fn current_lines_fail_on_empty_forecast() {
        let mut report = forecast();
        report.slots.clear();

        let err = current_lines(&translations(), &WeatherReport::Forecast(report)).unwrap_err();
        assert!(err.to_string().contains("no readings"));
    }

    #[test]
    fn sun_lines_use_madrid_offset() {
        // 2023-11-14 22:13:20 UTC and 2023-11-15 09:20:00 UTC, CET is UTC+1.
        let lines = sun_lines(&translations(), &forecast().sun, Madrid).unwrap();

        assert_eq!(
            lines,
            vec!["Sun times (Europe/Madrid)", "Sunrise: 23:13", "Sunset: 10:20"]
        );
    }

    #[test]
    fn clock_time_follows_summer_time() {
        // 2024-07-01 12:00:00 UTC, CEST is UTC+2.
        assert_eq!(clock_time(at(1_719_835_200), Madrid), "14:00");
    }

    #[test]
    fn forecast_lines_keep_provider_order() {
        let lines = forecast_lines(&translations(), &forecast()).unwrap();

        assert_eq!(
            lines,
            vec![
                "Forecast for Madrid",
                "2023-11-15 00:00:00 | clear sky | 9.5ºC | 70%",
                "2023-11-15 03:00:00 | few clouds | 7.25ºC | 75%",
            ]
        );
    }

    #[test]
    fn missing_key_is_an_error() {
        let t = Translations::parse("today_head=Weather in {}").unwrap();
        let report = WeatherReport::Forecast(forecast());

        let err = current_lines(&t, &report).unwrap_err();
        assert!(err.to_string().contains("today_weather"));
    }
}
