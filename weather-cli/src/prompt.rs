use anyhow::{Result, anyhow};
use weather_core::{CityName, Translations};

use crate::console::Console;

/// Printed when the input is not a number, whatever the selected language.
pub const PARSE_ERROR: &str = "Please, enter the correct data type (int).";

/// Out-of-range message used before a language has been chosen.
pub const DEFAULT_RANGE_ERROR: &str = "Please, select a correct option.";

/// Reads lines until one holds an integer in `1..=max`.
///
/// Only fails when the console does, or when input is closed.
pub fn read_option<C: Console>(console: &mut C, max: u32, range_error: &str) -> Result<u32> {
    loop {
        let line = console
            .read_line()?
            .ok_or_else(|| anyhow!("standard input closed while waiting for an option"))?;

        match line.trim().parse::<i64>() {
            Ok(value) if (1..=i64::from(max)).contains(&value) => {
                return Ok(u32::try_from(value)?);
            }
            Ok(_) => console.print_line(range_error)?,
            Err(_) => console.print_line(PARSE_ERROR)?,
        }
    }
}

/// Prompts until a non-blank city name is entered.
pub fn read_city<C: Console>(console: &mut C, t: &Translations) -> Result<CityName> {
    loop {
        console.print_line(t.get("select_city")?)?;

        let line = console
            .read_line()?
            .ok_or_else(|| anyhow!("standard input closed while waiting for a city"))?;

        match CityName::try_from(line.as_str()) {
            Ok(city) => return Ok(city),
            Err(_) => console.print_line(t.get("error")?)?,
        }
    }
}
