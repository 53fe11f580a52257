use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text, required, validator::Validation};
use weather_core::{Config, Endpoint, provider::provider_from_config};

use crate::{
    console::StdConsole,
    session::{Session, SessionOptions},
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Localized weather console")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug details to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the interactive session (the default).
    Run(RunArgs),

    /// Store the OpenWeather API key and endpoints.
    Configure,
}

#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// Provider endpoint: "current" or "forecast" (adds sunrise/sunset and 5-day forecast).
    #[arg(long, default_value = "current", value_parser = parse_endpoint)]
    pub endpoint: Endpoint,

    /// Directory holding texts_<lang>.txt files.
    #[arg(long)]
    pub languages_dir: Option<PathBuf>,
}

fn parse_endpoint(value: &str) -> Result<Endpoint, String> {
    Endpoint::try_from(value).map_err(|e| e.to_string())
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = self.config;

        match self.command.unwrap_or(Command::Run(RunArgs::default())) {
            Command::Run(args) => run_session(config_path.as_deref(), args).await,
            Command::Configure => configure(config_path.as_deref()),
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_session(config_path: Option<&Path>, args: RunArgs) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    config.apply_env();

    let provider = provider_from_config(&config)?;
    let options = SessionOptions {
        endpoint: args.endpoint,
        languages_dir: args.languages_dir.unwrap_or_else(|| config.languages_dir.clone()),
        timezone: config.timezone()?,
        retry: config.retry_policy(),
    };
    tracing::debug!(?options, "starting session");

    let mut console = StdConsole;
    Session::new(&mut console, provider.as_ref(), options).run().await
}

fn configure(config_path: Option<&Path>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_validator(required!("The API key must not be empty"))
        .prompt()
        .context("API key prompt was cancelled")?;
    config.set_api_key(api_key.trim().to_string());

    config.current_url = Text::new("Current weather endpoint:")
        .with_default(&config.current_url)
        .prompt()
        .context("Endpoint prompt was cancelled")?;

    config.forecast_url = Text::new("Forecast endpoint:")
        .with_default(&config.forecast_url)
        .prompt()
        .context("Endpoint prompt was cancelled")?;

    config.timezone = Text::new("Timezone for sunrise and sunset:")
        .with_default(&config.timezone)
        .with_validator(|input: &str| {
            Ok(match input.parse::<Tz>() {
                Ok(_) => Validation::Valid,
                Err(_) => Validation::Invalid("Not an IANA timezone, e.g. Europe/Madrid".into()),
            })
        })
        .prompt()
        .context("Timezone prompt was cancelled")?;

    match config_path {
        Some(path) => {
            config.save_to(path)?;
            println!("Configuration saved to {}", path.display());
        }
        None => {
            config.save()?;
            println!("Configuration saved to {}", Config::config_file_path()?.display());
        }
    }

    Ok(())
}
