use std::{io, path::PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use weather_core::{Config, OpenWeatherProvider, WeatherLogger};

use crate::app::WeatherApp;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// SQLite file the lookups are logged to (overrides config and WEATHER_DB_PATH).
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Without a subcommand, prompts for cities until `exit`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show and log the current weather for one city.
    Show {
        /// City name, passed to the provider as typed.
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { db, command } = self;

        if let Some(Command::Configure) = command {
            return configure();
        }

        let config = Config::load()?.with_env_overrides();
        let provider = OpenWeatherProvider::from_config(&config)?;
        let db_path = db.unwrap_or_else(|| config.database_path());
        let logger = WeatherLogger::open(&db_path)
            .await
            .with_context(|| format!("Failed to open weather log: {}", db_path.display()))?;

        let mut app = WeatherApp::new(provider, logger);
        let mut out = io::stdout().lock();

        let result = match command {
            Some(Command::Show { city }) => {
                let city = city.trim();
                if city.is_empty() {
                    Err(anyhow::anyhow!("City name must not be empty"))
                } else {
                    app.lookup(city, &mut out).await.map(|_| ())
                }
            }
            _ => app.run(io::stdin().lock(), &mut out).await,
        };

        app.shutdown().await;
        result
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved API key to {}", Config::config_file_path()?.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_starts_the_prompt() {
        let cli = Cli::try_parse_from(["weather"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.db.is_none());
    }

    #[test]
    fn show_takes_city_and_db_override() {
        let cli = Cli::try_parse_from(["weather", "show", "New York", "--db", "logs/w.db"]).unwrap();

        assert_eq!(cli.db, Some(PathBuf::from("logs/w.db")));
        match cli.command {
            Some(Command::Show { city }) => assert_eq!(city, "New York"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn configure_takes_no_arguments() {
        assert!(Cli::try_parse_from(["weather", "configure", "openweather"]).is_err());
        assert!(matches!(
            Cli::try_parse_from(["weather", "configure"]).unwrap().command,
            Some(Command::Configure)
        ));
    }
}
