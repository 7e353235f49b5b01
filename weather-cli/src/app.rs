use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::debug;
use weather_core::{LogEntry, WeatherLogger, WeatherProvider};

pub const PROMPT: &str = "Enter city name (or 'exit' to quit): ";
pub const EXIT_MESSAGE: &str = "Exiting application.";

/// Ties a provider to the weather log and drives the prompt loop.
pub struct WeatherApp<P> {
    provider: P,
    logger: WeatherLogger,
}

impl<P: WeatherProvider> WeatherApp<P> {
    pub fn new(provider: P, logger: WeatherLogger) -> Self {
        Self { provider, logger }
    }

    /// Fetch `city`, print the summary or the diagnostic line, and log on
    /// success. Lookup failures are reported and yield `None`; store
    /// failures are returned.
    pub async fn lookup<W: Write>(&mut self, city: &str, out: &mut W) -> anyhow::Result<Option<LogEntry>> {
        match self.provider.get_weather(city).await {
            Ok(record) => {
                writeln!(out, "{record}")?;
                let entry = self
                    .logger
                    .log(&record)
                    .await
                    .with_context(|| format!("Failed to log weather for {city}"))?;
                Ok(Some(entry))
            }
            Err(err) => {
                writeln!(out, "{err}")?;
                Ok(None)
            }
        }
    }

    /// Prompt for cities until `exit` (any case) or end of input.
    pub async fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> anyhow::Result<()> {
        let mut line = String::new();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                debug!("end of input");
                return Ok(());
            }

            let city = line.trim();
            if city.is_empty() {
                continue;
            }
            if city.eq_ignore_ascii_case("exit") {
                writeln!(out, "{EXIT_MESSAGE}")?;
                return Ok(());
            }

            self.lookup(city, out).await?;
        }
    }

    pub async fn shutdown(mut self) {
        self.logger.close().await;
    }
}
