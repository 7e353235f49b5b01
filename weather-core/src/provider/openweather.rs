use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use tracing::{debug, warn};

use crate::{Config, FetchError, Temperature, WeatherRecord, provider::RetryPolicy};

use super::WeatherProvider;

pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint: String,
    http: Client,
    retry: RetryPolicy,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: String,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            endpoint: endpoint.into(),
            http,
            retry: RetryPolicy::default(),
        })
    }

    /// Build a provider from the API key, endpoint and timeout in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?.to_owned();
        Self::new(api_key, config.endpoint(), config.timeout())
            .context("Failed to build HTTP client for OpenWeather")
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// One request, no retry.
    async fn fetch_current(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            // The status alone decides the outcome; the body is only kept for logging.
            let body = res.text().await.unwrap_or_default();
            return Err(FetchError::Rejected {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let body = res.text().await?;
        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        Ok(parsed.into_record(city))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn get_weather(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        let mut attempt = 1;
        loop {
            match self.fetch_current(city).await {
                Ok(record) => return Ok(record),
                Err(err) if err.is_retryable() && attempt < self.retry.attempts => {
                    let delay = self.retry.jitter();
                    debug!(city, attempt, ?delay, error = %err, "weather lookup failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    match &err {
                        FetchError::Rejected { status, body } => {
                            warn!(city, status, body = %body, "OpenWeather rejected the request");
                        }
                        other => warn!(city, attempt, error = %other, "weather lookup failed"),
                    }
                    return Err(err);
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: Temperature,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: Option<String>,
    main: OwMain,
    #[serde(default, deserialize_with = "first_condition")]
    weather: Option<OwWeather>,
}

impl OwCurrentResponse {
    fn into_record(self, city: &str) -> WeatherRecord {
        let name = self.name.unwrap_or_default();
        if name != city {
            debug!(requested = city, reported = %name, "provider renamed location");
        }

        let condition = self.weather.and_then(|w| w.main);

        WeatherRecord {
            city: city.to_owned(),
            temp: self.main.temp,
            humidity: self.main.humidity,
            condition,
        }
    }
}

// `main` is structurally required, `weather` is not: only the first entry is
// read, and anything that isn't a list starting with a well-formed condition
// reads as "no condition".
fn first_condition<'de, D>(deserializer: D) -> Result<Option<OwWeather>, D::Error>
where
    D: Deserializer<'de>,
{
    let first = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(entries) => entries.into_iter().next(),
        _ => None,
    };
    Ok(first.and_then(|entry| serde_json::from_value(entry).ok()))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
