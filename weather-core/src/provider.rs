use crate::{FetchError, WeatherRecord};
use async_trait::async_trait;
use rand::Rng;
use std::{fmt::Debug, ops::RangeInclusive, time::Duration};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Look up current conditions for `city`.
    async fn get_weather(&self, city: &str) -> Result<WeatherRecord, FetchError>;
}

/// How many times a lookup is attempted and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            min_delay: Duration::from_millis(50),
            max_delay: Duration::from_millis(120),
        }
    }
}

impl RetryPolicy {
    pub fn delay_range(&self) -> RangeInclusive<Duration> {
        self.min_delay..=self.max_delay.max(self.min_delay)
    }

    /// Random pause before the next attempt, uniform over the delay range.
    pub fn jitter(&self) -> Duration {
        let range = self.delay_range();
        let (lo, hi) = (range.start().as_millis() as u64, range.end().as_millis() as u64);
        Duration::from_millis(rand::thread_rng().gen_range(lo..=hi))
    }
}
