use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;

/// Normalized weather snapshot for one lookup.
///
/// `city` is always the string the caller asked for, never the provider's
/// canonical spelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub temp: Temperature,
    pub humidity: u8,
    pub condition: Option<String>,
}

/// Degrees Celsius, kept in the numeric form the provider sent so `18` and
/// `18.0` print back as they arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Temperature(Number);

impl Temperature {
    /// `None` for NaN and infinities.
    pub fn from_f64(celsius: f64) -> Option<Self> {
        Number::from_f64(celsius).map(Self)
    }

    pub fn celsius(&self) -> f64 {
        self.0.as_f64().unwrap_or_default()
    }
}

impl From<i64> for Temperature {
    fn from(celsius: i64) -> Self {
        Self(Number::from(celsius))
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A record as persisted in the `logs` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub record: WeatherRecord,
    /// Local capture time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
}

/// Renders the one-line summary printed after a successful lookup:
/// `Paris: 18.5°C, Humidity: 60%, Conditions: Clouds`.
impl fmt::Display for WeatherRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}°C, Humidity: {}%, Conditions: {}",
            self.city,
            self.temp,
            self.humidity,
            self.condition.as_deref().unwrap_or("None"),
        )
    }
}
