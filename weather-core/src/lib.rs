//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather lookup with its retry policy
//! - The append-only SQLite log of lookups
//! - Shared domain models (records, log entries) and error types
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod store;

pub use config::Config;
pub use error::{FetchError, StoreError};
pub use model::{LogEntry, Temperature, WeatherRecord};
pub use provider::{OpenWeatherProvider, RetryPolicy, WeatherProvider};
pub use store::WeatherLogger;
