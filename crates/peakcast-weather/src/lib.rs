//! Mountain weather data for Peakcast
//!
//! Catalog and hourly forecast types, the HTTP client for the remote API,
//! and summary statistics over a 24-hour forecast.

pub mod client;
pub mod error;
pub mod stats;
pub mod types;

pub use client::{HttpWeatherClient, WeatherFetcher};
pub use error::FetchError;
pub use stats::{round1, ForecastStats};
pub use types::*;
