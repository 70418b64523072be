//! Application error taxonomy.
//!
//! Every variant maps to a short hint via `user_message()`; the `Display`
//! text keeps the detail for logs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Forecast service: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather: {0}")]
    Weather(#[from] WeatherError),
}

impl AppError {
    /// Hint suitable for showing next to a failed card.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
        }
    }
}

/// Failures talking to the forecast service.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("unreachable: {0}")]
    Unreachable(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed forecast: {0}")]
    Malformed(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::Unreachable(_) => "Forecast service unreachable. Check your connection.",
            NetworkError::Status { status, .. } if *status >= 500 => {
                "Forecast service is having trouble. Try again later."
            }
            NetworkError::Status { .. } => "Forecast request was rejected.",
            NetworkError::Malformed(_) => "Forecast service sent data we could not read.",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error("cannot parse config file: {0}")]
    Parse(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Check the api and cards settings in config.toml.",
            ConfigError::Parse(_) => "config.toml is not valid TOML.",
        }
    }
}

/// Outcomes with a weather-specific meaning.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("unknown mountain: {0}")]
    UnknownMountain(String),

    #[error("forecast service temporarily unavailable")]
    Unavailable,
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::UnknownMountain(_) => "This mountain is not in the catalog.",
            WeatherError::Unavailable => "Forecasts are temporarily unavailable. Try again later.",
        }
    }
}
