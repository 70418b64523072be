//! Weather fetch error types.

use peakcast_core::{AppError, NetworkError, WeatherError};
use thiserror::Error;

use crate::types::SeriesError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Transport-level failure, no response received
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP response
    #[error("Server error {status}: {body}")]
    Server { status: u16, body: String },

    /// A success response whose body is not a valid forecast
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl FetchError {
    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429 || *status == 408,
            Self::InvalidResponse(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Server {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else if e.is_timeout() {
            Self::Network(format!("request timed out: {}", e))
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<FetchError> for AppError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::Server { status: 404, body } => {
                WeatherError::UnknownMountain(body).into()
            }
            FetchError::Server { status: 503, .. } => WeatherError::Unavailable.into(),
            FetchError::Server { status, body } => NetworkError::Status { status, body }.into(),
            FetchError::Network(msg) => NetworkError::Unreachable(msg).into(),
            FetchError::InvalidResponse(msg) => NetworkError::Malformed(msg).into(),
        }
    }
}

impl From<SeriesError> for FetchError {
    fn from(e: SeriesError) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}
