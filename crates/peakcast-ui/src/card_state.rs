//! Per-card weather state machine.
//!
//! Idle → Loading → {Loaded, Empty, Failed}, re-entered on every band
//! selection or retry. Each request gets a fresh token; a completion whose
//! token is not the latest one is stale and leaves the state untouched.

use std::sync::Arc;

use peakcast_core::AppError;
use peakcast_weather::{Band, FetchError, WeatherSeries};

/// Monotonic per-card request counter. 0 means nothing was requested yet.
pub type RequestToken = u64;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum CardStatus {
    #[default]
    Idle,
    Loading,
    Loaded(Arc<WeatherSeries>),
    /// Successful response without forecast coverage
    Empty,
    Failed {
        message: String,
        hint: &'static str,
    },
}

impl CardStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Empty => "empty",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Outcome of feeding a completion into the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Loaded,
    Empty,
    Failed,
    /// Superseded by a later request; ignored
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardState {
    mountain_id: String,
    active_band: Band,
    status: CardStatus,
    request_token: RequestToken,
}

impl CardState {
    pub fn new(mountain_id: impl Into<String>) -> Self {
        Self {
            mountain_id: mountain_id.into(),
            active_band: Band::Base,
            status: CardStatus::Idle,
            request_token: 0,
        }
    }

    pub fn mountain_id(&self) -> &str {
        &self.mountain_id
    }

    pub fn active_band(&self) -> Band {
        self.active_band
    }

    pub fn status(&self) -> &CardStatus {
        &self.status
    }

    pub fn request_token(&self) -> RequestToken {
        self.request_token
    }

    /// Present only when Loaded.
    pub fn series(&self) -> Option<&Arc<WeatherSeries>> {
        match &self.status {
            CardStatus::Loaded(series) => Some(series),
            _ => None,
        }
    }

    /// Present only when Failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            CardStatus::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// True if `retry` would issue a request.
    pub fn can_retry(&self) -> bool {
        matches!(self.status, CardStatus::Failed { .. })
    }

    /// Enter Loading for `band` and allocate the token of the new request.
    pub fn begin(&mut self, band: Band) -> RequestToken {
        self.request_token += 1;
        self.active_band = band;
        self.status = CardStatus::Loading;
        self.request_token
    }

    /// Re-issue the failed band. `None` unless Failed.
    pub fn retry(&mut self) -> Option<(Band, RequestToken)> {
        if !self.can_retry() {
            return None;
        }
        let band = self.active_band;
        Some((band, self.begin(band)))
    }

    /// Apply the completion of request `token`.
    pub fn resolve(
        &mut self,
        token: RequestToken,
        result: Result<WeatherSeries, FetchError>,
    ) -> Resolution {
        if token != self.request_token || self.status != CardStatus::Loading {
            return Resolution::Stale;
        }

        match result {
            Ok(series) if series.is_empty() => {
                self.status = CardStatus::Empty;
                Resolution::Empty
            }
            Ok(series) => {
                self.status = CardStatus::Loaded(Arc::new(series));
                Resolution::Loaded
            }
            Err(err) => {
                let message = format!("Failed to load weather: {}", err);
                let hint = AppError::from(err).user_message();
                self.status = CardStatus::Failed { message, hint };
                Resolution::Failed
            }
        }
    }
}
