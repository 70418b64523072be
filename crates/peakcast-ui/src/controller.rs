//! One mountain card: band selection, request sequencing and snapshots.
//!
//! The controller is sans-IO. Every operation that needs weather returns a
//! [`FetchRequest`] for the caller to execute; the completion comes back
//! through [`MountainCardController::complete`]. Renderers never touch the
//! state directly, they subscribe to immutable [`CardSnapshot`]s.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use peakcast_weather::{Band, FetchError, Mountain, WeatherSeries};
use tokio::sync::watch;

use crate::card_state::{CardState, CardStatus, RequestToken, Resolution};
use crate::detail::{AdvancedView, DetailError};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// A retrieval the controller wants executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub mountain_id: String,
    pub band: Band,
    pub token: RequestToken,
    /// Identifies the controller instance, so completions survive remove/re-add safely
    pub instance: u64,
}

/// Immutable view of a card at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct CardSnapshot {
    pub mountain: Arc<Mountain>,
    pub band: Band,
    pub token: RequestToken,
    pub status: CardStatus,
}

pub struct MountainCardController {
    mountain: Arc<Mountain>,
    state: CardState,
    instance: u64,
    snapshots: watch::Sender<CardSnapshot>,
}

impl MountainCardController {
    pub fn new(mountain: Mountain) -> Self {
        let mountain = Arc::new(mountain);
        let state = CardState::new(mountain.id.clone());
        let (snapshots, _) = watch::channel(CardSnapshot {
            mountain: mountain.clone(),
            band: state.active_band(),
            token: state.request_token(),
            status: state.status().clone(),
        });

        Self {
            mountain,
            state,
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            snapshots,
        }
    }

    pub fn mountain(&self) -> &Mountain {
        &self.mountain
    }

    pub fn mountain_id(&self) -> &str {
        &self.mountain.id
    }

    pub fn state(&self) -> &CardState {
        &self.state
    }

    pub fn instance(&self) -> u64 {
        self.instance
    }

    /// Initial load of a freshly mounted card.
    pub fn mount(&mut self) -> FetchRequest {
        self.select_band(Band::Base)
    }

    /// Switch to `band` and request its forecast. Outstanding requests are not
    /// cancelled; their completions become stale.
    pub fn select_band(&mut self, band: Band) -> FetchRequest {
        let token = self.state.begin(band);
        tracing::debug!(
            "Card {} loading {} (token {})",
            self.mountain.id,
            band,
            token
        );
        self.publish();
        self.request(band, token)
    }

    /// Re-issue the failed request. `None` unless the card is Failed.
    pub fn retry(&mut self) -> Option<FetchRequest> {
        let (band, token) = self.state.retry()?;
        tracing::info!(
            "Retrying {} at {} (token {})",
            self.mountain.id,
            band,
            token
        );
        self.publish();
        Some(self.request(band, token))
    }

    /// Feed back the result of request `token`.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<WeatherSeries, FetchError>,
    ) -> Resolution {
        let resolution = self.state.resolve(token, result);

        match resolution {
            Resolution::Stale => {
                tracing::debug!(
                    "Discarding stale response for {} (token {}, current {})",
                    self.mountain.id,
                    token,
                    self.state.request_token()
                );
                return resolution;
            }
            Resolution::Failed => {
                tracing::warn!(
                    "Weather for {} at {} failed: {}",
                    self.mountain.id,
                    self.state.active_band(),
                    self.state.error_message().unwrap_or_default()
                );
            }
            Resolution::Loaded | Resolution::Empty => {
                tracing::debug!(
                    "Card {} is {} for {}",
                    self.mountain.id,
                    self.state.status().name(),
                    self.state.active_band()
                );
            }
        }

        self.publish();
        resolution
    }

    pub fn snapshot(&self) -> CardSnapshot {
        CardSnapshot {
            mountain: self.mountain.clone(),
            band: self.state.active_band(),
            token: self.state.request_token(),
            status: self.state.status().clone(),
        }
    }

    /// Receiver that always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<CardSnapshot> {
        self.snapshots.subscribe()
    }

    /// Detail view for the current band; requires Loaded.
    pub fn advanced_view(&self) -> Result<AdvancedView, DetailError> {
        AdvancedView::derive(&self.mountain, &self.state)
    }

    fn request(&self, band: Band, token: RequestToken) -> FetchRequest {
        FetchRequest {
            mountain_id: self.mountain.id.clone(),
            band,
            token,
            instance: self.instance,
        }
    }

    fn publish(&self) {
        // send_replace keeps the value even with no live receivers
        self.snapshots.send_replace(self.snapshot());
    }
}
