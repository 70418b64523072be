//! Tracked mountains: one card controller per mountain id.
//!
//! Cards are isolated from each other. Completions arrive on a single channel
//! in whatever order the network delivers them and are routed by mountain id
//! and controller instance.

use std::sync::Arc;

use peakcast_weather::{Band, FetchError, Mountain, WeatherFetcher, WeatherSeries};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

use crate::card_state::{CardStatus, Resolution};
use crate::controller::{CardSnapshot, FetchRequest, MountainCardController};
use crate::detail::{AdvancedView, DetailError};
use crate::services::{request_weather_fetch, WeatherServiceMessage};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    #[error("mountain {0} is not tracked")]
    UnknownMountain(String),

    #[error("mountain {0} has no failed request to retry")]
    NothingToRetry(String),

    #[error(transparent)]
    Detail(#[from] DetailError),
}

/// A completion after it was applied (or not) to its card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub mountain_id: String,
    pub band: Band,
    pub resolution: Resolution,
}

pub struct MountainCollection {
    cards: Vec<MountainCardController>,
    fetcher: Arc<dyn WeatherFetcher>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<WeatherServiceMessage>,
    rx: mpsc::UnboundedReceiver<WeatherServiceMessage>,
}

impl MountainCollection {
    pub fn new(fetcher: Arc<dyn WeatherFetcher>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            cards: Vec::new(),
            fetcher,
            runtime,
            tx,
            rx,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Tracked ids in display order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|c| c.mountain_id())
    }

    pub fn card(&self, mountain_id: &str) -> Option<&MountainCardController> {
        self.cards.iter().find(|c| c.mountain_id() == mountain_id)
    }

    /// Mount a card for `mountain` and start loading its base band.
    /// Tracking an id twice keeps the existing card.
    pub fn track(&mut self, mountain: Mountain) -> watch::Receiver<CardSnapshot> {
        if let Some(existing) = self.card(&mountain.id) {
            tracing::debug!("Mountain {} already tracked", mountain.id);
            return existing.subscribe();
        }

        tracing::info!("Tracking mountain {} ({})", mountain.name, mountain.id);
        let mut card = MountainCardController::new(mountain);
        let rx = card.subscribe();
        let request = card.mount();
        self.cards.push(card);
        self.dispatch(request);
        rx
    }

    /// Unmount a card. In-flight results for it are dropped on arrival.
    pub fn untrack(&mut self, mountain_id: &str) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.mountain_id() != mountain_id);
        let removed = self.cards.len() != before;
        if removed {
            tracing::info!("Untracked mountain {}", mountain_id);
        }
        removed
    }

    pub fn select_band(&mut self, mountain_id: &str, band: Band) -> Result<(), CollectionError> {
        let request = self.card_mut(mountain_id)?.select_band(band);
        self.dispatch(request);
        Ok(())
    }

    pub fn retry(&mut self, mountain_id: &str) -> Result<(), CollectionError> {
        let request = self
            .card_mut(mountain_id)?
            .retry()
            .ok_or_else(|| CollectionError::NothingToRetry(mountain_id.to_string()))?;
        self.dispatch(request);
        Ok(())
    }

    pub fn advanced_view(&self, mountain_id: &str) -> Result<AdvancedView, CollectionError> {
        let card = self
            .card(mountain_id)
            .ok_or_else(|| CollectionError::UnknownMountain(mountain_id.to_string()))?;
        Ok(card.advanced_view()?)
    }

    /// True while any card waits for its latest request.
    pub fn has_pending(&self) -> bool {
        self.cards
            .iter()
            .any(|c| matches!(c.state().status(), CardStatus::Loading))
    }

    /// Wait for the next completion and apply it to its card.
    pub async fn process_next(&mut self) -> Option<Completion> {
        let WeatherServiceMessage::FetchDone { request, result } = self.rx.recv().await?;
        Some(self.apply(request, result))
    }

    fn apply(
        &mut self,
        request: FetchRequest,
        result: Result<WeatherSeries, FetchError>,
    ) -> Completion {
        let card = self
            .cards
            .iter_mut()
            .find(|c| c.mountain_id() == request.mountain_id && c.instance() == request.instance);

        let resolution = match card {
            Some(card) => card.complete(request.token, result),
            None => {
                tracing::debug!(
                    "Dropping result for untracked mountain {}",
                    request.mountain_id
                );
                Resolution::Stale
            }
        };

        Completion {
            mountain_id: request.mountain_id,
            band: request.band,
            resolution,
        }
    }

    fn card_mut(&mut self, mountain_id: &str) -> Result<&mut MountainCardController, CollectionError> {
        self.cards
            .iter_mut()
            .find(|c| c.mountain_id() == mountain_id)
            .ok_or_else(|| CollectionError::UnknownMountain(mountain_id.to_string()))
    }

    fn dispatch(&self, request: FetchRequest) {
        request_weather_fetch(&self.runtime, &self.tx, self.fetcher.clone(), request);
    }
}
