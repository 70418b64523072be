//! Weather backend: async weather fetching.
//! Network work is spawned on the runtime; results come back via mpsc.

use std::sync::Arc;

use peakcast_weather::{FetchError, WeatherFetcher, WeatherSeries};
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;

use crate::controller::FetchRequest;

/// Messages sent from async operations back to the owning collection
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Result of one (mountain, band) retrieval
    FetchDone {
        request: FetchRequest,
        result: Result<WeatherSeries, FetchError>,
    },
}

/// Execute `request` asynchronously.
/// Sends `FetchDone` on the channel when complete; never retries.
pub fn request_fetch(
    runtime: &Handle,
    tx: &UnboundedSender<WeatherServiceMessage>,
    fetcher: Arc<dyn WeatherFetcher>,
    request: FetchRequest,
) {
    let tx = tx.clone();

    runtime.spawn(async move {
        let result = fetcher.fetch(&request.mountain_id, request.band).await;
        if let Err(e) = &result {
            tracing::debug!(
                "Fetch for {} at {} failed (retryable: {}): {}",
                request.mountain_id,
                request.band,
                e.is_retryable(),
                e
            );
        }
        if tx.send(WeatherServiceMessage::FetchDone { request, result }).is_err() {
            tracing::debug!("Weather result dropped: collection is gone");
        }
    });
}
