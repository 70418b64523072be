//! HTTP client for the catalog/weather API.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use crate::error::FetchError;
use crate::types::{Band, Mountain, WeatherSample, WeatherSeries};

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// One retrieval per (mountain, band) pair.
///
/// Implementations never retry internally and never reorder samples.
#[async_trait]
pub trait WeatherFetcher: Send + Sync {
    async fn fetch(&self, mountain_id: &str, band: Band) -> Result<WeatherSeries, FetchError>;
}

#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpWeatherClient {
    /// Create a client with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client with the default timeout.
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        Self::new(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// `GET /weather/{mountain_id}?band=...`
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_weather(
        &self,
        mountain_id: &str,
        band: Band,
    ) -> Result<WeatherSeries, FetchError> {
        let url = format!("{}/weather/{}", self.base_url, mountain_id);

        let response = self
            .client
            .get(&url)
            .query(&[("band", band.as_str())])
            .send()
            .await?;

        let samples: Vec<WeatherSample> = self.handle_response(response).await?;
        let series = WeatherSeries::new(samples)?;

        tracing::debug!("Fetched {} samples for {} at {}", series.len(), mountain_id, band);
        Ok(series)
    }

    /// `GET /catalog/peaks/{mountain_id}`
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_mountain(&self, mountain_id: &str) -> Result<Mountain, FetchError> {
        let url = format!("{}/catalog/peaks/{}", self.base_url, mountain_id);

        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    /// `GET /my/mountains`: ids of the tracked mountains, in display order.
    #[instrument(skip(self), level = "info")]
    pub async fn list_my_mountains(&self) -> Result<Vec<String>, FetchError> {
        let url = format!("{}/my/mountains", self.base_url);

        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, FetchError> {
        let status = response.status();

        if status.is_success() {
            let bytes = response.bytes().await?;
            serde_json::from_slice(&bytes)
                .map_err(|e| FetchError::InvalidResponse(format!("JSON parse error: {}", e)))
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Request failed with status {}", status);
            Err(FetchError::Server {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl WeatherFetcher for HttpWeatherClient {
    async fn fetch(&self, mountain_id: &str, band: Band) -> Result<WeatherSeries, FetchError> {
        self.fetch_weather(mountain_id, band).await
    }
}
