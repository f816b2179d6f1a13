//! HTTP client for the EIA series API.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::messages::decode_series;
use crate::config::InsightsConfig;
use crate::error::{EnergyError, Result};
use crate::models::{Region, SeriesName, SeriesTable};
use crate::services::series_source::SeriesFetcher;

const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(250);

pub struct EiaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    max_retries: usize,
    retry_delay: Duration,
}

struct AttemptError {
    retryable: bool,
    error: EnergyError,
}

impl EiaClient {
    pub fn new(config: &InsightsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| EnergyError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(
            config.api_base_url.clone(),
            config.api_key.clone(),
            http,
        )
        .with_max_retries(config.fetch_max_retries))
    }

    pub fn with_client(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
            max_retries: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn request_url(&self, series_id: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/series/", self.base_url.trim_end_matches('/')))
            .map_err(|e| EnergyError::Config(format!("invalid EIA base URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("series_id", series_id);
        Ok(url)
    }

    async fn get_body(
        &self,
        url: &Url,
        series_id: &str,
    ) -> std::result::Result<String, AttemptError> {
        let response = self.http.get(url.clone()).send().await.map_err(|e| AttemptError {
            retryable: true,
            error: EnergyError::transport(series_id, e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AttemptError {
                retryable: status.is_server_error(),
                error: EnergyError::transport(series_id, format!("HTTP {status}")),
            });
        }

        response.text().await.map_err(|e| AttemptError {
            retryable: true,
            error: EnergyError::transport(series_id, e),
        })
    }
}

#[async_trait]
impl SeriesFetcher for EiaClient {
    async fn fetch(&self, region: Region, series: SeriesName) -> Result<SeriesTable> {
        let series_id = series.series_id(region);
        let url = self.request_url(&series_id)?;

        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.retry_delay)
            .with_max_times(self.max_retries);

        let body = (|| async { self.get_body(&url, &series_id).await })
            .retry(backoff)
            .when(|e: &AttemptError| e.retryable)
            .notify(|e: &AttemptError, after: Duration| {
                warn!(
                    series_id = %series_id,
                    error = %e.error,
                    retry_in_ms = after.as_millis() as u64,
                    "EIA request failed, retrying"
                );
            })
            .await
            .map_err(|e| e.error)?;

        let table = decode_series(region, series, &body)?;
        debug!(
            series_id = %series_id,
            observations = table.len(),
            units = %table.units,
            "Fetched series"
        );
        Ok(table)
    }
}
