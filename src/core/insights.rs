//! Query entry points for the presentation layer.
//!
//! Every call is a function of the cache contents and its arguments. Fetch
//! failures (`Transport`, `MalformedResponse`) abort the call; data gaps are
//! carried inside the returned tables.

use futures_util::future::try_join_all;
use std::sync::Arc;

use crate::aggregators::{consumption_history, generation_mix, intensity_history};
use crate::cache::{CachedSeriesProvider, SeriesCache};
use crate::config::InsightsConfig;
use crate::error::Result;
use crate::metrics::Metrics;
use crate::models::{
    FuelCode, FuelInfo, GenerationMixTable, IntensityTable, Region, SeasonalBandRow,
};
use crate::services::{EiaClient, SeriesFetcher};

#[derive(Clone)]
pub struct EnergyInsights {
    provider: CachedSeriesProvider,
}

impl EnergyInsights {
    pub fn new(fetcher: Arc<dyn SeriesFetcher>, cache: SeriesCache) -> Self {
        Self {
            provider: CachedSeriesProvider::new(cache, fetcher),
        }
    }

    /// EIA-backed instance with a cache bounded per `config`.
    pub fn from_config(config: &InsightsConfig, metrics: Option<Arc<Metrics>>) -> Result<Self> {
        let fetcher: Arc<dyn SeriesFetcher> = Arc::new(EiaClient::new(config)?);
        let cache = match metrics {
            Some(metrics) => SeriesCache::with_metrics(config.cache.clone(), metrics),
            None => SeriesCache::new(config.cache.clone()),
        };
        Ok(Self::new(fetcher, cache))
    }

    pub fn cache(&self) -> &SeriesCache {
        self.provider.cache()
    }

    pub fn regions(&self) -> Vec<Region> {
        Region::all().collect()
    }

    pub fn fuels(&self) -> Vec<FuelInfo> {
        FuelCode::ALL.iter().copied().map(FuelInfo::from).collect()
    }

    /// Seasonal bands over full history, rows limited to [start, end].
    pub async fn consumption_bands(
        &self,
        region: Region,
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<SeasonalBandRow>> {
        let mut rows: Vec<SeasonalBandRow> = consumption_history(&self.provider, region)
            .await?
            .into_iter()
            .filter(|r| r.year >= start_year && r.year <= end_year)
            .collect();
        rows.sort_by_key(|r| (r.year, r.month));
        Ok(rows)
    }

    /// Variance-ordered cumulative shares; the window also bounds the
    /// variance computation.
    pub async fn generation_mix(
        &self,
        region: Region,
        fuels: &[FuelCode],
        start_year: i32,
        end_year: i32,
    ) -> Result<GenerationMixTable> {
        generation_mix(&self.provider, region, fuels, start_year, end_year).await
    }

    pub async fn intensity(
        &self,
        region: Region,
        start_year: i32,
        end_year: i32,
    ) -> Result<IntensityTable> {
        let mut table = intensity_history(&self.provider, region).await?;
        table
            .rows
            .retain(|r| r.year >= start_year && r.year <= end_year);
        Ok(table)
    }

    /// `intensity` for several regions at once, in request order.
    pub async fn intensity_many(
        &self,
        regions: &[Region],
        start_year: i32,
        end_year: i32,
    ) -> Result<Vec<IntensityTable>> {
        try_join_all(
            regions
                .iter()
                .map(|region| self.intensity(*region, start_year, end_year)),
        )
        .await
    }
}
