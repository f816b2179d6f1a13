//! Cache-backed access to remote series.

use std::sync::Arc;
use tracing::debug;

use super::SeriesCache;
use crate::error::{EnergyError, Result};
use crate::models::{GenerationSource, Region, SeriesName, SeriesTable};
use crate::services::series_source::SeriesFetcher;

/// Routes every series request through the shared cache.
#[derive(Clone)]
pub struct CachedSeriesProvider {
    cache: SeriesCache,
    fetcher: Arc<dyn SeriesFetcher>,
}

impl CachedSeriesProvider {
    pub fn new(cache: SeriesCache, fetcher: Arc<dyn SeriesFetcher>) -> Self {
        Self { cache, fetcher }
    }

    pub fn cache(&self) -> &SeriesCache {
        &self.cache
    }

    pub async fn series(&self, region: Region, series: SeriesName) -> Result<Arc<SeriesTable>> {
        let fetcher = Arc::clone(&self.fetcher);
        self.cache
            .get_or_fetch(region, series, move || async move {
                fetcher.fetch(region, series).await
            })
            .await
    }

    /// Net generation for one fuel or the total. A fuel the source has no
    /// series for in `region` resolves to an all-zero series over the
    /// total's periods, and that substitute is what gets cached.
    pub async fn generation_series(
        &self,
        region: Region,
        source: GenerationSource,
    ) -> Result<Arc<SeriesTable>> {
        let name = SeriesName::NetGeneration(source);
        let this = self.clone();
        self.cache
            .get_or_fetch(region, name, move || async move {
                match this.fetcher.fetch(region, name).await {
                    Err(EnergyError::SeriesNotFound { series_id })
                        if source != GenerationSource::Total =>
                    {
                        debug!(
                            series_id = %series_id,
                            "No generation series for fuel, substituting zeros"
                        );
                        let total = this
                            .series(region, SeriesName::NetGeneration(GenerationSource::Total))
                            .await?;
                        Ok(total.zeroed_as(name))
                    }
                    other => other,
                }
            })
            .await
    }
}
