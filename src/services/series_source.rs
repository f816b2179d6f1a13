//! Remote series source interface.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Region, SeriesName, SeriesTable};

/// Retrieves one raw series for one region. Implementations do no caching.
///
/// Fails with `Transport` when the source cannot be reached,
/// `MalformedResponse` when the payload cannot be decoded, and
/// `SeriesNotFound` when the source has no series under that identifier.
#[async_trait]
pub trait SeriesFetcher: Send + Sync {
    async fn fetch(&self, region: Region, series: SeriesName) -> Result<SeriesTable>;
}
