pub mod eia;
pub mod series_source;

pub use eia::EiaClient;
pub use series_source::SeriesFetcher;
