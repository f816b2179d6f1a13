//! Shared data models spanning the fetch, cache and query layers.

pub mod fuel;
pub mod region;
pub mod series;
pub mod tables;

pub use fuel::{FuelCode, FuelInfo};
pub use region::Region;
pub use series::{GenerationSource, Granularity, RawObservation, SeriesName, SeriesTable};
pub use tables::{
    FuelShareRow, FuelVariance, GenerationMixTable, IntensityRow, IntensityTable,
    SeasonalBandRow, ShareValue,
};
