//! Raw per-region time series as delivered by the remote source.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::fuel::FuelCode;
use super::region::Region;

/// Fuel selector for net-generation series. `Total` is the synthetic
/// all-fuels series every generation-mix query divides by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationSource {
    Fuel(FuelCode),
    Total,
}

impl GenerationSource {
    pub fn code(&self) -> &'static str {
        match self {
            GenerationSource::Fuel(fuel) => fuel.code(),
            GenerationSource::Total => "ALL",
        }
    }
}

/// One named series available for every region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesName {
    /// Monthly retail electricity sales, million kWh
    RetailSales,
    /// Monthly net generation, thousand MWh
    NetGeneration(GenerationSource),
    /// Annual resident population, thousands
    Population,
    /// Annual real GDP, million chained dollars
    RealGdp,
    /// Annual total energy consumption, billion Btu
    TotalConsumption,
}

impl SeriesName {
    /// Remote identifier of this series for `region`.
    pub fn series_id(&self, region: Region) -> String {
        match self {
            SeriesName::RetailSales => format!("ELEC.SALES.{region}-ALL.M"),
            SeriesName::NetGeneration(source) => {
                format!("ELEC.GEN.{}-{region}-99.M", source.code())
            }
            SeriesName::Population => format!("SEDS.TPOPP.{region}.A"),
            SeriesName::RealGdp => format!("SEDS.GDPRX.{region}.A"),
            SeriesName::TotalConsumption => format!("SEDS.TETCB.{region}.A"),
        }
    }

    pub fn granularity(&self) -> Granularity {
        match self {
            SeriesName::RetailSales | SeriesName::NetGeneration(_) => Granularity::Monthly,
            SeriesName::Population | SeriesName::RealGdp | SeriesName::TotalConsumption => {
                Granularity::Annual
            }
        }
    }
}

impl fmt::Display for SeriesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesName::RetailSales => f.write_str("retail_sales"),
            SeriesName::NetGeneration(source) => write!(f, "net_generation/{}", source.code()),
            SeriesName::Population => f.write_str("population"),
            SeriesName::RealGdp => f.write_str("real_gdp"),
            SeriesName::TotalConsumption => f.write_str("total_consumption"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Monthly,
    Annual,
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Monthly => f.write_str("monthly"),
            Granularity::Annual => f.write_str("annual"),
        }
    }
}

/// One point of a raw series. `value` is `None` where the source reports
/// no value for the period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    pub value: Option<f64>,
}

impl RawObservation {
    pub fn monthly(year: i32, month: u32, value: Option<f64>) -> Self {
        Self {
            year,
            month: Some(month),
            value,
        }
    }

    pub fn annual(year: i32, value: Option<f64>) -> Self {
        Self {
            year,
            month: None,
            value,
        }
    }

    /// Sort key; annual points sort before any month of the same year.
    pub fn period(&self) -> (i32, u32) {
        (self.year, self.month.unwrap_or(0))
    }
}

/// A fetched series: the unit stored by the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesTable {
    pub region: Region,
    pub series: SeriesName,
    pub units: String,
    /// Ascending by (year, month)
    pub observations: Vec<RawObservation>,
}

impl SeriesTable {
    pub fn new(
        region: Region,
        series: SeriesName,
        units: impl Into<String>,
        mut observations: Vec<RawObservation>,
    ) -> Self {
        observations.sort_by_key(|o| o.period());
        Self {
            region,
            series,
            units: units.into(),
            observations,
        }
    }

    /// Same periods as `self`, every value replaced by zero.
    pub fn zeroed_as(&self, series: SeriesName) -> Self {
        Self {
            region: self.region,
            series,
            units: self.units.clone(),
            observations: self
                .observations
                .iter()
                .map(|o| RawObservation {
                    value: Some(0.0),
                    ..*o
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
