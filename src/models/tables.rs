//! Derived, analysis-ready tables returned by the query layer.

use serde::{Serialize, Serializer};

use super::fuel::FuelCode;
use super::region::Region;

/// One observed month of retail sales with that calendar month's
/// historical band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalBandRow {
    pub year: i32,
    pub month: u32,
    /// Retail sales in TWh; `None` when the source has no value
    pub twh: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
    /// `MM/YYYY`
    pub label: String,
}

/// Cumulative share cell. Gaps stay explicit and are never summed as zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShareValue {
    Value(f64),
    /// An input value was absent at this period
    Missing,
    /// The total was zero or absent, so the ratio has no value
    Undefined,
}

impl ShareValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            ShareValue::Value(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, ShareValue::Value(_))
    }

    /// `numerator / denominator`, classifying gaps.
    pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Self {
        match (numerator, denominator) {
            (_, None) => ShareValue::Undefined,
            (None, Some(_)) => ShareValue::Missing,
            (Some(n), Some(d)) => {
                let r = n / d;
                if d == 0.0 || !r.is_finite() {
                    ShareValue::Undefined
                } else {
                    ShareValue::Value(r)
                }
            }
        }
    }

    /// Running sum; `Undefined` dominates `Missing`, which dominates values.
    pub fn accumulate(self, next: ShareValue) -> ShareValue {
        match (self, next) {
            (ShareValue::Undefined, _) | (_, ShareValue::Undefined) => ShareValue::Undefined,
            (ShareValue::Missing, _) | (_, ShareValue::Missing) => ShareValue::Missing,
            (ShareValue::Value(a), ShareValue::Value(b)) => ShareValue::Value(a + b),
        }
    }
}

impl Serialize for ShareValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ShareValue::Value(v) => serializer.serialize_f64(*v),
            ShareValue::Missing => serializer.serialize_str("missing"),
            ShareValue::Undefined => serializer.serialize_str("undefined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelVariance {
    pub fuel: FuelCode,
    pub name: &'static str,
    /// Sample variance over the requested window; `None` below two values
    pub variance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelShareRow {
    pub year: i32,
    pub month: u32,
    /// Aligned with `GenerationMixTable::fuel_order`
    pub cumulative: Vec<ShareValue>,
    /// `M/YYYY`
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationMixTable {
    pub region: Region,
    pub start_year: i32,
    pub end_year: i32,
    /// Requested fuels by ascending variance
    pub fuel_order: Vec<FuelVariance>,
    pub rows: Vec<FuelShareRow>,
}

impl GenerationMixTable {
    pub fn fuels(&self) -> Vec<FuelCode> {
        self.fuel_order.iter().map(|f| f.fuel).collect()
    }

    /// Cumulative column for `fuel`, in row order.
    pub fn column(&self, fuel: FuelCode) -> Option<Vec<ShareValue>> {
        let idx = self.fuel_order.iter().position(|f| f.fuel == fuel)?;
        Some(self.rows.iter().map(|r| r.cumulative[idx]).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityRow {
    pub year: i32,
    pub population: Option<f64>,
    pub real_gdp: Option<f64>,
    pub total_consumption: Option<f64>,
    pub per_capita: Option<f64>,
    pub per_gdp: Option<f64>,
}

impl IntensityRow {
    pub fn is_complete(&self) -> bool {
        self.population.is_some() && self.real_gdp.is_some() && self.total_consumption.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityTable {
    pub region: Region,
    pub population_units: String,
    pub real_gdp_units: String,
    pub consumption_units: String,
    /// Ascending by year
    pub rows: Vec<IntensityRow>,
}
