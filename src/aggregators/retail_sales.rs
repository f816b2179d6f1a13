//! Seasonal consumption bands from monthly retail electricity sales.
//!
//! Each calendar month gets the min, Q1, Q3 and max of its TWh values across
//! every observed year; every historical (year, month) row then carries its
//! month's band. Bands always come from the full history, windowing is left
//! to the caller.

use tracing::debug;

use crate::cache::CachedSeriesProvider;
use crate::common::math;
use crate::error::Result;
use crate::models::{Region, SeasonalBandRow, SeriesName, SeriesTable};

/// Retail sales arrive in million kWh (GWh).
pub const GWH_PER_TWH: f64 = 1_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthBand {
    pub min: f64,
    pub q1: f64,
    pub q3: f64,
    pub max: f64,
}

/// Band for one calendar month, `None` when the month has no values.
pub fn month_band(values: &[f64]) -> Option<MonthBand> {
    let sorted = math::sorted_finite(values.iter().copied());
    Some(MonthBand {
        min: *sorted.first()?,
        q1: math::quantile(&sorted, 0.25)?,
        q3: math::quantile(&sorted, 0.75)?,
        max: *sorted.last()?,
    })
}

fn month_index(month: u32) -> Option<usize> {
    (1..=12).contains(&month).then(|| (month - 1) as usize)
}

/// Bands indexed by month - 1.
pub fn monthly_bands(table: &SeriesTable) -> [Option<MonthBand>; 12] {
    let mut by_month: [Vec<f64>; 12] = Default::default();
    for obs in &table.observations {
        if let (Some(idx), Some(value)) = (obs.month.and_then(month_index), obs.value) {
            by_month[idx].push(value / GWH_PER_TWH);
        }
    }

    let mut bands = [None; 12];
    for (slot, values) in bands.iter_mut().zip(by_month.iter()) {
        *slot = month_band(values);
    }
    bands
}

/// One row per monthly observation, ascending by (year, month).
pub fn seasonal_bands(table: &SeriesTable) -> Vec<SeasonalBandRow> {
    let bands = monthly_bands(table);

    table
        .observations
        .iter()
        .filter_map(|obs| {
            let month = obs.month?;
            let band = bands[month_index(month)?];
            Some(SeasonalBandRow {
                year: obs.year,
                month,
                twh: obs.value.map(|v| v / GWH_PER_TWH),
                min: band.map(|b| b.min),
                q1: band.map(|b| b.q1),
                q3: band.map(|b| b.q3),
                max: band.map(|b| b.max),
                label: format!("{:02}/{}", month, obs.year),
            })
        })
        .collect()
}

/// Full-history band table for `region`.
pub async fn consumption_history(
    provider: &CachedSeriesProvider,
    region: Region,
) -> Result<Vec<SeasonalBandRow>> {
    let table = provider.series(region, SeriesName::RetailSales).await?;
    let rows = seasonal_bands(&table);
    debug!(region = %region, rows = rows.len(), "Built seasonal band table");
    Ok(rows)
}
