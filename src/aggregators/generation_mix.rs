//! Variance-ordered cumulative fuel shares of net generation.
//!
//! Fuel series are windowed by year, outer-joined on (year, month) with the
//! total, ordered by ascending variance over the window and stacked as
//! running sums of their fraction of the total. The least variable fuel
//! forms the base of the stack.

use futures_util::future::try_join_all;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::cache::CachedSeriesProvider;
use crate::common::math;
use crate::error::Result;
use crate::models::{
    FuelCode, FuelShareRow, FuelVariance, GenerationMixTable, GenerationSource, Region,
    SeriesTable, ShareValue,
};

type Period = (i32, u32);

/// Monthly values of one series inside [start, end], keyed by period.
fn windowed(table: &SeriesTable, start: i32, end: i32) -> HashMap<Period, Option<f64>> {
    table
        .observations
        .iter()
        .filter(|o| o.year >= start && o.year <= end)
        .filter_map(|o| Some(((o.year, o.month?), o.value)))
        .collect()
}

/// Ascending by variance; undefined variances last. Stable, so ties keep
/// their input order.
pub fn variance_order(variances: &[Option<f64>]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..variances.len()).collect();
    order.sort_by(|&a, &b| match (variances[a], variances[b]) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    order
}

/// Build the cumulative share table from already fetched series.
/// `fuels` must be deduplicated and in caller order.
pub fn cumulative_shares(
    region: Region,
    fuels: &[(FuelCode, &SeriesTable)],
    total: &SeriesTable,
    start_year: i32,
    end_year: i32,
) -> GenerationMixTable {
    let fuel_values: Vec<HashMap<Period, Option<f64>>> = fuels
        .iter()
        .map(|(_, table)| windowed(table, start_year, end_year))
        .collect();
    let total_values = windowed(total, start_year, end_year);

    let periods: BTreeSet<Period> = fuel_values
        .iter()
        .chain(std::iter::once(&total_values))
        .flat_map(|values| values.keys().copied())
        .collect();

    let variances: Vec<Option<f64>> = fuel_values
        .iter()
        .map(|values| {
            let present: Vec<f64> = values.values().filter_map(|v| *v).collect();
            math::sample_variance(&present)
        })
        .collect();
    let order = variance_order(&variances);

    let fuel_order: Vec<FuelVariance> = order
        .iter()
        .map(|&i| FuelVariance {
            fuel: fuels[i].0,
            name: fuels[i].0.display_name(),
            variance: variances[i],
        })
        .collect();

    let rows = periods
        .iter()
        .map(|&(year, month)| {
            let total = total_values.get(&(year, month)).copied().flatten();
            let mut running = ShareValue::Value(0.0);
            let cumulative = order
                .iter()
                .map(|&i| {
                    let value = fuel_values[i].get(&(year, month)).copied().flatten();
                    running = running.accumulate(ShareValue::ratio(value, total));
                    running
                })
                .collect();
            FuelShareRow {
                year,
                month,
                cumulative,
                label: format!("{}/{}", month, year),
            }
        })
        .collect();

    GenerationMixTable {
        region,
        start_year,
        end_year,
        fuel_order,
        rows,
    }
}

/// Fetch (through the cache) and stack `fuels` plus the total for `region`.
pub async fn generation_mix(
    provider: &CachedSeriesProvider,
    region: Region,
    fuels: &[FuelCode],
    start_year: i32,
    end_year: i32,
) -> Result<GenerationMixTable> {
    let fuels = FuelCode::dedup(fuels);

    let fuel_fetches = fuels
        .iter()
        .map(|fuel| provider.generation_series(region, GenerationSource::Fuel(*fuel)));
    let (total, fuel_tables) = tokio::try_join!(
        provider.generation_series(region, GenerationSource::Total),
        try_join_all(fuel_fetches),
    )?;

    let inputs: Vec<(FuelCode, &SeriesTable)> = fuels
        .iter()
        .copied()
        .zip(fuel_tables.iter().map(|t| t.as_ref()))
        .collect();
    let table = cumulative_shares(region, &inputs, &total, start_year, end_year);

    debug!(
        region = %region,
        start_year,
        end_year,
        rows = table.rows.len(),
        order = ?table.fuels(),
        "Built generation mix table"
    );
    Ok(table)
}
