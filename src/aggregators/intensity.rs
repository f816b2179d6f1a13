//! Energy intensity per capita and per real GDP dollar.

use std::collections::BTreeMap;
use tracing::debug;

use crate::cache::CachedSeriesProvider;
use crate::error::Result;
use crate::models::{IntensityRow, IntensityTable, Region, SeriesName, SeriesTable};

fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let r = numerator? / denominator?;
    r.is_finite().then_some(r)
}

/// Outer-join the three annual series on year. Years missing an input
/// keep their row with the affected ratio left empty.
pub fn intensity_table(
    region: Region,
    population: &SeriesTable,
    real_gdp: &SeriesTable,
    consumption: &SeriesTable,
) -> IntensityTable {
    let mut years: BTreeMap<i32, [Option<f64>; 3]> = BTreeMap::new();
    for (idx, table) in [population, real_gdp, consumption].into_iter().enumerate() {
        for obs in &table.observations {
            years.entry(obs.year).or_insert([None; 3])[idx] = obs.value;
        }
    }

    let rows = years
        .into_iter()
        .map(|(year, [population, real_gdp, total_consumption])| IntensityRow {
            year,
            population,
            real_gdp,
            total_consumption,
            per_capita: ratio(total_consumption, population),
            per_gdp: ratio(total_consumption, real_gdp),
        })
        .collect();

    IntensityTable {
        region,
        population_units: population.units.clone(),
        real_gdp_units: real_gdp.units.clone(),
        consumption_units: consumption.units.clone(),
        rows,
    }
}

/// Full annual history for `region`.
pub async fn intensity_history(
    provider: &CachedSeriesProvider,
    region: Region,
) -> Result<IntensityTable> {
    let (population, real_gdp, consumption) = tokio::try_join!(
        provider.series(region, SeriesName::Population),
        provider.series(region, SeriesName::RealGdp),
        provider.series(region, SeriesName::TotalConsumption),
    )?;

    let table = intensity_table(region, &population, &real_gdp, &consumption);
    debug!(region = %region, rows = table.rows.len(), "Built intensity table");
    Ok(table)
}
