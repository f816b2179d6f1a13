//! Unit tests for seasonal consumption bands

use statewatt::aggregators::retail_sales::{monthly_bands, GWH_PER_TWH};
use statewatt::aggregators::{month_band, seasonal_bands};
use statewatt::models::{RawObservation, SeriesName, SeriesTable};

use crate::test_utils::{monthly_table, region, seasonal_sales};

#[test]
fn test_band_statistics_for_one_month() {
    let band = month_band(&[5.0, 1.0, 3.0, 2.0, 4.0]).unwrap();
    assert_eq!(band.min, 1.0);
    assert_eq!(band.q1, 2.0);
    assert_eq!(band.q3, 4.0);
    assert_eq!(band.max, 5.0);
    assert!(month_band(&[]).is_none());
}

#[test]
fn test_bands_are_ordered_for_every_month() {
    let table = monthly_table(region("MO"), SeriesName::RetailSales, 2001..=2021, seasonal_sales);
    let bands = monthly_bands(&table);

    for (idx, band) in bands.iter().enumerate() {
        let band = band.unwrap_or_else(|| panic!("month {} has no band", idx + 1));
        assert!(band.min <= band.q1, "month {}", idx + 1);
        assert!(band.q1 <= band.q3, "month {}", idx + 1);
        assert!(band.q3 <= band.max, "month {}", idx + 1);
    }
}

#[test]
fn test_rows_carry_full_history_band_and_twh() {
    let table = monthly_table(region("MO"), SeriesName::RetailSales, 2001..=2021, seasonal_sales);
    let rows = seasonal_bands(&table);

    assert_eq!(rows.len(), 21 * 12);
    let july_2001 = rows.iter().find(|r| r.year == 2001 && r.month == 7).unwrap();
    let july_2021 = rows.iter().find(|r| r.year == 2021 && r.month == 7).unwrap();
    assert_eq!(july_2001.min, july_2021.min);
    assert_eq!(july_2001.max, july_2021.max);
    // the trend makes the first July the lowest and the last the highest
    assert_eq!(july_2001.twh, july_2001.min);
    assert_eq!(july_2021.twh, july_2021.max);
    assert_eq!(
        july_2001.twh,
        seasonal_sales(2001, 7).map(|gwh| gwh / GWH_PER_TWH)
    );
    assert_eq!(july_2001.label, "07/2001");
}

#[test]
fn test_single_year_history_gives_degenerate_bands() {
    let table = monthly_table(region("DC"), SeriesName::RetailSales, 2021..=2021, seasonal_sales);
    let rows = seasonal_bands(&table);

    assert_eq!(rows.len(), 12);
    for row in rows {
        assert_eq!(row.min, row.twh);
        assert_eq!(row.q1, row.twh);
        assert_eq!(row.q3, row.twh);
        assert_eq!(row.max, row.twh);
    }
}

#[test]
fn test_missing_value_keeps_row_but_not_band_input() {
    let table = SeriesTable::new(
        region("VT"),
        SeriesName::RetailSales,
        "million kilowatthours",
        vec![
            RawObservation::monthly(2019, 1, Some(1_000.0)),
            RawObservation::monthly(2020, 1, None),
            RawObservation::monthly(2021, 1, Some(3_000.0)),
        ],
    );
    let rows = seasonal_bands(&table);

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1].twh, None);
    assert_eq!(rows[1].min, Some(1.0));
    assert_eq!(rows[1].max, Some(3.0));
    assert_eq!(rows[1].q1, Some(1.5));
    assert_eq!(rows[1].q3, Some(2.5));
}
