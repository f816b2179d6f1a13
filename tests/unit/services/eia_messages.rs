//! Unit tests for EIA envelope decoding

use serde_json::json;
use statewatt::error::EnergyError;
use statewatt::models::{FuelCode, GenerationSource, Region, SeriesName};
use statewatt::services::eia::{decode_series, parse_date_code, parse_value};

fn ny() -> Region {
    Region::parse("NY").unwrap()
}

#[test]
fn test_parse_date_codes() {
    assert_eq!(parse_date_code("202103"), Some((2021, Some(3))));
    assert_eq!(parse_date_code("2019"), Some((2019, None)));
    assert_eq!(parse_date_code("202113"), None);
    assert_eq!(parse_date_code("202100"), None);
    assert_eq!(parse_date_code("2021-03"), None);
    assert_eq!(parse_date_code("20210"), None);
    assert_eq!(parse_date_code(""), None);
}

#[test]
fn test_parse_values() {
    assert_eq!(parse_value(&json!(12.5)), Some(12.5));
    assert_eq!(parse_value(&json!(7)), Some(7.0));
    assert_eq!(parse_value(&json!("3.25")), Some(3.25));
    assert_eq!(parse_value(&json!(null)), None);
    assert_eq!(parse_value(&json!("--")), None);
    assert_eq!(parse_value(&json!("NA")), None);
}

#[test]
fn test_decode_monthly_series_sorted_ascending() {
    let body = json!({
        "request": {"command": "series", "series_id": "ELEC.SALES.NY-ALL.M"},
        "series": [{
            "series_id": "ELEC.SALES.NY-ALL.M",
            "units": "million kilowatthours",
            "data": [["202102", 11800.5], ["202101", 12500.0], ["202012", null]]
        }]
    })
    .to_string();

    let table = decode_series(ny(), SeriesName::RetailSales, &body).unwrap();
    assert_eq!(table.units, "million kilowatthours");
    assert_eq!(table.len(), 3);
    assert_eq!(table.observations[0].period(), (2020, 12));
    assert_eq!(table.observations[0].value, None);
    assert_eq!(table.observations[2].year, 2021);
    assert_eq!(table.observations[2].month, Some(2));
    assert_eq!(table.observations[2].value, Some(11800.5));
}

#[test]
fn test_decode_annual_series() {
    let body = json!({
        "series": [{
            "units": "thousand",
            "data": [["2019", 19453.6], ["2018", "19530.4"]]
        }]
    })
    .to_string();

    let table = decode_series(ny(), SeriesName::Population, &body).unwrap();
    assert_eq!(table.observations[0].year, 2018);
    assert_eq!(table.observations[0].month, None);
    assert_eq!(table.observations[0].value, Some(19530.4));
}

#[test]
fn test_unknown_series_envelope_is_not_found() {
    let body = json!({
        "request": {"command": "series", "series_id": "ELEC.GEN.GEO-NY-99.M"},
        "data": {"error": "invalid series_id. For api version 1, series_id must be..."}
    })
    .to_string();

    let series = SeriesName::NetGeneration(GenerationSource::Fuel(FuelCode::Geothermal));
    assert_eq!(
        decode_series(ny(), series, &body),
        Err(EnergyError::SeriesNotFound {
            series_id: "ELEC.GEN.GEO-NY-99.M".to_string()
        })
    );
}

#[test]
fn test_empty_series_list_is_not_found() {
    let body = json!({"series": []}).to_string();
    assert!(matches!(
        decode_series(ny(), SeriesName::RetailSales, &body),
        Err(EnergyError::SeriesNotFound { .. })
    ));
}

#[test]
fn test_missing_payload_is_malformed() {
    let body = json!({"request": {"command": "series"}}).to_string();
    assert!(matches!(
        decode_series(ny(), SeriesName::RetailSales, &body),
        Err(EnergyError::MalformedResponse { .. })
    ));
}

#[test]
fn test_invalid_json_is_malformed() {
    assert!(matches!(
        decode_series(ny(), SeriesName::RetailSales, "<html>rate limited</html>"),
        Err(EnergyError::MalformedResponse { .. })
    ));
}

#[test]
fn test_bad_date_code_is_malformed() {
    let body = json!({"series": [{"units": "x", "data": [["2021Q1", 1.0]]}]}).to_string();
    match decode_series(ny(), SeriesName::RetailSales, &body) {
        Err(EnergyError::MalformedResponse { series_id, reason }) => {
            assert_eq!(series_id, "ELEC.SALES.NY-ALL.M");
            assert!(reason.contains("2021Q1"));
        }
        other => panic!("expected malformed response, got {:?}", other),
    }
}

#[test]
fn test_annual_codes_in_monthly_series_are_malformed() {
    let body = json!({
        "series": [{
            "units": "million kilowatthours",
            "data": [["2021", 1.0], ["2020", 2.0]]
        }]
    })
    .to_string();
    match decode_series(ny(), SeriesName::RetailSales, &body) {
        Err(EnergyError::MalformedResponse { reason, .. }) => {
            assert!(reason.contains("2021"));
            assert!(reason.contains("monthly"));
        }
        other => panic!("expected malformed response, got {:?}", other),
    }
}

#[test]
fn test_monthly_codes_in_annual_series_are_malformed() {
    let body = json!({
        "series": [{
            "units": "thousand",
            "data": [["202101", 1.0], ["202102", 2.0]]
        }]
    })
    .to_string();
    match decode_series(ny(), SeriesName::Population, &body) {
        Err(EnergyError::MalformedResponse { series_id, reason }) => {
            assert_eq!(series_id, "SEDS.TPOPP.NY.A");
            assert!(reason.contains("annual"));
        }
        other => panic!("expected malformed response, got {:?}", other),
    }
}

#[test]
fn test_mixed_granularity_is_malformed() {
    let body = json!({
        "series": [{"units": "x", "data": [["202102", 1.0], ["2021", 12.0]]}]
    })
    .to_string();
    let series = SeriesName::NetGeneration(GenerationSource::Total);
    assert!(matches!(
        decode_series(ny(), series, &body),
        Err(EnergyError::MalformedResponse { .. })
    ));
}
