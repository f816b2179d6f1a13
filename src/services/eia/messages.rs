//! EIA series API response envelope and its decoding into `SeriesTable`.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{EnergyError, Result};
use crate::models::{Granularity, RawObservation, Region, SeriesName, SeriesTable};

#[derive(Debug, Deserialize)]
pub struct SeriesEnvelope {
    #[serde(default)]
    pub series: Option<Vec<SeriesPayload>>,
    /// Present instead of `series` when the identifier is unknown
    #[serde(default)]
    pub data: Option<ErrorPayload>,
}

#[derive(Debug, Deserialize)]
pub struct SeriesPayload {
    #[serde(default)]
    pub series_id: Option<String>,
    #[serde(default)]
    pub units: Option<String>,
    pub data: Vec<(Value, Value)>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub error: Option<String>,
}

/// Decode a response body for `series` in `region`.
pub fn decode_series(region: Region, series: SeriesName, body: &str) -> Result<SeriesTable> {
    let series_id = series.series_id(region);
    let envelope: SeriesEnvelope =
        serde_json::from_str(body).map_err(|e| EnergyError::malformed(&series_id, e))?;

    let payload = match envelope.series {
        Some(list) => match list.into_iter().next() {
            Some(payload) => payload,
            None => return Err(EnergyError::SeriesNotFound { series_id }),
        },
        None => {
            return match envelope.data.and_then(|d| d.error) {
                Some(_) => Err(EnergyError::SeriesNotFound { series_id }),
                None => Err(EnergyError::malformed(&series_id, "response has no series payload")),
            };
        }
    };

    let granularity = series.granularity();
    let observations = payload
        .data
        .iter()
        .map(|(date, value)| {
            let (year, month) = parse_date_value(date).ok_or_else(|| {
                EnergyError::malformed(&series_id, format!("bad date code {date}"))
            })?;
            if date_granularity(month) != granularity {
                return Err(EnergyError::malformed(
                    &series_id,
                    format!("date code {date} is not {granularity}"),
                ));
            }
            Ok(RawObservation {
                year,
                month,
                value: parse_value(value),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(SeriesTable::new(
        region,
        series,
        payload.units.unwrap_or_default(),
        observations,
    ))
}

fn date_granularity(month: Option<u32>) -> Granularity {
    match month {
        Some(_) => Granularity::Monthly,
        None => Granularity::Annual,
    }
}

fn parse_date_value(value: &Value) -> Option<(i32, Option<u32>)> {
    match value {
        Value::String(code) => parse_date_code(code),
        Value::Number(n) => parse_date_code(&n.to_string()),
        _ => None,
    }
}

/// `YYYYMM` -> (year, Some(month)), `YYYY` -> (year, None).
pub fn parse_date_code(code: &str) -> Option<(i32, Option<u32>)> {
    let code = code.trim();
    if !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match code.len() {
        4 => Some((code.parse().ok()?, None)),
        6 => {
            let year = code[..4].parse().ok()?;
            let month: u32 = code[4..].parse().ok()?;
            (1..=12).contains(&month).then_some((year, Some(month)))
        }
        _ => None,
    }
}

/// Numeric value or the absent-marker. The source uses `null` and
/// placeholder strings such as `"--"` or `"NA"` for missing points.
pub fn parse_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}
