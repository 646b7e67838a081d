use crate::types::observation::Observation;
use crate::weather_data::error::WeatherDataError;
use chrono::{DateTime, FixedOffset};
use serde_json::{Map, Value};

const KEY_STATION: &str = "nombre";
const KEY_DATETIME: &str = "fhora";
const KEY_TEMPERATURE: &str = "temp";
const KEY_PRESSURE: &str = "pres";
const KEY_SPEED: &str = "vel";

/// Timestamps are reported with a numeric offset without colon, e.g. `2023-01-07T00:00:00+0000`.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Maps the raw data response into observations, preserving input order.
///
/// Absent or `null` fields become `None`. A record that is not an object, a
/// numeric field holding something other than a number (or numeric string), or
/// an unparsable timestamp aborts the whole conversion.
///
/// # Examples
///
/// ```
/// use aemet::normalize_observations;
/// use serde_json::json;
///
/// let raw = json!([
///     {"nombre": "GdC Estacion meteorologica", "fhora": "2023-01-07T00:00:00+0000", "temp": 4.7},
///     {"nombre": "GdC Estacion meteorologica", "fhora": "2023-01-07T00:10:00+0000", "pres": 987.6},
/// ]);
/// let observations = normalize_observations(&raw).unwrap();
/// assert_eq!(observations.len(), 2);
/// assert_eq!(observations[0].temperature, Some(4.7));
/// assert_eq!(observations[0].pressure, None);
/// ```
pub fn normalize_observations(
    raw: &Value,
) -> Result<Vec<Observation<FixedOffset>>, WeatherDataError> {
    let records = raw.as_array().ok_or_else(|| {
        WeatherDataError::DataProcessing(format!(
            "expected a JSON array of observations, got {}",
            json_type(raw)
        ))
    })?;

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let record = record.as_object().ok_or_else(|| {
                WeatherDataError::DataProcessing(format!(
                    "record {} is {}, expected an object",
                    index,
                    json_type(record)
                ))
            })?;
            normalize_record(index, record)
        })
        .collect()
}

fn normalize_record(
    index: usize,
    record: &Map<String, Value>,
) -> Result<Observation<FixedOffset>, WeatherDataError> {
    Ok(Observation {
        station: get_opt_string(record, KEY_STATION),
        datetime: get_opt_datetime(index, record)?,
        temperature: get_opt_float(index, record, KEY_TEMPERATURE)?,
        pressure: get_opt_float(index, record, KEY_PRESSURE)?,
        speed: get_opt_float(index, record, KEY_SPEED)?,
    })
}

fn get_opt_string(record: &Map<String, Value>, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn get_opt_float(
    index: usize,
    record: &Map<String, Value>,
    key: &str,
) -> Result<Option<f64>, WeatherDataError> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| {
            WeatherDataError::DataProcessing(format!(
                "record {}: '{}' is not numeric ({:?})",
                index, key, s
            ))
        }),
        Some(other) => Err(WeatherDataError::DataProcessing(format!(
            "record {}: '{}' is {}, expected a number",
            index,
            key,
            json_type(other)
        ))),
    }
}

fn get_opt_datetime(
    index: usize,
    record: &Map<String, Value>,
) -> Result<Option<DateTime<FixedOffset>>, WeatherDataError> {
    match record.get(KEY_DATETIME) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_str(s, DATETIME_FORMAT)
            .map(Some)
            .map_err(|e| {
                WeatherDataError::DataProcessing(format!(
                    "record {}: cannot parse '{}' as {}: {}",
                    index, s, DATETIME_FORMAT, e
                ))
            }),
        Some(other) => Err(WeatherDataError::DataProcessing(format!(
            "record {}: '{}' is {}, expected a string",
            index,
            KEY_DATETIME,
            json_type(other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
