use crate::types::observation::{Observation, ObservationTable};
use crate::weather_data::error::WeatherDataError;
use chrono::FixedOffset;
use chrono_tz::Tz;

/// Relabels every timestamp in the named timezone. The instants do not change.
///
/// The name is resolved through the tz database, so `"CET"` follows the Central
/// European standard/summer time rules for each date.
///
/// # Examples
///
/// ```
/// use aemet::{convert_timezone, normalize_observations};
/// use serde_json::json;
///
/// let parsed = normalize_observations(&json!([{"fhora": "2023-07-01T10:00:00+0000"}])).unwrap();
/// let table = convert_timezone(parsed, "CET").unwrap();
/// let local = table.rows[0].datetime.unwrap();
/// assert_eq!(local.to_rfc3339(), "2023-07-01T12:00:00+02:00");
/// ```
pub fn convert_timezone(
    observations: Vec<Observation<FixedOffset>>,
    timezone: &str,
) -> Result<ObservationTable, WeatherDataError> {
    let tz = resolve_timezone(timezone)?;
    let rows = observations
        .iter()
        .map(|observation| observation.with_timezone(&tz))
        .collect();
    Ok(ObservationTable::new(tz, rows))
}

pub(crate) fn resolve_timezone(timezone: &str) -> Result<Tz, WeatherDataError> {
    timezone
        .parse::<Tz>()
        .map_err(|e| WeatherDataError::TimezoneConversion {
            timezone: timezone.to_string(),
            reason: e.to_string(),
        })
}
