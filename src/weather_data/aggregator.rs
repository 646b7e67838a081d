use crate::types::aggregation::Aggregation;
use crate::types::observation::{AggregatedTable, ObservationTable, PeriodMean};
use crate::weather_data::error::WeatherDataError;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::BTreeMap;

const HOUR: i64 = 3_600;

/// Running mean of one column that ignores missing values.
#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: u32,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn get(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / f64::from(self.count))
    }
}

#[derive(Debug, Default)]
struct Bucket {
    temperature: Mean,
    pressure: Mean,
    speed: Mean,
}

/// Averages the numeric columns per period.
///
/// Only periods containing at least one timestamped observation produce a row;
/// rows come out in ascending period order. The station column is dropped.
///
/// # Examples
///
/// ```
/// use aemet::{aggregate, convert_timezone, normalize_observations, Aggregation};
/// use serde_json::json;
///
/// let parsed = normalize_observations(&json!([
///     {"fhora": "2023-01-07T00:00:00+0000", "temp": 4.7},
///     {"fhora": "2023-01-07T00:10:00+0000", "temp": 4.6},
/// ])).unwrap();
/// let table = convert_timezone(parsed, "CET").unwrap();
/// let hourly = aggregate(&table, Aggregation::Hourly).unwrap();
/// assert_eq!(hourly.len(), 1);
/// assert!((hourly.rows[0].temperature.unwrap() - 4.65).abs() < 1e-9);
/// ```
pub fn aggregate(
    table: &ObservationTable,
    aggregation: Aggregation,
) -> Result<AggregatedTable, WeatherDataError> {
    let mut buckets: BTreeMap<DateTime<Tz>, Bucket> = BTreeMap::new();

    for observation in &table.rows {
        let Some(datetime) = &observation.datetime else {
            continue;
        };
        let period = period_label(aggregation, datetime)?;
        let bucket = buckets.entry(period).or_default();
        bucket.temperature.push(observation.temperature);
        bucket.pressure.push(observation.pressure);
        bucket.speed.push(observation.speed);
    }

    let rows = buckets
        .into_iter()
        .map(|(period, bucket)| PeriodMean {
            period,
            temperature: bucket.temperature.get(),
            pressure: bucket.pressure.get(),
            speed: bucket.speed.get(),
        })
        .collect();

    Ok(AggregatedTable {
        aggregation,
        timezone: table.timezone,
        rows,
    })
}

/// The label of the period `datetime` falls in, expressed in its own timezone.
fn period_label(
    aggregation: Aggregation,
    datetime: &DateTime<Tz>,
) -> Result<DateTime<Tz>, WeatherDataError> {
    let tz = datetime.timezone();
    match aggregation {
        // Absolute hours, so both 02:00 hours of a DST fall-back stay separate.
        Aggregation::Hourly => {
            let start = datetime.timestamp().div_euclid(HOUR) * HOUR;
            DateTime::<Utc>::from_timestamp(start, 0)
                .map(|dt| dt.with_timezone(&tz))
                .ok_or_else(|| {
                    WeatherDataError::Aggregation(format!("hour of {} is out of range", datetime))
                })
        }
        Aggregation::Daily => local_midnight(&tz, datetime.date_naive()),
        Aggregation::Monthly => {
            let date = datetime.date_naive();
            let month_end = last_day_of_month(date.year(), date.month()).ok_or_else(|| {
                WeatherDataError::Aggregation(format!("no month end for {}", datetime))
            })?;
            local_midnight(&tz, month_end)
        }
    }
}

fn local_midnight(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>, WeatherDataError> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .ok_or_else(|| {
            WeatherDataError::Aggregation(format!("midnight of {} does not exist in {}", date, tz))
        })
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::observation::Observation;

    fn obs(utc: &str, temperature: Option<f64>, pressure: Option<f64>) -> Observation {
        let dt = DateTime::parse_from_rfc3339(utc).unwrap().with_timezone(&Tz::CET);
        Observation {
            station: Some("GdC Estacion meteorologica".to_string()),
            datetime: Some(dt),
            temperature,
            pressure,
            speed: None,
        }
    }

    fn table(rows: Vec<Observation>) -> ObservationTable {
        ObservationTable::new(Tz::CET, rows)
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a value");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_hourly_same_hour_is_averaged() -> Result<(), WeatherDataError> {
        let input = table(vec![
            obs("2023-01-07T00:00:00Z", Some(4.7), Some(987.3)),
            obs("2023-01-07T00:10:00Z", Some(4.6), Some(987.6)),
        ]);
        let result = aggregate(&input, Aggregation::Hourly)?;

        assert_eq!(result.len(), 1);
        let row = &result.rows[0];
        assert_eq!(row.period.to_rfc3339(), "2023-01-07T01:00:00+01:00");
        assert_close(row.temperature, 4.65);
        assert_close(row.pressure, 987.45);
        assert_eq!(row.speed, None);
        Ok(())
    }

    #[test]
    fn test_hourly_different_hours() -> Result<(), WeatherDataError> {
        let input = table(vec![
            obs("2023-01-07T00:00:00Z", Some(4.7), Some(987.3)),
            obs("2023-01-07T01:00:00Z", Some(4.6), Some(987.6)),
        ]);
        let result = aggregate(&input, Aggregation::Hourly)?;

        assert_eq!(result.len(), 2);
        assert_close(result.rows[0].temperature, 4.7);
        assert_close(result.rows[1].temperature, 4.6);
        assert!(result.rows[0].period < result.rows[1].period);
        Ok(())
    }

    #[test]
    fn test_rows_are_sorted_and_gaps_not_filled() -> Result<(), WeatherDataError> {
        let input = table(vec![
            obs("2023-01-07T05:30:00Z", Some(1.0), None),
            obs("2023-01-07T00:30:00Z", Some(3.0), None),
        ]);
        let result = aggregate(&input, Aggregation::Hourly)?;
        let labels: Vec<String> = result.rows.iter().map(|r| r.period.to_rfc3339()).collect();
        assert_eq!(
            labels,
            ["2023-01-07T01:00:00+01:00", "2023-01-07T06:00:00+01:00"]
        );
        Ok(())
    }

    #[test]
    fn test_all_missing_yields_missing_not_zero() -> Result<(), WeatherDataError> {
        let input = table(vec![
            obs("2023-01-07T00:00:00Z", None, Some(990.0)),
            obs("2023-01-07T00:20:00Z", None, None),
        ]);
        let result = aggregate(&input, Aggregation::Hourly)?;
        assert_eq!(result.rows[0].temperature, None);
        assert_close(result.rows[0].pressure, 990.0);
        Ok(())
    }

    #[test]
    fn test_daily_uses_local_calendar_day() -> Result<(), WeatherDataError> {
        // 23:30 UTC on the 6th is already the 7th in CET.
        let input = table(vec![
            obs("2023-01-06T23:30:00Z", Some(2.0), None),
            obs("2023-01-07T12:00:00Z", Some(4.0), None),
            obs("2023-01-07T23:30:00Z", Some(8.0), None),
        ]);
        let result = aggregate(&input, Aggregation::Daily)?;

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0].period.to_rfc3339(), "2023-01-07T00:00:00+01:00");
        assert_close(result.rows[0].temperature, 3.0);
        assert_eq!(result.rows[1].period.to_rfc3339(), "2023-01-08T00:00:00+01:00");
        assert_close(result.rows[1].temperature, 8.0);
        Ok(())
    }

    #[test]
    fn test_monthly_is_labeled_by_month_end() -> Result<(), WeatherDataError> {
        let input = table(vec![
            obs("2024-02-01T12:00:00Z", Some(1.0), None),
            obs("2024-02-29T12:00:00Z", Some(3.0), None),
            obs("2024-12-31T12:00:00Z", Some(-5.0), None),
            obs("2024-07-15T12:00:00Z", Some(10.0), None),
        ]);
        let result = aggregate(&input, Aggregation::Monthly)?;

        let labels: Vec<String> = result.rows.iter().map(|r| r.period.to_rfc3339()).collect();
        assert_eq!(
            labels,
            [
                "2024-02-29T00:00:00+01:00",
                "2024-07-31T00:00:00+02:00",
                "2024-12-31T00:00:00+01:00",
            ]
        );
        assert_close(result.rows[0].temperature, 2.0);
        assert_close(result.rows[1].temperature, 10.0);
        Ok(())
    }

    #[test]
    fn test_hourly_keeps_repeated_fall_back_hour_apart() -> Result<(), WeatherDataError> {
        // 00:30 UTC is 02:30 CEST, 01:30 UTC is 02:30 CET.
        let input = table(vec![
            obs("2023-10-29T00:30:00Z", Some(1.0), None),
            obs("2023-10-29T01:30:00Z", Some(2.0), None),
        ]);
        let result = aggregate(&input, Aggregation::Hourly)?;
        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0].period.to_rfc3339(), "2023-10-29T02:00:00+02:00");
        assert_eq!(result.rows[1].period.to_rfc3339(), "2023-10-29T02:00:00+01:00");
        Ok(())
    }

    #[test]
    fn test_rows_without_timestamp_are_skipped() -> Result<(), WeatherDataError> {
        let mut undated = obs("2023-01-07T00:00:00Z", Some(100.0), None);
        undated.datetime = None;
        let input = table(vec![undated, obs("2023-01-07T00:00:00Z", Some(1.0), None)]);
        let result = aggregate(&input, Aggregation::Daily)?;
        assert_eq!(result.len(), 1);
        assert_close(result.rows[0].temperature, 1.0);
        Ok(())
    }

    #[test]
    fn test_empty_table() -> Result<(), WeatherDataError> {
        let result = aggregate(&table(Vec::new()), Aggregation::Monthly)?;
        assert!(result.is_empty());
        assert_eq!(result.aggregation, Aggregation::Monthly);
        Ok(())
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(2023, 2), NaiveDate::from_ymd_opt(2023, 2, 28));
        assert_eq!(last_day_of_month(2024, 2), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(last_day_of_month(2023, 12), NaiveDate::from_ymd_opt(2023, 12, 31));
    }
}
