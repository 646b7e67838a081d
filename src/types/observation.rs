//! Row types and tables produced by the normalization, timezone and aggregation steps,
//! plus their conversion into polars frames.

use crate::types::aggregation::Aggregation;
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;
use polars::prelude::*;

pub const COL_STATION: &str = "Station";
pub const COL_DATETIME: &str = "Datetime";
pub const COL_TEMPERATURE: &str = "Temperature (ºC)";
pub const COL_PRESSURE: &str = "Pressure (hpa)";
pub const COL_SPEED: &str = "Speed (m/s)";

/// One measurement as reported by a station.
///
/// Every field may be missing in the source data. Right after normalization the
/// timestamp keeps the offset it was reported with (`DateTime<FixedOffset>`);
/// after [`crate::convert_timezone`] it is expressed in a named timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation<Z: TimeZone = Tz> {
    pub station: Option<String>,
    pub datetime: Option<DateTime<Z>>,
    /// Air temperature in °C.
    pub temperature: Option<f64>,
    /// Pressure in hPa.
    pub pressure: Option<f64>,
    /// Wind speed in m/s.
    pub speed: Option<f64>,
}

impl<Z: TimeZone> Observation<Z> {
    pub fn with_timezone<Z2: TimeZone>(&self, tz: &Z2) -> Observation<Z2> {
        Observation {
            station: self.station.clone(),
            datetime: self.datetime.as_ref().map(|dt| dt.with_timezone(tz)),
            temperature: self.temperature,
            pressure: self.pressure,
            speed: self.speed,
        }
    }
}

/// Observations in input order, all timestamps in `timezone`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTable {
    pub timezone: Tz,
    pub rows: Vec<Observation>,
}

impl ObservationTable {
    pub fn new(timezone: Tz, rows: Vec<Observation>) -> Self {
        Self { timezone, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders the table with the columns `Station`, `Datetime`, `Temperature (ºC)`,
    /// `Pressure (hpa)` and `Speed (m/s)`, in that order.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let stations: Vec<Option<String>> =
            self.rows.iter().map(|row| row.station.clone()).collect();
        DataFrame::new(vec![
            Column::new(COL_STATION.into(), stations),
            datetime_column(
                self.rows
                    .iter()
                    .map(|row| row.datetime.as_ref().map(|dt| dt.timestamp_millis())),
                &self.timezone,
            ),
            numeric_column(COL_TEMPERATURE, self.rows.iter().map(|row| row.temperature)),
            numeric_column(COL_PRESSURE, self.rows.iter().map(|row| row.pressure)),
            numeric_column(COL_SPEED, self.rows.iter().map(|row| row.speed)),
        ])
    }
}

/// Averages of one aggregation bucket. A column is `None` when no observation in
/// the bucket carried a value for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodMean {
    pub period: DateTime<Tz>,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
    pub speed: Option<f64>,
}

/// One row per occupied period, ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedTable {
    pub aggregation: Aggregation,
    pub timezone: Tz,
    pub rows: Vec<PeriodMean>,
}

impl AggregatedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Same layout as [`ObservationTable::to_dataframe`] without the `Station` column.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        DataFrame::new(vec![
            datetime_column(
                self.rows.iter().map(|row| Some(row.period.timestamp_millis())),
                &self.timezone,
            ),
            numeric_column(COL_TEMPERATURE, self.rows.iter().map(|row| row.temperature)),
            numeric_column(COL_PRESSURE, self.rows.iter().map(|row| row.pressure)),
            numeric_column(COL_SPEED, self.rows.iter().map(|row| row.speed)),
        ])
    }
}

/// The result of [`crate::AemetClient::get_data`].
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherTable {
    Observations(ObservationTable),
    Aggregated(AggregatedTable),
}

impl WeatherTable {
    pub fn len(&self) -> usize {
        match self {
            WeatherTable::Observations(table) => table.len(),
            WeatherTable::Aggregated(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn aggregation(&self) -> Option<Aggregation> {
        match self {
            WeatherTable::Observations(_) => None,
            WeatherTable::Aggregated(table) => Some(table.aggregation),
        }
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        match self {
            WeatherTable::Observations(table) => table.to_dataframe(),
            WeatherTable::Aggregated(table) => table.to_dataframe(),
        }
    }

    pub fn into_lazy(self) -> PolarsResult<LazyFrame> {
        Ok(self.to_dataframe()?.lazy())
    }
}

fn numeric_column(name: &str, values: impl Iterator<Item = Option<f64>>) -> Column {
    let values: Vec<Option<f64>> = values.collect();
    Column::new(name.into(), values)
}

fn datetime_column(millis: impl Iterator<Item = Option<i64>>, timezone: &Tz) -> Column {
    let millis: Vec<Option<i64>> = millis.collect();
    Int64Chunked::new(COL_DATETIME.into(), millis.as_slice())
        .into_datetime(TimeUnit::Milliseconds, Some(timezone.name().into()))
        .into_series()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn observation(hour: u32, temperature: Option<f64>) -> Observation {
        Observation {
            station: Some("GdC Estacion meteorologica".to_string()),
            datetime: Some(Tz::CET.with_ymd_and_hms(2023, 1, 7, hour, 0, 0).unwrap()),
            temperature,
            pressure: Some(987.3),
            speed: None,
        }
    }

    fn column_names(df: &DataFrame) -> Vec<String> {
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    #[test]
    fn test_observation_frame_columns() -> Result<(), Box<dyn std::error::Error>> {
        let table = ObservationTable::new(
            Tz::CET,
            vec![observation(1, Some(4.7)), observation(2, None)],
        );
        let df = table.to_dataframe()?;

        assert_eq!(df.height(), 2);
        assert_eq!(
            column_names(&df),
            [COL_STATION, COL_DATETIME, COL_TEMPERATURE, COL_PRESSURE, COL_SPEED]
        );
        assert!(matches!(
            df.column(COL_DATETIME)?.dtype(),
            DataType::Datetime(TimeUnit::Milliseconds, Some(tz)) if tz.as_str() == "CET"
        ));

        let temperature = df.column(COL_TEMPERATURE)?.f64()?;
        assert_eq!(temperature.get(0), Some(4.7));
        assert_eq!(temperature.get(1), None);
        assert_eq!(df.column(COL_SPEED)?.null_count(), 2);
        Ok(())
    }

    #[test]
    fn test_datetime_column_stores_instant() -> Result<(), Box<dyn std::error::Error>> {
        let table = ObservationTable::new(Tz::CET, vec![observation(1, Some(4.7))]);
        let df = table.to_dataframe()?;
        let millis = df.column(COL_DATETIME)?.datetime()?.get(0);
        let expected = Utc.with_ymd_and_hms(2023, 1, 7, 0, 0, 0).unwrap();
        assert_eq!(millis, Some(expected.timestamp_millis()));
        Ok(())
    }

    #[test]
    fn test_aggregated_frame_drops_station() -> Result<(), Box<dyn std::error::Error>> {
        let table = AggregatedTable {
            aggregation: Aggregation::Daily,
            timezone: Tz::CET,
            rows: vec![PeriodMean {
                period: Tz::CET.with_ymd_and_hms(2023, 1, 7, 0, 0, 0).unwrap(),
                temperature: Some(4.65),
                pressure: Some(987.45),
                speed: None,
            }],
        };
        let df = WeatherTable::Aggregated(table).to_dataframe()?;
        assert_eq!(
            column_names(&df),
            [COL_DATETIME, COL_TEMPERATURE, COL_PRESSURE, COL_SPEED]
        );
        assert_eq!(df.height(), 1);
        Ok(())
    }

    #[test]
    fn test_with_timezone_keeps_instant() {
        let offset = FixedOffset::east_opt(0).unwrap();
        let parsed = Observation {
            station: None,
            datetime: Some(offset.with_ymd_and_hms(2023, 7, 1, 10, 0, 0).unwrap()),
            temperature: Some(-3.2),
            pressure: None,
            speed: Some(11.0),
        };
        let converted = parsed.with_timezone(&Tz::CET);
        let dt = converted.datetime.unwrap();
        assert_eq!(dt.to_rfc3339(), "2023-07-01T12:00:00+02:00");
        assert_eq!(dt.with_timezone(&Utc), parsed.datetime.unwrap().with_timezone(&Utc));
        assert_eq!(converted.speed, Some(11.0));
    }

    #[test]
    fn test_empty_table() -> Result<(), Box<dyn std::error::Error>> {
        let table = WeatherTable::Observations(ObservationTable::new(Tz::CET, Vec::new()));
        assert!(table.is_empty());
        assert_eq!(table.aggregation(), None);
        assert_eq!(table.into_lazy()?.collect()?.height(), 0);
        Ok(())
    }
}
