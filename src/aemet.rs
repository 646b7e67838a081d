//! This module provides the main entry point for fetching observations from the
//! AEMET OpenData Antarctic endpoint.

use crate::config::ClientConfig;
use crate::error::AemetError;
use crate::request::{ApiRequest, RequestBuilder};
use crate::types::aggregation::Aggregation;
use crate::types::observation::WeatherTable;
use crate::types::traits::any_datetime::AnyDateTime;
use crate::weather_data::aggregator::aggregate;
use crate::weather_data::fetcher::ObservationFetcher;
use crate::weather_data::normalizer::normalize_observations;
use crate::weather_data::timezone::convert_timezone;
use log::{debug, error};
use reqwest::Client;

/// The client for the AEMET Antarctic observations API.
///
/// Each [`AemetClient::get_data`] call is independent: it builds the pointer
/// request, performs the two downloads one after the other, normalizes the
/// records, converts them to the configured timezone and optionally averages
/// them per period. Nothing is cached between calls, and the client can be
/// shared between tasks.
///
/// # Examples
///
/// ```no_run
/// use aemet::{AemetClient, AemetError, Aggregation, GABRIEL_DE_CASTILLA};
/// use chrono::NaiveDate;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), AemetError> {
/// let client = AemetClient::new("my-api-key");
/// let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2023, 1, 10).unwrap();
///
/// let daily = client
///     .get_data(start, end, GABRIEL_DE_CASTILLA, Some(Aggregation::Daily))
///     .await?
///     .to_dataframe()?;
/// println!("{}", daily);
/// # Ok(())
/// # }
/// ```
pub struct AemetClient {
    config: ClientConfig,
    fetcher: ObservationFetcher,
}

impl AemetClient {
    /// Creates a client with the default endpoint, station table and timezone (CET).
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_config(ClientConfig::builder().api_key(api_key).build())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self {
            config,
            fetcher: ObservationFetcher::new(Client::new()),
        }
    }

    /// Reads the configuration from the environment, see [`ClientConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns [`AemetError::MissingApiKey`] when `AEMET_API_KEY` is not set.
    pub fn from_env() -> Result<Self, AemetError> {
        Ok(Self::with_config(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds the pointer request without sending it.
    ///
    /// # Errors
    ///
    /// [`AemetError::InvalidStation`] for names missing from the station table,
    /// [`AemetError::Format`] when a boundary cannot be rendered.
    pub fn request_for(
        &self,
        station: &str,
        start: impl AnyDateTime,
        end: impl AnyDateTime,
    ) -> Result<ApiRequest, AemetError> {
        RequestBuilder::new(&self.config.base_url, &self.config.api_key, &self.config.stations)
            .build(station, start, end)
    }

    /// Fetches the observations of `station` between `start` and `end`.
    ///
    /// `start` and `end` are sent with their own wall clock, any offset dropped;
    /// their order is not checked. With `aggregation` set, the numeric columns are averaged per
    /// period and the station column is dropped; otherwise rows keep the API's
    /// order. To select the aggregation by name with the lenient fallback, pass
    /// `Aggregation::from_name(name)`.
    ///
    /// # Errors
    ///
    /// * [`AemetError::InvalidStation`] / [`AemetError::Format`] before any request is sent.
    /// * [`AemetError::WeatherData`] for everything after that: authorization,
    ///   missing resource, rate limiting, transport failures, malformed records,
    ///   an unknown configured timezone and aggregation failures.
    ///
    /// Every error is logged at error level before it is returned.
    pub async fn get_data(
        &self,
        start: impl AnyDateTime,
        end: impl AnyDateTime,
        station: &str,
        aggregation: Option<Aggregation>,
    ) -> Result<WeatherTable, AemetError> {
        self.run(start, end, station, aggregation)
            .await
            .inspect_err(|e| error!("{}", e))
    }

    async fn run(
        &self,
        start: impl AnyDateTime,
        end: impl AnyDateTime,
        station: &str,
        aggregation: Option<Aggregation>,
    ) -> Result<WeatherTable, AemetError> {
        let request = self.request_for(station, start, end)?;
        let raw = self.fetcher.fetch(&request).await?;

        let observations = normalize_observations(&raw)?;
        let table = convert_timezone(observations, &self.config.timezone)?;
        debug!(
            "Fetched {} observations for station '{}'",
            table.len(),
            station
        );

        match aggregation {
            Some(aggregation) => Ok(WeatherTable::Aggregated(aggregate(&table, aggregation)?)),
            None => Ok(WeatherTable::Observations(table)),
        }
    }
}
