//! Client configuration: credentials, endpoint, station table and target timezone.

use crate::error::AemetError;
use crate::types::station::StationTable;
use bon::Builder;
use std::env;

pub const DEFAULT_BASE_URL: &str = "https://opendata.aemet.es/opendata/api";
pub const DEFAULT_TIMEZONE: &str = "CET";

pub const API_KEY_ENV: &str = "AEMET_API_KEY";
pub const BASE_URL_ENV: &str = "AEMET_BASE_URL";
pub const TIMEZONE_ENV: &str = "AEMET_TIMEZONE";

/// Everything an [`crate::AemetClient`] needs that is not part of an individual request.
///
/// # Examples
///
/// ```
/// use aemet::{ClientConfig, DEFAULT_BASE_URL};
///
/// let config = ClientConfig::builder().api_key("my-key").build();
/// assert_eq!(config.base_url, DEFAULT_BASE_URL);
/// assert_eq!(config.timezone, "CET");
///
/// let local = ClientConfig::builder()
///     .api_key("my-key")
///     .base_url("http://127.0.0.1:8080")
///     .build();
/// assert_eq!(local.base_url, "http://127.0.0.1:8080");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct ClientConfig {
    /// Opaque AEMET OpenData key, sent as a bearer token on the pointer request.
    #[builder(into)]
    pub api_key: String,
    /// API root, without trailing slash.
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(default)]
    pub stations: StationTable,
    /// IANA (or tz database alias) name the timestamps are converted to.
    #[builder(into, default = DEFAULT_TIMEZONE.to_string())]
    pub timezone: String,
}

impl ClientConfig {
    /// Reads `AEMET_API_KEY` (required), `AEMET_BASE_URL` and `AEMET_TIMEZONE`.
    ///
    /// # Errors
    ///
    /// Returns [`AemetError::MissingApiKey`] when `AEMET_API_KEY` is unset or empty.
    pub fn from_env() -> Result<Self, AemetError> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(AemetError::MissingApiKey)?;
        let base_url = env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timezone = env::var(TIMEZONE_ENV).unwrap_or_else(|_| DEFAULT_TIMEZONE.to_string());
        Ok(Self::builder()
            .api_key(api_key)
            .base_url(base_url)
            .timezone(timezone)
            .build())
    }
}
