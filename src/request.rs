//! Builds the pointer request for a station and time window.

use crate::error::AemetError;
use crate::types::station::StationTable;
use crate::types::traits::any_datetime::AnyDateTime;
use std::fmt;

/// A fully formed pointer request.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    /// Value of the `Authorization` header.
    pub authorization: String,
}

impl ApiRequest {
    /// The authorization header with the token masked, for logs.
    pub fn redacted_authorization(&self) -> &'static str {
        "Bearer ***"
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("url", &self.url)
            .field("authorization", &self.redacted_authorization())
            .finish()
    }
}

pub(crate) struct RequestBuilder<'a> {
    base_url: &'a str,
    api_key: &'a str,
    stations: &'a StationTable,
}

impl<'a> RequestBuilder<'a> {
    pub(crate) fn new(base_url: &'a str, api_key: &'a str, stations: &'a StationTable) -> Self {
        Self {
            base_url,
            api_key,
            stations,
        }
    }

    pub(crate) fn build(
        &self,
        station: &str,
        start: impl AnyDateTime,
        end: impl AnyDateTime,
    ) -> Result<ApiRequest, AemetError> {
        let station_id = self
            .stations
            .lookup(station)
            .ok_or_else(|| AemetError::InvalidStation(station.to_string()))?;

        let start = format_boundary(start, "start")?;
        let end = format_boundary(end, "end")?;

        Ok(ApiRequest {
            url: format!(
                "{}/antartida/datos/fechaini/{}/fechafin/{}/estacion/{}",
                self.base_url.trim_end_matches('/'),
                start,
                end,
                station_id
            ),
            authorization: format!("Bearer {}", self.api_key),
        })
    }
}

fn format_boundary(value: impl AnyDateTime, which: &str) -> Result<String, AemetError> {
    value
        .to_wire_format()
        .ok_or_else(|| AemetError::Format(format!("{} datetime cannot be rendered", which)))
}
