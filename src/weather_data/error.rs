use std::fmt;
use thiserror::Error;

/// The request of the two-stage fetch a transport failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    /// The authorized request that returns the pointer to the data resource.
    Pointer,
    /// The unauthenticated download of the observations themselves.
    Data,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchStage::Pointer => write!(f, "pointer"),
            FetchStage::Data => write!(f, "data"),
        }
    }
}

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error("Unauthorized: Check your API key.")]
    Unauthorized { url: String },

    #[error("Not Found: Check the URL and parameters.")]
    NotFound { url: String },

    #[error("Too Many Requests: You have exceeded the rate limit.")]
    RateLimited { url: String },

    #[error("Network request failed for {url} ({stage} stage)")]
    NetworkRequest {
        stage: FetchStage,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for {url} with status {status} ({stage} stage)")]
    HttpStatus {
        stage: FetchStage,
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Response from {url} is not valid JSON ({stage} stage)")]
    InvalidJson {
        stage: FetchStage,
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to retrieve data URL from the API response (estado: {estado:?}, descripcion: {descripcion:?})")]
    MissingDataUrl {
        estado: Option<u16>,
        descripcion: Option<String>,
    },

    #[error("Error processing data: {0}")]
    DataProcessing(String),

    #[error("Error converting to {timezone}: {reason}")]
    TimezoneConversion { timezone: String, reason: String },

    #[error("Error aggregating data: {0}")]
    Aggregation(String),
}

impl WeatherDataError {
    /// True for failures of the HTTP exchange that are not mapped to a dedicated
    /// status (401, 404, 429).
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            WeatherDataError::NetworkRequest { .. }
                | WeatherDataError::HttpStatus { .. }
                | WeatherDataError::InvalidJson { .. }
        )
    }

    pub fn stage(&self) -> Option<FetchStage> {
        match self {
            WeatherDataError::Unauthorized { .. }
            | WeatherDataError::NotFound { .. }
            | WeatherDataError::RateLimited { .. }
            | WeatherDataError::MissingDataUrl { .. } => Some(FetchStage::Pointer),
            WeatherDataError::NetworkRequest { stage, .. }
            | WeatherDataError::HttpStatus { stage, .. }
            | WeatherDataError::InvalidJson { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
