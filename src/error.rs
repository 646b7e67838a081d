use crate::weather_data::error::WeatherDataError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AemetError {
    #[error(transparent)]
    WeatherData(#[from] WeatherDataError),

    #[error("Invalid station name '{0}'. Choose from the predefined station names.")]
    InvalidStation(String),

    #[error("Error formatting datetime: {0}")]
    Format(String),

    #[error("AEMET_API_KEY is not set")]
    MissingApiKey,

    #[error("Failed building DataFrame")]
    Polars(#[from] PolarsError),

    #[error("Failed to open log file '{0}'")]
    LogFile(PathBuf, #[source] std::io::Error),

    #[error("A global logger has already been installed")]
    LoggerInit(#[from] log::SetLoggerError),
}
