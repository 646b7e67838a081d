mod aemet;
mod config;
mod error;
pub mod logging;
mod request;
mod types;
mod weather_data;

pub use aemet::*;
pub use config::*;
pub use error::AemetError;
pub use request::ApiRequest;

pub use types::aggregation::*;
pub use types::observation::*;
pub use types::station::*;
pub use types::traits::any_datetime::AnyDateTime;

pub use weather_data::aggregator::aggregate;
pub use weather_data::error::{FetchStage, WeatherDataError};
pub use weather_data::normalizer::normalize_observations;
pub use weather_data::timezone::convert_timezone;
