pub mod aggregator;
pub mod error;
pub mod fetcher;
pub mod normalizer;
pub mod timezone;
