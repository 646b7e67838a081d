pub mod aggregation;
pub mod observation;
pub mod station;
pub mod traits;
