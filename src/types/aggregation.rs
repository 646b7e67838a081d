//! Defines the resampling granularities that can be applied to an observation table.

use log::warn;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The period used to group observations before averaging their numeric columns.
///
/// Buckets are evaluated in the table's timezone (CET by default).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    /// One row per clock hour, labeled by the start of the hour.
    Hourly,
    /// One row per calendar day, labeled by local midnight.
    Daily,
    /// One row per calendar month, labeled by local midnight of the month's last day.
    Monthly,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown aggregation '{0}', expected one of Hourly, Daily, Monthly")]
pub struct UnknownAggregation(pub String);

impl Aggregation {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Aggregation::Hourly => "Hourly",
            Aggregation::Daily => "Daily",
            Aggregation::Monthly => "Monthly",
        }
    }

    /// Lenient name lookup.
    ///
    /// Unrecognized names yield `None`, which [`crate::AemetClient::get_data`] treats as
    /// "no aggregation". Use [`str::parse`] instead to reject unknown names.
    ///
    /// # Examples
    ///
    /// ```
    /// use aemet::Aggregation;
    ///
    /// assert_eq!(Aggregation::from_name("Daily"), Some(Aggregation::Daily));
    /// assert_eq!(Aggregation::from_name("Weekly"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        match name.parse() {
            Ok(aggregation) => Some(aggregation),
            Err(e) => {
                warn!("{}; returning data without aggregation", e);
                None
            }
        }
    }
}

impl FromStr for Aggregation {
    type Err = UnknownAggregation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Hourly" => Ok(Aggregation::Hourly),
            "Daily" => Ok(Aggregation::Daily),
            "Monthly" => Ok(Aggregation::Monthly),
            other => Err(UnknownAggregation(other.to_string())),
        }
    }
}

/// # Examples
///
/// ```
/// use aemet::Aggregation;
///
/// assert_eq!(Aggregation::Monthly.to_string(), "Monthly");
/// ```
impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
