//! The fixed set of AEMET Antarctic stations and the lookup from display name
//! to the numeric station code used in request URLs.

use serde::{Deserialize, Serialize};

/// A single AEMET Antarctic station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Human-readable name, as accepted by [`crate::AemetClient::get_data`].
    pub name: String,
    /// Numeric station code (e.g. "89064").
    pub id: String,
}

impl Station {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

pub const JUAN_CARLOS_I: &str = "Estación Meteorológica Juan Carlos I";
pub const GABRIEL_DE_CASTILLA: &str = "Estación Meteorológica Gabriel de Castilla";

/// An immutable name → code table.
///
/// The default table holds the two Spanish Antarctic bases. A custom table can be
/// injected through [`crate::ClientConfig`], mostly useful for tests.
///
/// # Examples
///
/// ```
/// use aemet::{StationTable, GABRIEL_DE_CASTILLA};
///
/// let stations = StationTable::default();
/// assert_eq!(stations.lookup(GABRIEL_DE_CASTILLA), Some("89070"));
/// assert_eq!(stations.lookup("Halley"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationTable {
    stations: Vec<Station>,
}

impl StationTable {
    pub fn new(stations: Vec<Station>) -> Self {
        Self { stations }
    }

    /// Exact, case-sensitive match on the station name.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.stations
            .iter()
            .find(|station| station.name == name)
            .map(|station| station.id.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stations.iter().map(|station| station.name.as_str())
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }
}

impl Default for StationTable {
    fn default() -> Self {
        Self::new(vec![
            Station::new(JUAN_CARLOS_I, "89064"),
            Station::new(GABRIEL_DE_CASTILLA, "89070"),
        ])
    }
}
