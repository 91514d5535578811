//! Station (machine) model.
//!
//! Stations are shared, single-capacity resources: at most one operation
//! may occupy a station at any instant.

use serde::{Deserialize, Serialize};

/// A station that processes operations one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Unique station identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
}

impl Station {
    /// Creates a new station.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }
}
