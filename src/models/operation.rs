//! Operation model.
//!
//! An operation is one (product, station) step of a routing. Its duration
//! comes from the instance's processing-time table; its start time is a
//! decision variable of the formulation.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies an operation by its (product, station) pair.
///
/// A product visits each station at most once, so the pair is unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OperationKey {
    /// Product ID.
    pub product_id: String,
    /// Station ID.
    pub station_id: String,
}

impl OperationKey {
    /// Creates a new key.
    pub fn new(product_id: impl Into<String>, station_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            station_id: station_id.into(),
        }
    }
}

impl fmt::Display for OperationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.product_id, self.station_id)
    }
}

/// A processing time entry: how long `product_id` occupies `station_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingTime {
    /// Product ID.
    pub product_id: String,
    /// Station ID.
    pub station_id: String,
    /// Duration in time units.
    pub duration: i64,
}

impl ProcessingTime {
    /// Creates a new processing time entry.
    pub fn new(product_id: impl Into<String>, station_id: impl Into<String>, duration: i64) -> Self {
        Self {
            product_id: product_id.into(),
            station_id: station_id.into(),
            duration,
        }
    }

    /// Key of the operation this entry times.
    pub fn key(&self) -> OperationKey {
        OperationKey::new(&self.product_id, &self.station_id)
    }
}

/// A routed operation with its resolved duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// (product, station) identity.
    pub key: OperationKey,
    /// Position within the product's routing (0-indexed).
    pub position: usize,
    /// Processing duration.
    pub duration: i64,
}

impl Operation {
    /// Creates a new operation.
    pub fn new(key: OperationKey, position: usize, duration: i64) -> Self {
        Self {
            key,
            position,
            duration,
        }
    }

    /// Product ID.
    #[inline]
    pub fn product_id(&self) -> &str {
        &self.key.product_id
    }

    /// Station ID.
    #[inline]
    pub fn station_id(&self) -> &str {
        &self.key.station_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_key_display() {
        let key = OperationKey::new("1", "Corte");
        assert_eq!(key.to_string(), "1,Corte");
    }

    #[test]
    fn test_processing_time_key() {
        let t = ProcessingTime::new("2", "Moldeo", 20);
        assert_eq!(t.key(), OperationKey::new("2", "Moldeo"));
        assert_eq!(t.duration, 20);
    }

    #[test]
    fn test_operation_accessors() {
        let op = Operation::new(OperationKey::new("3", "Pulido"), 0, 12);
        assert_eq!(op.product_id(), "3");
        assert_eq!(op.station_id(), "Pulido");
        assert_eq!(op.duration, 12);
    }
}
