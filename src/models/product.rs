//! Product (job) model.
//!
//! A product is a unit of work that visits stations in a fixed order,
//! its routing. Each routed station becomes one operation.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 2.2 (Job Shop)

use serde::{Deserialize, Serialize};

/// A product to be scheduled.
///
/// Carries identity only; the routing is kept in a separate table of the
/// [`ProblemInstance`](super::ProblemInstance) so it can be validated
/// against the duration table when the instance is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique product identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
}

/// Ordered station sequence a product must follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routing {
    /// Product this routing belongs to.
    pub product_id: String,
    /// Station IDs in processing order.
    pub stations: Vec<String>,
}

impl Product {
    /// Creates a new product with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
        }
    }
}

impl Routing {
    /// Creates a routing from an ordered list of station IDs.
    pub fn new<I, S>(product_id: impl Into<String>, stations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            product_id: product_id.into(),
            stations: stations.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of operations in this routing.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the routing visits no station.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Last station of the routing.
    pub fn last_station(&self) -> Option<&str> {
        self.stations.last().map(String::as_str)
    }

    /// Consecutive station pairs `(earlier, later)`.
    pub fn consecutive_pairs(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.stations
            .windows(2)
            .map(|w| (w[0].as_str(), w[1].as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_new() {
        let p = Product::new("P1");
        assert_eq!(p.id, "P1");
        assert!(p.name.is_empty());
    }

    #[test]
    fn test_routing_pairs() {
        let r = Routing::new("2", ["Moldeo", "Corte", "Pulido"]);
        assert_eq!(r.len(), 3);
        assert_eq!(r.last_station(), Some("Pulido"));

        let pairs: Vec<_> = r.consecutive_pairs().collect();
        assert_eq!(pairs, vec![("Moldeo", "Corte"), ("Corte", "Pulido")]);
    }

    #[test]
    fn test_routing_single_station() {
        let r = Routing::new("1", ["Corte"]);
        assert_eq!(r.consecutive_pairs().count(), 0);
        assert!(!r.is_empty());
        assert!(Routing::new("1", Vec::<String>::new()).is_empty());
    }
}
