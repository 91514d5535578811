//! Problem instance.
//!
//! The static input of a job-shop problem: products, stations, the
//! (product, station) processing-time table and each product's routing.
//! An instance is immutable once built; the formulation only reads it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Operation, OperationKey, ProcessingTime, Product, Routing, Station};
use crate::validation::{validate_instance, ValidationResult};

/// A job-shop problem instance.
///
/// Tables are kept as supplied by the external source. Call
/// [`validate`](Self::validate) (the model builder always does) before
/// relying on [`operations`](Self::operations).
///
/// # Example
/// ```
/// use u_jobshop::models::ProblemInstance;
///
/// let instance = ProblemInstance::new()
///     .with_station("Corte")
///     .with_station("Pulido")
///     .with_product("1")
///     .with_processing_time("1", "Corte", 30)
///     .with_processing_time("1", "Pulido", 15)
///     .with_routing("1", ["Corte", "Pulido"]);
///
/// assert!(instance.validate().is_ok());
/// assert_eq!(instance.operations().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemInstance {
    /// Declared products, in declaration order.
    pub products: Vec<Product>,
    /// Declared stations, in declaration order.
    pub stations: Vec<Station>,
    /// Duration table.
    pub processing_times: Vec<ProcessingTime>,
    /// Product routings.
    pub routings: Vec<Routing>,
}

impl ProblemInstance {
    /// Creates an empty instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a product.
    pub fn with_product(mut self, id: impl Into<String>) -> Self {
        self.products.push(Product::new(id));
        self
    }

    /// Declares a station.
    pub fn with_station(mut self, id: impl Into<String>) -> Self {
        self.stations.push(Station::new(id));
        self
    }

    /// Adds a processing time entry.
    pub fn with_processing_time(
        mut self,
        product_id: impl Into<String>,
        station_id: impl Into<String>,
        duration: i64,
    ) -> Self {
        self.processing_times
            .push(ProcessingTime::new(product_id, station_id, duration));
        self
    }

    /// Sets the routing of a product.
    pub fn with_routing<I, S>(mut self, product_id: impl Into<String>, stations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routings.push(Routing::new(product_id, stations));
        self
    }

    /// The three-product, three-station workshop instance.
    ///
    /// | Product | Routing | Durations |
    /// |---------|---------|-----------|
    /// | 1 | Corte → Pulido | 30, 15 |
    /// | 2 | Moldeo → Corte → Pulido | 20, 10, 34 |
    /// | 3 | Pulido → Corte → Moldeo | 12, 17, 28 |
    pub fn reference() -> Self {
        Self::new()
            .with_product("1")
            .with_product("2")
            .with_product("3")
            .with_station("Moldeo")
            .with_station("Corte")
            .with_station("Pulido")
            .with_processing_time("1", "Corte", 30)
            .with_processing_time("1", "Pulido", 15)
            .with_processing_time("2", "Moldeo", 20)
            .with_processing_time("2", "Corte", 10)
            .with_processing_time("2", "Pulido", 34)
            .with_processing_time("3", "Pulido", 12)
            .with_processing_time("3", "Corte", 17)
            .with_processing_time("3", "Moldeo", 28)
            .with_routing("1", ["Corte", "Pulido"])
            .with_routing("2", ["Moldeo", "Corte", "Pulido"])
            .with_routing("3", ["Pulido", "Corte", "Moldeo"])
    }

    /// Checks internal consistency of the tables.
    pub fn validate(&self) -> ValidationResult {
        validate_instance(self)
    }

    /// Looks up the processing time of a (product, station) pair.
    pub fn duration(&self, product_id: &str, station_id: &str) -> Option<i64> {
        self.processing_times
            .iter()
            .find(|t| t.product_id == product_id && t.station_id == station_id)
            .map(|t| t.duration)
    }

    /// Routing of a product.
    pub fn routing(&self, product_id: &str) -> Option<&Routing> {
        self.routings.iter().find(|r| r.product_id == product_id)
    }

    /// Declaration index of a product.
    pub fn product_index(&self, product_id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == product_id)
    }

    /// Routed operations, in product declaration order then routing order.
    ///
    /// Pairs without a duration entry are skipped; a validated instance
    /// has none.
    pub fn operations(&self) -> Vec<Operation> {
        let durations: HashMap<(&str, &str), i64> = self
            .processing_times
            .iter()
            .map(|t| ((t.product_id.as_str(), t.station_id.as_str()), t.duration))
            .collect();

        let mut operations = Vec::new();
        for product in &self.products {
            let Some(routing) = self.routing(&product.id) else {
                continue;
            };
            for (position, station_id) in routing.stations.iter().enumerate() {
                if let Some(&duration) = durations.get(&(product.id.as_str(), station_id.as_str())) {
                    operations.push(Operation::new(
                        OperationKey::new(&product.id, station_id),
                        position,
                        duration,
                    ));
                }
            }
        }
        operations
    }

    /// Sum of the durations of all routed operations, saturating at
    /// `i64::MAX`.
    pub fn total_processing_time(&self) -> i64 {
        self.operations()
            .iter()
            .fold(0i64, |total, op| total.saturating_add(op.duration))
    }

    /// Automatic Big-M: total routed processing time plus the longest single
    /// duration. `None` if the sum overflows `i64`.
    pub fn safe_big_m(&self) -> Option<i64> {
        self.operations()
            .iter()
            .try_fold(0i64, |total, op| total.checked_add(op.duration))?
            .checked_add(self.max_processing_time())
    }

    /// Longest single routed duration.
    pub fn max_processing_time(&self) -> i64 {
        self.operations()
            .iter()
            .map(|op| op.duration)
            .max()
            .unwrap_or(0)
    }

    /// Sum of routed durations per station.
    pub fn station_loads(&self) -> HashMap<String, i64> {
        let mut loads: HashMap<String, i64> = self
            .stations
            .iter()
            .map(|s| (s.id.clone(), 0))
            .collect();
        for op in self.operations() {
            let load = loads.entry(op.key.station_id).or_insert(0);
            *load = load.saturating_add(op.duration);
        }
        loads
    }

    /// Trivial makespan lower bound: the larger of the longest product
    /// chain and the most loaded station.
    pub fn makespan_lower_bound(&self) -> i64 {
        let mut chains: HashMap<&str, i64> = HashMap::new();
        let operations = self.operations();
        for op in &operations {
            let chain = chains.entry(op.product_id()).or_insert(0);
            *chain = chain.saturating_add(op.duration);
        }
        let longest_chain = chains.values().copied().max().unwrap_or(0);
        let busiest_station = self.station_loads().into_values().max().unwrap_or(0);
        longest_chain.max(busiest_station)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_instance_is_valid() {
        let instance = ProblemInstance::reference();
        assert!(instance.validate().is_ok());
        assert_eq!(instance.products.len(), 3);
        assert_eq!(instance.stations.len(), 3);
        assert_eq!(instance.operations().len(), 8);
    }

    #[test]
    fn test_operations_order() {
        let instance = ProblemInstance::reference();
        let ops = instance.operations();
        let keys: Vec<String> = ops.iter().map(|op| op.key.to_string()).collect();
        assert_eq!(
            keys,
            vec![
                "1,Corte", "1,Pulido", "2,Moldeo", "2,Corte", "2,Pulido", "3,Pulido",
                "3,Corte", "3,Moldeo",
            ]
        );
        assert_eq!(ops[4].position, 2);
        assert_eq!(ops[4].duration, 34);
    }

    #[test]
    fn test_duration_lookup() {
        let instance = ProblemInstance::reference();
        assert_eq!(instance.duration("3", "Corte"), Some(17));
        assert_eq!(instance.duration("1", "Moldeo"), None);
    }

    #[test]
    fn test_totals_and_bounds() {
        let instance = ProblemInstance::reference();
        assert_eq!(instance.total_processing_time(), 166);
        assert_eq!(instance.max_processing_time(), 34);
        assert_eq!(instance.safe_big_m(), Some(200));

        let loads = instance.station_loads();
        assert_eq!(loads["Corte"], 57);
        assert_eq!(loads["Pulido"], 61);
        assert_eq!(loads["Moldeo"], 48);

        // Product 2 chain: 20 + 10 + 34
        assert_eq!(instance.makespan_lower_bound(), 64);
    }

    #[test]
    fn test_empty_instance() {
        let instance = ProblemInstance::new();
        assert!(instance.operations().is_empty());
        assert_eq!(instance.total_processing_time(), 0);
        assert_eq!(instance.makespan_lower_bound(), 0);
    }

    #[test]
    fn test_huge_durations_do_not_overflow() {
        let half = i64::MAX / 2;
        let instance = ProblemInstance::new()
            .with_product("A")
            .with_station("M1")
            .with_station("M2")
            .with_processing_time("A", "M1", half)
            .with_processing_time("A", "M2", half)
            .with_routing("A", ["M1", "M2"]);

        assert_eq!(instance.total_processing_time(), half * 2);
        assert_eq!(instance.safe_big_m(), None);
        assert_eq!(instance.makespan_lower_bound(), half * 2);
    }

    #[test]
    fn test_serde_roundtrip() {
        let instance = ProblemInstance::reference();
        let json = serde_json::to_string(&instance).unwrap();
        let back: ProblemInstance = serde_json::from_str(&json).unwrap();
        assert_eq!(back, instance);
    }

    #[test]
    fn test_deserialize_without_names() {
        let json = r#"{
            "products": [{"id": "A"}],
            "stations": [{"id": "M1"}],
            "processing_times": [{"product_id": "A", "station_id": "M1", "duration": 5}],
            "routings": [{"product_id": "A", "stations": ["M1"]}]
        }"#;
        let instance: ProblemInstance = serde_json::from_str(json).unwrap();
        assert!(instance.validate().is_ok());
        assert_eq!(instance.products[0].name, "");
        assert_eq!(instance.total_processing_time(), 5);
    }
}
