//! Seeded random instance generation.
//!
//! Produces valid job-shop instances for property tests and benchmarks.
//! Every product visits a random non-empty subset of the stations in a
//! random order; every routed pair gets a duration.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::models::ProblemInstance;

/// Random instance generator.
///
/// The same settings always produce the same instance.
///
/// # Example
/// ```
/// use u_jobshop::generator::InstanceGenerator;
///
/// let instance = InstanceGenerator::default().with_seed(7).generate();
/// assert!(instance.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceGenerator {
    /// Number of products (at least 1).
    pub products: usize,
    /// Number of stations (at least 1).
    pub stations: usize,
    /// Smallest duration, inclusive.
    pub min_duration: i64,
    /// Largest duration, inclusive.
    pub max_duration: i64,
    /// RNG seed.
    pub seed: u64,
}

impl Default for InstanceGenerator {
    fn default() -> Self {
        Self {
            products: 3,
            stations: 3,
            min_duration: 1,
            max_duration: 30,
            seed: 42,
        }
    }
}

impl InstanceGenerator {
    /// Creates a generator for the given problem size.
    pub fn new(products: usize, stations: usize) -> Self {
        Self {
            products,
            stations,
            ..Self::default()
        }
    }

    /// Sets the duration range (inclusive).
    pub fn with_durations(mut self, min: i64, max: i64) -> Self {
        self.min_duration = min;
        self.max_duration = max;
        self
    }

    /// Sets the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Generates an instance.
    ///
    /// Products are named `P1..`, stations `S1..`. Counts below 1 are
    /// raised to 1 and negative durations to 0.
    pub fn generate(&self) -> ProblemInstance {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let lo = self.min_duration.max(0);
        let hi = self.max_duration.max(lo);

        let stations: Vec<String> = (1..=self.stations.max(1)).map(|i| format!("S{i}")).collect();
        let mut instance = stations
            .iter()
            .fold(ProblemInstance::new(), |inst, s| inst.with_station(s.as_str()));

        for p in 1..=self.products.max(1) {
            let product = format!("P{p}");
            let mut visit = stations.clone();
            visit.shuffle(&mut rng);
            visit.truncate(rng.random_range(1..=visit.len()));

            instance = instance.with_product(product.as_str());
            for station in &visit {
                let duration = rng.random_range(lo..=hi);
                instance = instance.with_processing_time(product.as_str(), station.as_str(), duration);
            }
            instance = instance.with_routing(product, visit);
        }

        instance
    }
}
