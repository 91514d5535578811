//! Disjunctive job-shop scheduling.
//!
//! Turns a job-shop instance (products, stations, processing times and
//! routings) into a Big-M mixed-integer model, hands it to a [`MilpSolver`],
//! and reads the solution back into a per-operation schedule and a
//! per-station timeline.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ProblemInstance`, `Product`, `Station`,
//!   `Operation`, `Schedule`
//! - **`validation`**: Instance integrity checks and schedule verification
//! - **`milp`**: Linear model representation, the `MilpSolver` seam and a
//!   `good_lp` backend
//! - **`formulation`**: Big-M model builder and schedule extraction
//! - **`timeline`**: Station-grouped projection for Gantt renderers
//! - **`kpi`**: Schedule quality metrics
//! - **`generator`**: Seeded random instances
//!
//! # Example
//! ```
//! use u_jobshop::formulation::JobShopModelBuilder;
//! use u_jobshop::milp::{GoodLpSolver, SolverConfig};
//! use u_jobshop::models::ProblemInstance;
//!
//! let instance = ProblemInstance::reference();
//! let (schedule, _) = JobShopModelBuilder::new(&instance)
//!     .solve(&GoodLpSolver::new(), &SolverConfig::default())
//!     .unwrap();
//! assert_eq!(schedule.makespan, 85);
//! ```
//!
//! # References
//!
//! - Manne (1960), "On the Job-Shop Scheduling Problem"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"
//!
//! [`MilpSolver`]: milp::MilpSolver

pub mod error;
pub mod formulation;
pub mod generator;
pub mod kpi;
pub mod milp;
pub mod models;
pub mod timeline;
pub mod validation;

pub use error::ScheduleError;
