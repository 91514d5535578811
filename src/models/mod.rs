//! Job-shop domain models.
//!
//! Provides the data types for a job-shop problem and its solution.
//!
//! # Domain Mappings
//!
//! | u-jobshop | Manufacturing | Healthcare | Logistics |
//! |-----------|--------------|------------|-----------|
//! | Product | Job/Order | Patient Case | Shipment |
//! | Operation | Operation | Procedure | Transport Leg |
//! | Station | Machine | Room | Dock |
//! | Schedule | Production Plan | OR Schedule | Route Plan |

mod instance;
mod operation;
mod product;
mod schedule;
mod station;

pub use instance::ProblemInstance;
pub use operation::{Operation, OperationKey, ProcessingTime};
pub use product::{Product, Routing};
pub use schedule::{Schedule, ScheduleEntry, Violation, ViolationType};
pub use station::Station;
