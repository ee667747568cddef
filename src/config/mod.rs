//! Configuration layering: environment, `.env`, plan file and flags.

mod duration;
mod plan;

pub use duration::parse_duration;
pub use plan::{EmployeePlan, SeedPlan};
