//! Seeding orchestration: preflight, reference data, the concurrent phase,
//! orders and receipts.

mod concurrent;
mod run;

pub use concurrent::{run_concurrent_phase, PhaseReport, SeedTask, TaskOutput};
pub use run::{preflight, run_seed, SeedSummary};
