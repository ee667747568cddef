//! Station Seed Library
//!
//! Fills a vehicle service station PostgreSQL schema with realistic fake
//! data: service centers, staff, customers, services and inventory first,
//! then orders with their spare parts and services, then receipts.
//!
//! # Crates
//!
//! - `seed_generator` - fake data provider and value ranges
//! - `seed_populate_postgresql` - connection pools, schema catalog, random
//!   entity selection, seeders and the order workflow
//!
//! # CLI Usage
//!
//! ```bash
//! # Built-in plan, database settings from the environment or .env
//! station-seed
//!
//! # Custom plan with fewer orders, committed every 50 attempts
//! station-seed --plan plan.yaml --oc 100 --commit-every 50
//! ```

pub mod config;
pub mod seed;

pub use config::SeedPlan;
pub use seed::{run_seed, SeedSummary};
