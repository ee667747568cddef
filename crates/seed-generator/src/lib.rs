//! Fake data provider for the station-seed tool.
//!
//! This crate provides [`FakeData`], the source of every randomized value the
//! seeders write: people, addresses, phone numbers, prices, quantities and
//! scheduling dates. All quantities are passed in as explicit [`Bounds`];
//! nothing here carries a hidden default range.
//!
//! # Architecture
//!
//! ```text
//!   SeedPlan (caller)
//!        │  Bounds<T>
//!        ▼
//! ┌─────────────────┐
//! │    FakeData     │
//! │                 │
//! │  - rng (StdRng) │──► fake::faker::* (names, addresses, lorem)
//! │                 │──► numeric / date helpers
//! └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use seed_generator::{Bounds, FakeData};
//!
//! let mut fake = FakeData::with_seed(42);
//! let price = fake.price(Bounds::new(500.0, 5000.0));
//! let quantity = fake.int_in(Bounds::new(1, 5));
//! assert!((1..=5).contains(&quantity));
//! println!("{} x {}", quantity, price);
//! ```

pub mod bounds;
pub mod date;
pub mod fake_data;
pub mod numeric;

pub use bounds::{Bounds, GeneratorError};
pub use fake_data::FakeData;
