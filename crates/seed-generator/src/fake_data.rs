//! Seeded provider of realistic fake values.

use crate::date::generate_future_date;
use crate::numeric::{generate_float, generate_int, generate_price};
use crate::Bounds;
use chrono::{NaiveDate, Utc};
use fake::faker::address::en::{BuildingNumber, CityName, StreetName, ZipCode};
use fake::faker::internet::en::{Password, Username};
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rust_decimal::Decimal;
use std::ops::Range;

/// Fake data provider backed by a seeded RNG.
///
/// Two providers created with the same seed produce the same sequence of
/// values, which makes seeding runs reproducible.
pub struct FakeData {
    rng: StdRng,
}

impl FakeData {
    /// Create a provider with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a provider seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a provider for one seeding task.
    ///
    /// With a base seed every task gets its own deterministic stream,
    /// otherwise the task is seeded from entropy.
    pub fn for_task(base_seed: Option<u64>, task: u64) -> Self {
        match base_seed {
            Some(seed) => Self::with_seed(seed.wrapping_add(task.wrapping_mul(0x9E3779B97F4A7C15))),
            None => Self::from_entropy(),
        }
    }

    pub fn name(&mut self) -> String {
        Name().fake_with_rng(&mut self.rng)
    }

    pub fn city(&mut self) -> String {
        CityName().fake_with_rng(&mut self.rng)
    }

    /// A street address placed in `city`.
    pub fn street_address(&mut self, city: &str) -> String {
        let building: String = BuildingNumber().fake_with_rng(&mut self.rng);
        let street: String = StreetName().fake_with_rng(&mut self.rng);
        format!("{building} {street}, {city}")
    }

    pub fn postal_code(&mut self) -> String {
        ZipCode().fake_with_rng(&mut self.rng)
    }

    pub fn phone(&mut self) -> String {
        PhoneNumber().fake_with_rng(&mut self.rng)
    }

    pub fn username(&mut self) -> String {
        Username().fake_with_rng(&mut self.rng)
    }

    /// Password with a length drawn from `len` (half-open).
    pub fn password(&mut self, len: Range<usize>) -> String {
        Password(len).fake_with_rng(&mut self.rng)
    }

    /// Sentence with a word count drawn from `words` (half-open).
    pub fn sentence(&mut self, words: Range<usize>) -> String {
        Sentence(words).fake_with_rng(&mut self.rng)
    }

    pub fn int_in(&mut self, bounds: Bounds<i32>) -> i32 {
        generate_int(&mut self.rng, bounds)
    }

    pub fn price(&mut self, bounds: Bounds<f64>) -> Decimal {
        generate_price(&mut self.rng, bounds)
    }

    pub fn fraction(&mut self, bounds: Bounds<f64>) -> f64 {
        generate_float(&mut self.rng, bounds)
    }

    /// A date after today (UTC), at most `horizon_days` ahead.
    pub fn future_date(&mut self, horizon_days: u32) -> NaiveDate {
        self.future_date_from(Utc::now().date_naive(), horizon_days)
    }

    pub fn future_date_from(&mut self, today: NaiveDate, horizon_days: u32) -> NaiveDate {
        generate_future_date(&mut self.rng, today, horizon_days)
    }

    /// Pick one element uniformly. `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_values() {
        let mut a = FakeData::with_seed(42);
        let mut b = FakeData::with_seed(42);

        assert_eq!(a.name(), b.name());
        assert_eq!(a.phone(), b.phone());
        assert_eq!(
            a.price(Bounds::new(1.0, 100.0)),
            b.price(Bounds::new(1.0, 100.0))
        );
    }

    #[test]
    fn test_task_streams_differ() {
        let mut a = FakeData::for_task(Some(42), 0);
        let mut b = FakeData::for_task(Some(42), 1);
        let a_values: Vec<i32> = (0..16).map(|_| a.int_in(Bounds::new(0, 1_000_000))).collect();
        let b_values: Vec<i32> = (0..16).map(|_| b.int_in(Bounds::new(0, 1_000_000))).collect();
        assert_ne!(a_values, b_values);
    }

    #[test]
    fn test_street_address_uses_city() {
        let mut fake = FakeData::with_seed(1);
        let address = fake.street_address("Springfield");
        assert!(address.ends_with(", Springfield"));
    }

    #[test]
    fn test_password_length() {
        let mut fake = FakeData::with_seed(3);
        for _ in 0..20 {
            let password = fake.password(10..11);
            assert_eq!(password.chars().count(), 10);
        }
    }

    #[test]
    fn test_pick() {
        let mut fake = FakeData::with_seed(9);
        let empty: [u8; 0] = [];
        assert!(fake.pick(&empty).is_none());
        let roles = ["Analyst", "Master", "Manager"];
        assert!(roles.contains(fake.pick(&roles).unwrap()));
    }
}
