//! Numeric value generators.

use crate::Bounds;
use rand::Rng;
use rust_decimal::Decimal;

/// Generate a random integer in the given range (inclusive).
pub fn generate_int<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds<i32>) -> i32 {
    let bounds = bounds.ordered();
    rng.gen_range(bounds.min..=bounds.max)
}

/// Generate a random float in the given range (inclusive).
pub fn generate_float<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds<f64>) -> f64 {
    let bounds = bounds.ordered();
    if bounds.min == bounds.max {
        return bounds.min;
    }
    rng.gen_range(bounds.min..=bounds.max)
}

/// Generate a monetary amount in the given range, rounded to cents.
///
/// The result is clamped back into the range after rounding so that a draw
/// close to an endpoint never rounds outside of it.
pub fn generate_price<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds<f64>) -> Decimal {
    let bounds = bounds.ordered();
    let value = generate_float(rng, bounds);
    let min_cents = (bounds.min * 100.0).ceil();
    let max_cents = (bounds.max * 100.0).floor();
    let cents = (value * 100.0).round().clamp(min_cents, max_cents.max(min_cents));
    Decimal::new(cents as i64, 2)
}
