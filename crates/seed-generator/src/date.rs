//! Date generators.

use chrono::{Days, NaiveDate};
use rand::Rng;

/// Generate a date strictly after `today`, at most `horizon_days` days ahead.
///
/// A horizon of zero is treated as one day so the result is always in the
/// future.
pub fn generate_future_date<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
    horizon_days: u32,
) -> NaiveDate {
    let offset = rng.gen_range(1..=horizon_days.max(1));
    today
        .checked_add_days(Days::new(u64::from(offset)))
        .unwrap_or(NaiveDate::MAX)
}
