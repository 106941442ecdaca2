//! Human-readable order numbers.
//!
//! Format: `TB` + booking date `YYYYMMDD` (UTC) + six random digits, e.g.
//! `TB20261017048213`. Uniqueness is enforced by `uq_orders_order_number`;
//! a collision surfaces as a retryable conflict in the reservation path.

use chrono::NaiveDate;
use rand::Rng;

/// Prefix carried by every order number.
pub const ORDER_NUMBER_PREFIX: &str = "TB";

/// Number of random digits appended after the date.
const SUFFIX_DIGITS: u32 = 6;

/// Generate an order number for a booking made on `booked_on`.
pub fn generate(booked_on: NaiveDate) -> String {
    generate_with(booked_on, &mut rand::rng())
}

/// Generate an order number using the supplied random source.
pub fn generate_with<R: Rng>(booked_on: NaiveDate, rng: &mut R) -> String {
    let suffix: u32 = rng.random_range(0..10u32.pow(SUFFIX_DIGITS));
    format!(
        "{ORDER_NUMBER_PREFIX}{}{suffix:0width$}",
        booked_on.format("%Y%m%d"),
        width = SUFFIX_DIGITS as usize
    )
}

/// Whether `s` has the shape produced by [`generate`].
pub fn is_well_formed(s: &str) -> bool {
    let Some(rest) = s.strip_prefix(ORDER_NUMBER_PREFIX) else {
        return false;
    };
    rest.len() == 8 + SUFFIX_DIGITS as usize
        && rest.bytes().all(|b| b.is_ascii_digit())
        && NaiveDate::parse_from_str(&rest[..8], "%Y%m%d").is_ok()
}
