//! Per-date price and capacity rules.
//!
//! `0 <= available_stock <= total_stock` must hold after every operation
//! below; the database CHECK constraint is the backstop, these functions keep
//! writes from ever reaching it.

use crate::error::CoreError;
use crate::types::Money;

/// Maximum number of dates accepted in one batch upsert.
pub const MAX_BATCH_DATES: usize = 366;

/// Decimal places stored for a price (`NUMERIC(12, 2)`).
pub const PRICE_SCALE: u32 = 2;

/// Largest price `NUMERIC(12, 2)` can hold: 9,999,999,999.99.
pub const MAX_PRICE: Money = Money::from_parts(3_567_587_327, 232, 0, false, PRICE_SCALE);

/// Validate merchant-supplied price and capacity for a date.
pub fn validate_schedule_input(price: Money, total_stock: i32) -> Result<(), CoreError> {
    if price <= Money::ZERO {
        return Err(CoreError::Validation(format!(
            "price must be > 0, got {price}"
        )));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(CoreError::Validation(format!(
            "price {price} has more than {PRICE_SCALE} decimal places"
        )));
    }
    if price > MAX_PRICE {
        return Err(CoreError::Validation(format!(
            "price {price} exceeds the maximum of {MAX_PRICE}"
        )));
    }
    if total_stock < 0 {
        return Err(CoreError::Validation(format!(
            "total_stock must be >= 0, got {total_stock}"
        )));
    }
    Ok(())
}

/// Validate the number of dates in a batch upsert.
pub fn validate_batch_size(count: usize) -> Result<(), CoreError> {
    if count == 0 {
        return Err(CoreError::Validation("Batch must contain at least one date".into()));
    }
    if count > MAX_BATCH_DATES {
        return Err(CoreError::Validation(format!(
            "Batch of {count} dates exceeds the maximum of {MAX_BATCH_DATES}"
        )));
    }
    Ok(())
}

/// Available stock after a merchant changes capacity from `old_total` to `new_total`.
///
/// Untouched capacity is reset to the new total. Once bookings have consumed
/// seats, the same delta applied to the total is applied to what is left,
/// clamped to `[0, new_total]`.
pub fn rebalance_available(old_total: i32, old_available: i32, new_total: i32) -> i32 {
    if old_available == old_total {
        return new_total;
    }
    let delta = new_total - old_total;
    (old_available + delta).clamp(0, new_total)
}

/// Available stock after `released` seats come back from a cancelled order.
///
/// Capped at `total_stock` since capacity may have shrunk after booking.
pub fn restore_available(available: i32, total: i32, released: i32) -> i32 {
    (available + released).min(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_price() {
        assert!(validate_schedule_input(Money::ZERO, 10).is_err());
        assert!(validate_schedule_input(Money::from(-5), 10).is_err());
        assert!(validate_schedule_input(Money::new(1, 2), 10).is_ok());
    }

    #[test]
    fn rejects_sub_cent_prices() {
        let err = validate_schedule_input(Money::new(1, 3), 10).unwrap_err();
        assert!(err.to_string().contains("decimal places"), "{err}");
        assert!(validate_schedule_input(Money::new(129_990, 3), 10).is_ok());
    }

    #[test]
    fn rejects_prices_beyond_column_range() {
        assert_eq!(MAX_PRICE, Money::new(999_999_999_999, 2));
        assert!(validate_schedule_input(MAX_PRICE, 10).is_ok());
        let err = validate_schedule_input(Money::from(10_000_000_000i64), 10).unwrap_err();
        assert!(err.to_string().contains("exceeds the maximum"), "{err}");
    }

    #[test]
    fn rejects_negative_stock_but_allows_zero() {
        assert!(validate_schedule_input(Money::from(100), -1).is_err());
        assert!(validate_schedule_input(Money::from(100), 0).is_ok());
    }

    #[test]
    fn batch_size_bounds() {
        assert!(validate_batch_size(0).is_err());
        assert!(validate_batch_size(1).is_ok());
        assert!(validate_batch_size(MAX_BATCH_DATES + 1).is_err());
    }

    #[test]
    fn untouched_capacity_is_recomputed() {
        assert_eq!(rebalance_available(10, 10, 4), 4);
        assert_eq!(rebalance_available(10, 10, 25), 25);
    }

    #[test]
    fn consumed_capacity_moves_by_delta() {
        // 3 seats sold out of 10; raising to 15 leaves 12.
        assert_eq!(rebalance_available(10, 7, 15), 12);
        // Lowering to 8 leaves 5.
        assert_eq!(rebalance_available(10, 7, 8), 5);
    }

    #[test]
    fn delta_is_clamped_at_zero() {
        // 8 sold out of 10; shrinking to 5 cannot go negative.
        assert_eq!(rebalance_available(10, 2, 5), 0);
        assert_eq!(rebalance_available(10, 2, 0), 0);
    }

    #[test]
    fn restore_caps_at_total() {
        assert_eq!(restore_available(7, 10, 3), 10);
        assert_eq!(restore_available(0, 5, 8), 5);
        assert_eq!(restore_available(2, 10, 3), 5);
    }
}
