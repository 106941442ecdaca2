/// Default number of retries after a transaction conflict.
const DEFAULT_MAX_CONFLICT_RETRIES: u32 = 3;
/// Default bound on waiting for a schedule row lock.
const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;
/// Default bound on any single statement inside a booking transaction.
const DEFAULT_STATEMENT_TIMEOUT_MS: u64 = 10_000;

/// Reservation policy and transaction bounds.
#[derive(Debug, Clone)]
pub struct BookingConfig {
    /// Book at the product's base price when a date has no schedule entry.
    /// No stock is tracked for such bookings.
    pub allow_unscheduled_booking: bool,
    /// Retries after a lock timeout, deadlock, serialization failure, or
    /// order-number collision before surfacing a conflict.
    pub max_conflict_retries: u32,
    /// `lock_timeout` applied to each booking transaction.
    pub lock_timeout_ms: u64,
    /// `statement_timeout` applied to each booking transaction.
    pub statement_timeout_ms: u64,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            allow_unscheduled_booking: false,
            max_conflict_retries: DEFAULT_MAX_CONFLICT_RETRIES,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
            statement_timeout_ms: DEFAULT_STATEMENT_TIMEOUT_MS,
        }
    }
}

impl BookingConfig {
    /// Load booking configuration from environment variables.
    ///
    /// | Env Var                            | Default |
    /// |------------------------------------|---------|
    /// | `ALLOW_UNSCHEDULED_BOOKING`        | `false` |
    /// | `RESERVATION_MAX_RETRIES`          | `3`     |
    /// | `RESERVATION_LOCK_TIMEOUT_MS`      | `5000`  |
    /// | `RESERVATION_STATEMENT_TIMEOUT_MS` | `10000` |
    ///
    /// # Panics
    ///
    /// Panics if a variable is set but cannot be parsed.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let allow_unscheduled_booking = std::env::var("ALLOW_UNSCHEDULED_BOOKING")
            .map(|v| parse_bool(&v).expect("ALLOW_UNSCHEDULED_BOOKING must be true or false"))
            .unwrap_or(defaults.allow_unscheduled_booking);

        let max_conflict_retries: u32 = std::env::var("RESERVATION_MAX_RETRIES")
            .map(|v| v.parse().expect("RESERVATION_MAX_RETRIES must be a valid u32"))
            .unwrap_or(defaults.max_conflict_retries);

        let lock_timeout_ms: u64 = std::env::var("RESERVATION_LOCK_TIMEOUT_MS")
            .map(|v| v.parse().expect("RESERVATION_LOCK_TIMEOUT_MS must be a valid u64"))
            .unwrap_or(defaults.lock_timeout_ms);

        let statement_timeout_ms: u64 = std::env::var("RESERVATION_STATEMENT_TIMEOUT_MS")
            .map(|v| {
                v.parse()
                    .expect("RESERVATION_STATEMENT_TIMEOUT_MS must be a valid u64")
            })
            .unwrap_or(defaults.statement_timeout_ms);

        Self {
            allow_unscheduled_booking,
            max_conflict_retries,
            lock_timeout_ms,
            statement_timeout_ms,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_require_a_schedule() {
        let config = BookingConfig::default();
        assert!(!config.allow_unscheduled_booking);
        assert_eq!(config.max_conflict_retries, 3);
        assert_eq!(config.lock_timeout_ms, 5_000);
    }

    #[test]
    fn parses_boolean_spellings() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" on "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
