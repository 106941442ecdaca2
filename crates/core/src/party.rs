//! Party composition and booking price math.
//!
//! Adults and both kinds of children occupy a seat and pay the unit price.
//! Infants ride along: recorded on the order, free, and not counted
//! against stock.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Money;

/// Largest party accepted in a single booking.
pub const MAX_PARTY_SIZE: i32 = 99;

/// Who is travelling on one order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyComposition {
    #[serde(default)]
    pub adults: i32,
    #[serde(default)]
    pub children_no_bed: i32,
    #[serde(default)]
    pub children_with_bed: i32,
    #[serde(default)]
    pub infants: i32,
}

impl PartyComposition {
    pub fn adults(adults: i32) -> Self {
        Self {
            adults,
            ..Self::default()
        }
    }

    /// Seats this party consumes from the schedule.
    pub fn requested(&self) -> i32 {
        self.adults + self.children_no_bed + self.children_with_bed
    }

    /// Reject negative counts, empty parties, and oversize parties.
    pub fn validate(&self) -> Result<(), CoreError> {
        let counts = [
            ("adults", self.adults),
            ("children_no_bed", self.children_no_bed),
            ("children_with_bed", self.children_with_bed),
            ("infants", self.infants),
        ];
        if let Some((field, value)) = counts.iter().find(|(_, v)| *v < 0) {
            return Err(CoreError::Validation(format!(
                "{field} must be >= 0, got {value}"
            )));
        }

        let requested = self.requested();
        if requested < 1 {
            return Err(CoreError::Validation(
                "Party must include at least one adult or child".into(),
            ));
        }
        if requested > MAX_PARTY_SIZE {
            return Err(CoreError::Validation(format!(
                "Party of {requested} exceeds the maximum of {MAX_PARTY_SIZE}"
            )));
        }
        Ok(())
    }
}

/// Total charged for `requested` seats at `unit_price`.
pub fn total_price(unit_price: Money, requested: i32) -> Money {
    unit_price * Money::from(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infants_do_not_consume_stock() {
        let party = PartyComposition {
            adults: 2,
            children_no_bed: 1,
            children_with_bed: 1,
            infants: 3,
        };
        assert_eq!(party.requested(), 4);
    }

    #[test]
    fn total_is_unit_times_seats() {
        let party = PartyComposition {
            adults: 2,
            children_no_bed: 1,
            ..PartyComposition::default()
        };
        assert_eq!(
            total_price(Money::from(2999), party.requested()),
            Money::from(8997)
        );
    }

    #[test]
    fn fractional_prices_stay_exact() {
        assert_eq!(
            total_price(Money::new(1999, 2), 3),
            Money::new(5997, 2)
        );
    }

    #[test]
    fn infant_only_party_is_invalid() {
        let party = PartyComposition {
            infants: 1,
            ..PartyComposition::default()
        };
        let err = party.validate().unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn negative_count_names_the_field() {
        let party = PartyComposition {
            adults: 2,
            children_with_bed: -1,
            ..PartyComposition::default()
        };
        let err = party.validate().unwrap_err();
        assert!(err.to_string().contains("children_with_bed"));
    }

    #[test]
    fn oversize_party_is_invalid() {
        assert!(PartyComposition::adults(MAX_PARTY_SIZE).validate().is_ok());
        assert!(PartyComposition::adults(MAX_PARTY_SIZE + 1).validate().is_err());
    }
}
