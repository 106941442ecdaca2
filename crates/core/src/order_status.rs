//! Order status lifecycle.
//!
//! One closed enum shared by every layer. Discriminants match the seed order
//! of the `order_statuses` lookup table, and every legal move is listed in
//! [`OrderStatus::allowed_targets`]; nothing else compares status strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending = 1,
    Confirmed = 2,
    Rejected = 3,
    Completed = 4,
    Archived = 5,
    Returned = 6,
}

/// Every status, in lookup-table order.
pub const ALL_STATUSES: [OrderStatus; 6] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Rejected,
    OrderStatus::Completed,
    OrderStatus::Archived,
    OrderStatus::Returned,
];

impl OrderStatus {
    /// The only status a new order may start in.
    pub const INITIAL: OrderStatus = OrderStatus::Pending;

    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Resolve a database status ID.
    pub fn from_id(id: StatusId) -> Result<Self, CoreError> {
        ALL_STATUSES
            .into_iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| CoreError::Internal(format!("Unknown order status id {id}")))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
            Self::Archived => "archived",
            Self::Returned => "returned",
        }
    }

    /// Parse a status name as sent by clients.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        ALL_STATUSES
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid order status '{s}'. Must be one of: {}",
                    ALL_STATUSES.map(|s| s.as_str()).join(", ")
                ))
            })
    }

    /// Statuses reachable from `self` in one step.
    pub fn allowed_targets(self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Pending => &[Confirmed, Rejected, Archived],
            Confirmed => &[Completed, Rejected, Archived, Returned],
            Completed => &[Returned],
            Rejected | Archived | Returned => &[],
        }
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Check a move against the transition table.
    pub fn validate_transition(self, target: OrderStatus) -> Result<(), CoreError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self,
                to: target,
            })
        }
    }

    /// Entering this status hands the order's seats back to the schedule.
    pub fn releases_stock(self) -> bool {
        matches!(self, Self::Rejected | Self::Returned)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OrderStatus> for StatusId {
    fn from(value: OrderStatus) -> Self {
        value as StatusId
    }
}

/// Statuses whose orders still hold seats on their travel date.
pub const OUTSTANDING_STATUSES: [OrderStatus; 2] = [OrderStatus::Pending, OrderStatus::Confirmed];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_seed_order() {
        for (i, status) in ALL_STATUSES.iter().enumerate() {
            assert_eq!(status.id(), (i + 1) as StatusId);
            assert_eq!(OrderStatus::from_id(status.id()).unwrap(), *status);
        }
    }

    #[test]
    fn unknown_id_is_internal_error() {
        assert!(matches!(
            OrderStatus::from_id(42),
            Err(CoreError::Internal(_))
        ));
    }

    #[test]
    fn parse_round_trips_names() {
        for status in ALL_STATUSES {
            assert_eq!(OrderStatus::parse(status.as_str()).unwrap(), status);
        }
        let err = OrderStatus::parse("cancelled").unwrap_err();
        assert!(err.to_string().contains("Invalid order status"));
    }

    #[test]
    fn pending_moves() {
        let p = OrderStatus::Pending;
        assert!(p.can_transition_to(OrderStatus::Confirmed));
        assert!(p.can_transition_to(OrderStatus::Rejected));
        assert!(p.can_transition_to(OrderStatus::Archived));
        assert!(!p.can_transition_to(OrderStatus::Completed));
        assert!(!p.can_transition_to(OrderStatus::Returned));
        assert!(!p.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn confirmed_and_completed_can_be_returned() {
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Returned));
        assert!(OrderStatus::Completed.can_transition_to(OrderStatus::Returned));
        assert!(OrderStatus::Confirmed.can_transition_to(OrderStatus::Completed));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Archived));
    }

    #[test]
    fn dead_ends_have_no_targets() {
        for status in [
            OrderStatus::Rejected,
            OrderStatus::Archived,
            OrderStatus::Returned,
        ] {
            assert!(status.allowed_targets().is_empty(), "{status}");
        }
    }

    #[test]
    fn rejected_to_confirmed_is_invalid() {
        let err = OrderStatus::Rejected
            .validate_transition(OrderStatus::Confirmed)
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTransition {
                from: OrderStatus::Rejected,
                to: OrderStatus::Confirmed
            }
        ));
    }

    #[test]
    fn only_rejected_and_returned_release_stock() {
        let releasing: Vec<_> = ALL_STATUSES
            .into_iter()
            .filter(|s| s.releases_stock())
            .collect();
        assert_eq!(releasing, vec![OrderStatus::Rejected, OrderStatus::Returned]);
    }
}
