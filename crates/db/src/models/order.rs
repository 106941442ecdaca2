//! Order models and listing filters.

use serde::Serialize;
use sqlx::FromRow;
use tourbook_core::types::{DbId, Money, Timestamp, TravelDate};

use super::status::StatusId;

/// A row from the `orders` table.
///
/// `unit_price`, `quantity`, and `total_price` are a snapshot taken at
/// booking time and never follow later schedule edits.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub order_number: String,
    pub product_id: DbId,
    pub travel_date: TravelDate,
    /// Schedule row the seats came from; `None` for unscheduled bookings.
    pub schedule_entry_id: Option<DbId>,
    pub adults: i32,
    pub children_no_bed: i32,
    pub children_with_bed: i32,
    pub infants: i32,
    pub quantity: i32,
    pub unit_price: Money,
    pub total_price: Money,
    pub customer_id: DbId,
    pub agent_id: Option<DbId>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload built by the reservation engine.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub product_id: DbId,
    pub travel_date: TravelDate,
    /// Schedule row the seats came from; `None` for unscheduled bookings.
    pub schedule_entry_id: Option<DbId>,
    pub adults: i32,
    pub children_no_bed: i32,
    pub children_with_bed: i32,
    pub infants: i32,
    pub quantity: i32,
    pub unit_price: Money,
    pub total_price: Money,
    pub customer_id: DbId,
    pub agent_id: Option<DbId>,
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: Option<String>,
    pub notes: Option<String>,
    pub status_id: StatusId,
}

/// Which orders a listing may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    All,
    Customer(DbId),
    /// Orders whose product belongs to this merchant.
    Merchant(DbId),
    /// Orders this agent referred.
    Agent(DbId),
}

impl OrderScope {
    /// `(customer_id, merchant_id, agent_id)` bind values; `None` means unfiltered.
    pub(crate) fn binds(self) -> (Option<DbId>, Option<DbId>, Option<DbId>) {
        match self {
            Self::All => (None, None, None),
            Self::Customer(id) => (Some(id), None, None),
            Self::Merchant(id) => (None, Some(id), None),
            Self::Agent(id) => (None, None, Some(id)),
        }
    }
}

/// Filter and page for order listings.
#[derive(Debug, Clone, Copy)]
pub struct OrderListQuery {
    pub scope: OrderScope,
    pub status_id: Option<StatusId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
