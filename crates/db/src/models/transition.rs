//! Order status transition log (append-only).

use serde::Serialize;
use sqlx::FromRow;
use tourbook_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// A row from the `order_status_transitions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderTransition {
    pub id: DbId,
    pub order_id: DbId,
    pub from_status_id: StatusId,
    pub to_status_id: StatusId,
    pub triggered_by: DbId,
    pub reason: Option<String>,
    pub stock_released: i32,
    pub transitioned_at: Timestamp,
}

/// Insert payload for one transition.
#[derive(Debug, Clone)]
pub struct NewOrderTransition {
    pub order_id: DbId,
    pub from_status_id: StatusId,
    pub to_status_id: StatusId,
    pub triggered_by: DbId,
    pub reason: Option<String>,
    pub stock_released: i32,
}
