//! Per-date price/inventory models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tourbook_core::types::{DbId, Money, Timestamp, TravelDate};

/// A row from the `schedule_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduleEntry {
    pub id: DbId,
    pub product_id: DbId,
    pub travel_date: TravelDate,
    pub price: Money,
    pub total_stock: i32,
    pub available_stock: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for setting price and capacity on a single date.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertScheduleEntry {
    pub price: Money,
    pub total_stock: i32,
}

/// One date in a batch upsert.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchScheduleItem {
    pub travel_date: TravelDate,
    pub price: Money,
    pub total_stock: i32,
}

/// Optional inclusive date range for schedule reads.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScheduleRange {
    pub from: Option<TravelDate>,
    pub to: Option<TravelDate>,
}
