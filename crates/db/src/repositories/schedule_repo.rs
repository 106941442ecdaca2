//! Repository for the `schedule_entries` table.
//!
//! Every write path locks the `(product_id, travel_date)` row with
//! `SELECT ... FOR UPDATE` inside the caller's transaction. The stock
//! counters are only changed by [`ScheduleRepo::take_stock`] and
//! [`ScheduleRepo::release_stock`] plus the capacity rebalance in an upsert.

use sqlx::{PgConnection, PgPool};
use tourbook_core::types::{DbId, Money, TravelDate};

use crate::models::schedule::{ScheduleEntry, ScheduleRange};

/// Column list for `schedule_entries` queries.
const COLUMNS: &str = "\
    id, product_id, travel_date, price, total_stock, available_stock, \
    created_at, updated_at";

/// Provides locked reads and counter updates for per-date inventory.
pub struct ScheduleRepo;

impl ScheduleRepo {
    /// Insert a fresh entry with `available_stock = total_stock`.
    ///
    /// Returns `None` if an entry for the date already exists; the caller
    /// then locks and updates it instead.
    pub async fn insert_if_absent(
        conn: &mut PgConnection,
        product_id: DbId,
        travel_date: TravelDate,
        price: Money,
        total_stock: i32,
    ) -> Result<Option<ScheduleEntry>, sqlx::Error> {
        let query = format!(
            "INSERT INTO schedule_entries \
                 (product_id, travel_date, price, total_stock, available_stock) \
             VALUES ($1, $2, $3, $4, $4) \
             ON CONFLICT (product_id, travel_date) DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleEntry>(&query)
            .bind(product_id)
            .bind(travel_date)
            .bind(price)
            .bind(total_stock)
            .fetch_optional(conn)
            .await
    }

    /// Load and row-lock the entry for a date.
    pub async fn lock(
        conn: &mut PgConnection,
        product_id: DbId,
        travel_date: TravelDate,
    ) -> Result<Option<ScheduleEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedule_entries \
             WHERE product_id = $1 AND travel_date = $2 \
             FOR UPDATE"
        );
        sqlx::query_as::<_, ScheduleEntry>(&query)
            .bind(product_id)
            .bind(travel_date)
            .fetch_optional(conn)
            .await
    }

    /// Overwrite price and capacity on a locked entry.
    pub async fn update_capacity(
        conn: &mut PgConnection,
        id: DbId,
        price: Money,
        total_stock: i32,
        available_stock: i32,
    ) -> Result<ScheduleEntry, sqlx::Error> {
        let query = format!(
            "UPDATE schedule_entries \
             SET price = $2, total_stock = $3, available_stock = $4 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleEntry>(&query)
            .bind(id)
            .bind(price)
            .bind(total_stock)
            .bind(available_stock)
            .fetch_one(conn)
            .await
    }

    /// Take `seats` from a locked entry.
    ///
    /// Guarded by `available_stock >= seats`, so this returns `None` rather
    /// than oversell even if the caller skipped its own check.
    pub async fn take_stock(
        conn: &mut PgConnection,
        id: DbId,
        seats: i32,
    ) -> Result<Option<ScheduleEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE schedule_entries \
             SET available_stock = available_stock - $2 \
             WHERE id = $1 AND available_stock >= $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleEntry>(&query)
            .bind(id)
            .bind(seats)
            .fetch_optional(conn)
            .await
    }

    /// Hand `seats` back to a locked entry, capped at `total_stock`.
    pub async fn release_stock(
        conn: &mut PgConnection,
        id: DbId,
        seats: i32,
    ) -> Result<ScheduleEntry, sqlx::Error> {
        let query = format!(
            "UPDATE schedule_entries \
             SET available_stock = LEAST(total_stock, available_stock + $2) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScheduleEntry>(&query)
            .bind(id)
            .bind(seats)
            .fetch_one(conn)
            .await
    }

    /// Delete a locked entry. Returns `true` if a row was removed.
    pub async fn delete(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM schedule_entries WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find the entry for a date without locking.
    pub async fn find(
        pool: &PgPool,
        product_id: DbId,
        travel_date: TravelDate,
    ) -> Result<Option<ScheduleEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedule_entries \
             WHERE product_id = $1 AND travel_date = $2"
        );
        sqlx::query_as::<_, ScheduleEntry>(&query)
            .bind(product_id)
            .bind(travel_date)
            .fetch_optional(pool)
            .await
    }

    /// List a product's entries ascending by date, optionally within an
    /// inclusive range. A plain snapshot read: takes no row locks.
    pub async fn list(
        pool: &PgPool,
        product_id: DbId,
        range: ScheduleRange,
    ) -> Result<Vec<ScheduleEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM schedule_entries \
             WHERE product_id = $1 \
               AND ($2::DATE IS NULL OR travel_date >= $2) \
               AND ($3::DATE IS NULL OR travel_date <= $3) \
             ORDER BY travel_date ASC"
        );
        sqlx::query_as::<_, ScheduleEntry>(&query)
            .bind(product_id)
            .bind(range.from)
            .bind(range.to)
            .fetch_all(pool)
            .await
    }
}
