//! Repository for the `orders` table.
//!
//! Orders are never deleted; status changes go through
//! [`OrderRepo::update_status`] inside the lifecycle transaction.

use sqlx::{PgConnection, PgPool};
use tourbook_core::order_status::OUTSTANDING_STATUSES;
use tourbook_core::types::DbId;

use crate::models::order::{NewOrder, Order, OrderListQuery, OrderScope};
use crate::models::status::StatusId;

/// Column list for `orders` queries.
const COLUMNS: &str = "\
    id, order_number, product_id, travel_date, schedule_entry_id, \
    adults, children_no_bed, children_with_bed, infants, quantity, \
    unit_price, total_price, customer_id, agent_id, \
    contact_name, contact_phone, contact_email, notes, \
    status_id, created_at, updated_at";

/// Same columns qualified with the `o` alias for joined queries.
const O_COLUMNS: &str = "\
    o.id, o.order_number, o.product_id, o.travel_date, o.schedule_entry_id, \
    o.adults, o.children_no_bed, o.children_with_bed, o.infants, o.quantity, \
    o.unit_price, o.total_price, o.customer_id, o.agent_id, \
    o.contact_name, o.contact_phone, o.contact_email, o.notes, \
    o.status_id, o.created_at, o.updated_at";

/// Scope predicate shared by listing and single-order visibility.
/// Binds: `$1` customer, `$2` merchant, `$3` agent.
const SCOPE_FILTER: &str = "\
    ($1::BIGINT IS NULL OR o.customer_id = $1) \
    AND ($2::BIGINT IS NULL OR p.merchant_id = $2) \
    AND ($3::BIGINT IS NULL OR o.agent_id = $3)";

/// Maximum page size for order listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for order listing.
const DEFAULT_LIMIT: i64 = 50;

/// Clamp a requested page size into `1..=MAX_LIMIT`.
pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Clamp a requested offset to be non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Provides persistence for bookings.
pub struct OrderRepo;

impl OrderRepo {
    /// Insert a new order row.
    pub async fn insert(conn: &mut PgConnection, input: &NewOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders \
                 (order_number, product_id, travel_date, schedule_entry_id, \
                  adults, children_no_bed, children_with_bed, infants, quantity, \
                  unit_price, total_price, customer_id, agent_id, \
                  contact_name, contact_phone, contact_email, notes, status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(&input.order_number)
            .bind(input.product_id)
            .bind(input.travel_date)
            .bind(input.schedule_entry_id)
            .bind(input.adults)
            .bind(input.children_no_bed)
            .bind(input.children_with_bed)
            .bind(input.infants)
            .bind(input.quantity)
            .bind(input.unit_price)
            .bind(input.total_price)
            .bind(input.customer_id)
            .bind(input.agent_id)
            .bind(&input.contact_name)
            .bind(&input.contact_phone)
            .bind(&input.contact_email)
            .bind(&input.notes)
            .bind(input.status_id)
            .fetch_one(conn)
            .await
    }

    /// Find an order by its human-readable number.
    pub async fn find_by_number(
        pool: &PgPool,
        order_number: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE order_number = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(order_number)
            .fetch_optional(pool)
            .await
    }

    /// Load and row-lock an order for a status change.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Set the status of a locked order.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: DbId,
        status_id: StatusId,
    ) -> Result<Order, sqlx::Error> {
        let query = format!(
            "UPDATE orders SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(id)
            .bind(status_id)
            .fetch_one(conn)
            .await
    }

    /// Count orders still holding seats taken from one schedule entry.
    ///
    /// Unscheduled orders (`schedule_entry_id IS NULL`) hold no seats and
    /// are never counted.
    pub async fn count_outstanding_for_entry(
        conn: &mut PgConnection,
        schedule_entry_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let statuses: Vec<StatusId> = OUTSTANDING_STATUSES.iter().map(|s| s.id()).collect();
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM orders \
             WHERE schedule_entry_id = $1 AND status_id = ANY($2)",
        )
        .bind(schedule_entry_id)
        .bind(&statuses)
        .fetch_one(conn)
        .await
    }

    /// List orders within a scope, newest first.
    pub async fn list(pool: &PgPool, params: &OrderListQuery) -> Result<Vec<Order>, sqlx::Error> {
        let (customer_id, merchant_id, agent_id) = params.scope.binds();
        let query = format!(
            "SELECT {O_COLUMNS} FROM orders o \
             JOIN products p ON p.id = o.product_id \
             WHERE {SCOPE_FILTER} \
               AND ($4::SMALLINT IS NULL OR o.status_id = $4) \
             ORDER BY o.created_at DESC, o.id DESC \
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(customer_id)
            .bind(merchant_id)
            .bind(agent_id)
            .bind(params.status_id)
            .bind(clamp_limit(params.limit))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Find one order if it falls within `scope`.
    pub async fn find_in_scope(
        pool: &PgPool,
        id: DbId,
        scope: OrderScope,
    ) -> Result<Option<Order>, sqlx::Error> {
        let (customer_id, merchant_id, agent_id) = scope.binds();
        let query = format!(
            "SELECT {O_COLUMNS} FROM orders o \
             JOIN products p ON p.id = o.product_id \
             WHERE {SCOPE_FILTER} AND o.id = $4"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(customer_id)
            .bind(merchant_id)
            .bind(agent_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
