//! Repository for the `order_status_transitions` audit log.

use sqlx::{PgConnection, PgPool};
use tourbook_core::types::DbId;

use crate::models::transition::{NewOrderTransition, OrderTransition};

/// Column list for `order_status_transitions` queries.
const COLUMNS: &str = "\
    id, order_id, from_status_id, to_status_id, triggered_by, reason, \
    stock_released, transitioned_at";

/// Append-only access to order status history.
pub struct TransitionRepo;

impl TransitionRepo {
    /// Append one transition inside the lifecycle transaction.
    pub async fn record(
        conn: &mut PgConnection,
        input: &NewOrderTransition,
    ) -> Result<OrderTransition, sqlx::Error> {
        let query = format!(
            "INSERT INTO order_status_transitions \
                 (order_id, from_status_id, to_status_id, triggered_by, reason, stock_released) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OrderTransition>(&query)
            .bind(input.order_id)
            .bind(input.from_status_id)
            .bind(input.to_status_id)
            .bind(input.triggered_by)
            .bind(&input.reason)
            .bind(input.stock_released)
            .fetch_one(conn)
            .await
    }

    /// List an order's transitions, oldest first.
    pub async fn list_for_order(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<OrderTransition>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM order_status_transitions \
             WHERE order_id = $1 ORDER BY transitioned_at ASC, id ASC"
        );
        sqlx::query_as::<_, OrderTransition>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }
}
