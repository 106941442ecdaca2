//! Order Lifecycle Manager.
//!
//! Moves orders through the status table in [`OrderStatus::allowed_targets`].
//! Entering `rejected` or `returned` hands the order's seats back to its
//! schedule entry in the same transaction as the status change and the
//! audit record.
//!
//! Lock order is order row, then schedule row. Reservations and schedule
//! edits only ever take the schedule row, so the two paths cannot deadlock.

use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use tourbook_core::error::CoreError;
use tourbook_core::order_status::OrderStatus;
use tourbook_core::roles::Actor;
use tourbook_core::schedule::restore_available;
use tourbook_core::types::DbId;
use tourbook_db::models::order::Order;
use tourbook_db::models::transition::{NewOrderTransition, OrderTransition};
use tourbook_db::repositories::{OrderRepo, ProductRepo, ScheduleRepo, TransitionRepo};

use crate::config::BookingConfig;
use crate::error::BookingResult;
use crate::tx::{begin_bounded, with_conflict_retry};

/// Result of a successful transition.
#[derive(Debug, Clone, Serialize)]
pub struct TransitionOutcome {
    pub order: Order,
    pub transition: OrderTransition,
}

impl TransitionOutcome {
    /// Seats returned to the schedule by this transition.
    pub fn stock_released(&self) -> i32 {
        self.transition.stock_released
    }
}

/// Status changes for existing orders.
#[derive(Clone)]
pub struct OrderLifecycle {
    pool: PgPool,
    config: BookingConfig,
}

impl OrderLifecycle {
    pub fn new(pool: PgPool, config: BookingConfig) -> Self {
        Self { pool, config }
    }

    /// Move `order_id` to `target`.
    ///
    /// Only the merchant owning the order's product, or an admin, may do
    /// this. Illegal moves fail with `InvalidTransition` and change nothing.
    pub async fn transition(
        &self,
        actor: &Actor,
        order_id: DbId,
        target: OrderStatus,
        reason: Option<String>,
    ) -> BookingResult<TransitionOutcome> {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        with_conflict_retry(self.config.max_conflict_retries, "Order transition", || {
            self.try_transition(actor, order_id, target, reason.clone())
        })
        .await
    }

    async fn try_transition(
        &self,
        actor: &Actor,
        order_id: DbId,
        target: OrderStatus,
        reason: Option<String>,
    ) -> BookingResult<TransitionOutcome> {
        let mut tx = begin_bounded(&self.pool, &self.config).await?;

        let order = OrderRepo::lock(&mut *tx, order_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Order",
                id: order_id,
            })?;
        let product = ProductRepo::find_by_id(&mut *tx, order.product_id)
            .await?
            .ok_or_else(|| {
                CoreError::Internal(format!(
                    "Order {} references missing product {}",
                    order.id, order.product_id
                ))
            })?;
        actor.ensure_manages_product(product.merchant_id)?;

        let from = OrderStatus::from_id(order.status_id)?;
        from.validate_transition(target)?;

        let stock_released = if target.releases_stock() {
            release_seats(&mut *tx, &order).await?
        } else {
            0
        };

        let updated = OrderRepo::update_status(&mut *tx, order.id, target.id()).await?;
        let transition = TransitionRepo::record(
            &mut *tx,
            &NewOrderTransition {
                order_id: order.id,
                from_status_id: from.id(),
                to_status_id: target.id(),
                triggered_by: actor.user_id,
                reason,
                stock_released,
            },
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            order_number = %order.order_number,
            from = %from,
            to = %target,
            stock_released,
            user_id = actor.user_id,
            "Order status changed",
        );
        Ok(TransitionOutcome {
            order: updated,
            transition,
        })
    }
}

/// Return an order's seats to the entry they were taken from.
///
/// Returns the number of seats actually handed back. Unscheduled orders
/// and orders whose entry was replaced release nothing; a release that
/// would exceed `total_stock` is capped.
async fn release_seats(conn: &mut PgConnection, order: &Order) -> BookingResult<i32> {
    let Some(entry_id) = order.schedule_entry_id else {
        return Ok(0);
    };

    let entry = match ScheduleRepo::lock(conn, order.product_id, order.travel_date).await? {
        Some(entry) if entry.id == entry_id => entry,
        _ => {
            tracing::warn!(
                order_id = order.id,
                product_id = order.product_id,
                travel_date = %order.travel_date,
                "Schedule entry for order is gone; skipping stock release",
            );
            return Ok(0);
        }
    };

    let released = ScheduleRepo::release_stock(conn, entry.id, order.quantity).await?;
    let handed_back =
        restore_available(entry.available_stock, entry.total_stock, order.quantity)
            - entry.available_stock;
    debug_assert_eq!(released.available_stock, entry.available_stock + handed_back);
    if handed_back < order.quantity {
        tracing::warn!(
            order_id = order.id,
            quantity = order.quantity,
            handed_back,
            total_stock = released.total_stock,
            "Stock release capped at total_stock",
        );
    }
    Ok(handed_back)
}
