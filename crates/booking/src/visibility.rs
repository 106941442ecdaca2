//! Role-scoped order reads.
//!
//! Customers see their own orders, agents the orders they referred,
//! merchants the orders on their products, admins everything. An order
//! outside the caller's scope is reported as not found.

use sqlx::PgPool;
use tourbook_core::error::CoreError;
use tourbook_core::order_status::OrderStatus;
use tourbook_core::roles::{Actor, Role};
use tourbook_core::types::DbId;
use tourbook_db::models::order::{Order, OrderListQuery, OrderScope};
use tourbook_db::models::transition::OrderTransition;
use tourbook_db::repositories::{OrderRepo, TransitionRepo};

use crate::error::BookingResult;

/// The listing filter for `actor`.
pub fn scope_for(actor: &Actor) -> OrderScope {
    match actor.role {
        Role::Admin => OrderScope::All,
        Role::Customer => OrderScope::Customer(actor.user_id),
        Role::Merchant => OrderScope::Merchant(actor.user_id),
        Role::Agent => OrderScope::Agent(actor.user_id),
    }
}

/// Orders visible to `actor`, newest first.
pub async fn list_orders(
    pool: &PgPool,
    actor: &Actor,
    status: Option<OrderStatus>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> BookingResult<Vec<Order>> {
    let query = OrderListQuery {
        scope: scope_for(actor),
        status_id: status.map(OrderStatus::id),
        limit,
        offset,
    };
    Ok(OrderRepo::list(pool, &query).await?)
}

/// One order, if `actor` may see it.
pub async fn get_order(pool: &PgPool, actor: &Actor, order_id: DbId) -> BookingResult<Order> {
    OrderRepo::find_in_scope(pool, order_id, scope_for(actor))
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "Order",
                id: order_id,
            }
            .into()
        })
}

/// One order by its `TB...` number, if `actor` may see it.
///
/// Unknown numbers and orders outside the caller's scope fail the same
/// way, so a number never reveals the id behind it.
pub async fn get_order_by_number(
    pool: &PgPool,
    actor: &Actor,
    order_number: &str,
) -> BookingResult<Order> {
    let order = OrderRepo::find_by_number(pool, order_number)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    Ok(OrderRepo::find_in_scope(pool, order.id, scope_for(actor))
        .await?
        .ok_or(sqlx::Error::RowNotFound)?)
}

/// Status history of a visible order, oldest first.
pub async fn list_transitions(
    pool: &PgPool,
    actor: &Actor,
    order_id: DbId,
) -> BookingResult<Vec<OrderTransition>> {
    let order = get_order(pool, actor, order_id).await?;
    Ok(TransitionRepo::list_for_order(pool, order.id).await?)
}
