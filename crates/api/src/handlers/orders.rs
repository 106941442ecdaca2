//! Handlers for booking, order status changes, and role-scoped order reads.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tourbook_booking::visibility;
use tourbook_booking::ReserveRequest;
use tourbook_core::order_status::OrderStatus;
use tourbook_core::types::DbId;
use tourbook_db::models::order::Order;
use tourbook_db::models::transition::OrderTransition;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireBooker, RequireMerchant};
use crate::query::OrderListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// An order with its status spelled out.
#[derive(Debug, Serialize)]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub status: OrderStatus,
}

impl TryFrom<Order> for OrderView {
    type Error = tourbook_core::error::CoreError;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        let status = OrderStatus::from_id(order.status_id)?;
        Ok(Self { order, status })
    }
}

/// One audit row with status names.
#[derive(Debug, Serialize)]
pub struct TransitionView {
    #[serde(flatten)]
    pub transition: OrderTransition,
    pub from_status: OrderStatus,
    pub to_status: OrderStatus,
}

impl TryFrom<OrderTransition> for TransitionView {
    type Error = tourbook_core::error::CoreError;

    fn try_from(transition: OrderTransition) -> Result<Self, Self::Error> {
        Ok(Self {
            from_status: OrderStatus::from_id(transition.from_status_id)?,
            to_status: OrderStatus::from_id(transition.to_status_id)?,
            transition,
        })
    }
}

/// Body of `POST /orders/{order_id}/transition`.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// Target status name, e.g. `confirmed`.
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Response of a successful transition.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub order: OrderView,
    pub stock_released: i32,
}

/// POST /api/v1/orders
///
/// Reserve seats and create a `pending` order. Returns 201 with the order.
pub async fn create_order(
    RequireBooker(user): RequireBooker,
    State(state): State<AppState>,
    Json(input): Json<ReserveRequest>,
) -> AppResult<impl IntoResponse> {
    let order = state.reservations.reserve(&user.actor(), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: OrderView::try_from(order)?,
        }),
    ))
}

/// GET /api/v1/orders?status=&limit=&offset=
pub async fn list_orders(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> AppResult<impl IntoResponse> {
    let status = params
        .status
        .as_deref()
        .map(OrderStatus::parse)
        .transpose()?;
    let orders = visibility::list_orders(
        &state.pool,
        &auth.actor(),
        status,
        params.limit,
        params.offset,
    )
    .await?;
    let data = orders
        .into_iter()
        .map(OrderView::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/orders/{order_id}
///
/// 404 for orders outside the caller's scope.
pub async fn get_order(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = visibility::get_order(&state.pool, &auth.actor(), order_id).await?;
    Ok(Json(DataResponse {
        data: OrderView::try_from(order)?,
    }))
}

/// GET /api/v1/orders/number/{order_number}
///
/// Same 404 for unknown numbers and orders outside the caller's scope.
pub async fn get_order_by_number(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> AppResult<impl IntoResponse> {
    let order =
        visibility::get_order_by_number(&state.pool, &auth.actor(), order_number.trim()).await?;
    Ok(Json(DataResponse {
        data: OrderView::try_from(order)?,
    }))
}

/// POST /api/v1/orders/{order_id}/transition
pub async fn transition_order(
    RequireMerchant(user): RequireMerchant,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
    Json(input): Json<TransitionRequest>,
) -> AppResult<impl IntoResponse> {
    let target = OrderStatus::parse(input.status.trim())?;
    let outcome = state
        .lifecycle
        .transition(&user.actor(), order_id, target, input.reason)
        .await?;
    let stock_released = outcome.stock_released();
    Ok(Json(DataResponse {
        data: TransitionResponse {
            order: OrderView::try_from(outcome.order)?,
            stock_released,
        },
    }))
}

/// GET /api/v1/orders/{order_id}/transitions
///
/// Oldest first.
pub async fn list_transitions(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(order_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let transitions =
        visibility::list_transitions(&state.pool, &auth.actor(), order_id).await?;
    let data = transitions
        .into_iter()
        .map(TransitionView::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data }))
}
