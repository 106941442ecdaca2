//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role can
//! never perform the operation. Per-product ownership is checked again in
//! the booking layer.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tourbook_core::error::CoreError;
use tourbook_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `merchant` or `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn edit_schedule(RequireMerchant(user): RequireMerchant) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireMerchant(pub AuthUser);

impl FromRequestParts<AppState> for RequireMerchant {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !matches!(user.role, Role::Merchant | Role::Admin) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Merchant or Admin role required".into(),
            )));
        }
        Ok(RequireMerchant(user))
    }
}

/// Requires a role that may place orders: `customer`, `agent`, or `admin`.
pub struct RequireBooker(pub AuthUser);

impl FromRequestParts<AppState> for RequireBooker {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.actor().can_place_orders() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Customer, Agent, or Admin role required".into(),
            )));
        }
        Ok(RequireBooker(user))
    }
}
