//! Handlers for per-date schedule reads and merchant edits.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tourbook_booking::schedule_store::BatchUpsertResult;
use tourbook_core::types::{DbId, TravelDate};
use tourbook_db::models::schedule::{
    BatchScheduleItem, ScheduleEntry, ScheduleRange, UpsertScheduleEntry,
};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireMerchant;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /products/{product_id}/schedule/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchUpsertRequest {
    pub entries: Vec<BatchScheduleItem>,
}

/// Per-date outcome of a batch upsert.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchItemResult {
    Ok {
        travel_date: TravelDate,
        ok: bool,
        entry: ScheduleEntry,
    },
    Failed {
        travel_date: TravelDate,
        ok: bool,
        code: &'static str,
        error: String,
    },
}

impl From<BatchUpsertResult> for BatchItemResult {
    fn from(result: BatchUpsertResult) -> Self {
        match result.outcome {
            Ok(entry) => Self::Ok {
                travel_date: result.travel_date,
                ok: true,
                entry,
            },
            Err(err) => {
                let parts = AppError::from(err).parts();
                Self::Failed {
                    travel_date: result.travel_date,
                    ok: false,
                    code: parts.code,
                    error: parts.message,
                }
            }
        }
    }
}

/// GET /api/v1/products/{product_id}/schedule?from=&to=
///
/// Ascending by date. Open to any authenticated user.
pub async fn get_schedule(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
    Query(range): Query<ScheduleRange>,
) -> AppResult<impl IntoResponse> {
    let entries = state.schedule_store.get_schedule(product_id, range).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// PUT /api/v1/products/{product_id}/schedule/{travel_date}
pub async fn upsert_schedule(
    RequireMerchant(user): RequireMerchant,
    State(state): State<AppState>,
    Path((product_id, travel_date)): Path<(DbId, TravelDate)>,
    Json(input): Json<UpsertScheduleEntry>,
) -> AppResult<impl IntoResponse> {
    let entry = state
        .schedule_store
        .upsert(
            &user.actor(),
            product_id,
            travel_date,
            input.price,
            input.total_stock,
        )
        .await?;
    Ok(Json(DataResponse { data: entry }))
}

/// POST /api/v1/products/{product_id}/schedule/batch
///
/// Always 200 once the batch itself is accepted; inspect each item's `ok`.
pub async fn batch_upsert_schedule(
    RequireMerchant(user): RequireMerchant,
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
    Json(input): Json<BatchUpsertRequest>,
) -> AppResult<impl IntoResponse> {
    let results = state
        .schedule_store
        .batch_upsert(&user.actor(), product_id, &input.entries)
        .await?;
    let data: Vec<BatchItemResult> = results.into_iter().map(Into::into).collect();
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/products/{product_id}/schedule/{travel_date}
pub async fn delete_schedule(
    RequireMerchant(user): RequireMerchant,
    State(state): State<AppState>,
    Path((product_id, travel_date)): Path<(DbId, TravelDate)>,
) -> AppResult<StatusCode> {
    state
        .schedule_store
        .delete(&user.actor(), product_id, travel_date)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
