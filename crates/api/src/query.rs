//! Query parameter types shared by handlers.

use serde::Deserialize;

/// `GET /orders` filters (`?status=&limit=&offset=`).
///
/// Page bounds are clamped in the repository layer via `clamp_limit` /
/// `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct OrderListParams {
    /// Status name, e.g. `pending`.
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
