//! Product projection used by booking (ownership and fallback price).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tourbook_core::types::{DbId, Money, Timestamp};

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub merchant_id: DbId,
    pub title: String,
    pub base_price: Money,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a product projection.
#[derive(Debug, Deserialize)]
pub struct CreateProduct {
    pub merchant_id: DbId,
    pub title: String,
    pub base_price: Money,
}
