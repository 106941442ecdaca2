//! Repository for the `products` table.

use sqlx::{PgExecutor, PgPool};
use tourbook_core::types::DbId;

use crate::models::product::{CreateProduct, Product};

/// Column list for `products` queries.
const COLUMNS: &str = "id, merchant_id, title, base_price, created_at, updated_at";

/// Provides lookups over the product projection.
pub struct ProductRepo;

impl ProductRepo {
    /// Register a product projection.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (merchant_id, title, base_price) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(input.merchant_id)
            .bind(&input.title)
            .bind(input.base_price)
            .fetch_one(pool)
            .await
    }

    /// Find a product by its ID.
    pub async fn find_by_id<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
