//! Schedule Store: per-date price and capacity CRUD.
//!
//! Writes are restricted to the owning merchant (or an admin). Each date is
//! its own transaction, so a batch reports per-date outcomes instead of
//! rolling everything back on the first bad row.

use sqlx::PgPool;
use tourbook_core::error::CoreError;
use tourbook_core::roles::Actor;
use tourbook_core::schedule::{rebalance_available, validate_batch_size, validate_schedule_input};
use tourbook_core::types::{DbId, Money, TravelDate};
use tourbook_db::models::product::Product;
use tourbook_db::models::schedule::{BatchScheduleItem, ScheduleEntry, ScheduleRange};
use tourbook_db::repositories::{OrderRepo, ProductRepo, ScheduleRepo};

use crate::config::BookingConfig;
use crate::error::BookingResult;
use crate::tx::{begin_bounded, with_conflict_retry};

/// Outcome for one date of a batch upsert.
#[derive(Debug)]
pub struct BatchUpsertResult {
    pub travel_date: TravelDate,
    pub outcome: BookingResult<ScheduleEntry>,
}

/// Durable CRUD over schedule entries.
#[derive(Clone)]
pub struct ScheduleStore {
    pool: PgPool,
    config: BookingConfig,
}

impl ScheduleStore {
    pub fn new(pool: PgPool, config: BookingConfig) -> Self {
        Self { pool, config }
    }

    /// Create or replace the entry for one date.
    ///
    /// A new entry starts fully available. On replace, capacity changes are
    /// applied to `available_stock` via [`rebalance_available`].
    pub async fn upsert(
        &self,
        actor: &Actor,
        product_id: DbId,
        travel_date: TravelDate,
        price: Money,
        total_stock: i32,
    ) -> BookingResult<ScheduleEntry> {
        validate_schedule_input(price, total_stock)?;
        self.load_managed_product(actor, product_id).await?;
        self.upsert_checked(product_id, travel_date, price, total_stock)
            .await
    }

    /// Apply [`ScheduleStore::upsert`] to each date independently.
    ///
    /// Only a missing product, a forbidden actor, or an empty/oversize batch
    /// fail the whole call; everything else is reported per date.
    pub async fn batch_upsert(
        &self,
        actor: &Actor,
        product_id: DbId,
        items: &[BatchScheduleItem],
    ) -> BookingResult<Vec<BatchUpsertResult>> {
        validate_batch_size(items.len())?;
        self.load_managed_product(actor, product_id).await?;

        let mut results = Vec::with_capacity(items.len());
        for item in items {
            let outcome = match validate_schedule_input(item.price, item.total_stock) {
                Ok(()) => {
                    self.upsert_checked(product_id, item.travel_date, item.price, item.total_stock)
                        .await
                }
                Err(e) => Err(e.into()),
            };
            if let Err(e) = &outcome {
                tracing::info!(
                    product_id,
                    travel_date = %item.travel_date,
                    error = %e,
                    "Batch schedule item failed",
                );
            }
            results.push(BatchUpsertResult {
                travel_date: item.travel_date,
                outcome,
            });
        }

        let failed = results.iter().filter(|r| r.outcome.is_err()).count();
        tracing::info!(
            product_id,
            total = results.len(),
            failed,
            "Batch schedule upsert finished",
        );
        Ok(results)
    }

    /// A product's schedule, ascending by date.
    pub async fn get_schedule(
        &self,
        product_id: DbId,
        range: ScheduleRange,
    ) -> BookingResult<Vec<ScheduleEntry>> {
        if let (Some(from), Some(to)) = (range.from, range.to) {
            if from > to {
                return Err(CoreError::Validation(format!(
                    "from ({from}) must not be after to ({to})"
                ))
                .into());
            }
        }
        ProductRepo::find_by_id(&self.pool, product_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Product",
                id: product_id,
            })?;
        Ok(ScheduleRepo::list(&self.pool, product_id, range).await?)
    }

    /// Remove the entry for a date.
    ///
    /// Fails with `Conflict` while pending or confirmed orders still hold
    /// seats on that date. The row lock serializes this against concurrent
    /// reservations, so no order can slip in between the check and the delete.
    pub async fn delete(
        &self,
        actor: &Actor,
        product_id: DbId,
        travel_date: TravelDate,
    ) -> BookingResult<()> {
        self.load_managed_product(actor, product_id).await?;
        with_conflict_retry(self.config.max_conflict_retries, "Schedule delete", || {
            self.try_delete(product_id, travel_date)
        })
        .await
    }

    async fn try_delete(&self, product_id: DbId, travel_date: TravelDate) -> BookingResult<()> {
        let mut tx = begin_bounded(&self.pool, &self.config).await?;

        let entry = ScheduleRepo::lock(&mut *tx, product_id, travel_date)
            .await?
            .ok_or(CoreError::ScheduleNotFound {
                product_id,
                travel_date,
            })?;

        let outstanding = OrderRepo::count_outstanding_for_entry(&mut *tx, entry.id).await?;
        if outstanding > 0 {
            return Err(CoreError::Conflict(format!(
                "{outstanding} outstanding order(s) reference {travel_date}; \
                 reject or archive them before deleting the date"
            ))
            .into());
        }

        ScheduleRepo::delete(&mut *tx, entry.id).await?;
        tx.commit().await?;

        tracing::info!(product_id, travel_date = %travel_date, "Schedule entry deleted");
        Ok(())
    }

    async fn upsert_checked(
        &self,
        product_id: DbId,
        travel_date: TravelDate,
        price: Money,
        total_stock: i32,
    ) -> BookingResult<ScheduleEntry> {
        with_conflict_retry(self.config.max_conflict_retries, "Schedule upsert", || {
            self.try_upsert(product_id, travel_date, price, total_stock)
        })
        .await
    }

    async fn try_upsert(
        &self,
        product_id: DbId,
        travel_date: TravelDate,
        price: Money,
        total_stock: i32,
    ) -> BookingResult<ScheduleEntry> {
        let mut tx = begin_bounded(&self.pool, &self.config).await?;

        if let Some(created) =
            ScheduleRepo::insert_if_absent(&mut *tx, product_id, travel_date, price, total_stock)
                .await?
        {
            tx.commit().await?;
            tracing::info!(
                product_id,
                travel_date = %travel_date,
                price = %price,
                total_stock,
                "Schedule entry created",
            );
            return Ok(created);
        }

        // The row existed at insert time but may have been deleted since.
        let existing = ScheduleRepo::lock(&mut *tx, product_id, travel_date)
            .await?
            .ok_or_else(|| {
                CoreError::Conflict(format!(
                    "Schedule for {travel_date} changed concurrently; please retry"
                ))
            })?;

        let available = rebalance_available(
            existing.total_stock,
            existing.available_stock,
            total_stock,
        );
        let updated =
            ScheduleRepo::update_capacity(&mut *tx, existing.id, price, total_stock, available)
                .await?;
        tx.commit().await?;

        tracing::info!(
            product_id,
            travel_date = %travel_date,
            price = %price,
            old_total = existing.total_stock,
            total_stock,
            old_available = existing.available_stock,
            available_stock = available,
            "Schedule entry updated",
        );
        Ok(updated)
    }

    async fn load_managed_product(&self, actor: &Actor, product_id: DbId) -> BookingResult<Product> {
        let product = ProductRepo::find_by_id(&self.pool, product_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Product",
                id: product_id,
            })?;
        actor.ensure_manages_product(product.merchant_id)?;
        Ok(product)
    }
}
