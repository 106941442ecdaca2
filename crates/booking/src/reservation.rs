//! Reservation Engine: turns a booking request into an order with stock taken.
//!
//! One transaction per attempt:
//!
//! 1. Row-lock the schedule entry for `(product_id, travel_date)`.
//! 2. Check the party against `available_stock`.
//! 3. Decrement `available_stock`.
//! 4. Insert the order with the schedule price as its snapshot.
//! 5. Commit.
//!
//! Concurrent reservations on the same date queue on the row lock, so the
//! sum of accepted parties never exceeds the stock. Any failure before the
//! commit drops the transaction and leaves the stock untouched.

use chrono::Utc;
use serde::Deserialize;
use sqlx::PgPool;
use tourbook_core::contact::ContactInfo;
use tourbook_core::error::CoreError;
use tourbook_core::order_number;
use tourbook_core::order_status::OrderStatus;
use tourbook_core::party::{total_price, PartyComposition};
use tourbook_core::roles::{Actor, Role};
use tourbook_core::types::{DbId, TravelDate};
use tourbook_db::models::order::{NewOrder, Order};
use tourbook_db::repositories::{OrderRepo, ProductRepo, ScheduleRepo};

use crate::config::BookingConfig;
use crate::error::BookingResult;
use crate::tx::{begin_bounded, with_conflict_retry};

/// A customer's request for seats on one date.
#[derive(Debug, Clone, Deserialize)]
pub struct ReserveRequest {
    pub product_id: DbId,
    pub travel_date: TravelDate,
    #[serde(flatten)]
    pub party: PartyComposition,
    #[serde(flatten)]
    pub contact: ContactInfo,
    /// Customer the booking is for. Required when an agent or admin books;
    /// must match the caller (or be omitted) when a customer books.
    #[serde(default)]
    pub customer_id: Option<DbId>,
    /// Referring agent. Ignored when an agent books (the agent is the referrer).
    #[serde(default)]
    pub agent_id: Option<DbId>,
}

/// Who the order is for and who referred it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Parties {
    customer_id: DbId,
    agent_id: Option<DbId>,
}

fn resolve_parties(actor: &Actor, request: &ReserveRequest) -> Result<Parties, CoreError> {
    match actor.role {
        Role::Customer => {
            if request.customer_id.is_some_and(|id| id != actor.user_id) {
                return Err(CoreError::Forbidden(
                    "Customers may only book for themselves".into(),
                ));
            }
            Ok(Parties {
                customer_id: actor.user_id,
                agent_id: request.agent_id,
            })
        }
        Role::Agent => Ok(Parties {
            customer_id: request.customer_id.ok_or_else(|| {
                CoreError::Validation("customer_id is required when booking as an agent".into())
            })?,
            agent_id: Some(actor.user_id),
        }),
        Role::Admin => Ok(Parties {
            customer_id: request.customer_id.ok_or_else(|| {
                CoreError::Validation("customer_id is required when booking as an admin".into())
            })?,
            agent_id: request.agent_id,
        }),
        Role::Merchant => Err(CoreError::Forbidden("Merchants cannot place orders".into())),
    }
}

/// Atomic entry point for bookings.
#[derive(Clone)]
pub struct ReservationEngine {
    pool: PgPool,
    config: BookingConfig,
}

impl ReservationEngine {
    pub fn new(pool: PgPool, config: BookingConfig) -> Self {
        Self { pool, config }
    }

    /// Reserve seats and create a `pending` order, or fail with no side effects.
    ///
    /// Errors: `Validation`, `Forbidden`, `NotFound` (product),
    /// `ScheduleNotFound`, `InsufficientStock`, or `Conflict` once the
    /// bounded retries are used up.
    pub async fn reserve(&self, actor: &Actor, request: ReserveRequest) -> BookingResult<Order> {
        let parties = resolve_parties(actor, &request)?;
        request.party.validate()?;
        let contact = request.contact.clone().normalized();
        contact.validate()?;

        let today = Utc::now().date_naive();
        if request.travel_date < today {
            return Err(CoreError::Validation(format!(
                "travel_date {} is in the past",
                request.travel_date
            ))
            .into());
        }

        with_conflict_retry(self.config.max_conflict_retries, "Reservation", || {
            self.try_reserve(&request, &contact, parties)
        })
        .await
    }

    async fn try_reserve(
        &self,
        request: &ReserveRequest,
        contact: &ContactInfo,
        parties: Parties,
    ) -> BookingResult<Order> {
        let requested = request.party.requested();
        let mut tx = begin_bounded(&self.pool, &self.config).await?;

        let product = ProductRepo::find_by_id(&mut *tx, request.product_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Product",
                id: request.product_id,
            })?;

        let (unit_price, schedule_entry_id) =
            match ScheduleRepo::lock(&mut *tx, request.product_id, request.travel_date).await? {
                Some(entry) => {
                    if requested > entry.available_stock {
                        return Err(CoreError::InsufficientStock {
                            requested,
                            available: entry.available_stock,
                        }
                        .into());
                    }
                    ScheduleRepo::take_stock(&mut *tx, entry.id, requested)
                        .await?
                        .ok_or(CoreError::InsufficientStock {
                            requested,
                            available: entry.available_stock,
                        })?;
                    (entry.price, Some(entry.id))
                }
                None if self.config.allow_unscheduled_booking => {
                    tracing::debug!(
                        product_id = product.id,
                        travel_date = %request.travel_date,
                        "No schedule entry; booking at base price",
                    );
                    (product.base_price, None)
                }
                None => {
                    return Err(CoreError::ScheduleNotFound {
                        product_id: request.product_id,
                        travel_date: request.travel_date,
                    }
                    .into())
                }
            };

        let new_order = NewOrder {
            order_number: order_number::generate(Utc::now().date_naive()),
            product_id: request.product_id,
            travel_date: request.travel_date,
            schedule_entry_id,
            adults: request.party.adults,
            children_no_bed: request.party.children_no_bed,
            children_with_bed: request.party.children_with_bed,
            infants: request.party.infants,
            quantity: requested,
            unit_price,
            total_price: total_price(unit_price, requested),
            customer_id: parties.customer_id,
            agent_id: parties.agent_id,
            contact_name: contact.contact_name.clone(),
            contact_phone: contact.contact_phone.clone(),
            contact_email: contact.contact_email.clone(),
            notes: contact.notes.clone(),
            status_id: OrderStatus::INITIAL.id(),
        };
        let order = OrderRepo::insert(&mut *tx, &new_order).await?;
        tx.commit().await?;

        tracing::info!(
            order_id = order.id,
            order_number = %order.order_number,
            product_id = order.product_id,
            travel_date = %order.travel_date,
            quantity = order.quantity,
            total_price = %order.total_price,
            customer_id = order.customer_id,
            "Order reserved",
        );
        Ok(order)
    }
}
