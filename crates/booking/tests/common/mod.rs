//! Shared fixtures for booking integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tourbook_booking::{
    BookingConfig, OrderLifecycle, ReservationEngine, ReserveRequest, ScheduleStore,
};
use tourbook_core::contact::ContactInfo;
use tourbook_core::party::PartyComposition;
use tourbook_core::roles::{Actor, Role};
use tourbook_db::models::product::{CreateProduct, Product};
use tourbook_db::repositories::ProductRepo;

pub const MERCHANT_ID: i64 = 100;
pub const OTHER_MERCHANT_ID: i64 = 101;
pub const CUSTOMER_ID: i64 = 200;
pub const AGENT_ID: i64 = 300;
pub const ADMIN_ID: i64 = 1;

pub fn merchant() -> Actor {
    Actor::new(MERCHANT_ID, Role::Merchant)
}

pub fn other_merchant() -> Actor {
    Actor::new(OTHER_MERCHANT_ID, Role::Merchant)
}

pub fn customer() -> Actor {
    Actor::new(CUSTOMER_ID, Role::Customer)
}

pub fn agent() -> Actor {
    Actor::new(AGENT_ID, Role::Agent)
}

pub fn admin() -> Actor {
    Actor::new(ADMIN_ID, Role::Admin)
}

/// A travel date safely in the future.
pub fn travel_date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 7, day).unwrap()
}

pub fn price(units: i64) -> Decimal {
    Decimal::new(units, 0)
}

/// All three services over one pool.
pub struct Services {
    pub schedule: ScheduleStore,
    pub reservations: ReservationEngine,
    pub lifecycle: OrderLifecycle,
}

pub fn services(pool: &PgPool) -> Services {
    services_with(pool, BookingConfig::default())
}

pub fn services_with(pool: &PgPool, config: BookingConfig) -> Services {
    Services {
        schedule: ScheduleStore::new(pool.clone(), config.clone()),
        reservations: ReservationEngine::new(pool.clone(), config.clone()),
        lifecycle: OrderLifecycle::new(pool.clone(), config),
    }
}

pub async fn create_product(pool: &PgPool, merchant_id: i64) -> Product {
    ProductRepo::create(
        pool,
        &CreateProduct {
            merchant_id,
            title: "Li River cruise".to_string(),
            base_price: price(1500),
        },
    )
    .await
    .unwrap()
}

pub fn reserve_request(product_id: i64, date: NaiveDate, party: PartyComposition) -> ReserveRequest {
    ReserveRequest {
        product_id,
        travel_date: date,
        party,
        contact: ContactInfo {
            contact_name: "Wang Fang".to_string(),
            contact_phone: "13900000000".to_string(),
            contact_email: Some("wang@example.com".to_string()),
            notes: None,
        },
        customer_id: None,
        agent_id: None,
    }
}
