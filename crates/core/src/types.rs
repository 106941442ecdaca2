/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A calendar travel date with no time component.
pub type TravelDate = chrono::NaiveDate;

/// Monetary amounts are exact decimals (Postgres `NUMERIC`).
pub type Money = rust_decimal::Decimal;
