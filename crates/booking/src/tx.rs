//! Bounded transactions and conflict retry.

use std::future::Future;
use std::time::Duration;

use sqlx::{PgPool, Postgres, Transaction};
use tourbook_core::error::CoreError;

use crate::config::BookingConfig;
use crate::error::{BookingError, BookingResult};

/// SQLSTATE `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";
/// SQLSTATE `deadlock_detected`.
const DEADLOCK_DETECTED: &str = "40P01";
/// SQLSTATE `lock_not_available` (raised when `lock_timeout` expires).
const LOCK_NOT_AVAILABLE: &str = "55P03";
/// SQLSTATE `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE `query_canceled` (raised when `statement_timeout` expires).
const QUERY_CANCELED: &str = "57014";

/// Unique constraints whose violation means "lost a race, try again".
const RETRYABLE_CONSTRAINTS: [&str; 2] = ["uq_orders_order_number", "uq_schedule_entries_product_date"];

/// Base delay between conflict retries; grows linearly per attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(15);

/// Begin a transaction whose lock waits and statements are time-bounded.
///
/// Dropping the returned transaction without committing rolls it back, so a
/// cancelled request never leaves a partial decrement behind.
pub(crate) async fn begin_bounded(
    pool: &PgPool,
    config: &BookingConfig,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        "SELECT set_config('lock_timeout', $1, true), \
                set_config('statement_timeout', $2, true)",
    )
    .bind(format!("{}ms", config.lock_timeout_ms))
    .bind(format!("{}ms", config.statement_timeout_ms))
    .execute(&mut *tx)
    .await?;
    Ok(tx)
}

fn sqlstate(err: &sqlx::Error) -> Option<(String, Option<String>)> {
    match err {
        sqlx::Error::Database(db) => db
            .code()
            .map(|code| (code.into_owned(), db.constraint().map(str::to_string))),
        _ => None,
    }
}

/// Whether re-running the whole transaction may succeed.
pub(crate) fn is_retryable_conflict(err: &sqlx::Error) -> bool {
    match sqlstate(err) {
        Some((code, constraint)) => match code.as_str() {
            SERIALIZATION_FAILURE | DEADLOCK_DETECTED | LOCK_NOT_AVAILABLE => true,
            UNIQUE_VIOLATION => constraint
                .as_deref()
                .is_some_and(|c| RETRYABLE_CONSTRAINTS.contains(&c)),
            _ => false,
        },
        None => false,
    }
}

fn is_statement_timeout(err: &sqlx::Error) -> bool {
    sqlstate(err).is_some_and(|(code, _)| code == QUERY_CANCELED)
}

/// Run `attempt` until it succeeds, fails with a non-conflict error, or
/// `max_retries` retries are used up.
pub(crate) async fn with_conflict_retry<T, F, Fut>(
    max_retries: u32,
    operation: &'static str,
    mut attempt: F,
) -> BookingResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BookingResult<T>>,
{
    let mut retries: u32 = 0;
    loop {
        match attempt().await {
            Err(BookingError::Database(err)) if is_retryable_conflict(&err) => {
                if retries >= max_retries {
                    tracing::warn!(
                        operation,
                        attempts = retries + 1,
                        error = %err,
                        "Conflict retries exhausted",
                    );
                    return Err(CoreError::Conflict(format!(
                        "{operation} conflicted with a concurrent update; please retry"
                    ))
                    .into());
                }
                retries += 1;
                tracing::warn!(operation, retry = retries, error = %err, "Retrying after transaction conflict");
                tokio::time::sleep(RETRY_BACKOFF * retries).await;
            }
            Err(BookingError::Database(err)) if is_statement_timeout(&err) => {
                tracing::warn!(operation, error = %err, "Booking transaction timed out");
                return Err(CoreError::Conflict(format!(
                    "{operation} timed out; please retry"
                ))
                .into());
            }
            other => return other,
        }
    }
}
