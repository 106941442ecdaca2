use tourbook_core::error::CoreError;

/// Error returned by every booking operation.
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// A domain-level error from `tourbook_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type BookingResult<T> = Result<T, BookingError>;
