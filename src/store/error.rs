//! Store Errors
//!
//! Error types for wallet and transaction persistence.

/// Errors that can occur in a store or scope provider
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Update or lookup matched no row
    #[error("Row not found")]
    RowNotFound,

    /// Insert collided with an existing key
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A stored row could not be decoded into a domain value
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}
