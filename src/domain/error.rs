//! Domain Error Types
//!
//! The tagged error kind produced by the ledger core.

use thiserror::Error;

use crate::id::IdError;
use crate::store::StoreError;

/// Outcome category a transport layer maps each error kind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    BadInput,
    NotFound,
    Conflict,
    Internal,
}

/// Errors produced by the wallet and transaction services and the
/// unit-of-work coordinator.
///
/// Validation errors are raised at the service boundary and never wrapped.
/// Store errors pass through unchanged inside `Store`. A failed rollback
/// keeps the original error reachable through [`LedgerError::root_cause`].
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Amount is zero or negative
    #[error("Invalid amount: {0} (must be positive)")]
    InvalidAmount(i64),

    /// Transaction type outside DEPOSIT / WITHDRAW / TRANSFER
    #[error("Invalid transaction type: {0}")]
    InvalidTransactionType(String),

    /// Empty user ID on a read
    #[error("Invalid user ID")]
    InvalidUserId,

    /// Empty transaction ID on a read
    #[error("Invalid transaction ID")]
    InvalidTransactionId,

    /// Negative limit or offset on a history query
    #[error("Invalid pagination: limit {limit}, offset {offset}")]
    InvalidPagination { limit: i64, offset: i64 },

    /// Transfer where sender and recipient are the same wallet
    #[error("Cannot transfer to the same wallet")]
    SameWalletTransfer,

    /// Request currency differs from the wallet currency
    #[error("Currency mismatch: wallet holds {expected}, request used {found}")]
    CurrencyMismatch { expected: String, found: String },

    /// Balance would leave the i64 range
    #[error("Balance overflow for wallet {0}")]
    BalanceOverflow(String),

    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Insufficient funds in wallet {user_id}: required {required}, available {available}")]
    InsufficientFunds {
        user_id: String,
        required: i64,
        available: i64,
    },

    #[error("Wallet already exists: {0}")]
    WalletAlreadyExists(String),

    /// Underlying persistence failure
    #[error("Store failure: {0}")]
    Store(#[from] StoreError),

    /// Transaction ID could not be generated
    #[error("ID generation failed: {0}")]
    IdGeneration(#[from] IdError),

    /// Atomic scope could not be opened or committed
    #[error("Scope failure: {0}")]
    Scope(#[source] StoreError),

    /// Work failed and the rollback that followed failed too
    #[error("Rollback failed ({rollback}) after error: {cause}")]
    RollbackFailed {
        cause: Box<LedgerError>,
        #[source]
        rollback: StoreError,
    },
}

impl LedgerError {
    /// Create an insufficient funds error
    pub fn insufficient_funds(user_id: impl Into<String>, required: i64, available: i64) -> Self {
        Self::InsufficientFunds {
            user_id: user_id.into(),
            required,
            available,
        }
    }

    /// The error that caused the operation to fail, looking through a
    /// failed rollback.
    pub fn root_cause(&self) -> &LedgerError {
        match self {
            Self::RollbackFailed { cause, .. } => cause.root_cause(),
            other => other,
        }
    }

    /// Stable outcome category for this error kind
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidAmount(_)
            | Self::InvalidTransactionType(_)
            | Self::InvalidUserId
            | Self::InvalidTransactionId
            | Self::InvalidPagination { .. }
            | Self::SameWalletTransfer
            | Self::CurrencyMismatch { .. }
            | Self::BalanceOverflow(_) => ErrorCategory::BadInput,
            Self::WalletNotFound(_) | Self::TransactionNotFound(_) => ErrorCategory::NotFound,
            Self::InsufficientFunds { .. } | Self::WalletAlreadyExists(_) => {
                ErrorCategory::Conflict
            }
            Self::Store(_) | Self::IdGeneration(_) | Self::Scope(_) => ErrorCategory::Internal,
            Self::RollbackFailed { cause, .. } => cause.category(),
        }
    }

    /// Check if this is a client error (caller's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::BadInput | ErrorCategory::NotFound | ErrorCategory::Conflict
        )
    }
}
