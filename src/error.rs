//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::{ErrorCategory, LedgerError};

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // Ledger errors
    #[error(transparent)]
    Ledger(#[from] LedgerError),

}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Stable machine-readable code for a ledger error
fn ledger_error_code(err: &LedgerError) -> &'static str {
    match err.root_cause() {
        LedgerError::InvalidAmount(_) => "invalid_amount",
        LedgerError::InvalidTransactionType(_) => "invalid_transaction_type",
        LedgerError::InvalidUserId => "invalid_user_id",
        LedgerError::InvalidTransactionId => "invalid_transaction_id",
        LedgerError::InvalidPagination { .. } => "invalid_pagination",
        LedgerError::SameWalletTransfer => "same_wallet_transfer",
        LedgerError::CurrencyMismatch { .. } => "currency_mismatch",
        LedgerError::BalanceOverflow(_) => "balance_overflow",
        LedgerError::WalletNotFound(_) => "wallet_not_found",
        LedgerError::TransactionNotFound(_) => "transaction_not_found",
        LedgerError::InsufficientFunds { .. } => "insufficient_funds",
        LedgerError::WalletAlreadyExists(_) => "wallet_already_exists",
        LedgerError::Store(_) => "store_error",
        LedgerError::IdGeneration(_) => "id_generation_error",
        LedgerError::Scope(_) | LedgerError::RollbackFailed { .. } => "scope_error",
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            // Ledger errors - map by category
            AppError::Ledger(ledger_err) => {
                let code = ledger_error_code(ledger_err);
                match ledger_err.category() {
                    ErrorCategory::BadInput => {
                        (StatusCode::BAD_REQUEST, code, Some(ledger_err.root_cause().to_string()))
                    }
                    ErrorCategory::NotFound => {
                        (StatusCode::NOT_FOUND, code, Some(ledger_err.root_cause().to_string()))
                    }
                    ErrorCategory::Conflict => {
                        (StatusCode::CONFLICT, code, Some(ledger_err.root_cause().to_string()))
                    }
                    ErrorCategory::Internal => {
                        tracing::error!("Ledger error: {:?}", ledger_err);
                        (StatusCode::INTERNAL_SERVER_ERROR, code, None)
                    }
                }
            }
        };

        // Internal failures keep their cause in the log only
        let error = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
