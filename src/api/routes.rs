//! API Routes
//!
//! HTTP endpoint definitions.

use std::sync::Arc;

use axum::{
    extract::{Extension, FromRequest, FromRequestParts, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::domain::{OperationContext, Transaction, Wallet};
use crate::error::AppError;
use crate::handlers::{
    CreateWalletCommand, DepositCommand, TransferCommand, WalletHandler, WithdrawCommand,
    DEFAULT_CURRENCY,
};
use crate::store::ScopeProvider;

/// Shared handler state
pub type HandlerState<P> = Arc<WalletHandler<P>>;

// =========================================================================
// Extractors
// =========================================================================

/// JSON body whose rejection renders as an `AppError`
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string whose rejection renders as an `AppError`
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

// =========================================================================
// Request/Response types
// =========================================================================

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWalletRequest {
    pub user_id: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DepositRequest {
    pub user_id: String,
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub user_id: String,
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Body returned by deposit, withdraw and transfer
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationResponse {
    pub status: String,
    pub transaction: Transaction,
}

impl OperationResponse {
    fn success(transaction: Transaction) -> Self {
        Self {
            status: "success".to_string(),
            transaction,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub user_id: String,
    pub balance: i64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    10
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router<P: ScopeProvider>() -> Router<HandlerState<P>> {
    Router::new()
        .route("/health", get(health_check))
        // Wallets
        .route("/wallets", post(create_wallet::<P>))
        .route("/wallet/deposit", post(deposit::<P>))
        .route("/wallet/withdraw", post(withdraw::<P>))
        .route("/wallet/transfer", post(transfer::<P>))
        .route("/wallet/:user_id/balance", get(get_balance::<P>))
        .route("/wallet/:user_id/transactions", get(get_history::<P>))
        // Ledger
        .route("/transactions/:id", get(get_transaction::<P>))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// =========================================================================
// POST /wallets
// =========================================================================

async fn create_wallet<P: ScopeProvider>(
    State(handler): State<HandlerState<P>>,
    Extension(context): Extension<OperationContext>,
    ApiJson(request): ApiJson<CreateWalletRequest>,
) -> Result<(StatusCode, Json<Wallet>), AppError> {
    let command = CreateWalletCommand::new(request.user_id).with_currency(request.currency);

    let wallet = handler.create_wallet(command, &context).await?;

    Ok((StatusCode::CREATED, Json(wallet)))
}

// =========================================================================
// POST /wallet/deposit
// =========================================================================

async fn deposit<P: ScopeProvider>(
    State(handler): State<HandlerState<P>>,
    Extension(context): Extension<OperationContext>,
    ApiJson(request): ApiJson<DepositRequest>,
) -> Result<Json<OperationResponse>, AppError> {
    let command =
        DepositCommand::new(request.user_id, request.amount).with_currency(request.currency);

    let transaction = handler.deposit(command, &context).await?;

    Ok(Json(OperationResponse::success(transaction)))
}

// =========================================================================
// POST /wallet/withdraw
// =========================================================================

async fn withdraw<P: ScopeProvider>(
    State(handler): State<HandlerState<P>>,
    Extension(context): Extension<OperationContext>,
    ApiJson(request): ApiJson<WithdrawRequest>,
) -> Result<Json<OperationResponse>, AppError> {
    let command =
        WithdrawCommand::new(request.user_id, request.amount).with_currency(request.currency);

    let transaction = handler.withdraw(command, &context).await?;

    Ok(Json(OperationResponse::success(transaction)))
}

// =========================================================================
// POST /wallet/transfer
// =========================================================================

async fn transfer<P: ScopeProvider>(
    State(handler): State<HandlerState<P>>,
    Extension(context): Extension<OperationContext>,
    ApiJson(request): ApiJson<TransferRequest>,
) -> Result<Json<OperationResponse>, AppError> {
    let command = TransferCommand::new(request.from_user_id, request.to_user_id, request.amount)
        .with_currency(request.currency);

    let transaction = handler.transfer(command, &context).await?;

    Ok(Json(OperationResponse::success(transaction)))
}

// =========================================================================
// GET /wallet/:user_id/balance
// =========================================================================

async fn get_balance<P: ScopeProvider>(
    State(handler): State<HandlerState<P>>,
    Path(user_id): Path<String>,
) -> Result<Json<BalanceResponse>, AppError> {
    let balance = handler.get_balance(&user_id).await?;

    Ok(Json(BalanceResponse { user_id, balance }))
}

// =========================================================================
// GET /wallet/:user_id/transactions
// =========================================================================

async fn get_history<P: ScopeProvider>(
    State(handler): State<HandlerState<P>>,
    Path(user_id): Path<String>,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    let transactions = handler
        .get_transaction_history(&user_id, query.limit, query.offset)
        .await?;

    Ok(Json(transactions))
}

// =========================================================================
// GET /transactions/:id
// =========================================================================

async fn get_transaction<P: ScopeProvider>(
    State(handler): State<HandlerState<P>>,
    Path(id): Path<String>,
) -> Result<Json<Transaction>, AppError> {
    let transaction = handler.get_transaction_by_id(&id).await?;

    Ok(Json(transaction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_request_deserialize() {
        let json = r#"{
            "from_user_id": "alice",
            "to_user_id": "bob",
            "amount": 500
        }"#;

        let request: TransferRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.from_user_id, "alice");
        assert_eq!(request.to_user_id, "bob");
        assert_eq!(request.amount, 500);
        assert_eq!(request.currency, "USD");
    }

    #[test]
    fn test_history_query_defaults() {
        let query: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 0);
    }
}
