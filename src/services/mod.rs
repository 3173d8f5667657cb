//! Domain services
//!
//! Stateless, store-backed services. Each method takes the caller's scope
//! and never commits or rolls back on its own.

mod transaction_service;
mod wallet_service;

pub use transaction_service::{TransactionService, MAX_HISTORY_LIMIT};
pub use wallet_service::WalletService;
