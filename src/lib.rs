//! wallet_ledger Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod domain;
pub mod handlers;
pub mod id;
pub mod services;
pub mod store;
pub mod unit_of_work;

pub mod config;
pub mod db;
mod error;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use domain::{Amount, ErrorCategory, LedgerError, OperationContext};
pub use domain::{Transaction, TransactionType, Wallet};
pub use unit_of_work::UnitOfWork;
