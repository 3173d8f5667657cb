//! Domain module
//!
//! Core domain types: wallets, ledger transactions, and the error taxonomy.

pub mod amount;
pub mod context;
pub mod error;
pub mod transaction;
pub mod wallet;

pub use amount::Amount;
pub use context::OperationContext;
pub use error::{ErrorCategory, LedgerError};
pub use transaction::{Transaction, TransactionType};
pub use wallet::Wallet;

use chrono::{DateTime, SubsecRound, Utc};

/// Current time at the precision the database stores (microseconds), so a
/// value handed back to the caller equals the row read later.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
