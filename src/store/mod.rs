//! Store module
//!
//! Persistence contracts for wallets and ledger transactions, plus the
//! atomic scope they run in. Every store call takes the scope explicitly;
//! nothing is looked up from ambient state.
//!
//! Two backends implement the contracts:
//! - [`postgres`]: PostgreSQL via sqlx, one database transaction per scope
//! - [`memory`]: in-process, whole-scope serialization (tests and local runs)

mod error;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{Transaction, Wallet};

pub use error::StoreError;
pub use memory::{MemoryScope, MemoryStorage};
pub use postgres::{PgScope, PgScopeProvider, PgTransactionStore, PgWalletStore};

/// Opens and closes atomic scopes against the backing store.
///
/// Only the unit-of-work coordinator calls these methods.
#[async_trait]
pub trait ScopeProvider: Send + Sync + 'static {
    /// Handle for one atomic scope. Dropping it without `commit` discards
    /// every write made through it.
    type Scope: Send + 'static;

    async fn begin(&self) -> Result<Self::Scope, StoreError>;

    async fn commit(&self, scope: Self::Scope) -> Result<(), StoreError>;

    async fn rollback(&self, scope: Self::Scope) -> Result<(), StoreError>;
}

/// Wallet rows keyed by user ID
#[async_trait]
pub trait WalletStore<S: Send + 'static>: Send + Sync {
    /// Insert a new wallet; `UniqueViolation` if the user already has one
    async fn create(&self, scope: &mut S, wallet: &Wallet) -> Result<(), StoreError>;

    /// Plain read of the wallet as seen by the scope
    async fn get_by_user_id(&self, scope: &mut S, user_id: &str)
        -> Result<Option<Wallet>, StoreError>;

    /// Read the wallet and hold a row lock on it until the scope ends
    async fn get_for_update(&self, scope: &mut S, user_id: &str)
        -> Result<Option<Wallet>, StoreError>;

    /// Lock the given wallets in the order supplied. Callers sort first.
    async fn lock_many(&self, scope: &mut S, user_ids: &[String]) -> Result<(), StoreError>;

    /// Overwrite balance and `updated_at`; `RowNotFound` if absent
    async fn update(&self, scope: &mut S, wallet: &Wallet) -> Result<(), StoreError>;
}

/// Append-only ledger rows
#[async_trait]
pub trait TransactionStore<S: Send + 'static>: Send + Sync {
    async fn create(&self, scope: &mut S, transaction: &Transaction) -> Result<(), StoreError>;

    async fn get_by_id(&self, scope: &mut S, id: &str) -> Result<Option<Transaction>, StoreError>;

    /// Transactions where the user is sender or receiver, newest first
    async fn list_by_user_id(
        &self,
        scope: &mut S,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, StoreError>;
}
