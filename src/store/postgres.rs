//! PostgreSQL Store
//!
//! Each scope is one database transaction. Wallet mutations lock their row
//! with `SELECT ... FOR UPDATE`, so concurrent writers on the same wallet
//! are serialized by the database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use std::time::Duration;

use crate::domain::{Transaction, TransactionType, Wallet};

use super::{ScopeProvider, StoreError, TransactionStore, WalletStore};

/// Scope handle for the PostgreSQL backend
pub type PgScope = sqlx::Transaction<'static, Postgres>;

type WalletRow = (String, i64, String, DateTime<Utc>, DateTime<Utc>);
type TransactionRow = (String, String, String, i64, String, String, DateTime<Utc>);

// =========================================================================
// Scope provider
// =========================================================================

/// Opens database transactions from a pool
#[derive(Debug, Clone)]
pub struct PgScopeProvider {
    pool: PgPool,
    lock_timeout: Option<Duration>,
}

impl PgScopeProvider {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lock_timeout: None,
        }
    }

    /// Abort a scope that waits longer than `timeout` for a row lock
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl ScopeProvider for PgScopeProvider {
    type Scope = PgScope;

    async fn begin(&self) -> Result<PgScope, StoreError> {
        let mut tx = self.pool.begin().await?;

        if let Some(timeout) = self.lock_timeout {
            // set_config(..., true) is transaction-local, like SET LOCAL
            sqlx::query("SELECT set_config('lock_timeout', $1, true)")
                .bind(format!("{}ms", timeout.as_millis()))
                .execute(&mut *tx)
                .await?;
        }

        Ok(tx)
    }

    async fn commit(&self, scope: PgScope) -> Result<(), StoreError> {
        scope.commit().await?;
        Ok(())
    }

    async fn rollback(&self, scope: PgScope) -> Result<(), StoreError> {
        scope.rollback().await?;
        Ok(())
    }
}

// =========================================================================
// Wallet store
// =========================================================================

/// `wallets` table access
#[derive(Debug, Clone, Copy, Default)]
pub struct PgWalletStore;

fn wallet_from_row((user_id, balance, currency, created_at, updated_at): WalletRow) -> Wallet {
    Wallet {
        user_id,
        balance,
        currency,
        created_at,
        updated_at,
    }
}

#[async_trait]
impl WalletStore<PgScope> for PgWalletStore {
    async fn create(&self, scope: &mut PgScope, wallet: &Wallet) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO wallets (user_id, balance, currency, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&wallet.user_id)
        .bind(wallet.balance)
        .bind(&wallet.currency)
        .bind(wallet.created_at)
        .bind(wallet.updated_at)
        .execute(&mut **scope)
        .await?;

        Ok(())
    }

    async fn get_by_user_id(
        &self,
        scope: &mut PgScope,
        user_id: &str,
    ) -> Result<Option<Wallet>, StoreError> {
        let row: Option<WalletRow> = sqlx::query_as(
            r#"
            SELECT user_id, balance, currency, created_at, updated_at
            FROM wallets
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut **scope)
        .await?;

        Ok(row.map(wallet_from_row))
    }

    async fn get_for_update(
        &self,
        scope: &mut PgScope,
        user_id: &str,
    ) -> Result<Option<Wallet>, StoreError> {
        let row: Option<WalletRow> = sqlx::query_as(
            r#"
            SELECT user_id, balance, currency, created_at, updated_at
            FROM wallets
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut **scope)
        .await?;

        Ok(row.map(wallet_from_row))
    }

    async fn lock_many(&self, scope: &mut PgScope, user_ids: &[String]) -> Result<(), StoreError> {
        if user_ids.is_empty() {
            return Ok(());
        }

        // LockRows runs above the sort, so rows are locked in this order.
        // COLLATE "C" matches the byte-wise order callers sort by.
        let _locked: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT user_id FROM wallets
            WHERE user_id = ANY($1)
            ORDER BY user_id COLLATE "C"
            FOR UPDATE
            "#,
        )
        .bind(user_ids.to_vec())
        .fetch_all(&mut **scope)
        .await?;

        Ok(())
    }

    async fn update(&self, scope: &mut PgScope, wallet: &Wallet) -> Result<(), StoreError> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $2, updated_at = $3
            WHERE user_id = $1
            "#,
        )
        .bind(&wallet.user_id)
        .bind(wallet.balance)
        .bind(wallet.updated_at)
        .execute(&mut **scope)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::RowNotFound);
        }

        Ok(())
    }
}

// =========================================================================
// Transaction store
// =========================================================================

/// `transactions` table access (insert and read only)
#[derive(Debug, Clone, Copy, Default)]
pub struct PgTransactionStore;

fn transaction_from_row(row: TransactionRow) -> Result<Transaction, StoreError> {
    let (id, from_user_id, to_user_id, amount, currency, tx_type, created_at) = row;
    let tx_type = tx_type
        .parse::<TransactionType>()
        .map_err(|e| StoreError::InvalidData(e.to_string()))?;

    Ok(Transaction {
        id,
        from_user_id,
        to_user_id,
        amount,
        currency,
        tx_type,
        created_at,
    })
}

#[async_trait]
impl TransactionStore<PgScope> for PgTransactionStore {
    async fn create(
        &self,
        scope: &mut PgScope,
        transaction: &Transaction,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, from_user_id, to_user_id, amount, currency, type, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.from_user_id)
        .bind(&transaction.to_user_id)
        .bind(transaction.amount)
        .bind(&transaction.currency)
        .bind(transaction.tx_type.as_str())
        .bind(transaction.created_at)
        .execute(&mut **scope)
        .await?;

        Ok(())
    }

    async fn get_by_id(
        &self,
        scope: &mut PgScope,
        id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        let row: Option<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, from_user_id, to_user_id, amount, currency, type, created_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **scope)
        .await?;

        row.map(transaction_from_row).transpose()
    }

    async fn list_by_user_id(
        &self,
        scope: &mut PgScope,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, StoreError> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            r#"
            SELECT id, from_user_id, to_user_id, amount, currency, type, created_at
            FROM transactions
            WHERE from_user_id = $1 OR to_user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut **scope)
        .await?;

        rows.into_iter().map(transaction_from_row).collect()
    }
}
