//! In-memory Store
//!
//! A single async mutex guards the committed state. A scope holds that lock
//! for its whole lifetime and writes into a private copy, which replaces the
//! committed state on commit and is thrown away on rollback or drop. Scopes
//! are therefore fully serialized.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::{Transaction, Wallet};

use super::{ScopeProvider, StoreError, TransactionStore, WalletStore};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    wallets: HashMap<String, Wallet>,
    /// Insertion (= commit) order, oldest first
    transactions: Vec<Transaction>,
}

/// In-process wallet and transaction storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

/// Open scope on a [`MemoryStorage`]
#[derive(Debug)]
pub struct MemoryScope {
    committed: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed ledger entries
    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }

    /// Number of committed wallets
    pub async fn wallet_count(&self) -> usize {
        self.state.lock().await.wallets.len()
    }
}

fn to_index(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

#[async_trait]
impl ScopeProvider for MemoryStorage {
    type Scope = MemoryScope;

    async fn begin(&self) -> Result<MemoryScope, StoreError> {
        let committed = Arc::clone(&self.state).lock_owned().await;
        let staged = committed.clone();
        Ok(MemoryScope { committed, staged })
    }

    async fn commit(&self, scope: MemoryScope) -> Result<(), StoreError> {
        let MemoryScope {
            mut committed,
            staged,
        } = scope;
        *committed = staged;
        Ok(())
    }

    async fn rollback(&self, scope: MemoryScope) -> Result<(), StoreError> {
        drop(scope);
        Ok(())
    }
}

#[async_trait]
impl WalletStore<MemoryScope> for MemoryStorage {
    async fn create(&self, scope: &mut MemoryScope, wallet: &Wallet) -> Result<(), StoreError> {
        if scope.staged.wallets.contains_key(&wallet.user_id) {
            return Err(StoreError::UniqueViolation(format!(
                "wallets.user_id = {}",
                wallet.user_id
            )));
        }
        scope
            .staged
            .wallets
            .insert(wallet.user_id.clone(), wallet.clone());
        Ok(())
    }

    async fn get_by_user_id(
        &self,
        scope: &mut MemoryScope,
        user_id: &str,
    ) -> Result<Option<Wallet>, StoreError> {
        Ok(scope.staged.wallets.get(user_id).cloned())
    }

    async fn get_for_update(
        &self,
        scope: &mut MemoryScope,
        user_id: &str,
    ) -> Result<Option<Wallet>, StoreError> {
        // The scope already excludes every other writer
        Ok(scope.staged.wallets.get(user_id).cloned())
    }

    async fn lock_many(&self, _scope: &mut MemoryScope, _user_ids: &[String]) -> Result<(), StoreError> {
        Ok(())
    }

    async fn update(&self, scope: &mut MemoryScope, wallet: &Wallet) -> Result<(), StoreError> {
        let stored = scope
            .staged
            .wallets
            .get_mut(&wallet.user_id)
            .ok_or(StoreError::RowNotFound)?;
        stored.balance = wallet.balance;
        stored.updated_at = wallet.updated_at;
        Ok(())
    }
}

#[async_trait]
impl TransactionStore<MemoryScope> for MemoryStorage {
    async fn create(
        &self,
        scope: &mut MemoryScope,
        transaction: &Transaction,
    ) -> Result<(), StoreError> {
        if scope
            .staged
            .transactions
            .iter()
            .any(|existing| existing.id == transaction.id)
        {
            return Err(StoreError::UniqueViolation(format!(
                "transactions.id = {}",
                transaction.id
            )));
        }
        scope.staged.transactions.push(transaction.clone());
        Ok(())
    }

    async fn get_by_id(
        &self,
        scope: &mut MemoryScope,
        id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(scope
            .staged
            .transactions
            .iter()
            .find(|transaction| transaction.id == id)
            .cloned())
    }

    async fn list_by_user_id(
        &self,
        scope: &mut MemoryScope,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, StoreError> {
        Ok(scope
            .staged
            .transactions
            .iter()
            .rev()
            .filter(|transaction| transaction.involves(user_id))
            .skip(to_index(offset))
            .take(to_index(limit))
            .cloned()
            .collect())
    }
}
