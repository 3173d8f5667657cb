//! Wallet Service
//!
//! Validates wallet operations and applies them through the wallet store.
//! Holds no state of its own; every call runs against the caller's scope.

use std::sync::Arc;

use crate::domain::{Amount, LedgerError, Wallet};
use crate::store::{StoreError, WalletStore};

/// Wallet domain service
pub struct WalletService<S> {
    store: Arc<dyn WalletStore<S>>,
}

impl<S> Clone for WalletService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Send + 'static> WalletService<S> {
    pub fn new(store: Arc<dyn WalletStore<S>>) -> Self {
        Self { store }
    }

    /// Create a zero-balance wallet for `user_id`
    pub async fn create_wallet(
        &self,
        scope: &mut S,
        user_id: &str,
        currency: &str,
    ) -> Result<Wallet, LedgerError> {
        if user_id.is_empty() {
            return Err(LedgerError::InvalidUserId);
        }

        let wallet = Wallet::new(user_id, currency);
        self.store
            .create(scope, &wallet)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => LedgerError::WalletAlreadyExists(user_id.to_string()),
                other => LedgerError::Store(other),
            })?;

        tracing::debug!(user_id = %user_id, currency = %currency, "Wallet created");
        Ok(wallet)
    }

    /// Add `amount` to the wallet balance. Returns the updated wallet.
    pub async fn deposit(
        &self,
        scope: &mut S,
        user_id: &str,
        amount: i64,
    ) -> Result<Wallet, LedgerError> {
        let amount = Amount::new(amount)?;
        let mut wallet = self.load_for_update(scope, user_id).await?;

        wallet.credit(amount)?;
        self.save(scope, &wallet).await?;

        tracing::debug!(user_id = %user_id, amount = %amount, balance = wallet.balance, "Wallet credited");
        Ok(wallet)
    }

    /// Subtract `amount` from the wallet balance. Returns the updated wallet.
    pub async fn withdraw(
        &self,
        scope: &mut S,
        user_id: &str,
        amount: i64,
    ) -> Result<Wallet, LedgerError> {
        let amount = Amount::new(amount)?;
        let mut wallet = self.load_for_update(scope, user_id).await?;

        wallet.debit(amount)?;
        self.save(scope, &wallet).await?;

        tracing::debug!(user_id = %user_id, amount = %amount, balance = wallet.balance, "Wallet debited");
        Ok(wallet)
    }

    /// Current balance as seen by the scope
    pub async fn get_balance(&self, scope: &mut S, user_id: &str) -> Result<i64, LedgerError> {
        Ok(self.get_wallet(scope, user_id).await?.balance)
    }

    pub async fn get_wallet(&self, scope: &mut S, user_id: &str) -> Result<Wallet, LedgerError> {
        self.store
            .get_by_user_id(scope, user_id)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound(user_id.to_string()))
    }

    /// Lock several wallets for the rest of the scope, in ascending user-ID
    /// order. Every multi-wallet operation must lock through here so that
    /// two scopes never wait on each other in opposite orders.
    pub async fn lock_wallets(&self, scope: &mut S, user_ids: &[&str]) -> Result<(), LedgerError> {
        let mut ordered: Vec<String> = user_ids.iter().map(|id| id.to_string()).collect();
        ordered.sort();
        ordered.dedup();

        self.store.lock_many(scope, &ordered).await?;
        Ok(())
    }

    async fn load_for_update(&self, scope: &mut S, user_id: &str) -> Result<Wallet, LedgerError> {
        self.store
            .get_for_update(scope, user_id)
            .await?
            .ok_or_else(|| LedgerError::WalletNotFound(user_id.to_string()))
    }

    async fn save(&self, scope: &mut S, wallet: &Wallet) -> Result<(), LedgerError> {
        self.store.update(scope, wallet).await.map_err(|e| match e {
            StoreError::RowNotFound => LedgerError::WalletNotFound(wallet.user_id.clone()),
            other => LedgerError::Store(other),
        })
    }
}
