//! Transaction Service
//!
//! Creates immutable ledger entries and answers ledger queries.

use std::sync::Arc;

use crate::domain::{Amount, LedgerError, Transaction, TransactionType};
use crate::id::IdGenerator;
use crate::store::TransactionStore;

/// Largest page a history query returns
pub const MAX_HISTORY_LIMIT: i64 = 100;

/// Transaction domain service
pub struct TransactionService<S> {
    store: Arc<dyn TransactionStore<S>>,
    ids: Arc<dyn IdGenerator>,
}

impl<S> Clone for TransactionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<S: Send + 'static> TransactionService<S> {
    pub fn new(store: Arc<dyn TransactionStore<S>>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Append a ledger entry and return it as persisted
    pub async fn log_transaction(
        &self,
        scope: &mut S,
        from_user_id: &str,
        to_user_id: &str,
        amount: i64,
        currency: &str,
        tx_type: TransactionType,
    ) -> Result<Transaction, LedgerError> {
        let amount = Amount::new(amount)?;
        let id = self.ids.next_id()?;

        let transaction =
            Transaction::new(id, from_user_id, to_user_id, amount, currency, tx_type)?;
        self.store.create(scope, &transaction).await?;

        tracing::debug!(
            transaction_id = %transaction.id,
            tx_type = %transaction.tx_type,
            amount = transaction.amount,
            "Transaction logged"
        );
        Ok(transaction)
    }

    pub async fn get_transaction_by_id(
        &self,
        scope: &mut S,
        id: &str,
    ) -> Result<Transaction, LedgerError> {
        if id.is_empty() {
            return Err(LedgerError::InvalidTransactionId);
        }

        self.store
            .get_by_id(scope, id)
            .await?
            .ok_or_else(|| LedgerError::TransactionNotFound(id.to_string()))
    }

    /// Transactions where `user_id` is sender or receiver, newest first.
    ///
    /// Negative `limit` or `offset` is rejected; `limit` is capped at
    /// [`MAX_HISTORY_LIMIT`].
    pub async fn get_transaction_history(
        &self,
        scope: &mut S,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, LedgerError> {
        if user_id.is_empty() {
            return Err(LedgerError::InvalidUserId);
        }
        if limit < 0 || offset < 0 {
            return Err(LedgerError::InvalidPagination { limit, offset });
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let limit = limit.min(MAX_HISTORY_LIMIT);
        Ok(self
            .store
            .list_by_user_id(scope, user_id, limit, offset)
            .await?)
    }
}
