//! Common test utilities
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wallet_ledger::domain::{Transaction, Wallet};
use wallet_ledger::handlers::{CreateWalletCommand, DepositCommand, WalletHandler};
use wallet_ledger::id::{IdError, IdGenerator, UuidV7Generator};
use wallet_ledger::store::{
    MemoryScope, MemoryStorage, ScopeProvider, StoreError, TransactionStore, WalletStore,
};
use wallet_ledger::OperationContext;

/// Handler over fresh in-memory storage
pub fn memory_handler() -> (MemoryStorage, WalletHandler<MemoryStorage>) {
    let storage = MemoryStorage::new();
    (storage.clone(), WalletHandler::in_memory(storage))
}

/// Create a wallet and optionally fund it
pub async fn seed_wallet<P: ScopeProvider>(handler: &WalletHandler<P>, user_id: &str, balance: i64) {
    let context = OperationContext::new();
    handler
        .create_wallet(CreateWalletCommand::new(user_id), &context)
        .await
        .expect("Failed to create wallet");

    if balance > 0 {
        handler
            .deposit(DepositCommand::new(user_id, balance), &context)
            .await
            .expect("Failed to fund wallet");
    }
}

// =========================================================================
// Failure injection
// =========================================================================

/// How an injected transaction store misbehaves on insert
#[derive(Debug, Clone, Copy)]
pub enum InsertFault {
    /// Return a store error
    Fail,
    /// Never complete
    Hang,
}

/// Transaction store whose inserts misbehave; reads hit the real storage
pub struct FaultyTransactionStore {
    inner: MemoryStorage,
    fault: InsertFault,
}

impl FaultyTransactionStore {
    pub fn new(inner: MemoryStorage, fault: InsertFault) -> Self {
        Self { inner, fault }
    }
}

#[async_trait]
impl TransactionStore<MemoryScope> for FaultyTransactionStore {
    async fn create(
        &self,
        _scope: &mut MemoryScope,
        _transaction: &Transaction,
    ) -> Result<(), StoreError> {
        match self.fault {
            InsertFault::Fail => Err(StoreError::InvalidData("injected insert failure".to_string())),
            InsertFault::Hang => std::future::pending().await,
        }
    }

    async fn get_by_id(
        &self,
        scope: &mut MemoryScope,
        id: &str,
    ) -> Result<Option<Transaction>, StoreError> {
        self.inner.get_by_id(scope, id).await
    }

    async fn list_by_user_id(
        &self,
        scope: &mut MemoryScope,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, StoreError> {
        self.inner.list_by_user_id(scope, user_id, limit, offset).await
    }
}

/// Scope provider whose commit and/or rollback report failure.
/// A failed commit publishes nothing.
#[derive(Clone)]
pub struct FlakyProvider {
    inner: MemoryStorage,
    fail_commit: bool,
    fail_rollback: bool,
}

impl FlakyProvider {
    pub fn failing_commit(inner: MemoryStorage) -> Self {
        Self {
            inner,
            fail_commit: true,
            fail_rollback: false,
        }
    }

    pub fn failing_rollback(inner: MemoryStorage) -> Self {
        Self {
            inner,
            fail_commit: false,
            fail_rollback: true,
        }
    }
}

#[async_trait]
impl ScopeProvider for FlakyProvider {
    type Scope = MemoryScope;

    async fn begin(&self) -> Result<MemoryScope, StoreError> {
        self.inner.begin().await
    }

    async fn commit(&self, scope: MemoryScope) -> Result<(), StoreError> {
        if self.fail_commit {
            drop(scope);
            return Err(StoreError::InvalidData("injected commit failure".to_string()));
        }
        self.inner.commit(scope).await
    }

    async fn rollback(&self, scope: MemoryScope) -> Result<(), StoreError> {
        drop(scope);
        if self.fail_rollback {
            return Err(StoreError::InvalidData("injected rollback failure".to_string()));
        }
        Ok(())
    }
}

/// Wallet store that records every call before delegating to memory storage
#[derive(Clone)]
pub struct RecordingWalletStore {
    inner: MemoryStorage,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingWalletStore {
    pub fn new(inner: MemoryStorage) -> Self {
        Self {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Calls so far, e.g. `lock:a,b` or `get_for_update:a`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl WalletStore<MemoryScope> for RecordingWalletStore {
    async fn create(&self, scope: &mut MemoryScope, wallet: &Wallet) -> Result<(), StoreError> {
        self.record(format!("create:{}", wallet.user_id));
        WalletStore::create(&self.inner, scope, wallet).await
    }

    async fn get_by_user_id(
        &self,
        scope: &mut MemoryScope,
        user_id: &str,
    ) -> Result<Option<Wallet>, StoreError> {
        self.record(format!("get:{}", user_id));
        self.inner.get_by_user_id(scope, user_id).await
    }

    async fn get_for_update(
        &self,
        scope: &mut MemoryScope,
        user_id: &str,
    ) -> Result<Option<Wallet>, StoreError> {
        self.record(format!("get_for_update:{}", user_id));
        self.inner.get_for_update(scope, user_id).await
    }

    async fn lock_many(&self, scope: &mut MemoryScope, user_ids: &[String]) -> Result<(), StoreError> {
        self.record(format!("lock:{}", user_ids.join(",")));
        self.inner.lock_many(scope, user_ids).await
    }

    async fn update(&self, scope: &mut MemoryScope, wallet: &Wallet) -> Result<(), StoreError> {
        self.record(format!("update:{}", wallet.user_id));
        self.inner.update(scope, wallet).await
    }
}

/// Handler over `storage` with wallet calls recorded by `wallets`
pub fn handler_with_wallet_store(
    storage: &MemoryStorage,
    wallets: RecordingWalletStore,
) -> WalletHandler<MemoryStorage> {
    WalletHandler::new(
        storage.clone(),
        Arc::new(wallets),
        Arc::new(storage.clone()),
        Arc::new(UuidV7Generator),
    )
}

/// ID generator that always fails
pub struct FailingIds;

impl IdGenerator for FailingIds {
    fn next_id(&self) -> Result<String, IdError> {
        Err(IdError::Unavailable("injected".to_string()))
    }
}

/// Handler over `storage` with the transaction store replaced
pub fn handler_with_transaction_store(
    storage: &MemoryStorage,
    transactions: Arc<dyn TransactionStore<MemoryScope>>,
) -> WalletHandler<MemoryStorage> {
    WalletHandler::new(
        storage.clone(),
        Arc::new(storage.clone()),
        transactions,
        Arc::new(UuidV7Generator),
    )
}

/// Handler over `storage` with the ID generator replaced
pub fn handler_with_ids(
    storage: &MemoryStorage,
    ids: Arc<dyn IdGenerator>,
) -> WalletHandler<MemoryStorage> {
    WalletHandler::new(
        storage.clone(),
        Arc::new(storage.clone()),
        Arc::new(storage.clone()),
        ids,
    )
}

/// Handler over `storage` opened through `provider`
pub fn handler_with_provider(
    storage: &MemoryStorage,
    provider: FlakyProvider,
) -> WalletHandler<FlakyProvider> {
    let wallets: Arc<dyn WalletStore<MemoryScope>> = Arc::new(storage.clone());
    WalletHandler::new(
        provider,
        wallets,
        Arc::new(storage.clone()),
        Arc::new(UuidV7Generator),
    )
}

/// Direct read of a committed wallet, bypassing the handler
pub async fn committed_wallet(storage: &MemoryStorage, user_id: &str) -> Option<Wallet> {
    let mut scope = storage.begin().await.ok()?;
    let wallet = storage.get_by_user_id(&mut scope, user_id).await.ok()?;
    storage.rollback(scope).await.ok()?;
    wallet
}
