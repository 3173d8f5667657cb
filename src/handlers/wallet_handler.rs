//! Wallet Handler
//!
//! Use-case layer. Composes the wallet and transaction services with the
//! unit of work into deposit, withdraw and transfer, plus the read paths.

use std::sync::Arc;

use crate::domain::{LedgerError, OperationContext, Transaction, TransactionType, Wallet};
use crate::id::{IdGenerator, UuidV7Generator};
use crate::services::{TransactionService, WalletService};
use crate::store::{
    MemoryStorage, PgScopeProvider, PgTransactionStore, PgWalletStore, ScopeProvider,
    TransactionStore, WalletStore,
};
use crate::unit_of_work::UnitOfWork;

use super::{CreateWalletCommand, DepositCommand, TransferCommand, WithdrawCommand};

/// Wallet use-case handler over a scope provider
pub struct WalletHandler<P: ScopeProvider> {
    uow: UnitOfWork<P>,
    wallets: Arc<WalletService<P::Scope>>,
    ledger: Arc<TransactionService<P::Scope>>,
}

impl<P: ScopeProvider> WalletHandler<P> {
    pub fn new(
        provider: P,
        wallet_store: Arc<dyn WalletStore<P::Scope>>,
        transaction_store: Arc<dyn TransactionStore<P::Scope>>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            uow: UnitOfWork::new(provider),
            wallets: Arc::new(WalletService::new(wallet_store)),
            ledger: Arc::new(TransactionService::new(transaction_store, ids)),
        }
    }

    // =====================================================================
    // CreateWallet
    // =====================================================================

    pub async fn create_wallet(
        &self,
        command: CreateWalletCommand,
        context: &OperationContext,
    ) -> Result<Wallet, LedgerError> {
        let wallets = Arc::clone(&self.wallets);

        let wallet = self
            .uow
            .run_in_scope(move |scope| {
                Box::pin(async move {
                    wallets
                        .create_wallet(scope, &command.user_id, &command.currency)
                        .await
                })
            })
            .await?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            user_id = %wallet.user_id,
            currency = %wallet.currency,
            "Wallet created"
        );
        Ok(wallet)
    }

    // =====================================================================
    // Deposit
    // =====================================================================

    /// Credit a wallet and log a DEPOSIT entry, atomically.
    pub async fn deposit(
        &self,
        command: DepositCommand,
        context: &OperationContext,
    ) -> Result<Transaction, LedgerError> {
        let wallets = Arc::clone(&self.wallets);
        let ledger = Arc::clone(&self.ledger);

        let transaction = self
            .uow
            .run_in_scope(move |scope| {
                Box::pin(async move {
                    let wallet = wallets.deposit(scope, &command.user_id, command.amount).await?;
                    ensure_currency(&wallet, &command.currency)?;

                    ledger
                        .log_transaction(
                            scope,
                            "",
                            &command.user_id,
                            command.amount,
                            &command.currency,
                            TransactionType::Deposit,
                        )
                        .await
                })
            })
            .await?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            transaction_id = %transaction.id,
            user_id = %transaction.to_user_id,
            amount = transaction.amount,
            "Deposit committed"
        );
        Ok(transaction)
    }

    // =====================================================================
    // Withdraw
    // =====================================================================

    /// Debit a wallet and log a WITHDRAW entry, atomically.
    pub async fn withdraw(
        &self,
        command: WithdrawCommand,
        context: &OperationContext,
    ) -> Result<Transaction, LedgerError> {
        let wallets = Arc::clone(&self.wallets);
        let ledger = Arc::clone(&self.ledger);

        let transaction = self
            .uow
            .run_in_scope(move |scope| {
                Box::pin(async move {
                    let wallet = wallets.withdraw(scope, &command.user_id, command.amount).await?;
                    ensure_currency(&wallet, &command.currency)?;

                    ledger
                        .log_transaction(
                            scope,
                            &command.user_id,
                            "",
                            command.amount,
                            &command.currency,
                            TransactionType::Withdraw,
                        )
                        .await
                })
            })
            .await?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            transaction_id = %transaction.id,
            user_id = %transaction.from_user_id,
            amount = transaction.amount,
            "Withdrawal committed"
        );
        Ok(transaction)
    }

    // =====================================================================
    // Transfer
    // =====================================================================

    /// Move funds between two wallets and log a TRANSFER entry.
    ///
    /// Both wallets are locked in user-ID order before either balance
    /// changes. The withdrawal is never durable without the deposit.
    pub async fn transfer(
        &self,
        command: TransferCommand,
        context: &OperationContext,
    ) -> Result<Transaction, LedgerError> {
        if command.from_user_id == command.to_user_id {
            return Err(LedgerError::SameWalletTransfer);
        }

        let wallets = Arc::clone(&self.wallets);
        let ledger = Arc::clone(&self.ledger);

        let transaction = self
            .uow
            .run_in_scope(move |scope| {
                Box::pin(async move {
                    let TransferCommand {
                        from_user_id,
                        to_user_id,
                        amount,
                        currency,
                    } = command;

                    wallets
                        .lock_wallets(scope, &[from_user_id.as_str(), to_user_id.as_str()])
                        .await?;

                    let sender = wallets.withdraw(scope, &from_user_id, amount).await?;
                    ensure_currency(&sender, &currency)?;

                    let recipient = wallets.deposit(scope, &to_user_id, amount).await?;
                    ensure_currency(&recipient, &currency)?;

                    ledger
                        .log_transaction(
                            scope,
                            &from_user_id,
                            &to_user_id,
                            amount,
                            &currency,
                            TransactionType::Transfer,
                        )
                        .await
                })
            })
            .await?;

        tracing::info!(
            correlation_id = ?context.correlation_id,
            transaction_id = %transaction.id,
            from_user_id = %transaction.from_user_id,
            to_user_id = %transaction.to_user_id,
            amount = transaction.amount,
            "Transfer committed"
        );
        Ok(transaction)
    }

    // =====================================================================
    // Reads
    // =====================================================================

    pub async fn get_balance(&self, user_id: &str) -> Result<i64, LedgerError> {
        let wallets = Arc::clone(&self.wallets);
        let user_id = user_id.to_string();

        self.uow
            .read_only(move |scope| {
                Box::pin(async move { wallets.get_balance(scope, &user_id).await })
            })
            .await
    }

    pub async fn get_wallet(&self, user_id: &str) -> Result<Wallet, LedgerError> {
        let wallets = Arc::clone(&self.wallets);
        let user_id = user_id.to_string();

        self.uow
            .read_only(move |scope| {
                Box::pin(async move { wallets.get_wallet(scope, &user_id).await })
            })
            .await
    }

    /// Newest-first page of the user's ledger entries
    pub async fn get_transaction_history(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let ledger = Arc::clone(&self.ledger);
        let user_id = user_id.to_string();

        self.uow
            .read_only(move |scope| {
                Box::pin(async move {
                    ledger
                        .get_transaction_history(scope, &user_id, limit, offset)
                        .await
                })
            })
            .await
    }

    pub async fn get_transaction_by_id(&self, id: &str) -> Result<Transaction, LedgerError> {
        let ledger = Arc::clone(&self.ledger);
        let id = id.to_string();

        self.uow
            .read_only(move |scope| {
                Box::pin(async move { ledger.get_transaction_by_id(scope, &id).await })
            })
            .await
    }
}

impl WalletHandler<PgScopeProvider> {
    /// Handler backed by PostgreSQL
    pub fn postgres(provider: PgScopeProvider) -> Self {
        Self::new(
            provider,
            Arc::new(PgWalletStore),
            Arc::new(PgTransactionStore),
            Arc::new(UuidV7Generator),
        )
    }
}

impl WalletHandler<MemoryStorage> {
    /// Handler backed by process memory
    pub fn in_memory(storage: MemoryStorage) -> Self {
        Self::new(
            storage.clone(),
            Arc::new(storage.clone()),
            Arc::new(storage),
            Arc::new(UuidV7Generator),
        )
    }
}

fn ensure_currency(wallet: &Wallet, currency: &str) -> Result<(), LedgerError> {
    if wallet.holds_currency(currency) {
        Ok(())
    } else {
        Err(LedgerError::CurrencyMismatch {
            expected: wallet.currency.clone(),
            found: currency.to_string(),
        })
    }
}
