//! Unit of Work
//!
//! Runs a piece of work inside one atomic scope. The scope is handed to the
//! work as `&mut P::Scope` and every store call made inside threads it
//! through, so all writes land in the same database transaction.
//!
//! Outcome rules:
//! - work returns `Ok`: commit; a commit failure becomes `LedgerError::Scope`
//! - work returns `Err`: roll back and return the error unchanged; if the
//!   rollback fails too, return `RollbackFailed` carrying both
//! - the returned future is dropped mid-flight: the scope is dropped
//!   without commit, which discards its writes
//!
//! This is the only place scopes are opened and closed.

use std::future::Future;
use std::pin::Pin;

use crate::domain::LedgerError;
use crate::store::ScopeProvider;

/// Future returned by scoped work; borrows the scope for `'s`
pub type ScopedFuture<'s, T> = Pin<Box<dyn Future<Output = T> + Send + 's>>;

/// Unit-of-work coordinator over a scope provider
#[derive(Debug, Clone)]
pub struct UnitOfWork<P> {
    provider: P,
}

impl<P: ScopeProvider> UnitOfWork<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Execute `work` atomically: all of its writes become visible, or none.
    pub async fn run_in_scope<T, F>(&self, work: F) -> Result<T, LedgerError>
    where
        T: Send,
        F: for<'s> FnOnce(&'s mut P::Scope) -> ScopedFuture<'s, Result<T, LedgerError>> + Send,
    {
        let mut scope = self.provider.begin().await.map_err(LedgerError::Scope)?;

        match work(&mut scope).await {
            Ok(value) => {
                if let Err(e) = self.provider.commit(scope).await {
                    tracing::error!(error = %e, "Scope commit failed");
                    return Err(LedgerError::Scope(e));
                }
                tracing::debug!("Scope committed");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Rolling back scope");
                match self.provider.rollback(scope).await {
                    Ok(()) => Err(err),
                    Err(rollback) => {
                        tracing::error!(
                            error = %err,
                            rollback_error = %rollback,
                            "Scope rollback failed"
                        );
                        Err(LedgerError::RollbackFailed {
                            cause: Box::new(err),
                            rollback,
                        })
                    }
                }
            }
        }
    }

    /// Execute read-only `work` in a scope that is always rolled back.
    pub async fn read_only<T, F>(&self, work: F) -> Result<T, LedgerError>
    where
        T: Send,
        F: for<'s> FnOnce(&'s mut P::Scope) -> ScopedFuture<'s, Result<T, LedgerError>> + Send,
    {
        let mut scope = self.provider.begin().await.map_err(LedgerError::Scope)?;
        let outcome = work(&mut scope).await;

        match (self.provider.rollback(scope).await, outcome) {
            (Ok(()), outcome) => outcome,
            // Nothing was written, so the read result still stands
            (Err(rollback), Ok(value)) => {
                tracing::warn!(rollback_error = %rollback, "Read scope release failed");
                Ok(value)
            }
            (Err(rollback), Err(err)) => Err(LedgerError::RollbackFailed {
                cause: Box::new(err),
                rollback,
            }),
        }
    }
}
