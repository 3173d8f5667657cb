//! Wallet entity
//!
//! A per-user balance in a single currency. Balance changes go through
//! [`Wallet::credit`] and [`Wallet::debit`], which keep the balance
//! non-negative and bump `updated_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Amount, LedgerError};

/// Wallet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Owner user ID (unique key)
    pub user_id: String,

    /// Current balance in the smallest currency unit, never negative
    pub balance: i64,

    /// Currency code (e.g. USD, EUR)
    pub currency: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Create a new zero-balance wallet
    pub fn new(user_id: impl Into<String>, currency: impl Into<String>) -> Self {
        let now = super::now();
        Self {
            user_id: user_id.into(),
            balance: 0,
            currency: currency.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Credit (deposit) money to the wallet
    pub fn credit(&mut self, amount: Amount) -> Result<(), LedgerError> {
        let balance = self
            .balance
            .checked_add(amount.value())
            .ok_or_else(|| LedgerError::BalanceOverflow(self.user_id.clone()))?;
        self.apply_balance(balance);
        Ok(())
    }

    /// Debit (withdraw) money from the wallet
    pub fn debit(&mut self, amount: Amount) -> Result<(), LedgerError> {
        if !amount.is_covered_by(self.balance) {
            return Err(LedgerError::insufficient_funds(
                self.user_id.clone(),
                amount.value(),
                self.balance,
            ));
        }
        self.apply_balance(self.balance - amount.value());
        Ok(())
    }

    /// Check if the wallet holds the given currency
    pub fn holds_currency(&self, currency: &str) -> bool {
        self.currency == currency
    }

    fn apply_balance(&mut self, balance: i64) {
        self.balance = balance;
        // updated_at must never move backwards, even if the clock does
        self.updated_at = super::now().max(self.updated_at);
    }
}
