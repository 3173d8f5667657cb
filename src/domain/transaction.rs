//! Ledger transaction entity
//!
//! Transactions are immutable facts: once logged they are never updated or
//! deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Amount, LedgerError};

/// Kind of balance-affecting operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdraw,
    Transfer,
}

impl TransactionType {
    /// Storage / wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdraw => "WITHDRAW",
            TransactionType::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(TransactionType::Deposit),
            "WITHDRAW" => Ok(TransactionType::Withdraw),
            "TRANSFER" => Ok(TransactionType::Transfer),
            other => Err(LedgerError::InvalidTransactionType(other.to_string())),
        }
    }
}

/// Immutable ledger entry
///
/// An empty `from_user_id` marks a deposit source and an empty `to_user_id`
/// marks a withdrawal sink; transfers carry both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub from_user_id: String,
    pub to_user_id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a new ledger entry stamped with the current time
    pub fn new(
        id: String,
        from_user_id: impl Into<String>,
        to_user_id: impl Into<String>,
        amount: Amount,
        currency: impl Into<String>,
        tx_type: TransactionType,
    ) -> Result<Self, LedgerError> {
        if id.is_empty() {
            return Err(LedgerError::InvalidTransactionId);
        }

        Ok(Self {
            id,
            from_user_id: from_user_id.into(),
            to_user_id: to_user_id.into(),
            amount: amount.value(),
            currency: currency.into(),
            tx_type,
            created_at: super::now(),
        })
    }

    /// Check if the user is the sender or the receiver
    pub fn involves(&self, user_id: &str) -> bool {
        self.from_user_id == user_id || self.to_user_id == user_id
    }
}
