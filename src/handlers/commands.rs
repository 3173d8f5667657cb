//! Command definitions
//!
//! Commands represent intentions to change wallet balances.

use serde::{Deserialize, Serialize};

/// Currency used when a request does not name one
pub const DEFAULT_CURRENCY: &str = "USD";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

// =========================================================================
// CreateWalletCommand
// =========================================================================

/// Command to open a zero-balance wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWalletCommand {
    pub user_id: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl CreateWalletCommand {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            currency: default_currency(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

// =========================================================================
// DepositCommand
// =========================================================================

/// Command to credit a wallet from outside the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositCommand {
    pub user_id: String,
    /// Amount in minor units
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl DepositCommand {
    pub fn new(user_id: impl Into<String>, amount: i64) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            currency: default_currency(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

// =========================================================================
// WithdrawCommand
// =========================================================================

/// Command to debit a wallet to outside the ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawCommand {
    pub user_id: String,
    /// Amount in minor units
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl WithdrawCommand {
    pub fn new(user_id: impl Into<String>, amount: i64) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            currency: default_currency(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

// =========================================================================
// TransferCommand
// =========================================================================

/// Command to move funds between two wallets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferCommand {
    pub from_user_id: String,
    pub to_user_id: String,
    /// Amount in minor units
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl TransferCommand {
    pub fn new(from_user_id: impl Into<String>, to_user_id: impl Into<String>, amount: i64) -> Self {
        Self {
            from_user_id: from_user_id.into(),
            to_user_id: to_user_id.into(),
            amount,
            currency: default_currency(),
        }
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}
