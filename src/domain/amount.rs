//! Amount type
//!
//! Domain primitive for monetary amounts in the smallest currency unit.
//! Amounts are validated at construction time, so a non-positive amount
//! cannot reach a balance mutation or a ledger entry.

use std::fmt;

use super::LedgerError;

/// Amount represents a validated monetary value.
///
/// # Invariants
/// - Value is always positive (> 0)
/// - Expressed in the smallest currency unit (cents, satoshi, ...)
///
/// # Example
/// ```
/// use wallet_ledger::domain::Amount;
///
/// let amount = Amount::new(1_000).unwrap();
/// assert_eq!(amount.value(), 1_000);
/// assert!(Amount::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// # Errors
    /// - `LedgerError::InvalidAmount` if value <= 0
    pub fn new(value: i64) -> Result<Self, LedgerError> {
        if value <= 0 {
            return Err(LedgerError::InvalidAmount(value));
        }
        Ok(Self(value))
    }

    /// Get the underlying value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Check if a balance covers this amount.
    pub fn is_covered_by(&self, balance: i64) -> bool {
        balance >= self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
