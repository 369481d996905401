//! Bank account model
//!
//! A bank account's balance is a running total. After creation it moves only
//! through reconciliation of actual transactions (or an explicit correction).

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;

/// Maximum length of an account or card name
pub const MAX_NAME_LEN: usize = 100;

/// A bank account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier (rowid)
    pub id: AccountId,

    /// Account name (e.g., "Chase Checking")
    pub name: String,

    /// Current balance (signed)
    pub balance: Money,

    /// When the balance or name last changed
    pub last_updated: Option<NaiveDateTime>,
}

impl Account {
    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        validate_name(&self.name)
    }
}

/// Shared name rule for accounts and cards
pub(crate) fn validate_name(name: &str) -> Result<(), AccountValidationError> {
    if name.trim().is_empty() {
        return Err(AccountValidationError::EmptyName);
    }

    if name.len() > MAX_NAME_LEN {
        return Err(AccountValidationError::NameTooLong(name.len()));
    }

    Ok(())
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.balance)
    }
}

/// Validation errors for accounts and cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Name too long ({} chars, max {})", len, MAX_NAME_LEN)
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> Account {
        Account {
            id: AccountId::new(1),
            name: name.into(),
            balance: Money::from_dollars(1000),
            last_updated: None,
        }
    }

    #[test]
    fn test_validation() {
        assert!(account("Checking").validate().is_ok());
        assert_eq!(
            account("   ").validate(),
            Err(AccountValidationError::EmptyName)
        );
        assert_eq!(
            account(&"x".repeat(101)).validate(),
            Err(AccountValidationError::NameTooLong(101))
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(account("Checking").to_string(), "Checking ($1,000.00)");
    }
}
