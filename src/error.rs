//! Custom error types for the cash-flow ledger
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::models::{
    AccountValidationError, BothLinksSet, CreditCardValidationError, RuleValidationError,
    TransactionValidationError,
};

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// A transaction or rule links to both an account and a card, or an
    /// income transaction targets a credit card
    #[error("Invalid linkage: {0}")]
    InvalidLinkage(String),

    /// Amount supplied to a transaction or rule was zero or negative
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The operation would orphan rows that still reference the entity
    #[error("Cannot delete {entity_type} '{identifier}': {reason}")]
    Conflict {
        entity_type: &'static str,
        identifier: String,
        reason: String,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),
}

impl LedgerError {
    /// Create a "not found" error for bank accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for credit cards
    pub fn card_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Credit card",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for recurring rules
    pub fn rule_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Recurring transaction",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for actual transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a dangling-reference conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if this error rejects bad input (validation, linkage or amount)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidLinkage(_) | Self::NonPositiveAmount(_)
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        Self::Import(err.to_string())
    }
}

impl From<AccountValidationError> for LedgerError {
    fn from(err: AccountValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CreditCardValidationError> for LedgerError {
    fn from(err: CreditCardValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<BothLinksSet> for LedgerError {
    fn from(err: BothLinksSet) -> Self {
        Self::InvalidLinkage(err.to_string())
    }
}

impl From<TransactionValidationError> for LedgerError {
    fn from(err: TransactionValidationError) -> Self {
        match err {
            TransactionValidationError::NonPositiveAmount(amount) => {
                Self::NonPositiveAmount(amount.to_string())
            }
            TransactionValidationError::IncomeToCreditCard(_) => {
                Self::InvalidLinkage(err.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}

impl From<RuleValidationError> for LedgerError {
    fn from(err: RuleValidationError) -> Self {
        match err {
            RuleValidationError::NonPositiveAmount(amount) => {
                Self::NonPositiveAmount(amount.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::account_not_found("Checking");
        assert_eq!(err.to_string(), "Account not found: Checking");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_conflict_error() {
        let err = LedgerError::Conflict {
            entity_type: "Account",
            identifier: "Checking".into(),
            reason: "1 transaction still linked".into(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot delete Account 'Checking': 1 transaction still linked"
        );
        assert!(err.is_conflict());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_input_errors_are_validation() {
        assert!(LedgerError::NonPositiveAmount("0.00".into()).is_validation());
        assert!(LedgerError::InvalidLinkage("both set".into()).is_validation());
    }

    #[test]
    fn test_from_model_validation() {
        use crate::models::{CreditCardId, Money};

        let err: LedgerError = TransactionValidationError::NonPositiveAmount(Money::zero()).into();
        assert_eq!(err.to_string(), "Amount must be positive, got $0.00");

        let err: LedgerError =
            TransactionValidationError::IncomeToCreditCard(CreditCardId::new(1)).into();
        assert!(matches!(err, LedgerError::InvalidLinkage(_)));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ledger_err: LedgerError = io_err.into();
        assert!(matches!(ledger_err, LedgerError::Io(_)));
    }
}
