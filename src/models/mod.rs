//! Core data models for the cash-flow ledger
//!
//! Strongly typed records for the four stored entities (bank accounts,
//! credit cards, recurring rules, actual transactions) plus the value types
//! they are built from.

pub mod account;
pub mod credit_card;
pub mod ids;
pub mod money;
pub mod month;
pub mod recurring;
pub mod transaction;

pub use account::{Account, AccountValidationError};
pub use credit_card::{CreditCard, CreditCardValidationError};
pub use ids::{AccountId, CreditCardId, RecurringRuleId, TransactionId};
pub use money::Money;
pub use month::YearMonth;
pub use recurring::{Frequency, RecurringRule, RuleValidationError};
pub use transaction::{
    ActualTransaction, BothLinksSet, Link, TransactionKind, TransactionValidationError,
};
