//! Actual transaction model
//!
//! An actual transaction is a recorded income or expense. Its amount is always
//! positive; `kind` decides the direction. A transaction may be linked to one
//! bank account, one credit card, or nothing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CreditCardId, TransactionId};
use super::money::Money;

/// Direction of a transaction or recurring rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// The label stored in the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parse the stored label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Signed amount as it affects a cash total
    pub fn signed(&self, amount: Money) -> Money {
        match self {
            Self::Income => amount,
            Self::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        })
    }
}

/// What a transaction or rule is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Link {
    /// Not attached to any account or card ("other")
    #[default]
    None,
    Account(AccountId),
    CreditCard(CreditCardId),
}

impl Link {
    /// Build from the pair of nullable link columns
    ///
    /// Both columns set is an invalid linkage.
    pub fn from_columns(
        account_id: Option<AccountId>,
        credit_card_id: Option<CreditCardId>,
    ) -> Result<Self, BothLinksSet> {
        match (account_id, credit_card_id) {
            (None, None) => Ok(Self::None),
            (Some(a), None) => Ok(Self::Account(a)),
            (None, Some(c)) => Ok(Self::CreditCard(c)),
            (Some(a), Some(c)) => Err(BothLinksSet(a, c)),
        }
    }

    pub fn account_id(&self) -> Option<AccountId> {
        match self {
            Self::Account(id) => Some(*id),
            _ => None,
        }
    }

    pub fn credit_card_id(&self) -> Option<CreditCardId> {
        match self {
            Self::CreditCard(id) => Some(*id),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "other"),
            Self::Account(id) => write!(f, "{}", id),
            Self::CreditCard(id) => write!(f, "{}", id),
        }
    }
}

/// Both an account and a card were given for one record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BothLinksSet(pub AccountId, pub CreditCardId);

impl fmt::Display for BothLinksSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot link to both account {} and credit card {}",
            self.0, self.1
        )
    }
}

impl std::error::Error for BothLinksSet {}

/// A recorded transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualTransaction {
    pub id: TransactionId,
    pub description: String,

    /// Always positive
    pub amount: Money,

    pub date: NaiveDate,
    pub category: String,
    pub kind: TransactionKind,
    pub link: Link,
}

impl ActualTransaction {
    /// Amount signed by kind (income positive, expense negative)
    pub fn signed_amount(&self) -> Money {
        self.kind.signed(self.amount)
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::EmptyDescription);
        }

        if self.category.trim().is_empty() {
            return Err(TransactionValidationError::EmptyCategory);
        }

        if let (TransactionKind::Income, Link::CreditCard(card)) = (self.kind, self.link) {
            return Err(TransactionValidationError::IncomeToCreditCard(card));
        }

        Ok(())
    }
}

impl fmt::Display for ActualTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.date, self.description, self.signed_amount(), self.category
        )
    }
}

/// Validation errors for actual transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    EmptyDescription,
    EmptyCategory,
    IncomeToCreditCard(CreditCardId),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be positive, got {}", amount)
            }
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::EmptyCategory => write!(f, "Category cannot be empty"),
            Self::IncomeToCreditCard(card) => {
                write!(f, "Income cannot be recorded against credit card {}", card)
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn txn(kind: TransactionKind, cents: i64, link: Link) -> ActualTransaction {
        ActualTransaction {
            id: TransactionId::new(1),
            description: "Groceries".into(),
            amount: Money::from_cents(cents),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            category: "Food".into(),
            kind,
            link,
        }
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(TransactionKind::parse("Expense"), Some(TransactionKind::Expense));
        assert_eq!(TransactionKind::parse(" income "), Some(TransactionKind::Income));
        assert_eq!(TransactionKind::parse("transfer"), None);
        assert_eq!(TransactionKind::Expense.as_str(), "expense");
    }

    #[test]
    fn test_signed_amount() {
        let t = txn(TransactionKind::Expense, 2500, Link::None);
        assert_eq!(t.signed_amount().cents(), -2500);
        let t = txn(TransactionKind::Income, 2500, Link::None);
        assert_eq!(t.signed_amount().cents(), 2500);
    }

    #[test]
    fn test_link_from_columns() {
        assert_eq!(Link::from_columns(None, None), Ok(Link::None));
        assert_eq!(
            Link::from_columns(Some(AccountId::new(3)), None),
            Ok(Link::Account(AccountId::new(3)))
        );
        assert!(Link::from_columns(Some(AccountId::new(3)), Some(CreditCardId::new(4))).is_err());
    }

    #[test]
    fn test_rejects_non_positive_amount() {
        let t = txn(TransactionKind::Expense, 0, Link::None);
        assert!(matches!(
            t.validate(),
            Err(TransactionValidationError::NonPositiveAmount(_))
        ));
        let t = txn(TransactionKind::Expense, -100, Link::None);
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_rejects_income_to_card() {
        let card = CreditCardId::new(2);
        let t = txn(TransactionKind::Income, 1000, Link::CreditCard(card));
        assert_eq!(
            t.validate(),
            Err(TransactionValidationError::IncomeToCreditCard(card))
        );

        let t = txn(TransactionKind::Expense, 1000, Link::CreditCard(card));
        assert!(t.validate().is_ok());
    }
}
