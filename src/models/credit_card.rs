//! Credit card model
//!
//! `current_balance` is the amount owed and grows with card expenses. The
//! statement balance, rate, limit and due date are informational and only
//! feed the dashboard and utilization reports.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::{validate_name, AccountValidationError};
use super::ids::CreditCardId;
use super::money::Money;

/// A credit card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: CreditCardId,
    pub name: String,

    /// Amount currently owed
    pub current_balance: Money,

    /// Balance on the last statement
    pub statement_balance: Money,

    /// Annual interest rate, in percent
    pub interest_rate: f64,

    /// Next payment due date
    pub due_date: NaiveDate,

    pub credit_limit: Money,

    pub last_updated: Option<NaiveDateTime>,
}

impl CreditCard {
    /// Current balance as a percentage of the credit limit (0 when no limit)
    pub fn utilization_percent(&self) -> f64 {
        self.current_balance.percent_of(self.credit_limit)
    }

    /// Remaining credit (may be negative when over limit)
    pub fn available_credit(&self) -> Money {
        self.credit_limit - self.current_balance
    }

    /// Days from `today` until the due date; negative when overdue
    pub fn days_until_due(&self, today: NaiveDate) -> i64 {
        (self.due_date - today).num_days()
    }

    /// Validate the card
    pub fn validate(&self) -> Result<(), CreditCardValidationError> {
        validate_name(&self.name).map_err(CreditCardValidationError::Name)?;

        if self.credit_limit.is_negative() {
            return Err(CreditCardValidationError::NegativeLimit(self.credit_limit));
        }

        if !self.interest_rate.is_finite() || self.interest_rate < 0.0 {
            return Err(CreditCardValidationError::InvalidRate(self.interest_rate));
        }

        Ok(())
    }
}

impl fmt::Display for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} owed)", self.name, self.current_balance)
    }
}

/// Validation errors for credit cards
#[derive(Debug, Clone, PartialEq)]
pub enum CreditCardValidationError {
    Name(AccountValidationError),
    NegativeLimit(Money),
    InvalidRate(f64),
}

impl fmt::Display for CreditCardValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(e) => write!(f, "{}", e),
            Self::NegativeLimit(limit) => {
                write!(f, "Credit limit cannot be negative ({})", limit)
            }
            Self::InvalidRate(rate) => write!(f, "Invalid interest rate: {}", rate),
        }
    }
}

impl std::error::Error for CreditCardValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(balance: i64, limit: i64) -> CreditCard {
        CreditCard {
            id: CreditCardId::new(1),
            name: "Visa".into(),
            current_balance: Money::from_dollars(balance),
            statement_balance: Money::zero(),
            interest_rate: 19.99,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            credit_limit: Money::from_dollars(limit),
            last_updated: None,
        }
    }

    #[test]
    fn test_utilization() {
        assert_eq!(card(1500, 5000).utilization_percent(), 30.0);
        assert_eq!(card(200, 0).utilization_percent(), 0.0);
        assert_eq!(card(1500, 5000).available_credit(), Money::from_dollars(3500));
    }

    #[test]
    fn test_days_until_due() {
        let c = card(0, 1000);
        let today = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert_eq!(c.days_until_due(today), 3);
        let later = NaiveDate::from_ymd_opt(2024, 3, 22).unwrap();
        assert_eq!(c.days_until_due(later), -2);
    }

    #[test]
    fn test_validation() {
        assert!(card(0, 1000).validate().is_ok());
        assert!(matches!(
            card(0, -1).validate(),
            Err(CreditCardValidationError::NegativeLimit(_))
        ));

        let mut bad_rate = card(0, 1000);
        bad_rate.interest_rate = -1.0;
        assert!(matches!(
            bad_rate.validate(),
            Err(CreditCardValidationError::InvalidRate(_))
        ));
    }
}
