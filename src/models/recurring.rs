//! Recurring (expected) transaction model
//!
//! A recurring rule describes a repeating income or expense: an amount, a
//! frequency label, and an active date window. Rules never touch balances;
//! they only feed the expected-vs-actual comparison and the forecast.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::RecurringRuleId;
use super::money::Money;
use super::transaction::{Link, TransactionKind};

/// How often a recurring rule repeats
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Frequency {
    Weekly,
    BiWeekly,
    SemiMonthly,
    Monthly,
    Quarterly,
    Annually,
    OneTime,
    /// A label this version does not recognize; treated as monthly
    Other(String),
}

impl Frequency {
    /// All recognized frequencies, shortest cadence first
    pub const KNOWN: [Frequency; 7] = [
        Self::Weekly,
        Self::BiWeekly,
        Self::SemiMonthly,
        Self::Monthly,
        Self::Quarterly,
        Self::Annually,
        Self::OneTime,
    ];

    /// The label stored in the `frequency` column
    pub fn label(&self) -> &str {
        match self {
            Self::Weekly => "weekly",
            Self::BiWeekly => "bi-weekly",
            Self::SemiMonthly => "semi-monthly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Annually => "annually",
            Self::OneTime => "one-time",
            Self::Other(label) => label,
        }
    }

    /// Parse a stored label. Never fails: unknown labels become `Other`.
    pub fn parse(s: &str) -> Self {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "weekly" => Self::Weekly,
            "bi-weekly" | "biweekly" => Self::BiWeekly,
            "semi-monthly" | "semimonthly" => Self::SemiMonthly,
            "monthly" => Self::Monthly,
            "quarterly" => Self::Quarterly,
            "annually" | "annual" | "yearly" => Self::Annually,
            "one-time" | "onetime" | "once" => Self::OneTime,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Sub-monthly and monthly cadences are spread evenly across months;
    /// the rest fire only in specific months.
    pub fn is_smoothed(&self) -> bool {
        matches!(
            self,
            Self::Weekly | Self::BiWeekly | Self::SemiMonthly | Self::Monthly | Self::Other(_)
        )
    }
}

impl From<String> for Frequency {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Frequency> for String {
    fn from(f: Frequency) -> Self {
        f.label().to_string()
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::Monthly
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// A recurring income or expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: RecurringRuleId,
    pub description: String,

    /// Amount per occurrence; always positive
    pub amount: Money,

    pub kind: TransactionKind,
    pub frequency: Frequency,
    pub start_date: NaiveDate,

    /// Last date the rule applies (inclusive), if any
    pub end_date: Option<NaiveDate>,

    pub category: String,
    pub link: Link,

    /// Inactive rules are ignored by reports and forecasts
    pub active: bool,
}

impl RecurringRule {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Validate the rule
    pub fn validate(&self) -> Result<(), RuleValidationError> {
        if !self.amount.is_positive() {
            return Err(RuleValidationError::NonPositiveAmount(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(RuleValidationError::EmptyDescription);
        }

        if self.category.trim().is_empty() {
            return Err(RuleValidationError::EmptyCategory);
        }

        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(RuleValidationError::EndBeforeStart {
                    start: self.start_date,
                    end,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Display for RecurringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ({})",
            self.description,
            self.kind.signed(self.amount),
            self.frequency,
            self.category
        )
    }
}

/// Validation errors for recurring rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleValidationError {
    NonPositiveAmount(Money),
    EmptyDescription,
    EmptyCategory,
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for RuleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Amount must be positive, got {}", amount)
            }
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::EmptyCategory => write!(f, "Category cannot be empty"),
            Self::EndBeforeStart { start, end } => {
                write!(f, "End date {} is before start date {}", end, start)
            }
        }
    }
}

impl std::error::Error for RuleValidationError {}
