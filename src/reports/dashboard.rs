//! Dashboard Report
//!
//! One-screen summary: totals across accounts and cards, this month's actual
//! cash flow, and a list of insights worth acting on.

use std::fmt;

use chrono::NaiveDate;

use crate::config::settings::Settings;
use crate::error::LedgerResult;
use crate::models::{Account, CreditCard, Money, YearMonth};
use crate::storage::{Storage, TransactionFilter};

/// Cards due within this many days are "due soon" rather than "upcoming"
const DUE_SOON_DAYS: i64 = 3;

/// Due-date state of a credit card payment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    DueSoon,
    Upcoming,
}

impl DueStatus {
    /// Classify `days_until_due`; `None` when the due date is further out
    /// than `window` days
    pub fn classify(days_until_due: i64, window: i64) -> Option<Self> {
        if days_until_due < 0 {
            Some(Self::Overdue)
        } else if days_until_due <= DUE_SOON_DAYS {
            Some(Self::DueSoon)
        } else if days_until_due <= window {
            Some(Self::Upcoming)
        } else {
            None
        }
    }
}

impl fmt::Display for DueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overdue => write!(f, "Overdue"),
            Self::DueSoon => write!(f, "Due soon"),
            Self::Upcoming => write!(f, "Upcoming"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum InsightLevel {
    Good,
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub level: InsightLevel,
    pub message: String,
}

impl Insight {
    fn new(level: InsightLevel, message: String) -> Self {
        Self { level, message }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.level {
            InsightLevel::Good => "+",
            InsightLevel::Info => "*",
            InsightLevel::Warning => "!",
        };
        write!(f, "[{}] {}", marker, self.message)
    }
}

/// Dashboard Report
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub today: NaiveDate,
    pub total_bank_balance: Money,
    pub total_card_debt: Money,
    pub month_income: Money,
    pub month_expense: Money,
    pub insights: Vec<Insight>,
}

impl DashboardReport {
    /// Generate the dashboard as of `today`
    pub fn generate(storage: &Storage, settings: &Settings, today: NaiveDate) -> LedgerResult<Self> {
        let accounts = storage.accounts.get_all()?;
        let cards = storage.cards.get_all()?;

        let month = YearMonth::of(today);
        let transactions = storage
            .transactions
            .list(&TransactionFilter::between(month.first_day(), month.last_day()))?;

        let month_income: Money = transactions
            .iter()
            .filter(|t| t.is_income())
            .map(|t| t.amount)
            .sum();
        let month_expense: Money = transactions
            .iter()
            .filter(|t| t.is_expense())
            .map(|t| t.amount)
            .sum();

        let mut report = Self {
            today,
            total_bank_balance: accounts.iter().map(|a| a.balance).sum(),
            total_card_debt: cards.iter().map(|c| c.current_balance).sum(),
            month_income,
            month_expense,
            insights: Vec::new(),
        };
        report.insights = report.collect_insights(&accounts, &cards, settings);
        Ok(report)
    }

    /// Bank balance minus card debt
    pub fn net_worth(&self) -> Money {
        self.total_bank_balance - self.total_card_debt
    }

    /// This month's income minus expenses
    pub fn month_net(&self) -> Money {
        self.month_income - self.month_expense
    }

    fn collect_insights(
        &self,
        accounts: &[Account],
        cards: &[CreditCard],
        settings: &Settings,
    ) -> Vec<Insight> {
        let mut insights = Vec::new();

        for card in cards {
            let days = card.days_until_due(self.today);
            let Some(status) = DueStatus::classify(days, settings.due_soon_days) else {
                continue;
            };
            let message = match status {
                DueStatus::Overdue => format!(
                    "{} payment of {} is overdue by {} day{}",
                    card.name,
                    card.statement_balance,
                    -days,
                    if days == -1 { "" } else { "s" }
                ),
                _ => format!(
                    "{} payment of {} is due in {} day{}",
                    card.name,
                    card.statement_balance,
                    days,
                    if days == 1 { "" } else { "s" }
                ),
            };
            let level = if status == DueStatus::Upcoming {
                InsightLevel::Info
            } else {
                InsightLevel::Warning
            };
            insights.push(Insight::new(level, message));
        }

        for account in accounts {
            if account.balance < settings.low_balance_threshold {
                insights.push(Insight::new(
                    InsightLevel::Warning,
                    format!("{} has a low balance ({})", account.name, account.balance),
                ));
            }
        }

        let net = self.month_net();
        if net.is_negative() {
            insights.push(Insight::new(
                InsightLevel::Warning,
                format!("You're spending more than you earn this month ({})", net),
            ));
        } else {
            insights.push(Insight::new(
                InsightLevel::Good,
                format!("You're cash flow positive this month by {}", net),
            ));
        }

        for card in cards {
            let utilization = card.utilization_percent();
            if utilization > settings.utilization_warning_percent {
                insights.push(Insight::new(
                    InsightLevel::Warning,
                    format!(
                        "{} has high utilization ({:.1}%). Consider paying down this balance.",
                        card.name, utilization
                    ),
                ));
            }
        }

        insights
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Dashboard ({})\n", self.today));
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output.push_str(&format!("{:<24} {:>16}\n", "Bank balance:", self.total_bank_balance));
        output.push_str(&format!("{:<24} {:>16}\n", "Credit card debt:", self.total_card_debt));
        output.push_str(&format!("{:<24} {:>16}\n", "Net worth:", self.net_worth()));
        output.push('\n');

        output.push_str(&format!("{}\n", YearMonth::of(self.today).label()));
        output.push_str(&"-".repeat(50));
        output.push('\n');
        output.push_str(&format!("{:<24} {:>16}\n", "Income:", self.month_income));
        output.push_str(&format!("{:<24} {:>16}\n", "Expenses:", self.month_expense));
        output.push_str(&format!("{:<24} {:>16}\n", "Net cash flow:", self.month_net()));

        if !self.insights.is_empty() {
            output.push_str("\nInsights\n");
            output.push_str(&"-".repeat(50));
            output.push('\n');
            for insight in &self.insights {
                output.push_str(&format!("{}\n", insight));
            }
        }

        output
    }
}
