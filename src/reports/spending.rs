//! Spending Report
//!
//! Generates spending analysis by category for a given date range.

use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Money;
use crate::storage::{Storage, TransactionFilter};

/// Spending breakdown by category
#[derive(Debug, Clone)]
pub struct SpendingByCategory {
    /// Category name as first recorded
    pub category: String,
    /// Total spending
    pub total_spending: Money,
    /// Number of transactions
    pub transaction_count: usize,
    /// Percentage of total spending
    pub percentage: f64,
}

/// Spending Report
#[derive(Debug, Clone)]
pub struct SpendingReport {
    /// Start date of the report
    pub start_date: NaiveDate,
    /// End date of the report
    pub end_date: NaiveDate,
    /// Categories, largest spending first
    pub categories: Vec<SpendingByCategory>,
    /// Total spending across all categories
    pub total_spending: Money,
    /// Total income in the period
    pub total_income: Money,
    /// Number of expense transactions
    pub total_transactions: usize,
}

impl SpendingReport {
    /// Generate a spending report for a date range
    pub fn generate(
        storage: &Storage,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> LedgerResult<Self> {
        if start_date > end_date {
            return Err(LedgerError::Validation(format!(
                "Start date {} is after end date {}",
                start_date, end_date
            )));
        }

        let transactions = storage
            .transactions
            .list(&TransactionFilter::between(start_date, end_date))?;

        // Aggregate spending by category, case-insensitively
        let mut by_category: HashMap<String, SpendingByCategory> = HashMap::new();
        let mut total_income = Money::zero();
        let mut total_spending = Money::zero();
        let mut total_transactions = 0;

        for txn in &transactions {
            if txn.is_income() {
                total_income += txn.amount;
                continue;
            }

            let entry = by_category
                .entry(txn.category.to_lowercase())
                .or_insert_with(|| SpendingByCategory {
                    category: txn.category.clone(),
                    total_spending: Money::zero(),
                    transaction_count: 0,
                    percentage: 0.0,
                });
            entry.total_spending += txn.amount;
            entry.transaction_count += 1;
            total_spending += txn.amount;
            total_transactions += 1;
        }

        let mut categories: Vec<SpendingByCategory> = by_category
            .into_values()
            .map(|mut c| {
                c.percentage = c.total_spending.percent_of(total_spending);
                c
            })
            .collect();

        // Most spending first, then by name for a stable order
        categories.sort_by(|a, b| {
            b.total_spending
                .cmp(&a.total_spending)
                .then_with(|| a.category.cmp(&b.category))
        });

        Ok(Self {
            start_date,
            end_date,
            categories,
            total_spending,
            total_income,
            total_transactions,
        })
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        // Header
        output.push_str(&format!(
            "Spending Report: {} to {}\n",
            self.start_date, self.end_date
        ));
        output.push_str(&"=".repeat(66));
        output.push('\n');
        output.push_str(&format!("Total Spending: {}\n", self.total_spending));
        output.push_str(&format!("Total Income: {}\n", self.total_income));
        output.push_str(&format!("Total Transactions: {}\n\n", self.total_transactions));

        if self.categories.is_empty() {
            output.push_str("No spending in this period.\n");
            return output;
        }

        // Column headers
        output.push_str(&format!(
            "{:<35} {:>12} {:>8} {:>8}\n",
            "Category", "Amount", "Count", "%"
        ));
        output.push_str(&"-".repeat(66));
        output.push('\n');

        for category in &self.categories {
            output.push_str(&format!(
                "{:<35} {:>12} {:>8} {:>7.1}%\n",
                category.category,
                category.total_spending,
                category.transaction_count,
                category.percentage
            ));
        }

        // Grand total
        output.push_str(&"-".repeat(66));
        output.push('\n');
        output.push_str(&format!(
            "{:<35} {:>12} {:>8}\n",
            "TOTAL SPENDING", self.total_spending, self.total_transactions
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "Start Date",
            "End Date",
            "Category",
            "Amount",
            "Transaction Count",
            "Percentage",
        ])?;

        for category in &self.categories {
            csv.write_record([
                self.start_date.to_string(),
                self.end_date.to_string(),
                category.category.clone(),
                format!("{:.2}", category.total_spending.as_f64()),
                category.transaction_count.to_string(),
                format!("{:.2}", category.percentage),
            ])?;
        }

        csv.write_record([
            self.start_date.to_string(),
            self.end_date.to_string(),
            "TOTAL".to_string(),
            format!("{:.2}", self.total_spending.as_f64()),
            self.total_transactions.to_string(),
            "100.00".to_string(),
        ])?;

        csv.flush()?;
        Ok(())
    }

    /// Get top spending categories
    pub fn top_categories(&self, limit: usize) -> Vec<&SpendingByCategory> {
        self.categories.iter().take(limit).collect()
    }
}
