//! Expected vs. Actual Report
//!
//! Compares what the recurring rules say a month should cost with what the
//! recorded expense transactions actually came to, in aggregate or per
//! category.

use std::collections::BTreeMap;
use std::io::Write;

use crate::error::LedgerResult;
use crate::models::{ActualTransaction, Money, RecurringRule, YearMonth};
use crate::services::frequency::{is_eligible, monthly_equivalent};
use crate::storage::{Storage, TransactionFilter};

/// One line of the comparison
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceRow {
    /// Category name, or "All expenses" for the aggregate
    pub label: String,
    pub expected: Money,
    pub actual: Money,
}

impl VarianceRow {
    /// `actual - expected`; negative means under budget
    pub fn difference(&self) -> Money {
        self.actual - self.expected
    }

    /// Difference as a percentage of expected, 0 when nothing was expected
    pub fn percent_difference(&self) -> f64 {
        self.difference().percent_of(self.expected)
    }
}

/// Expected vs. Actual Report
#[derive(Debug, Clone)]
pub struct ExpectedVsActualReport {
    pub month: YearMonth,
    /// Category the report was restricted to, if any
    pub category: Option<String>,
    /// Per-category rows (empty for an aggregate report)
    pub rows: Vec<VarianceRow>,
    pub total: VarianceRow,
}

fn bucket<'a>(buckets: &'a mut BTreeMap<String, VarianceRow>, name: &str) -> &'a mut VarianceRow {
    buckets
        .entry(name.to_lowercase())
        .or_insert_with(|| VarianceRow {
            label: name.to_string(),
            expected: Money::zero(),
            actual: Money::zero(),
        })
}

fn category_matches(filter: Option<&str>, category: &str) -> bool {
    filter.map_or(true, |f| category.eq_ignore_ascii_case(f.trim()))
}

/// Build the comparison from already-loaded rules and transactions
///
/// Expected is the monthly equivalent of every active expense rule eligible
/// for `month`; actual is the sum of expense transactions dated inside it.
pub fn compare(
    rules: &[RecurringRule],
    transactions: &[ActualTransaction],
    month: YearMonth,
    category: Option<&str>,
    by_category: bool,
) -> ExpectedVsActualReport {
    // Keyed by lowercase name; the first spelling seen is displayed
    let mut buckets: BTreeMap<String, VarianceRow> = BTreeMap::new();

    for rule in rules {
        if rule.is_expense()
            && is_eligible(rule, month)
            && category_matches(category, &rule.category)
        {
            bucket(&mut buckets, &rule.category).expected += monthly_equivalent(rule, month);
        }
    }

    for txn in transactions {
        if txn.is_expense() && month.contains(txn.date) && category_matches(category, &txn.category)
        {
            bucket(&mut buckets, &txn.category).actual += txn.amount;
        }
    }

    let rows: Vec<VarianceRow> = buckets.into_values().collect();
    let total = VarianceRow {
        label: category.map_or_else(|| "All expenses".to_string(), |c| c.trim().to_string()),
        expected: rows.iter().map(|r| r.expected).sum(),
        actual: rows.iter().map(|r| r.actual).sum(),
    };

    ExpectedVsActualReport {
        month,
        category: category.map(|c| c.trim().to_string()),
        rows: if by_category { rows } else { Vec::new() },
        total,
    }
}

fn format_row(row: &VarianceRow) -> String {
    format!(
        "{:<24} {:>12} {:>12} {:>12} {:>7.2}%\n",
        row.label,
        row.expected,
        row.actual,
        row.difference(),
        row.percent_difference()
    )
}

impl ExpectedVsActualReport {
    /// Generate the report for `month` from the ledger store
    pub fn generate(
        storage: &Storage,
        month: YearMonth,
        category: Option<&str>,
        by_category: bool,
    ) -> LedgerResult<Self> {
        let rules = storage.recurring.get_active()?;
        let transactions = storage
            .transactions
            .list(&TransactionFilter::between(month.first_day(), month.last_day()))?;
        Ok(compare(&rules, &transactions, month, category, by_category))
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Expected vs. Actual: {}\n", self.month.label()));
        if let Some(category) = &self.category {
            output.push_str(&format!("Category: {}\n", category));
        }
        output.push_str(&"=".repeat(72));
        output.push('\n');

        output.push_str(&format!(
            "{:<24} {:>12} {:>12} {:>12} {:>8}\n",
            "Category", "Expected", "Actual", "Difference", "%"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format_row(row));
        }
        if !self.rows.is_empty() {
            output.push_str(&"-".repeat(72));
            output.push('\n');
        }
        output.push_str(&format_row(&self.total));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Month", "Category", "Expected", "Actual", "Difference", "Percent"])?;

        for row in self.rows.iter().chain(std::iter::once(&self.total)) {
            csv.write_record([
                self.month.to_string(),
                row.label.clone(),
                format!("{:.2}", row.expected.as_f64()),
                format!("{:.2}", row.actual.as_f64()),
                format!("{:.2}", row.difference().as_f64()),
                format!("{:.2}", row.percent_difference()),
            ])?;
        }

        csv.flush()?;
        Ok(())
    }
}
