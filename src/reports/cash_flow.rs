//! Cash-Flow Overview Report
//!
//! Actual income, expenses and net per day, week or month across a date
//! range. Every bucket in the range is reported, including empty ones.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{ActualTransaction, Money, YearMonth};
use crate::storage::{Storage, TransactionFilter};

/// Bucket size for the overview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    Day,
    /// Weeks start on Monday
    Week,
    #[default]
    Month,
}

impl Granularity {
    /// First day of the bucket containing `date`
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => date,
            Self::Week => date - Duration::days(date.weekday().num_days_from_monday() as i64),
            Self::Month => YearMonth::of(date).first_day(),
        }
    }

    fn next(&self, bucket_start: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => bucket_start + Duration::days(1),
            Self::Week => bucket_start + Duration::days(7),
            Self::Month => YearMonth::of(bucket_start).add_months(1).first_day(),
        }
    }

    fn label(&self, bucket_start: NaiveDate) -> String {
        match self {
            Self::Day => bucket_start.to_string(),
            Self::Week => format!("Week of {}", bucket_start),
            Self::Month => YearMonth::of(bucket_start).label(),
        }
    }
}

impl FromStr for Granularity {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "daily" => Ok(Self::Day),
            "week" | "weekly" => Ok(Self::Week),
            "month" | "monthly" => Ok(Self::Month),
            other => Err(LedgerError::Validation(format!(
                "Unknown granularity '{}' (expected day, week or month)",
                other
            ))),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "Daily"),
            Self::Week => write!(f, "Weekly"),
            Self::Month => write!(f, "Monthly"),
        }
    }
}

/// Totals for one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CashFlowBucket {
    pub start: NaiveDate,
    pub income: Money,
    pub expense: Money,
}

impl CashFlowBucket {
    pub fn net(&self) -> Money {
        self.income - self.expense
    }
}

/// Cash-Flow Overview Report
#[derive(Debug, Clone)]
pub struct CashFlowReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub granularity: Granularity,
    pub buckets: Vec<CashFlowBucket>,
}

/// Bucket `transactions` dated within `from..=to`
pub fn bucketize(
    transactions: &[ActualTransaction],
    from: NaiveDate,
    to: NaiveDate,
    granularity: Granularity,
) -> Vec<CashFlowBucket> {
    let mut buckets = BTreeMap::new();
    let mut start = granularity.bucket_start(from);
    while start <= to {
        buckets.insert(
            start,
            CashFlowBucket {
                start,
                income: Money::zero(),
                expense: Money::zero(),
            },
        );
        start = granularity.next(start);
    }

    for txn in transactions.iter().filter(|t| t.date >= from && t.date <= to) {
        if let Some(bucket) = buckets.get_mut(&granularity.bucket_start(txn.date)) {
            if txn.is_income() {
                bucket.income += txn.amount;
            } else {
                bucket.expense += txn.amount;
            }
        }
    }

    buckets.into_values().collect()
}

impl CashFlowReport {
    /// Generate the overview for `from..=to`
    pub fn generate(
        storage: &Storage,
        from: NaiveDate,
        to: NaiveDate,
        granularity: Granularity,
    ) -> LedgerResult<Self> {
        if from > to {
            return Err(LedgerError::Validation(format!(
                "Start date {} is after end date {}",
                from, to
            )));
        }

        let transactions = storage.transactions.list(&TransactionFilter::between(from, to))?;
        Ok(Self {
            from,
            to,
            granularity,
            buckets: bucketize(&transactions, from, to, granularity),
        })
    }

    pub fn total_income(&self) -> Money {
        self.buckets.iter().map(|b| b.income).sum()
    }

    pub fn total_expense(&self) -> Money {
        self.buckets.iter().map(|b| b.expense).sum()
    }

    pub fn total_net(&self) -> Money {
        self.total_income() - self.total_expense()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} Cash Flow: {} to {}\n",
            self.granularity, self.from, self.to
        ));
        output.push_str(&"=".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{:<22} {:>15} {:>15} {:>15}\n",
            "Period", "Income", "Expenses", "Net"
        ));
        output.push_str(&"-".repeat(70));
        output.push('\n');

        for bucket in &self.buckets {
            output.push_str(&format!(
                "{:<22} {:>15} {:>15} {:>15}\n",
                self.granularity.label(bucket.start),
                bucket.income,
                bucket.expense,
                bucket.net()
            ));
        }

        output.push_str(&"-".repeat(70));
        output.push('\n');
        output.push_str(&format!(
            "{:<22} {:>15} {:>15} {:>15}\n",
            "TOTAL",
            self.total_income(),
            self.total_expense(),
            self.total_net()
        ));

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Period Start", "Income", "Expenses", "Net"])?;
        for bucket in &self.buckets {
            csv.write_record([
                bucket.start.to_string(),
                format!("{:.2}", bucket.income.as_f64()),
                format!("{:.2}", bucket.expense.as_f64()),
                format!("{:.2}", bucket.net().as_f64()),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Link, TransactionId, TransactionKind};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(kind: TransactionKind, dollars: i64, on: NaiveDate) -> ActualTransaction {
        ActualTransaction {
            id: TransactionId::new(0),
            description: "Entry".into(),
            amount: Money::from_dollars(dollars),
            date: on,
            category: "General".into(),
            kind,
            link: Link::None,
        }
    }

    #[test]
    fn test_week_starts_monday() {
        // 2024-03-06 is a Wednesday
        assert_eq!(Granularity::Week.bucket_start(date(2024, 3, 6)), date(2024, 3, 4));
        assert_eq!(Granularity::Week.bucket_start(date(2024, 3, 4)), date(2024, 3, 4));
        assert_eq!(Granularity::Week.bucket_start(date(2024, 3, 10)), date(2024, 3, 4));
    }

    #[test]
    fn test_monthly_buckets_include_empty_months() {
        let txns = vec![
            txn(TransactionKind::Income, 3000, date(2024, 1, 15)),
            txn(TransactionKind::Expense, 1000, date(2024, 1, 20)),
            txn(TransactionKind::Expense, 200, date(2024, 3, 2)),
        ];

        let buckets = bucketize(&txns, date(2024, 1, 1), date(2024, 3, 31), Granularity::Month);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].net(), Money::from_dollars(2000));
        assert!(buckets[1].income.is_zero() && buckets[1].expense.is_zero());
        assert_eq!(buckets[2].net(), Money::from_dollars(-200));
    }

    #[test]
    fn test_daily_buckets_ignore_out_of_range() {
        let txns = vec![
            txn(TransactionKind::Expense, 10, date(2024, 3, 1)),
            txn(TransactionKind::Expense, 20, date(2024, 3, 3)),
            txn(TransactionKind::Expense, 99, date(2024, 3, 4)),
        ];

        let buckets = bucketize(&txns, date(2024, 3, 1), date(2024, 3, 3), Granularity::Day);
        let expenses: Vec<i64> = buckets.iter().map(|b| b.expense.cents() / 100).collect();
        assert_eq!(expenses, vec![10, 0, 20]);
    }

    #[test]
    fn test_parse_granularity() {
        assert_eq!("Weekly".parse::<Granularity>().unwrap(), Granularity::Week);
        assert_eq!("day".parse::<Granularity>().unwrap(), Granularity::Day);
        assert!("hourly".parse::<Granularity>().unwrap_err().is_validation());
    }

    #[test]
    fn test_generate_rejects_reversed_range() {
        let storage = Storage::open_in_memory().unwrap();
        let err = CashFlowReport::generate(
            &storage,
            date(2024, 3, 31),
            date(2024, 3, 1),
            Granularity::Day,
        )
        .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_generate_weekly() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .transactions
            .insert(&txn(TransactionKind::Income, 500, date(2024, 3, 5)))
            .unwrap();
        storage
            .transactions
            .insert(&txn(TransactionKind::Expense, 125, date(2024, 3, 12)))
            .unwrap();

        let report =
            CashFlowReport::generate(&storage, date(2024, 3, 4), date(2024, 3, 17), Granularity::Week)
                .unwrap();
        assert_eq!(report.buckets.len(), 2);
        assert_eq!(report.total_net(), Money::from_dollars(375));
        assert!(report.format_terminal().contains("Week of 2024-03-11"));
    }
}
