//! Balance Forecast Report
//!
//! Projects the total bank balance forward month by month. Each month starts
//! from the previous month's projection and adds the forecast effect of every
//! active recurring rule, so the sequence is a running sum and must be built
//! in order.

use std::fmt;
use std::io::Write;

use crate::config::settings::MAX_FORECAST_MONTHS;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, RecurringRule, YearMonth};
use crate::services::frequency::forecast_effect;
use crate::storage::Storage;

/// Projected balance at the start of a month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastPoint {
    pub month: YearMonth,
    pub balance: Money,
}

/// Overall direction of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outlook {
    /// Some projected balance goes below zero
    Alert,
    /// Ends lower than it starts
    Declining,
    Positive,
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alert => write!(f, "Alert: balance projected to go negative"),
            Self::Declining => write!(f, "Declining: balance projected to decrease"),
            Self::Positive => write!(f, "Positive: balance projected to hold or grow"),
        }
    }
}

/// Summary figures derived from a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastAnalysis {
    pub min: ForecastPoint,
    pub max: ForecastPoint,
    pub start: Money,
    pub end: Money,
    pub outlook: Outlook,
}

impl ForecastAnalysis {
    /// `end - start`
    pub fn change(&self) -> Money {
        self.end - self.start
    }
}

/// Balance Forecast Report
#[derive(Debug, Clone)]
pub struct ForecastReport {
    /// Horizon length; `points` holds `months + 1` entries
    pub months: u32,
    pub points: Vec<ForecastPoint>,
}

/// Project `balance` over `months` months after `start`
///
/// The first point is `(start, balance)`; each following point adds the
/// forecast effect of every rule for that month.
pub fn project(
    rules: &[RecurringRule],
    start: YearMonth,
    balance: Money,
    months: u32,
) -> LedgerResult<Vec<ForecastPoint>> {
    if months == 0 || months > MAX_FORECAST_MONTHS {
        return Err(LedgerError::Validation(format!(
            "Forecast horizon must be between 1 and {} months, got {}",
            MAX_FORECAST_MONTHS, months
        )));
    }

    let mut points = Vec::with_capacity(months as usize + 1);
    points.push(ForecastPoint {
        month: start,
        balance,
    });

    let mut running = balance;
    for i in 1..=months as i32 {
        let month = start.add_months(i);
        running += rules.iter().map(|rule| forecast_effect(rule, month)).sum::<Money>();
        points.push(ForecastPoint {
            month,
            balance: running,
        });
    }

    Ok(points)
}

/// Derive min, max, start, end and outlook from a projection
///
/// Ties for min or max go to the earliest month. Returns `None` for an empty
/// sequence.
pub fn analyze(points: &[ForecastPoint]) -> Option<ForecastAnalysis> {
    let first = *points.first()?;
    let last = *points.last()?;

    let mut min = first;
    let mut max = first;
    for point in points {
        if point.balance < min.balance {
            min = *point;
        }
        if point.balance > max.balance {
            max = *point;
        }
    }

    let outlook = if min.balance.is_negative() {
        Outlook::Alert
    } else if last.balance < first.balance {
        Outlook::Declining
    } else {
        Outlook::Positive
    };

    Some(ForecastAnalysis {
        min,
        max,
        start: first.balance,
        end: last.balance,
        outlook,
    })
}

impl ForecastReport {
    /// Forecast from the current month and the current total bank balance
    pub fn generate(storage: &Storage, months: u32) -> LedgerResult<Self> {
        Self::generate_from(storage, YearMonth::current(), months)
    }

    /// Forecast starting at `start` instead of the current month
    pub fn generate_from(storage: &Storage, start: YearMonth, months: u32) -> LedgerResult<Self> {
        let balance = storage.accounts.total_balance()?;
        let rules = storage.recurring.get_active()?;
        let points = project(&rules, start, balance, months)?;
        Ok(Self { months, points })
    }

    pub fn analysis(&self) -> Option<ForecastAnalysis> {
        analyze(&self.points)
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Balance Forecast ({} months)\n", self.months));
        output.push_str(&"=".repeat(50));
        output.push('\n');
        output.push_str(&format!("{:<12} {:>16} {:>16}\n", "Month", "Balance", "Change"));
        output.push_str(&"-".repeat(50));
        output.push('\n');

        let mut previous: Option<Money> = None;
        for point in &self.points {
            let change = previous.map_or_else(String::new, |p| (point.balance - p).to_string());
            output.push_str(&format!(
                "{:<12} {:>16} {:>16}\n",
                point.month.label(),
                point.balance,
                change
            ));
            previous = Some(point.balance);
        }

        if let Some(analysis) = self.analysis() {
            output.push_str(&"-".repeat(50));
            output.push('\n');
            output.push_str(&format!(
                "Lowest:  {} ({})\n",
                analysis.min.balance,
                analysis.min.month.label()
            ));
            output.push_str(&format!(
                "Highest: {} ({})\n",
                analysis.max.balance,
                analysis.max.month.label()
            ));
            output.push_str(&format!("Change:  {}\n", analysis.change()));
            output.push_str(&format!("\n{}\n", analysis.outlook));
        }

        output
    }

    /// Export the report to CSV format
    pub fn export_csv<W: Write>(&self, writer: W) -> LedgerResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Month", "Balance"])?;
        for point in &self.points {
            csv.write_record([
                point.month.to_string(),
                format!("{:.2}", point.balance.as_f64()),
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Link, RecurringRuleId, TransactionKind};
    use chrono::NaiveDate;

    fn ym(y: i32, m: u32) -> YearMonth {
        YearMonth::new(y, m).unwrap()
    }

    fn rule(kind: TransactionKind, dollars: i64, frequency: Frequency, start: YearMonth) -> RecurringRule {
        RecurringRule {
            id: RecurringRuleId::new(1),
            description: "Rule".into(),
            amount: Money::from_dollars(dollars),
            kind,
            frequency,
            start_date: start.first_day(),
            end_date: None,
            category: "General".into(),
            link: Link::None,
            active: true,
        }
    }

    fn balances(points: &[ForecastPoint]) -> Vec<i64> {
        points.iter().map(|p| p.balance.cents() / 100).collect()
    }

    #[test]
    fn test_monthly_expense_scenario() {
        let start = ym(2024, 3);
        let rules = vec![rule(TransactionKind::Expense, 200, Frequency::Monthly, start)];

        let points = project(&rules, start, Money::from_dollars(1000), 3).unwrap();
        assert_eq!(balances(&points), vec![1000, 800, 600, 400]);
        assert_eq!(points[0].month, start);
        assert_eq!(points[3].month, ym(2024, 6));

        let analysis = analyze(&points).unwrap();
        assert_eq!(analysis.min.balance, Money::from_dollars(400));
        assert_eq!(analysis.min.month, ym(2024, 6));
        assert_eq!(analysis.max.month, start);
        assert_eq!(analysis.change(), Money::from_dollars(-600));
        assert_eq!(analysis.outlook, Outlook::Declining);
    }

    #[test]
    fn test_horizon_bounds() {
        let start = ym(2024, 1);
        assert!(project(&[], start, Money::zero(), 0).unwrap_err().is_validation());
        assert!(project(&[], start, Money::zero(), 13).unwrap_err().is_validation());
        assert_eq!(project(&[], start, Money::zero(), 12).unwrap().len(), 13);
    }

    #[test]
    fn test_year_rollover() {
        let points = project(&[], ym(2024, 11), Money::zero(), 3).unwrap();
        let months: Vec<YearMonth> = points.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![ym(2024, 11), ym(2024, 12), ym(2025, 1), ym(2025, 2)]);
    }

    #[test]
    fn test_discrete_rules_hit_only_firing_months() {
        let start = ym(2024, 1);
        let rules = vec![
            rule(TransactionKind::Expense, 300, Frequency::Quarterly, start),
            rule(TransactionKind::Income, 50, Frequency::OneTime, ym(2024, 2)),
        ];

        let points = project(&rules, start, Money::from_dollars(1000), 4).unwrap();
        // Feb +50, Mar 0, Apr -300, May 0
        assert_eq!(balances(&points), vec![1000, 1050, 1050, 750, 750]);
    }

    #[test]
    fn test_weekly_rules_are_smoothed() {
        let start = ym(2024, 1);
        let rules = vec![rule(TransactionKind::Income, 100, Frequency::Weekly, start)];
        let points = project(&rules, start, Money::zero(), 2).unwrap();
        assert_eq!(points[1].balance.cents(), 43_300);
        assert_eq!(points[2].balance.cents(), 86_600);
    }

    #[test]
    fn test_inactive_and_future_rules_ignored() {
        let start = ym(2024, 1);
        let mut paused = rule(TransactionKind::Expense, 100, Frequency::Monthly, start);
        paused.active = false;
        let later = rule(TransactionKind::Expense, 100, Frequency::Monthly, ym(2024, 3));

        let points = project(&[paused, later], start, Money::from_dollars(500), 3).unwrap();
        assert_eq!(balances(&points), vec![500, 500, 400, 300]);
    }

    #[test]
    fn test_outlook_classification() {
        let start = ym(2024, 1);
        let drain = vec![rule(TransactionKind::Expense, 400, Frequency::Monthly, start)];
        let points = project(&drain, start, Money::from_dollars(500), 2).unwrap();
        assert_eq!(analyze(&points).unwrap().outlook, Outlook::Alert);

        let salary = vec![rule(TransactionKind::Income, 400, Frequency::Monthly, start)];
        let points = project(&salary, start, Money::from_dollars(500), 2).unwrap();
        assert_eq!(analyze(&points).unwrap().outlook, Outlook::Positive);

        assert!(analyze(&[]).is_none());
    }

    #[test]
    fn test_generate_from_storage() {
        let storage = Storage::open_in_memory().unwrap();
        storage.accounts.insert("Checking", Money::from_dollars(700)).unwrap();
        storage.accounts.insert("Savings", Money::from_dollars(300)).unwrap();
        let start = ym(2024, 3);
        let mut expense = rule(TransactionKind::Expense, 200, Frequency::Monthly, start);
        expense.start_date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        storage.recurring.insert(&expense).unwrap();

        let report = ForecastReport::generate_from(&storage, start, 3).unwrap();
        assert_eq!(balances(&report.points), vec![1000, 800, 600, 400]);

        let text = report.format_terminal();
        assert!(text.contains("Jun 2024"));
        assert!(text.contains("Declining"));

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert_eq!(
            csv,
            "Month,Balance\n2024-03,1000.00\n2024-04,800.00\n2024-05,600.00\n2024-06,400.00\n"
        );
    }
}
