//! CLI commands for reports
//!
//! Provides commands for generating and exporting the ledger's reports.

use std::path::PathBuf;

use clap::Subcommand;

use crate::config::Settings;
use crate::error::LedgerResult;
use crate::models::YearMonth;
use crate::reports::{
    CashFlowReport, DashboardReport, ExpectedVsActualReport, ForecastReport, Granularity,
    SpendingReport, UtilizationReport,
};
use crate::storage::Storage;

use super::{create_export_file, parse_date, parse_month_or_current};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Balances, debt, this month's cash flow and alerts
    #[command(alias = "summary")]
    Dashboard,

    /// Expected (recurring) versus actual spending for a month
    #[command(alias = "variance")]
    Expected {
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// Restrict to one category
        #[arg(short, long)]
        category: Option<String>,

        /// One row per category
        #[arg(long)]
        by_category: bool,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Project the total bank balance forward month by month
    Forecast {
        /// Number of months to project (1-12)
        #[arg(short, long)]
        months: Option<u32>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Income and expenses per day, week or month
    #[command(alias = "cash-flow")]
    Cashflow {
        /// Start date (YYYY-MM-DD), defaults to the first of the month
        #[arg(short, long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        to: Option<String>,

        /// Bucket size: day, week or month
        #[arg(short, long, default_value = "month")]
        by: Granularity,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Spending by category
    Spending {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,

        /// Month to report on (alternative to start/end)
        #[arg(short, long)]
        month: Option<String>,

        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show top N categories only
        #[arg(long)]
        top: Option<usize>,
    },

    /// Credit utilization per card
    Utilization,
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    match cmd {
        ReportCommands::Dashboard => {
            let today = chrono::Local::now().date_naive();
            let report = DashboardReport::generate(storage, settings, today)?;
            println!("{}", report.format_terminal());
            Ok(())
        }
        ReportCommands::Expected {
            month,
            category,
            by_category,
            output,
        } => handle_expected_report(storage, month, category, by_category, output),
        ReportCommands::Forecast { months, output } => {
            let months = months.unwrap_or_else(|| settings.forecast_months());
            handle_forecast_report(storage, months, output)
        }
        ReportCommands::Cashflow {
            from,
            to,
            by,
            output,
        } => handle_cash_flow_report(storage, from, to, by, output),
        ReportCommands::Spending {
            start,
            end,
            month,
            output,
            top,
        } => handle_spending_report(storage, start, end, month, output, top),
        ReportCommands::Utilization => {
            let report = UtilizationReport::generate(storage)?;
            println!("{}", report.format_terminal());
            Ok(())
        }
    }
}

/// Handle expected vs. actual report
fn handle_expected_report(
    storage: &Storage,
    month: Option<String>,
    category: Option<String>,
    by_category: bool,
    output: Option<PathBuf>,
) -> LedgerResult<()> {
    let month = parse_month_or_current(month.as_deref())?;
    let report = ExpectedVsActualReport::generate(storage, month, category.as_deref(), by_category)?;

    if let Some(path) = output {
        let mut writer = create_export_file(&path)?;
        report.export_csv(&mut writer)?;
        println!("Expected vs. actual report exported to: {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}

/// Handle balance forecast
fn handle_forecast_report(storage: &Storage, months: u32, output: Option<PathBuf>) -> LedgerResult<()> {
    let report = ForecastReport::generate(storage, months)?;

    if let Some(path) = output {
        let mut writer = create_export_file(&path)?;
        report.export_csv(&mut writer)?;
        println!("Forecast exported to: {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}

/// Handle cash-flow report
fn handle_cash_flow_report(
    storage: &Storage,
    from: Option<String>,
    to: Option<String>,
    by: Granularity,
    output: Option<PathBuf>,
) -> LedgerResult<()> {
    let today = chrono::Local::now().date_naive();
    let from = match from {
        Some(s) => parse_date(&s)?,
        None => YearMonth::of(today).first_day(),
    };
    let to = match to {
        Some(s) => parse_date(&s)?,
        None => today,
    };

    let report = CashFlowReport::generate(storage, from, to, by)?;

    if let Some(path) = output {
        let mut writer = create_export_file(&path)?;
        report.export_csv(&mut writer)?;
        println!("Cash-flow report exported to: {}", path.display());
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}

/// Handle spending report
fn handle_spending_report(
    storage: &Storage,
    start: Option<String>,
    end: Option<String>,
    month: Option<String>,
    output: Option<PathBuf>,
    top: Option<usize>,
) -> LedgerResult<()> {
    // Determine date range
    let (start_date, end_date) = if month.is_some() {
        let month = parse_month_or_current(month.as_deref())?;
        (month.first_day(), month.last_day())
    } else {
        let today = chrono::Local::now().date_naive();
        let start_date = match start {
            Some(s) => parse_date(&s)?,
            None => YearMonth::of(today).first_day(),
        };
        let end_date = match end {
            Some(e) => parse_date(&e)?,
            None => today,
        };
        (start_date, end_date)
    };

    let report = SpendingReport::generate(storage, start_date, end_date)?;

    if let Some(path) = output {
        let mut writer = create_export_file(&path)?;
        report.export_csv(&mut writer)?;
        println!("Spending report exported to: {}", path.display());
    } else if let Some(n) = top {
        // Show top N categories only
        println!(
            "Top {} Spending Categories: {} to {}\n",
            n, start_date, end_date
        );
        println!("{:<35} {:>12} {:>8}", "Category", "Amount", "%");
        println!("{}", "-".repeat(60));

        for cat in report.top_categories(n) {
            println!(
                "{:<35} {:>12} {:>7.1}%",
                cat.category, cat.total_spending, cat.percentage
            );
        }
        println!("\nTotal Spending: {}", report.total_spending);
    } else {
        println!("{}", report.format_terminal());
    }

    Ok(())
}
