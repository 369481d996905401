//! Reports module for the cash-flow ledger
//!
//! Expected-vs-actual spending and the balance forecast, plus the dashboard,
//! cash-flow overview, spending breakdown and credit utilization views.

pub mod cash_flow;
pub mod dashboard;
pub mod expected_vs_actual;
pub mod forecast;
pub mod spending;
pub mod utilization;

pub use cash_flow::{CashFlowBucket, CashFlowReport, Granularity};
pub use dashboard::{DashboardReport, DueStatus, Insight, InsightLevel};
pub use expected_vs_actual::{ExpectedVsActualReport, VarianceRow};
pub use forecast::{ForecastAnalysis, ForecastPoint, ForecastReport, Outlook};
pub use spending::{SpendingByCategory, SpendingReport};
pub use utilization::{CardUtilization, UtilizationBand, UtilizationReport};
