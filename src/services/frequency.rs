//! Frequency normalization for recurring rules
//!
//! Two views of a rule against a calendar month:
//!
//! - [`monthly_equivalent`]: the averaged monthly amount used for
//!   expected-vs-actual comparisons
//! - [`fires_in_month`]: whether the rule produces a cash-flow event in that
//!   month, used by the forecast
//!
//! Weekly, bi-weekly, semi-monthly and monthly rules are smoothed: they count
//! every month at their averaged value. Quarterly, annual and one-time rules
//! are discrete and count their full amount only in the months they fire.

use tracing::warn;

use crate::models::{Frequency, Money, RecurringRule, YearMonth};

/// Monthly multiplier for a frequency, as `(numerator, denominator)`
fn monthly_factor(frequency: &Frequency) -> (i64, i64) {
    match frequency {
        Frequency::Weekly => (433, 100),
        Frequency::BiWeekly => (217, 100),
        Frequency::SemiMonthly => (2, 1),
        Frequency::Monthly => (1, 1),
        Frequency::Quarterly => (1, 3),
        Frequency::Annually => (1, 12),
        Frequency::OneTime => (1, 1),
        Frequency::Other(label) => {
            warn!(frequency = %label, "unrecognized frequency, treating as monthly");
            (1, 1)
        }
    }
}

/// Averaged monthly amount of `rule` for `month`
///
/// A one-time rule counts in full in the month of its start date and zero
/// in every other month. Unrecognized frequencies count as monthly.
pub fn monthly_equivalent(rule: &RecurringRule, month: YearMonth) -> Money {
    if rule.frequency == Frequency::OneTime {
        return if month.contains(rule.start_date) {
            rule.amount
        } else {
            Money::zero()
        };
    }

    let (numerator, denominator) = monthly_factor(&rule.frequency);
    rule.amount.scale(numerator, denominator)
}

/// Whether `rule` produces a cash-flow event in `month`
///
/// Smoothed frequencies fire every month. The date window and active flag
/// are checked separately by [`is_eligible`].
pub fn fires_in_month(rule: &RecurringRule, month: YearMonth) -> bool {
    let start = YearMonth::of(rule.start_date);
    match rule.frequency {
        Frequency::Quarterly => month.months_since(start).rem_euclid(3) == 0,
        Frequency::Annually => month.month() == start.month(),
        Frequency::OneTime => month == start,
        _ => true,
    }
}

/// Whether `rule` applies to `month` at all: active, started by the end of
/// the month, and not ended before the month begins
pub fn is_eligible(rule: &RecurringRule, month: YearMonth) -> bool {
    rule.active
        && rule.start_date <= month.last_day()
        && rule.end_date.map_or(true, |end| end >= month.first_day())
}

/// Unsigned amount `rule` moves in `month` for forecasting
///
/// Smoothed frequencies contribute their monthly equivalent every eligible
/// month; discrete frequencies contribute the full amount only when they fire.
pub fn forecast_amount(rule: &RecurringRule, month: YearMonth) -> Money {
    if !is_eligible(rule, month) || !fires_in_month(rule, month) {
        return Money::zero();
    }

    if rule.frequency.is_smoothed() {
        monthly_equivalent(rule, month)
    } else {
        rule.amount
    }
}

/// Signed forecast effect: income adds, expense subtracts
pub fn forecast_effect(rule: &RecurringRule, month: YearMonth) -> Money {
    rule.kind.signed(forecast_amount(rule, month))
}
