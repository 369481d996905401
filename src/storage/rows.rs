//! Conversions between stored column values and typed fields
//!
//! Amounts are `REAL` dollars, dates are `YYYY-MM-DD` text (a trailing time
//! part is tolerated), timestamps come from SQLite's `CURRENT_TIMESTAMP`.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::LedgerError;
use crate::models::Money;

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub(crate) fn money_to_sql(amount: Money) -> f64 {
    amount.as_f64()
}

pub(crate) fn money_from_sql(raw: f64) -> Money {
    Money::from_f64(raw)
}

/// Parse a stored date, ignoring any time part
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

pub(crate) fn parse_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// A row that cannot be turned into a typed record
pub(crate) fn malformed(table: &str, id: i64, problem: impl std::fmt::Display) -> LedgerError {
    LedgerError::Storage(format!("Malformed row {} in {}: {}", id, table, problem))
}

pub(crate) fn required_date(table: &str, id: i64, column: &str, raw: &str) -> Result<NaiveDate, LedgerError> {
    parse_date(raw).ok_or_else(|| malformed(table, id, format!("bad {} '{}'", column, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_tolerates_time_part() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date("2024-03-15"), expected);
        assert_eq!(parse_date("2024-03-15 00:00:00"), expected);
        assert_eq!(parse_date("15/03/2024"), None);
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp(Some("2024-03-15 12:30:00")).is_some());
        assert!(parse_timestamp(Some("garbage")).is_none());
        assert!(parse_timestamp(None).is_none());
    }

    #[test]
    fn test_money_boundary() {
        assert_eq!(money_from_sql(1234.56).cents(), 123_456);
        assert_eq!(money_to_sql(Money::from_cents(-250)), -2.5);
    }
}
