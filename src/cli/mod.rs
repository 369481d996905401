//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod audit;
pub mod card;
pub mod import;
pub mod recurring;
pub mod report;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use audit::handle_audit_command;
pub use card::{handle_card_command, CardCommands};
pub use import::{handle_import_command, ImportArgs};
pub use recurring::{handle_recurring_command, RecurringCommands};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Link, Money, TransactionKind, YearMonth};
use crate::services::{AccountService, CreditCardService};
use crate::storage::Storage;

/// Parse a money argument such as "1,200.50" or "-$40"
pub(crate) fn parse_money(value: &str, what: &str) -> LedgerResult<Money> {
    Money::parse(value).map_err(|e| {
        LedgerError::Validation(format!(
            "Invalid {} '{}'. Use format like '1200.50' or '1200'. Error: {}",
            what, value, e
        ))
    })
}

/// Parse a YYYY-MM-DD date argument
pub(crate) fn parse_date(value: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        LedgerError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", value))
    })
}

/// Parse an optional date argument, defaulting to today
pub(crate) fn parse_date_or_today(value: Option<&str>) -> LedgerResult<NaiveDate> {
    match value {
        Some(s) => parse_date(s),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// Parse a YYYY-MM month argument, defaulting to the current month
pub(crate) fn parse_month_or_current(value: Option<&str>) -> LedgerResult<YearMonth> {
    match value {
        Some(s) => YearMonth::parse(s).map_err(|e| {
            LedgerError::Validation(format!(
                "Invalid month '{}': {}. Use YYYY-MM (e.g., 2024-03)",
                s, e
            ))
        }),
        None => Ok(YearMonth::current()),
    }
}

/// Parse "income" or "expense"
pub(crate) fn parse_kind(value: &str) -> LedgerResult<TransactionKind> {
    TransactionKind::parse(value).ok_or_else(|| {
        LedgerError::Validation(format!(
            "Invalid type: '{}'. Use income or expense",
            value
        ))
    })
}

/// Turn `--account` / `--card` options into a link
///
/// Accounts and cards are looked up by name or ID. Giving both is an error.
pub(crate) fn resolve_link(
    storage: &Storage,
    account: Option<&str>,
    card: Option<&str>,
) -> LedgerResult<Link> {
    match (account, card) {
        (Some(_), Some(_)) => Err(LedgerError::InvalidLinkage(
            "Specify either --account or --card, not both".into(),
        )),
        (Some(a), None) => Ok(Link::Account(AccountService::new(storage).require(a)?.id)),
        (None, Some(c)) => Ok(Link::CreditCard(CreditCardService::new(storage).require(c)?.id)),
        (None, None) => Ok(Link::None),
    }
}

/// Parse an ID argument like "txn-4" or "4"
pub(crate) fn parse_id<T: std::str::FromStr>(value: &str, what: &str) -> LedgerResult<T> {
    value
        .parse()
        .map_err(|_| LedgerError::Validation(format!("Invalid {} ID: '{}'", what, value)))
}

/// Open `path` for a CSV export
pub(crate) fn create_export_file(path: &Path) -> LedgerResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        LedgerError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionId;

    #[test]
    fn test_parse_money_rejects_garbage() {
        assert_eq!(parse_money("1,200.50", "amount").unwrap().cents(), 120_050);
        assert!(parse_money("twelve", "amount").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("02/29/2024").is_err());
    }

    #[test]
    fn test_parse_id_accepts_both_forms() {
        let a: TransactionId = parse_id("txn-4", "transaction").unwrap();
        let b: TransactionId = parse_id("4", "transaction").unwrap();
        assert_eq!(a, b);
        assert!(parse_id::<TransactionId>("abc", "transaction").is_err());
    }

    #[test]
    fn test_resolve_link() {
        let storage = Storage::open_in_memory().unwrap();
        let account = AccountService::new(&storage)
            .create("Checking", Money::zero())
            .unwrap();

        assert_eq!(
            resolve_link(&storage, Some("Checking"), None).unwrap(),
            Link::Account(account.id)
        );
        assert_eq!(resolve_link(&storage, None, None).unwrap(), Link::None);
        assert!(resolve_link(&storage, Some("Checking"), Some("Visa")).is_err());
        assert!(resolve_link(&storage, Some("Nope"), None)
            .unwrap_err()
            .is_not_found());
    }
}
