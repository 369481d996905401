//! Transaction display formatting
//!
//! Register and detail views for recorded transactions.

use crate::models::{ActualTransaction, Money, TransactionKind};

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &ActualTransaction) -> String {
    let sign = match txn.kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense => "-",
    };

    format!(
        "{:<8} {} {} {} {:>12} {}{}",
        txn.id.to_string(),
        txn.date.format("%Y-%m-%d"),
        truncate(&txn.description, 24),
        truncate(&txn.category, 16),
        txn.amount,
        sign,
        link_suffix(txn)
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(transactions: &[ActualTransaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:10} {:24} {:16} {:>12}\n",
        "ID", "Date", "Description", "Category", "Amount"
    ));
    output.push_str(&"-".repeat(86));
    output.push('\n');

    let mut net = Money::zero();
    for txn in transactions {
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
        net += txn.signed_amount();
    }

    output.push_str(&"-".repeat(86));
    output.push('\n');
    output.push_str(&format!(
        "{} transaction(s), net {}\n",
        transactions.len(),
        net
    ));

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &ActualTransaction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Description: {}\n", txn.description));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Category:    {}\n", txn.category));
    output.push_str(&format!("Linked to:   {}\n", txn.link));

    output
}

fn link_suffix(txn: &ActualTransaction) -> String {
    if txn.link.is_none() {
        String::new()
    } else {
        format!(" [{}]", txn.link)
    }
}

/// Truncate a string to a maximum length, padding shorter ones
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        format!("{:width$}", s, width = max_len)
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, Link, TransactionId};
    use chrono::NaiveDate;

    fn txn(kind: TransactionKind, cents: i64, link: Link) -> ActualTransaction {
        ActualTransaction {
            id: TransactionId::new(4),
            description: "Weekly groceries".into(),
            amount: Money::from_cents(cents),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            category: "Groceries".into(),
            kind,
            link,
        }
    }

    #[test]
    fn test_register_row_shows_link() {
        let row = format_transaction_row(&txn(
            TransactionKind::Expense,
            8_250,
            Link::Account(AccountId::new(2)),
        ));
        assert!(row.contains("txn-4"));
        assert!(row.contains("2024-03-09"));
        assert!(row.contains("$82.50"));
        assert!(row.contains("[acct-2]"));
    }

    #[test]
    fn test_register_net() {
        let register = format_transaction_register(&[
            txn(TransactionKind::Income, 10_000, Link::None),
            txn(TransactionKind::Expense, 2_500, Link::None),
        ]);
        assert!(register.contains("2 transaction(s), net $75.00"));
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(format_transaction_register(&[]), "No transactions found.\n");
    }

    #[test]
    fn test_details() {
        let details = format_transaction_details(&txn(TransactionKind::Income, 100, Link::None));
        assert!(details.contains("Type:        Income"));
        assert!(details.contains("Linked to:   other"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abc", 5), "abc  ");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}
