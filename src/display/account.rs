//! Account display formatting
//!
//! Formats bank accounts for terminal output in table and detail views.

use crate::models::{Account, Money};

/// Format a list of accounts with balances as a table
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    // Calculate column widths
    let name_width = accounts
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let id_width = accounts
        .iter()
        .map(|a| a.id.to_string().len())
        .max()
        .unwrap_or(2)
        .max(2);

    // Build header
    let mut output = String::new();
    output.push_str(&format!(
        "{:<id_width$}  {:<name_width$}  {:>14}  {}\n",
        "ID",
        "Name",
        "Balance",
        "Last Updated",
        id_width = id_width,
        name_width = name_width,
    ));

    // Separator line
    output.push_str(&format!(
        "{:-<id_width$}  {:-<name_width$}  {:->14}  {:-<16}\n",
        "",
        "",
        "",
        "",
        id_width = id_width,
        name_width = name_width,
    ));

    for account in accounts {
        let updated = account
            .last_updated
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        output.push_str(&format!(
            "{:<id_width$}  {:<name_width$}  {:>14}  {}\n",
            account.id.to_string(),
            account.name,
            account.balance,
            updated,
            id_width = id_width,
            name_width = name_width,
        ));
    }

    // Total row
    let total: Money = accounts.iter().map(|a| a.balance).sum();
    output.push_str(&format!(
        "{:<id_width$}  {:<name_width$}  {:>14}\n",
        "",
        "TOTAL",
        total,
        id_width = id_width,
        name_width = name_width,
    ));

    output
}

/// Format a single account's details
pub fn format_account_details(account: &Account) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  ID:           {}\n", account.id));
    output.push_str(&format!("  Balance:      {}\n", account.balance));
    if let Some(updated) = account.last_updated {
        output.push_str(&format!(
            "  Last Updated: {}\n",
            updated.format("%Y-%m-%d %H:%M")
        ));
    }

    output
}
