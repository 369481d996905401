//! Recurring rule display formatting

use crate::models::{Money, RecurringRule, TransactionKind, YearMonth};
use crate::services::frequency::monthly_equivalent;

use super::transaction::truncate;

/// Format recurring rules as a table, with each rule's monthly equivalent
/// for `month`
pub fn format_rule_list(rules: &[RecurringRule], month: YearMonth) -> String {
    if rules.is_empty() {
        return "No recurring transactions found.".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {:24} {:16} {:8} {:>12} {:13} {:>12}  {}\n",
        "ID", "Description", "Category", "Type", "Amount", "Frequency", "Monthly", "Status"
    ));
    output.push_str(&"-".repeat(110));
    output.push('\n');

    let mut income = Money::zero();
    let mut expense = Money::zero();

    for rule in rules {
        let monthly = monthly_equivalent(rule, month);
        if rule.active {
            match rule.kind {
                TransactionKind::Income => income += monthly,
                TransactionKind::Expense => expense += monthly,
            }
        }

        let status = if rule.active { "active" } else { "paused" };
        output.push_str(&format!(
            "{:<8} {} {} {:8} {:>12} {:13} {:>12}  {}\n",
            rule.id.to_string(),
            truncate(&rule.description, 24),
            truncate(&rule.category, 16),
            rule.kind,
            rule.amount,
            rule.frequency,
            monthly,
            status
        ));
    }

    output.push_str(&"-".repeat(110));
    output.push('\n');
    output.push_str(&format!(
        "Expected for {}: income {}, expenses {}, net {}\n",
        month.label(),
        income,
        expense,
        income - expense
    ));

    output
}

/// Format a single rule's details
pub fn format_rule_details(rule: &RecurringRule) -> String {
    let mut output = String::new();

    output.push_str(&format!("Recurring: {}\n", rule.description));
    output.push_str(&format!("  ID:        {}\n", rule.id));
    output.push_str(&format!("  Type:      {}\n", rule.kind));
    output.push_str(&format!("  Amount:    {}\n", rule.amount));
    output.push_str(&format!("  Frequency: {}\n", rule.frequency));
    output.push_str(&format!("  Category:  {}\n", rule.category));
    output.push_str(&format!("  Starts:    {}\n", rule.start_date));
    if let Some(end) = rule.end_date {
        output.push_str(&format!("  Ends:      {}\n", end));
    }
    output.push_str(&format!("  Linked to: {}\n", rule.link));
    output.push_str(&format!(
        "  Status:    {}\n",
        if rule.active { "active" } else { "paused" }
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Link, RecurringRuleId};
    use chrono::NaiveDate;

    fn rule(description: &str, kind: TransactionKind, dollars: i64, frequency: Frequency) -> RecurringRule {
        RecurringRule {
            id: RecurringRuleId::new(1),
            description: description.into(),
            amount: Money::from_dollars(dollars),
            kind,
            frequency,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            category: "General".into(),
            link: Link::None,
            active: true,
        }
    }

    #[test]
    fn test_rule_list_totals() {
        let month = YearMonth::new(2024, 3).unwrap();
        let rules = vec![
            rule("Salary", TransactionKind::Income, 2000, Frequency::SemiMonthly),
            rule("Rent", TransactionKind::Expense, 1500, Frequency::Monthly),
        ];

        let output = format_rule_list(&rules, month);
        assert!(output.contains("semi-monthly"));
        assert!(output.contains("income $4,000.00"));
        assert!(output.contains("expenses $1,500.00"));
        assert!(output.contains("net $2,500.00"));
    }

    #[test]
    fn test_paused_rules_excluded_from_totals() {
        let month = YearMonth::new(2024, 3).unwrap();
        let mut paused = rule("Gym", TransactionKind::Expense, 50, Frequency::Monthly);
        paused.active = false;

        let output = format_rule_list(&[paused], month);
        assert!(output.contains("paused"));
        assert!(output.contains("expenses $0.00"));
    }

    #[test]
    fn test_empty_list() {
        let month = YearMonth::new(2024, 3).unwrap();
        assert_eq!(format_rule_list(&[], month), "No recurring transactions found.");
    }
}
