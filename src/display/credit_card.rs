//! Credit card display formatting

use chrono::NaiveDate;

use crate::models::{CreditCard, Money};

/// Format a list of credit cards as a table
pub fn format_card_list(cards: &[CreditCard]) -> String {
    if cards.is_empty() {
        return "No credit cards found.".to_string();
    }

    let name_width = cards
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:>12}  {:>12}  {:>6}  {:>7}  {}\n",
        "ID",
        "Name",
        "Balance",
        "Limit",
        "Used",
        "APR",
        "Due",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<8}  {:-<name_width$}  {:->12}  {:->12}  {:->6}  {:->7}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for card in cards {
        output.push_str(&format!(
            "{:<8}  {:<name_width$}  {:>12}  {:>12}  {:>5.1}%  {:>6.2}%  {}\n",
            card.id.to_string(),
            card.name,
            card.current_balance,
            card.credit_limit,
            card.utilization_percent(),
            card.interest_rate,
            card.due_date,
            name_width = name_width,
        ));
    }

    let total: Money = cards.iter().map(|c| c.current_balance).sum();
    output.push_str(&format!(
        "{:<8}  {:<name_width$}  {:>12}\n",
        "",
        "TOTAL DEBT",
        total,
        name_width = name_width.max(10),
    ));

    output
}

/// Format a single card's details
pub fn format_card_details(card: &CreditCard, today: NaiveDate) -> String {
    let mut output = String::new();

    output.push_str(&format!("Credit Card: {}\n", card.name));
    output.push_str(&format!("  ID:                {}\n", card.id));
    output.push_str(&format!("  Current Balance:   {}\n", card.current_balance));
    output.push_str(&format!("  Statement Balance: {}\n", card.statement_balance));
    output.push_str(&format!("  Credit Limit:      {}\n", card.credit_limit));
    output.push_str(&format!("  Available Credit:  {}\n", card.available_credit()));
    output.push_str(&format!(
        "  Utilization:       {:.1}%\n",
        card.utilization_percent()
    ));
    output.push_str(&format!("  Interest Rate:     {:.2}%\n", card.interest_rate));

    let days = card.days_until_due(today);
    let when = match days {
        d if d < 0 => format!("overdue by {} day(s)", -d),
        0 => "due today".to_string(),
        d => format!("in {} day(s)", d),
    };
    output.push_str(&format!("  Due Date:          {} ({})\n", card.due_date, when));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreditCardId;

    fn card() -> CreditCard {
        CreditCard {
            id: CreditCardId::new(1),
            name: "Visa".into(),
            current_balance: Money::from_dollars(300),
            statement_balance: Money::from_dollars(250),
            interest_rate: 19.99,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            credit_limit: Money::from_dollars(1000),
            last_updated: None,
        }
    }

    #[test]
    fn test_format_card_list() {
        let output = format_card_list(&[card()]);
        assert!(output.contains("card-1"));
        assert!(output.contains("30.0%"));
        assert!(output.contains("19.99%"));
        assert!(output.contains("TOTAL DEBT"));
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format_card_list(&[]), "No credit cards found.");
    }

    #[test]
    fn test_details_due_status() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let output = format_card_details(&card(), today);
        assert!(output.contains("Available Credit:  $700.00"));
        assert!(output.contains("(in 5 day(s))"));

        let late = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        assert!(format_card_details(&card(), late).contains("overdue by 2 day(s)"));
    }
}
