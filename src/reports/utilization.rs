//! Credit Utilization Report

use std::fmt;

use crate::error::LedgerResult;
use crate::models::{CreditCard, Money};
use crate::storage::Storage;

/// Utilization band of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UtilizationBand {
    Good,
    Fair,
    Warning,
    High,
}

impl UtilizationBand {
    /// Good below 30%, Fair below 50%, Warning below 70%, High otherwise
    pub fn of(percent: f64) -> Self {
        if percent < 30.0 {
            Self::Good
        } else if percent < 50.0 {
            Self::Fair
        } else if percent < 70.0 {
            Self::Warning
        } else {
            Self::High
        }
    }
}

impl fmt::Display for UtilizationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Warning => "Warning",
            Self::High => "High",
        };
        f.pad(label)
    }
}

#[derive(Debug, Clone)]
pub struct CardUtilization {
    pub name: String,
    pub balance: Money,
    pub limit: Money,
    pub percent: f64,
    pub band: UtilizationBand,
}

impl From<&CreditCard> for CardUtilization {
    fn from(card: &CreditCard) -> Self {
        let percent = card.utilization_percent();
        Self {
            name: card.name.clone(),
            balance: card.current_balance,
            limit: card.credit_limit,
            percent,
            band: UtilizationBand::of(percent),
        }
    }
}

/// Credit Utilization Report
#[derive(Debug, Clone)]
pub struct UtilizationReport {
    pub cards: Vec<CardUtilization>,
}

impl UtilizationReport {
    pub fn generate(storage: &Storage) -> LedgerResult<Self> {
        let cards = storage.cards.get_all()?;
        Ok(Self {
            cards: cards.iter().map(CardUtilization::from).collect(),
        })
    }

    /// Utilization across all cards combined (0 when there is no limit)
    pub fn overall_percent(&self) -> f64 {
        let balance: Money = self.cards.iter().map(|c| c.balance).sum();
        let limit: Money = self.cards.iter().map(|c| c.limit).sum();
        balance.percent_of(limit)
    }

    pub fn format_terminal(&self) -> String {
        if self.cards.is_empty() {
            return "No credit cards found.".to_string();
        }

        let name_width = self
            .cards
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(4)
            .max(4);

        let mut output = String::new();
        output.push_str(&format!(
            "{:<name_width$}  {:>12}  {:>12}  {:>7}  {}\n",
            "Card",
            "Balance",
            "Limit",
            "Used",
            "Status",
            name_width = name_width,
        ));
        output.push_str(&format!(
            "{:-<name_width$}  {:->12}  {:->12}  {:->7}  {:-<7}\n",
            "",
            "",
            "",
            "",
            "",
            name_width = name_width,
        ));

        for card in &self.cards {
            output.push_str(&format!(
                "{:<name_width$}  {:>12}  {:>12}  {:>6.1}%  {}\n",
                card.name,
                card.balance,
                card.limit,
                card.percent,
                card.band,
                name_width = name_width,
            ));
        }

        output.push_str(&format!("\nOverall utilization: {:.1}%\n", self.overall_percent()));
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreditCardId;
    use chrono::NaiveDate;

    fn card(name: &str, balance: i64, limit: i64) -> CreditCard {
        CreditCard {
            id: CreditCardId::new(0),
            name: name.into(),
            current_balance: Money::from_dollars(balance),
            statement_balance: Money::zero(),
            interest_rate: 0.0,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            credit_limit: Money::from_dollars(limit),
            last_updated: None,
        }
    }

    #[test]
    fn test_bands() {
        assert_eq!(UtilizationBand::of(0.0), UtilizationBand::Good);
        assert_eq!(UtilizationBand::of(29.9), UtilizationBand::Good);
        assert_eq!(UtilizationBand::of(30.0), UtilizationBand::Fair);
        assert_eq!(UtilizationBand::of(50.0), UtilizationBand::Warning);
        assert_eq!(UtilizationBand::of(70.0), UtilizationBand::High);
    }

    #[test]
    fn test_zero_limit_is_zero_percent() {
        let row = CardUtilization::from(&card("Store", 100, 0));
        assert_eq!(row.percent, 0.0);
        assert_eq!(row.band, UtilizationBand::Good);
    }

    #[test]
    fn test_generate() {
        let storage = Storage::open_in_memory().unwrap();
        storage.cards.insert(&card("Amex", 750, 1000)).unwrap();
        storage.cards.insert(&card("Visa", 250, 1000)).unwrap();

        let report = UtilizationReport::generate(&storage).unwrap();
        assert_eq!(report.cards.len(), 2);
        assert_eq!(report.cards[0].band, UtilizationBand::High);
        assert_eq!(report.cards[1].band, UtilizationBand::Good);
        assert!((report.overall_percent() - 50.0).abs() < 1e-9);
        assert!(report.format_terminal().contains("Overall utilization: 50.0%"));
    }
}
