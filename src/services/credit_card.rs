//! Credit card service

use chrono::NaiveDate;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CreditCard, CreditCardId, Money};
use crate::storage::Storage;

use super::link_conflict_reason;

/// Service for credit card management
pub struct CreditCardService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new credit card
#[derive(Debug, Clone)]
pub struct CreateCreditCardInput {
    pub name: String,
    pub current_balance: Money,
    pub statement_balance: Money,
    pub interest_rate: f64,
    pub due_date: NaiveDate,
    pub credit_limit: Money,
}

/// Field changes for a card; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct UpdateCreditCardInput {
    pub name: Option<String>,
    /// Manual correction of the amount owed
    pub current_balance: Option<Money>,
    pub statement_balance: Option<Money>,
    pub interest_rate: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub credit_limit: Option<Money>,
}

impl<'a> CreditCardService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new credit card
    pub fn create(&self, input: CreateCreditCardInput) -> LedgerResult<CreditCard> {
        let draft = CreditCard {
            id: CreditCardId::new(0),
            name: input.name.trim().to_string(),
            current_balance: input.current_balance,
            statement_balance: input.statement_balance,
            interest_rate: input.interest_rate,
            due_date: input.due_date,
            credit_limit: input.credit_limit,
            last_updated: None,
        };
        draft.validate()?;

        let card = self.storage.unit_of_work(|s| {
            ensure_name_free(s, &draft.name, None)?;
            s.cards.insert(&draft)
        })?;
        info!(card = %card.id, name = %card.name, "created credit card");

        self.storage.log_create(&card);
        Ok(card)
    }

    pub fn get(&self, id: CreditCardId) -> LedgerResult<Option<CreditCard>> {
        self.storage.cards.get(id)
    }

    /// Find a card by name or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<CreditCard>> {
        if let Some(card) = self.storage.cards.get_by_name(identifier)? {
            return Ok(Some(card));
        }

        if let Ok(id) = identifier.parse::<CreditCardId>() {
            return self.storage.cards.get(id);
        }

        Ok(None)
    }

    /// Like [`find`](Self::find), but a missing card is an error
    pub fn require(&self, identifier: &str) -> LedgerResult<CreditCard> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::card_not_found(identifier))
    }

    /// All cards, ordered by name
    pub fn list(&self) -> LedgerResult<Vec<CreditCard>> {
        self.storage.cards.get_all()
    }

    /// Total owed across all cards
    pub fn total_debt(&self) -> LedgerResult<Money> {
        self.storage.cards.total_debt()
    }

    /// Update card details
    pub fn update(&self, id: CreditCardId, input: UpdateCreditCardInput) -> LedgerResult<CreditCard> {
        let before = self
            .storage
            .cards
            .get(id)?
            .ok_or_else(|| LedgerError::card_not_found(id.to_string()))?;

        let mut card = before.clone();
        if let Some(name) = input.name {
            card.name = name.trim().to_string();
        }
        if let Some(balance) = input.current_balance {
            card.current_balance = balance;
        }
        if let Some(statement) = input.statement_balance {
            card.statement_balance = statement;
        }
        if let Some(rate) = input.interest_rate {
            card.interest_rate = rate;
        }
        if let Some(due) = input.due_date {
            card.due_date = due;
        }
        if let Some(limit) = input.credit_limit {
            card.credit_limit = limit;
        }
        card.validate()?;

        let card = self.storage.unit_of_work(|s| {
            ensure_name_free(s, &card.name, Some(id))?;
            s.cards.update(&card)?;
            s.cards
                .get(id)?
                .ok_or_else(|| LedgerError::card_not_found(id.to_string()))
        })?;

        self.storage.log_update(&before, &card);
        Ok(card)
    }

    /// Delete a card
    ///
    /// Refused with a conflict while any recurring rule or actual transaction
    /// still links to the card.
    pub fn delete(&self, id: CreditCardId) -> LedgerResult<CreditCard> {
        let card = self.storage.unit_of_work(|s| {
            let card = s
                .cards
                .get(id)?
                .ok_or_else(|| LedgerError::card_not_found(id.to_string()))?;

            let rules = s.recurring.count_for_card(id)?;
            let transactions = s.transactions.count_for_card(id)?;
            if let Some(reason) = link_conflict_reason(rules, transactions) {
                return Err(LedgerError::Conflict {
                    entity_type: "Credit card",
                    identifier: card.name,
                    reason,
                });
            }

            s.cards.delete(id)?;
            Ok(card)
        })?;
        info!(card = %card.id, name = %card.name, "deleted credit card");

        self.storage.log_delete(&card);
        Ok(card)
    }
}

/// Fail with `Duplicate` if another card already uses `name`
fn ensure_name_free(storage: &Storage, name: &str, except: Option<CreditCardId>) -> LedgerResult<()> {
    match storage.cards.get_by_name(name)? {
        Some(existing) if Some(existing.id) != except => Err(LedgerError::Duplicate {
            entity_type: "Credit card",
            identifier: name.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Link, TransactionKind};
    use crate::services::recurring::{CreateRuleInput, RecurringService};

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().unwrap()
    }

    fn visa() -> CreateCreditCardInput {
        CreateCreditCardInput {
            name: "Visa".into(),
            current_balance: Money::from_dollars(500),
            statement_balance: Money::from_dollars(450),
            interest_rate: 19.99,
            due_date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
            credit_limit: Money::from_dollars(5000),
        }
    }

    #[test]
    fn test_create_and_find() {
        let storage = create_test_storage();
        let service = CreditCardService::new(&storage);
        let card = service.create(visa()).unwrap();

        assert_eq!(service.find("visa").unwrap().unwrap().id, card.id);
        assert_eq!(service.find("card-1").unwrap().unwrap().id, card.id);
        assert_eq!(service.total_debt().unwrap(), Money::from_dollars(500));
    }

    #[test]
    fn test_create_rejects_negative_limit() {
        let storage = create_test_storage();
        let mut input = visa();
        input.credit_limit = Money::from_dollars(-1);
        let err = CreditCardService::new(&storage).create(input).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_partial_update() {
        let storage = create_test_storage();
        let service = CreditCardService::new(&storage);
        let card = service.create(visa()).unwrap();

        let updated = service
            .update(
                card.id,
                UpdateCreditCardInput {
                    statement_balance: Some(Money::from_dollars(120)),
                    due_date: NaiveDate::from_ymd_opt(2024, 5, 15),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.statement_balance, Money::from_dollars(120));
        assert_eq!(updated.due_date, NaiveDate::from_ymd_opt(2024, 5, 15).unwrap());
        assert_eq!(updated.current_balance, Money::from_dollars(500));
        assert_eq!(updated.name, "Visa");
    }

    #[test]
    fn test_delete_with_linked_rule_is_conflict() {
        let storage = create_test_storage();
        let service = CreditCardService::new(&storage);
        let card = service.create(visa()).unwrap();

        RecurringService::new(&storage)
            .create(CreateRuleInput {
                description: "Streaming".into(),
                amount: Money::from_cents(1_599),
                kind: TransactionKind::Expense,
                frequency: Frequency::Monthly,
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: None,
                category: "Entertainment".into(),
                link: Link::CreditCard(card.id),
            })
            .unwrap();

        let err = service.delete(card.id).unwrap_err();
        assert!(err.is_conflict());
        assert!(err.to_string().contains("1 recurring transaction"));
        assert!(service.get(card.id).unwrap().is_some());
    }

    #[test]
    fn test_delete_missing_card() {
        let storage = create_test_storage();
        let err = CreditCardService::new(&storage)
            .delete(CreditCardId::new(42))
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
