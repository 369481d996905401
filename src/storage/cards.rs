//! Credit card repository (`credit_cards` table)

use std::rc::Rc;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{CreditCard, CreditCardId, Money};

use super::rows::{
    date_to_sql, malformed, money_from_sql, money_to_sql, parse_timestamp, required_date,
};

const TABLE: &str = "credit_cards";
const SELECT: &str = "SELECT id, name, current_balance, statement_balance, interest_rate, \
                      due_date, credit_limit, last_updated FROM credit_cards";

struct CardRow {
    id: i64,
    name: String,
    current_balance: f64,
    statement_balance: f64,
    interest_rate: f64,
    due_date: String,
    credit_limit: f64,
    last_updated: Option<String>,
}

impl CardRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            current_balance: row.get(2)?,
            statement_balance: row.get(3)?,
            interest_rate: row.get(4)?,
            due_date: row.get(5)?,
            credit_limit: row.get(6)?,
            last_updated: row.get(7)?,
        })
    }

    fn into_card(self) -> LedgerResult<CreditCard> {
        if !self.interest_rate.is_finite() {
            return Err(malformed(TABLE, self.id, "non-finite interest rate"));
        }
        Ok(CreditCard {
            id: CreditCardId::new(self.id),
            due_date: required_date(TABLE, self.id, "due_date", &self.due_date)?,
            name: self.name,
            current_balance: money_from_sql(self.current_balance),
            statement_balance: money_from_sql(self.statement_balance),
            interest_rate: self.interest_rate,
            credit_limit: money_from_sql(self.credit_limit),
            last_updated: parse_timestamp(self.last_updated.as_deref()),
        })
    }
}

/// Repository for credit card persistence
pub struct CreditCardRepository {
    conn: Rc<Connection>,
}

impl CreditCardRepository {
    pub(crate) fn new(conn: Rc<Connection>) -> Self {
        Self { conn }
    }

    /// Get a card by ID
    pub fn get(&self, id: CreditCardId) -> LedgerResult<Option<CreditCard>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT), [id], CardRow::read)
            .optional()?
            .map(CardRow::into_card)
            .transpose()
    }

    /// Get a card by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> LedgerResult<Option<CreditCard>> {
        self.conn
            .query_row(
                &format!("{} WHERE name = ?1 COLLATE NOCASE ORDER BY id LIMIT 1", SELECT),
                [name.trim()],
                CardRow::read,
            )
            .optional()?
            .map(CardRow::into_card)
            .transpose()
    }

    /// Get all cards, ordered by name
    pub fn get_all(&self) -> LedgerResult<Vec<CreditCard>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY name COLLATE NOCASE, id", SELECT))?;
        let rows = stmt
            .query_map([], CardRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(CardRow::into_card).collect()
    }

    /// Insert a card; the `id` and `last_updated` fields of `card` are ignored
    pub fn insert(&self, card: &CreditCard) -> LedgerResult<CreditCard> {
        self.conn.execute(
            "INSERT INTO credit_cards (name, current_balance, statement_balance, interest_rate, due_date, credit_limit)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                card.name,
                money_to_sql(card.current_balance),
                money_to_sql(card.statement_balance),
                card.interest_rate,
                date_to_sql(card.due_date),
                money_to_sql(card.credit_limit),
            ],
        )?;
        let id = CreditCardId::new(self.conn.last_insert_rowid());
        self.get(id)?
            .ok_or_else(|| LedgerError::card_not_found(id.to_string()))
    }

    /// Overwrite every stored field of an existing card
    pub fn update(&self, card: &CreditCard) -> LedgerResult<()> {
        let changed = self.conn.execute(
            "UPDATE credit_cards SET name = ?1, current_balance = ?2, statement_balance = ?3,
                 interest_rate = ?4, due_date = ?5, credit_limit = ?6, last_updated = CURRENT_TIMESTAMP
             WHERE id = ?7",
            params![
                card.name,
                money_to_sql(card.current_balance),
                money_to_sql(card.statement_balance),
                card.interest_rate,
                date_to_sql(card.due_date),
                money_to_sql(card.credit_limit),
                card.id,
            ],
        )?;
        if changed == 0 {
            return Err(LedgerError::card_not_found(card.id.to_string()));
        }
        Ok(())
    }

    /// Add `delta` to the amount owed
    pub fn adjust_balance(&self, id: CreditCardId, delta: Money) -> LedgerResult<()> {
        let changed = self.conn.execute(
            "UPDATE credit_cards SET current_balance = ROUND(current_balance + ?1, 2), last_updated = CURRENT_TIMESTAMP WHERE id = ?2",
            params![money_to_sql(delta), id],
        )?;
        if changed == 0 {
            return Err(LedgerError::card_not_found(id.to_string()));
        }
        Ok(())
    }

    /// Delete a card. Returns false if it did not exist.
    pub fn delete(&self, id: CreditCardId) -> LedgerResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM credit_cards WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// Sum of the amounts owed on all cards
    pub fn total_debt(&self) -> LedgerResult<Money> {
        Ok(self.get_all()?.iter().map(|c| c.current_balance).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use chrono::NaiveDate;

    fn sample_card(name: &str) -> CreditCard {
        CreditCard {
            id: CreditCardId::new(0),
            name: name.into(),
            current_balance: Money::from_dollars(250),
            statement_balance: Money::from_dollars(200),
            interest_rate: 21.5,
            due_date: NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
            credit_limit: Money::from_dollars(5000),
            last_updated: None,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let storage = Storage::open_in_memory().unwrap();
        let card = storage.cards.insert(&sample_card("Visa")).unwrap();

        let fetched = storage.cards.get(card.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Visa");
        assert_eq!(fetched.current_balance, Money::from_dollars(250));
        assert_eq!(fetched.due_date, NaiveDate::from_ymd_opt(2024, 4, 15).unwrap());
        assert_eq!(fetched.interest_rate, 21.5);
    }

    #[test]
    fn test_adjust_and_total_debt() {
        let storage = Storage::open_in_memory().unwrap();
        let visa = storage.cards.insert(&sample_card("Visa")).unwrap();
        storage.cards.insert(&sample_card("Amex")).unwrap();

        storage
            .cards
            .adjust_balance(visa.id, Money::from_cents(4_599))
            .unwrap();
        assert_eq!(storage.cards.total_debt().unwrap().cents(), 54_599);
    }

    #[test]
    fn test_malformed_due_date_is_reported() {
        let storage = Storage::open_in_memory().unwrap();
        let card = storage.cards.insert(&sample_card("Visa")).unwrap();
        storage
            .conn()
            .execute(
                "UPDATE credit_cards SET due_date = 'soon' WHERE id = ?1",
                [card.id],
            )
            .unwrap();

        let err = storage.cards.get(card.id).unwrap_err();
        assert!(err.to_string().contains("credit_cards"));
    }
}
