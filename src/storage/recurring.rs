//! Recurring rule repository (`recurring_transactions` table)

use std::rc::Rc;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, CreditCardId, Frequency, Link, RecurringRule, RecurringRuleId, TransactionKind,
};

use super::rows::{date_to_sql, malformed, money_from_sql, money_to_sql, parse_date, required_date};

const TABLE: &str = "recurring_transactions";
const SELECT: &str = "SELECT id, description, amount, frequency, start_date, end_date, category, \
                      type, account_id, credit_card_id, is_active FROM recurring_transactions";

struct RuleRow {
    id: i64,
    description: String,
    amount: f64,
    frequency: String,
    start_date: String,
    end_date: Option<String>,
    category: String,
    kind: String,
    account_id: Option<AccountId>,
    credit_card_id: Option<CreditCardId>,
    is_active: Option<i64>,
}

impl RuleRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            description: row.get(1)?,
            amount: row.get(2)?,
            frequency: row.get(3)?,
            start_date: row.get(4)?,
            end_date: row.get(5)?,
            category: row.get(6)?,
            kind: row.get(7)?,
            account_id: row.get(8)?,
            credit_card_id: row.get(9)?,
            is_active: row.get(10)?,
        })
    }

    fn into_rule(self) -> LedgerResult<RecurringRule> {
        let kind = TransactionKind::parse(&self.kind)
            .ok_or_else(|| malformed(TABLE, self.id, format!("unknown type '{}'", self.kind)))?;
        let link = Link::from_columns(self.account_id, self.credit_card_id)
            .map_err(|e| malformed(TABLE, self.id, e))?;
        let end_date = match self.end_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                parse_date(raw)
                    .ok_or_else(|| malformed(TABLE, self.id, format!("bad end_date '{}'", raw)))?,
            ),
        };

        Ok(RecurringRule {
            id: RecurringRuleId::new(self.id),
            start_date: required_date(TABLE, self.id, "start_date", &self.start_date)?,
            end_date,
            description: self.description,
            amount: money_from_sql(self.amount),
            kind,
            frequency: Frequency::parse(&self.frequency),
            category: self.category,
            link,
            // NULL is_active falls back to the column default
            active: self.is_active.map_or(true, |v| v != 0),
        })
    }
}

/// Repository for recurring rule persistence
pub struct RecurringRepository {
    conn: Rc<Connection>,
}

impl RecurringRepository {
    pub(crate) fn new(conn: Rc<Connection>) -> Self {
        Self { conn }
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> LedgerResult<Vec<RecurringRule>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, RuleRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(RuleRow::into_rule).collect()
    }

    /// Get a rule by ID
    pub fn get(&self, id: RecurringRuleId) -> LedgerResult<Option<RecurringRule>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT), [id], RuleRow::read)
            .optional()?
            .map(RuleRow::into_rule)
            .transpose()
    }

    /// All rules, ordered by description
    pub fn get_all(&self) -> LedgerResult<Vec<RecurringRule>> {
        self.query(&format!("{} ORDER BY description COLLATE NOCASE, id", SELECT), [])
    }

    /// Rules with `is_active` set
    pub fn get_active(&self) -> LedgerResult<Vec<RecurringRule>> {
        self.query(
            &format!(
                "{} WHERE COALESCE(is_active, 1) != 0 ORDER BY description COLLATE NOCASE, id",
                SELECT
            ),
            [],
        )
    }

    /// Insert a rule; the `id` field of `rule` is ignored
    pub fn insert(&self, rule: &RecurringRule) -> LedgerResult<RecurringRule> {
        self.conn.execute(
            "INSERT INTO recurring_transactions
                 (description, amount, frequency, start_date, end_date, category, type,
                  account_id, credit_card_id, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                rule.description,
                money_to_sql(rule.amount),
                rule.frequency.label(),
                date_to_sql(rule.start_date),
                rule.end_date.map(date_to_sql),
                rule.category,
                rule.kind.as_str(),
                rule.link.account_id(),
                rule.link.credit_card_id(),
                rule.active,
            ],
        )?;
        let id = RecurringRuleId::new(self.conn.last_insert_rowid());
        self.get(id)?
            .ok_or_else(|| LedgerError::rule_not_found(id.to_string()))
    }

    /// Overwrite every stored field of an existing rule
    pub fn update(&self, rule: &RecurringRule) -> LedgerResult<()> {
        let changed = self.conn.execute(
            "UPDATE recurring_transactions SET description = ?1, amount = ?2, frequency = ?3,
                 start_date = ?4, end_date = ?5, category = ?6, type = ?7,
                 account_id = ?8, credit_card_id = ?9, is_active = ?10
             WHERE id = ?11",
            params![
                rule.description,
                money_to_sql(rule.amount),
                rule.frequency.label(),
                date_to_sql(rule.start_date),
                rule.end_date.map(date_to_sql),
                rule.category,
                rule.kind.as_str(),
                rule.link.account_id(),
                rule.link.credit_card_id(),
                rule.active,
                rule.id,
            ],
        )?;
        if changed == 0 {
            return Err(LedgerError::rule_not_found(rule.id.to_string()));
        }
        Ok(())
    }

    /// Delete a rule. Returns false if it did not exist.
    pub fn delete(&self, id: RecurringRuleId) -> LedgerResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM recurring_transactions WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// Number of rules linked to an account
    pub fn count_for_account(&self, id: AccountId) -> LedgerResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM recurring_transactions WHERE account_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Number of rules linked to a credit card
    pub fn count_for_card(&self, id: CreditCardId) -> LedgerResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM recurring_transactions WHERE credit_card_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::storage::Storage;
    use chrono::NaiveDate;

    fn sample_rule(description: &str, frequency: Frequency) -> RecurringRule {
        RecurringRule {
            id: RecurringRuleId::new(0),
            description: description.into(),
            amount: Money::from_dollars(1500),
            kind: TransactionKind::Expense,
            frequency,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            category: "Housing".into(),
            link: Link::None,
            active: true,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let storage = Storage::open_in_memory().unwrap();
        let mut rule = sample_rule("Rent", Frequency::BiWeekly);
        rule.end_date = NaiveDate::from_ymd_opt(2024, 12, 31);
        let stored = storage.recurring.insert(&rule).unwrap();

        let fetched = storage.recurring.get(stored.id).unwrap().unwrap();
        assert_eq!(fetched.frequency, Frequency::BiWeekly);
        assert_eq!(fetched.end_date, NaiveDate::from_ymd_opt(2024, 12, 31));
        assert_eq!(fetched.amount, Money::from_dollars(1500));
        assert!(fetched.active);
    }

    #[test]
    fn test_frequency_column_is_lowercase() {
        let storage = Storage::open_in_memory().unwrap();
        let stored = storage
            .recurring
            .insert(&sample_rule("Paycheck", Frequency::SemiMonthly))
            .unwrap();

        let raw: String = storage
            .conn()
            .query_row(
                "SELECT frequency FROM recurring_transactions WHERE id = ?1",
                [stored.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(raw, "semi-monthly");
    }

    #[test]
    fn test_unknown_frequency_survives_read() {
        let storage = Storage::open_in_memory().unwrap();
        let stored = storage
            .recurring
            .insert(&sample_rule("Gym", Frequency::Monthly))
            .unwrap();
        storage
            .conn()
            .execute(
                "UPDATE recurring_transactions SET frequency = 'fortnightly' WHERE id = ?1",
                [stored.id],
            )
            .unwrap();

        let fetched = storage.recurring.get(stored.id).unwrap().unwrap();
        assert_eq!(fetched.frequency, Frequency::Other("fortnightly".into()));
    }

    #[test]
    fn test_both_links_in_row_is_malformed() {
        let storage = Storage::open_in_memory().unwrap();
        let account = storage.accounts.insert("Checking", Money::zero()).unwrap();
        let mut rule = sample_rule("Rent", Frequency::Monthly);
        rule.link = Link::Account(account.id);
        let stored = storage.recurring.insert(&rule).unwrap();
        storage
            .conn()
            .execute_batch("PRAGMA foreign_keys = OFF;")
            .unwrap();
        storage
            .conn()
            .execute(
                "UPDATE recurring_transactions SET credit_card_id = 5 WHERE id = ?1",
                [stored.id],
            )
            .unwrap();

        assert!(storage.recurring.get(stored.id).is_err());
    }

    #[test]
    fn test_active_filter_and_counts() {
        let storage = Storage::open_in_memory().unwrap();
        let account = storage.accounts.insert("Checking", Money::zero()).unwrap();

        let mut linked = sample_rule("Rent", Frequency::Monthly);
        linked.link = Link::Account(account.id);
        storage.recurring.insert(&linked).unwrap();

        let mut paused = sample_rule("Gym", Frequency::Monthly);
        paused.active = false;
        storage.recurring.insert(&paused).unwrap();

        assert_eq!(storage.recurring.get_all().unwrap().len(), 2);
        let active = storage.recurring.get_active().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].description, "Rent");
        assert_eq!(storage.recurring.count_for_account(account.id).unwrap(), 1);
    }
}
