//! Actual transaction repository (`actual_transactions` table)

use std::rc::Rc;

use chrono::NaiveDate;
use rusqlite::types::ToSql;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, ActualTransaction, CreditCardId, Link, TransactionId, TransactionKind,
};

use super::rows::{date_to_sql, malformed, money_from_sql, money_to_sql, required_date};

const TABLE: &str = "actual_transactions";
const SELECT: &str = "SELECT id, description, amount, date, category, type, account_id, \
                      credit_card_id FROM actual_transactions";

/// Criteria for listing transactions. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Earliest date (inclusive)
    pub from: Option<NaiveDate>,
    /// Latest date (inclusive)
    pub to: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    /// Exact category (case-insensitive)
    pub category: Option<String>,
    pub account: Option<AccountId>,
    pub card: Option<CreditCardId>,
    /// Newest N only
    pub limit: Option<usize>,
}

impl TransactionFilter {
    /// Everything dated between `from` and `to`, inclusive
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    fn to_sql(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut clauses = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(from) = self.from {
            values.push(Box::new(date_to_sql(from)));
            clauses.push(format!("date(date) >= ?{}", values.len()));
        }
        if let Some(to) = self.to {
            values.push(Box::new(date_to_sql(to)));
            clauses.push(format!("date(date) <= ?{}", values.len()));
        }
        if let Some(kind) = self.kind {
            values.push(Box::new(kind.as_str()));
            clauses.push(format!("lower(type) = ?{}", values.len()));
        }
        if let Some(category) = &self.category {
            values.push(Box::new(category.trim().to_string()));
            clauses.push(format!("category = ?{} COLLATE NOCASE", values.len()));
        }
        if let Some(account) = self.account {
            values.push(Box::new(account));
            clauses.push(format!("account_id = ?{}", values.len()));
        }
        if let Some(card) = self.card {
            values.push(Box::new(card));
            clauses.push(format!("credit_card_id = ?{}", values.len()));
        }

        let mut sql = SELECT.to_string();
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY date(date) DESC, id DESC");
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        (sql, values)
    }
}

struct TransactionRow {
    id: i64,
    description: String,
    amount: f64,
    date: String,
    category: String,
    kind: String,
    account_id: Option<AccountId>,
    credit_card_id: Option<CreditCardId>,
}

impl TransactionRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            description: row.get(1)?,
            amount: row.get(2)?,
            date: row.get(3)?,
            category: row.get(4)?,
            kind: row.get(5)?,
            account_id: row.get(6)?,
            credit_card_id: row.get(7)?,
        })
    }

    fn into_transaction(self) -> LedgerResult<ActualTransaction> {
        let kind = TransactionKind::parse(&self.kind)
            .ok_or_else(|| malformed(TABLE, self.id, format!("unknown type '{}'", self.kind)))?;
        let link = Link::from_columns(self.account_id, self.credit_card_id)
            .map_err(|e| malformed(TABLE, self.id, e))?;

        Ok(ActualTransaction {
            id: TransactionId::new(self.id),
            date: required_date(TABLE, self.id, "date", &self.date)?,
            description: self.description,
            amount: money_from_sql(self.amount),
            category: self.category,
            kind,
            link,
        })
    }
}

/// Repository for actual transaction persistence
pub struct TransactionRepository {
    conn: Rc<Connection>,
}

impl TransactionRepository {
    pub(crate) fn new(conn: Rc<Connection>) -> Self {
        Self { conn }
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<ActualTransaction>> {
        self.conn
            .query_row(&format!("{} WHERE id = ?1", SELECT), [id], TransactionRow::read)
            .optional()?
            .map(TransactionRow::into_transaction)
            .transpose()
    }

    /// List transactions matching `filter`, newest first
    pub fn list(&self, filter: &TransactionFilter) -> LedgerResult<Vec<ActualTransaction>> {
        let (sql, values) = filter.to_sql();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), TransactionRow::read)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(TransactionRow::into_transaction).collect()
    }

    /// Every transaction, newest first
    pub fn get_all(&self) -> LedgerResult<Vec<ActualTransaction>> {
        self.list(&TransactionFilter::default())
    }

    /// Transactions dated between `from` and `to`, inclusive
    pub fn get_by_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> LedgerResult<Vec<ActualTransaction>> {
        self.list(&TransactionFilter::between(from, to))
    }

    /// Insert a transaction; the `id` field of `txn` is ignored
    pub fn insert(&self, txn: &ActualTransaction) -> LedgerResult<ActualTransaction> {
        self.conn.execute(
            "INSERT INTO actual_transactions
                 (description, amount, date, category, type, account_id, credit_card_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                txn.description,
                money_to_sql(txn.amount),
                date_to_sql(txn.date),
                txn.category,
                txn.kind.as_str(),
                txn.link.account_id(),
                txn.link.credit_card_id(),
            ],
        )?;
        let id = TransactionId::new(self.conn.last_insert_rowid());
        self.get(id)?
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))
    }

    /// Overwrite every stored field of an existing transaction
    pub fn update(&self, txn: &ActualTransaction) -> LedgerResult<()> {
        let changed = self.conn.execute(
            "UPDATE actual_transactions SET description = ?1, amount = ?2, date = ?3,
                 category = ?4, type = ?5, account_id = ?6, credit_card_id = ?7
             WHERE id = ?8",
            params![
                txn.description,
                money_to_sql(txn.amount),
                date_to_sql(txn.date),
                txn.category,
                txn.kind.as_str(),
                txn.link.account_id(),
                txn.link.credit_card_id(),
                txn.id,
            ],
        )?;
        if changed == 0 {
            return Err(LedgerError::transaction_not_found(txn.id.to_string()));
        }
        Ok(())
    }

    /// Delete a transaction. Returns false if it did not exist.
    pub fn delete(&self, id: TransactionId) -> LedgerResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM actual_transactions WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// Number of transactions linked to an account
    pub fn count_for_account(&self, id: AccountId) -> LedgerResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM actual_transactions WHERE account_id = ?1",
            [id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Number of transactions linked to a credit card
    pub fn count_for_card(&self, id: CreditCardId) -> LedgerResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM actual_transactions WHERE credit_card_id = ?1",
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

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample(description: &str, kind: TransactionKind, on: NaiveDate) -> ActualTransaction {
        ActualTransaction {
            id: TransactionId::new(0),
            description: description.into(),
            amount: Money::from_cents(4_250),
            date: on,
            category: "Food".into(),
            kind,
            link: Link::None,
        }
    }

    #[test]
    fn test_insert_and_get() {
        let storage = Storage::open_in_memory().unwrap();
        let stored = storage
            .transactions
            .insert(&sample("Groceries", TransactionKind::Expense, date(2024, 3, 5)))
            .unwrap();

        let fetched = storage.transactions.get(stored.id).unwrap().unwrap();
        assert_eq!(fetched.description, "Groceries");
        assert_eq!(fetched.amount.cents(), 4_250);
        assert_eq!(fetched.date, date(2024, 3, 5));
        assert_eq!(fetched.kind, TransactionKind::Expense);
    }

    #[test]
    fn test_date_range_query() {
        let storage = Storage::open_in_memory().unwrap();
        for (d, name) in [(1, "a"), (15, "b"), (31, "c")] {
            storage
                .transactions
                .insert(&sample(name, TransactionKind::Expense, date(2024, 3, d)))
                .unwrap();
        }
        storage
            .transactions
            .insert(&sample("april", TransactionKind::Expense, date(2024, 4, 1)))
            .unwrap();

        let march = storage
            .transactions
            .get_by_date_range(date(2024, 3, 1), date(2024, 3, 31))
            .unwrap();
        assert_eq!(march.len(), 3);
        // newest first
        assert_eq!(march[0].description, "c");
    }

    #[test]
    fn test_timestamped_dates_are_matched() {
        let storage = Storage::open_in_memory().unwrap();
        let stored = storage
            .transactions
            .insert(&sample("late", TransactionKind::Expense, date(2024, 3, 31)))
            .unwrap();
        storage
            .conn()
            .execute(
                "UPDATE actual_transactions SET date = '2024-03-31 00:00:00' WHERE id = ?1",
                [stored.id],
            )
            .unwrap();

        let march = storage
            .transactions
            .get_by_date_range(date(2024, 3, 1), date(2024, 3, 31))
            .unwrap();
        assert_eq!(march.len(), 1);
        assert_eq!(march[0].date, date(2024, 3, 31));
    }

    #[test]
    fn test_filter_by_kind_category_and_limit() {
        let storage = Storage::open_in_memory().unwrap();
        storage
            .transactions
            .insert(&sample("Paycheck", TransactionKind::Income, date(2024, 3, 1)))
            .unwrap();
        for d in 2..6 {
            storage
                .transactions
                .insert(&sample("Lunch", TransactionKind::Expense, date(2024, 3, d)))
                .unwrap();
        }

        let filter = TransactionFilter {
            category: Some("food".into()),
            limit: Some(2),
            ..TransactionFilter::default()
        }
        .with_kind(TransactionKind::Expense);
        let found = storage.transactions.list(&filter).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|t| t.is_expense()));
    }

    #[test]
    fn test_counts_by_link() {
        let storage = Storage::open_in_memory().unwrap();
        let account = storage.accounts.insert("Checking", Money::zero()).unwrap();
        let mut txn = sample("Rent", TransactionKind::Expense, date(2024, 3, 1));
        txn.link = Link::Account(account.id);
        storage.transactions.insert(&txn).unwrap();

        assert_eq!(storage.transactions.count_for_account(account.id).unwrap(), 1);
        assert_eq!(
            storage
                .transactions
                .count_for_card(CreditCardId::new(1))
                .unwrap(),
            0
        );
    }
}
