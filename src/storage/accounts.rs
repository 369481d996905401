//! Bank account repository (`bank_accounts` table)

use std::rc::Rc;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, Money};

use super::rows::{money_from_sql, money_to_sql, parse_timestamp};

const SELECT: &str = "SELECT id, name, balance, last_updated FROM bank_accounts";

/// Repository for bank account persistence
pub struct AccountRepository {
    conn: Rc<Connection>,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<Account> {
    let last_updated: Option<String> = row.get(3)?;
    Ok(Account {
        id: row.get(0)?,
        name: row.get(1)?,
        balance: money_from_sql(row.get(2)?),
        last_updated: parse_timestamp(last_updated.as_deref()),
    })
}

impl AccountRepository {
    pub(crate) fn new(conn: Rc<Connection>) -> Self {
        Self { conn }
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        let account = self
            .conn
            .query_row(&format!("{} WHERE id = ?1", SELECT), [id], from_row)
            .optional()?;
        Ok(account)
    }

    /// Get an account by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> LedgerResult<Option<Account>> {
        let account = self
            .conn
            .query_row(
                &format!("{} WHERE name = ?1 COLLATE NOCASE ORDER BY id LIMIT 1", SELECT),
                [name.trim()],
                from_row,
            )
            .optional()?;
        Ok(account)
    }

    /// Get all accounts, ordered by name
    pub fn get_all(&self) -> LedgerResult<Vec<Account>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY name COLLATE NOCASE, id", SELECT))?;
        let accounts = stmt
            .query_map([], from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(accounts)
    }

    /// Insert a new account and return it with its assigned ID
    pub fn insert(&self, name: &str, balance: Money) -> LedgerResult<Account> {
        self.conn.execute(
            "INSERT INTO bank_accounts (name, balance) VALUES (?1, ?2)",
            params![name, money_to_sql(balance)],
        )?;
        let id = AccountId::new(self.conn.last_insert_rowid());
        self.get(id)?
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))
    }

    /// Overwrite name and balance
    pub fn update(&self, account: &Account) -> LedgerResult<()> {
        let changed = self.conn.execute(
            "UPDATE bank_accounts SET name = ?1, balance = ?2, last_updated = CURRENT_TIMESTAMP WHERE id = ?3",
            params![account.name, money_to_sql(account.balance), account.id],
        )?;
        if changed == 0 {
            return Err(LedgerError::account_not_found(account.id.to_string()));
        }
        Ok(())
    }

    /// Add `delta` to the stored balance
    pub fn adjust_balance(&self, id: AccountId, delta: Money) -> LedgerResult<()> {
        let changed = self.conn.execute(
            "UPDATE bank_accounts SET balance = ROUND(balance + ?1, 2), last_updated = CURRENT_TIMESTAMP WHERE id = ?2",
            params![money_to_sql(delta), id],
        )?;
        if changed == 0 {
            return Err(LedgerError::account_not_found(id.to_string()));
        }
        Ok(())
    }

    /// Delete an account. Returns false if it did not exist.
    pub fn delete(&self, id: AccountId) -> LedgerResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM bank_accounts WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    /// Sum of all account balances
    pub fn total_balance(&self) -> LedgerResult<Money> {
        Ok(self.get_all()?.iter().map(|a| a.balance).sum())
    }
}
