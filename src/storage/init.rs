//! Schema initialization
//!
//! Table and column names match databases written by earlier versions of the
//! ledger, so an existing `finance_data.db` is opened as-is.

use rusqlite::Connection;

use crate::error::LedgerResult;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS bank_accounts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        balance REAL NOT NULL,
        last_updated TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS credit_cards (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        current_balance REAL NOT NULL,
        statement_balance REAL NOT NULL,
        interest_rate REAL NOT NULL,
        due_date DATE NOT NULL,
        credit_limit REAL NOT NULL,
        last_updated TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS recurring_transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        amount REAL NOT NULL,
        frequency TEXT NOT NULL,
        start_date DATE NOT NULL,
        end_date DATE,
        category TEXT NOT NULL,
        type TEXT NOT NULL,
        account_id INTEGER,
        credit_card_id INTEGER,
        is_active BOOLEAN DEFAULT 1,
        FOREIGN KEY (account_id) REFERENCES bank_accounts (id),
        FOREIGN KEY (credit_card_id) REFERENCES credit_cards (id)
    );

    CREATE TABLE IF NOT EXISTS actual_transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        amount REAL NOT NULL,
        date DATE NOT NULL,
        category TEXT NOT NULL,
        type TEXT NOT NULL,
        account_id INTEGER,
        credit_card_id INTEGER,
        FOREIGN KEY (account_id) REFERENCES bank_accounts (id),
        FOREIGN KEY (credit_card_id) REFERENCES credit_cards (id)
    );

    CREATE INDEX IF NOT EXISTS idx_actual_transactions_date ON actual_transactions(date);
";

/// Create any missing tables
pub fn initialize_schema(conn: &Connection) -> LedgerResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        initialize_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            tables,
            vec![
                "actual_transactions",
                "bank_accounts",
                "credit_cards",
                "recurring_transactions"
            ]
        );
    }
}
