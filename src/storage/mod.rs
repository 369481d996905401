//! Ledger store backed by SQLite
//!
//! One repository per table, all sharing a single connection. Multi-step
//! writes (a transaction row plus the balance it moves) go through
//! [`Storage::unit_of_work`] so readers never see a half-applied change.

pub mod accounts;
pub mod cards;
pub mod init;
pub mod recurring;
mod rows;
pub mod transactions;

pub use accounts::AccountRepository;
pub use cards::CreditCardRepository;
pub use init::initialize_schema;
pub use recurring::RecurringRepository;
pub use transactions::{TransactionFilter, TransactionRepository};

use std::rc::Rc;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::audit::{AuditEntry, AuditLogger, Audited};
use crate::config::paths::LedgerPaths;
use crate::error::{LedgerError, LedgerResult};

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    conn: Rc<Connection>,
    audit: Option<AuditLogger>,
    pub accounts: AccountRepository,
    pub cards: CreditCardRepository,
    pub recurring: RecurringRepository,
    pub transactions: TransactionRepository,
}

impl Storage {
    /// Open (creating if needed) the ledger database in the data directory
    pub fn open(paths: &LedgerPaths) -> LedgerResult<Self> {
        paths.ensure_directories()?;

        let db_path = paths.database_file();
        let conn = Connection::open(&db_path).map_err(|e| {
            LedgerError::Storage(format!("Failed to open {}: {}", db_path.display(), e))
        })?;
        debug!(path = %db_path.display(), "opened ledger database");

        Self::from_connection(conn, Some(AuditLogger::new(paths.audit_log())))
    }

    /// Open a throwaway in-memory ledger (no audit trail)
    pub fn open_in_memory() -> LedgerResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(conn: Connection, audit: Option<AuditLogger>) -> LedgerResult<Self> {
        initialize_schema(&conn)?;
        let conn = Rc::new(conn);

        Ok(Self {
            accounts: AccountRepository::new(Rc::clone(&conn)),
            cards: CreditCardRepository::new(Rc::clone(&conn)),
            recurring: RecurringRepository::new(Rc::clone(&conn)),
            transactions: TransactionRepository::new(Rc::clone(&conn)),
            audit,
            conn,
        })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Run `work` as one database transaction
    ///
    /// Commits when `work` returns `Ok`, rolls back when it returns `Err`.
    /// Calls nested inside an open unit of work join the outer one.
    pub fn unit_of_work<T, F>(&self, work: F) -> LedgerResult<T>
    where
        F: FnOnce(&Self) -> LedgerResult<T>,
    {
        if !self.conn.is_autocommit() {
            return work(self);
        }

        let tx = self.conn.unchecked_transaction()?;
        let value = work(self)?;
        tx.commit()?;
        Ok(value)
    }

    /// Audit trail, if this store has one
    pub fn audit_log(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    fn write_audit(&self, entry: AuditEntry) {
        if let Some(logger) = &self.audit {
            // The change is already committed; a lost audit line is not worth failing over
            if let Err(e) = logger.log(&entry) {
                warn!(error = %e, entity = %entry.entity_id, "failed to write audit entry");
            }
        }
    }

    pub(crate) fn log_create<T: Audited>(&self, entity: &T) {
        self.write_audit(AuditEntry::created(entity));
    }

    pub(crate) fn log_update<T: Audited>(&self, before: &T, after: &T) {
        self.write_audit(AuditEntry::updated(before, after));
    }

    pub(crate) fn log_delete<T: Audited>(&self, entity: &T) {
        self.write_audit(AuditEntry::deleted(entity));
    }
}
