//! Audit log CLI command

use crate::error::LedgerResult;
use crate::storage::Storage;

/// Print the most recent `limit` audit entries, oldest first
pub fn handle_audit_command(storage: &Storage, limit: usize) -> LedgerResult<()> {
    let Some(logger) = storage.audit_log() else {
        println!("Audit logging is not enabled for this ledger.");
        return Ok(());
    };

    let entries = logger.read_recent(limit)?;
    if entries.is_empty() {
        println!("No audit entries found.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.summary());
    }
    println!("\nShowing {} entries from {}", entries.len(), logger.path().display());

    Ok(())
}
