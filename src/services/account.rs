//! Bank account service
//!
//! Creation, renaming, manual balance correction and guarded deletion of bank
//! accounts. Day-to-day balance movement happens through the reconciler, not
//! here.

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, AccountId, Money};
use crate::storage::Storage;

use super::link_conflict_reason;

/// Service for bank account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account with an opening balance
    pub fn create(&self, name: &str, opening_balance: Money) -> LedgerResult<Account> {
        let name = name.trim();
        let draft = Account {
            id: AccountId::new(0),
            name: name.to_string(),
            balance: opening_balance,
            last_updated: None,
        };
        draft.validate()?;

        let account = self.storage.unit_of_work(|s| {
            ensure_name_free(s, name, None)?;
            s.accounts.insert(name, opening_balance)
        })?;
        info!(account = %account.id, name = %account.name, "created account");

        self.storage.log_create(&account);
        Ok(account)
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name or ID string
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        if let Ok(id) = identifier.parse::<AccountId>() {
            return self.storage.accounts.get(id);
        }

        Ok(None)
    }

    /// Like [`find`](Self::find), but a missing account is an error
    pub fn require(&self, identifier: &str) -> LedgerResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::account_not_found(identifier))
    }

    /// All accounts, ordered by name
    pub fn list(&self) -> LedgerResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }

    /// Sum of all account balances
    pub fn total_balance(&self) -> LedgerResult<Money> {
        self.storage.accounts.total_balance()
    }

    /// Rename an account
    pub fn rename(&self, id: AccountId, new_name: &str) -> LedgerResult<Account> {
        self.modify(id, |account| account.name = new_name.trim().to_string())
    }

    /// Overwrite the stored balance (manual correction)
    ///
    /// This bypasses reconciliation; the audit trail records the old and new
    /// balance.
    pub fn set_balance(&self, id: AccountId, balance: Money) -> LedgerResult<Account> {
        self.modify(id, |account| account.balance = balance)
    }

    fn modify(&self, id: AccountId, change: impl FnOnce(&mut Account)) -> LedgerResult<Account> {
        let before = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?;

        let mut account = before.clone();
        change(&mut account);
        account.validate()?;

        let account = self.storage.unit_of_work(|s| {
            ensure_name_free(s, &account.name, Some(id))?;
            s.accounts.update(&account)?;
            s.accounts
                .get(id)?
                .ok_or_else(|| LedgerError::account_not_found(id.to_string()))
        })?;

        self.storage.log_update(&before, &account);
        Ok(account)
    }

    /// Delete an account
    ///
    /// Refused with a conflict while any recurring rule or actual transaction
    /// still links to the account.
    pub fn delete(&self, id: AccountId) -> LedgerResult<Account> {
        let account = self.storage.unit_of_work(|s| {
            let account = s
                .accounts
                .get(id)?
                .ok_or_else(|| LedgerError::account_not_found(id.to_string()))?;

            let rules = s.recurring.count_for_account(id)?;
            let transactions = s.transactions.count_for_account(id)?;
            if let Some(reason) = link_conflict_reason(rules, transactions) {
                return Err(LedgerError::Conflict {
                    entity_type: "Account",
                    identifier: account.name,
                    reason,
                });
            }

            s.accounts.delete(id)?;
            Ok(account)
        })?;
        info!(account = %account.id, name = %account.name, "deleted account");

        self.storage.log_delete(&account);
        Ok(account)
    }
}

/// Fail with `Duplicate` if another account already uses `name`
fn ensure_name_free(storage: &Storage, name: &str, except: Option<AccountId>) -> LedgerResult<()> {
    match storage.accounts.get_by_name(name)? {
        Some(existing) if Some(existing.id) != except => Err(LedgerError::Duplicate {
            entity_type: "Account",
            identifier: name.to_string(),
        }),
        _ => Ok(()),
    }
}
