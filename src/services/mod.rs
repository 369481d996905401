//! Service layer for the cash-flow ledger
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, reconciliation of stored balances, and cross-entity
//! checks such as refusing to delete an account that transactions still use.

pub mod account;
pub mod credit_card;
pub mod frequency;
pub mod import;
pub mod reconciler;
pub mod recurring;
pub mod transaction;

pub use account::AccountService;
pub use credit_card::{CreateCreditCardInput, CreditCardService, UpdateCreditCardInput};
pub use import::{AmountSign, ColumnMapping, ImportResult, ImportService};
pub use reconciler::{BalanceEffect, BalanceTarget, Reconciler};
pub use recurring::{CreateRuleInput, RecurringService, RuleFilter, UpdateRuleInput};
pub use transaction::{CreateTransactionInput, TransactionService, UpdateTransactionInput};

use crate::error::{LedgerError, LedgerResult};
use crate::models::Link;
use crate::storage::Storage;

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Describe the rows still linked to an entity, or `None` if nothing is
pub(crate) fn link_conflict_reason(rules: usize, transactions: usize) -> Option<String> {
    let parts: Vec<String> = [
        (rules, "recurring transaction"),
        (transactions, "transaction"),
    ]
    .iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, noun)| plural(*count, noun))
    .collect();

    if parts.is_empty() {
        None
    } else {
        Some(format!("{} still linked", parts.join(" and ")))
    }
}

/// Fail with `NotFound` if `link` points at a missing account or card
pub(crate) fn ensure_link_exists(storage: &Storage, link: Link) -> LedgerResult<()> {
    match link {
        Link::None => Ok(()),
        Link::Account(id) => storage
            .accounts
            .get(id)?
            .map(|_| ())
            .ok_or_else(|| LedgerError::account_not_found(id.to_string())),
        Link::CreditCard(id) => storage
            .cards
            .get(id)?
            .map(|_| ())
            .ok_or_else(|| LedgerError::card_not_found(id.to_string())),
    }
}
