//! Actual transaction service
//!
//! Every write here pairs the row change with its balance change inside one
//! unit of work: create applies, delete reverses, and update reverses the old
//! version before applying the new one.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{ActualTransaction, Link, Money, TransactionId, TransactionKind};
use crate::storage::{Storage, TransactionFilter};

use super::ensure_link_exists;
use super::reconciler::Reconciler;

/// Service for actual transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Input for recording a transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub description: String,
    pub amount: Money,
    pub date: NaiveDate,
    pub category: String,
    pub kind: TransactionKind,
    pub link: Link,
}

/// Field changes for a transaction; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub kind: Option<TransactionKind>,
    pub link: Option<Link>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a transaction and apply its balance effect
    pub fn create(&self, input: CreateTransactionInput) -> LedgerResult<ActualTransaction> {
        let draft = ActualTransaction {
            id: TransactionId::new(0),
            description: input.description.trim().to_string(),
            amount: input.amount,
            date: input.date,
            category: input.category.trim().to_string(),
            kind: input.kind,
            link: input.link,
        };
        draft.validate()?;

        let txn = self.storage.unit_of_work(|s| {
            ensure_link_exists(s, draft.link)?;
            let txn = s.transactions.insert(&draft)?;
            Reconciler::new(s).apply(&txn)?;
            Ok(txn)
        })?;
        info!(
            transaction = %txn.id,
            amount = %txn.signed_amount(),
            link = %txn.link,
            "recorded transaction"
        );

        self.storage.log_create(&txn);
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<ActualTransaction>> {
        self.storage.transactions.get(id)
    }

    /// Get a transaction, treating a missing one as an error
    pub fn require(&self, id: TransactionId) -> LedgerResult<ActualTransaction> {
        self.get(id)?
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))
    }

    /// List transactions matching `filter`, newest first
    pub fn list(&self, filter: &TransactionFilter) -> LedgerResult<Vec<ActualTransaction>> {
        self.storage.transactions.list(filter)
    }

    /// Edit a transaction, moving its balance effect accordingly
    pub fn update(
        &self,
        id: TransactionId,
        input: UpdateTransactionInput,
    ) -> LedgerResult<ActualTransaction> {
        let old = self.require(id)?;

        let mut new = old.clone();
        if let Some(description) = input.description {
            new.description = description.trim().to_string();
        }
        if let Some(amount) = input.amount {
            new.amount = amount;
        }
        if let Some(date) = input.date {
            new.date = date;
        }
        if let Some(category) = input.category {
            new.category = category.trim().to_string();
        }
        if let Some(kind) = input.kind {
            new.kind = kind;
        }
        if let Some(link) = input.link {
            new.link = link;
        }
        new.validate()?;

        self.storage.unit_of_work(|s| {
            ensure_link_exists(s, new.link)?;
            s.transactions.update(&new)?;
            Reconciler::new(s).update(&old, &new)
        })?;

        self.storage.log_update(&old, &new);
        Ok(new)
    }

    /// Delete a transaction and reverse its balance effect
    pub fn delete(&self, id: TransactionId) -> LedgerResult<ActualTransaction> {
        let txn = self.storage.unit_of_work(|s| {
            let txn = s
                .transactions
                .get(id)?
                .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;
            Reconciler::new(s).reverse(&txn)?;
            s.transactions.delete(id)?;
            Ok(txn)
        })?;
        info!(transaction = %txn.id, "deleted transaction");

        self.storage.log_delete(&txn);
        Ok(txn)
    }
}
