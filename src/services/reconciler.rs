//! Balance reconciliation
//!
//! Keeps each stored account and card balance equal to the running total of
//! the actual transactions linked to it. Every change to a transaction is
//! expressed as `reverse(old)` followed by `apply(new)`; nothing special-cases
//! a changed amount, kind or link.
//!
//! | kind    | linked to   | effect                  |
//! |---------|-------------|-------------------------|
//! | expense | credit card | card balance += amount  |
//! | expense | account     | account balance -= amount |
//! | income  | account     | account balance += amount |
//! | income  | credit card | rejected                |
//! | any     | nothing     | none                    |
//!
//! The income-on-card rejection guards new rows only. Rows written before it
//! existed carry no effect, so reversing them is a no-op.

use std::fmt;

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, ActualTransaction, CreditCardId, Link, Money, TransactionKind};
use crate::storage::Storage;

/// The stored balance a transaction moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BalanceTarget {
    Account(AccountId),
    CreditCard(CreditCardId),
}

impl fmt::Display for BalanceTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(id) => write!(f, "{}", id),
            Self::CreditCard(id) => write!(f, "{}", id),
        }
    }
}

/// A signed change to one stored balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceEffect {
    pub target: BalanceTarget,
    pub delta: Money,
}

impl BalanceEffect {
    /// The mirror-image effect
    pub fn reversed(self) -> Self {
        Self {
            target: self.target,
            delta: -self.delta,
        }
    }

    pub fn apply_to(&self, balance: Money) -> Money {
        balance + self.delta
    }
}

/// The balance effect of recording `txn`, if any
///
/// Returns `None` for unlinked transactions and for income against a credit
/// card, which has no defined effect.
pub fn effect_of(txn: &ActualTransaction) -> Option<BalanceEffect> {
    let (target, delta) = match (txn.kind, txn.link) {
        (_, Link::None) => return None,
        (TransactionKind::Expense, Link::CreditCard(id)) => {
            (BalanceTarget::CreditCard(id), txn.amount)
        }
        (TransactionKind::Expense, Link::Account(id)) => (BalanceTarget::Account(id), -txn.amount),
        (TransactionKind::Income, Link::Account(id)) => (BalanceTarget::Account(id), txn.amount),
        (TransactionKind::Income, Link::CreditCard(_)) => return None,
    };
    Some(BalanceEffect { target, delta })
}

fn check_linkage(txn: &ActualTransaction) -> LedgerResult<()> {
    if let (TransactionKind::Income, Link::CreditCard(card)) = (txn.kind, txn.link) {
        return Err(LedgerError::InvalidLinkage(format!(
            "income '{}' cannot be recorded against credit card {}",
            txn.description, card
        )));
    }
    Ok(())
}

/// Applies and reverses transaction effects against the ledger store
pub struct Reconciler<'a> {
    storage: &'a Storage,
}

impl<'a> Reconciler<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn write(&self, effect: BalanceEffect) -> LedgerResult<()> {
        debug!(balance = %effect.target, delta = %effect.delta, "adjusting balance");
        match effect.target {
            BalanceTarget::Account(id) => self.storage.accounts.adjust_balance(id, effect.delta),
            BalanceTarget::CreditCard(id) => self.storage.cards.adjust_balance(id, effect.delta),
        }
    }

    /// Apply the effect of `txn` once
    pub fn apply(&self, txn: &ActualTransaction) -> LedgerResult<()> {
        check_linkage(txn)?;
        match effect_of(txn) {
            Some(effect) => self.write(effect),
            None => Ok(()),
        }
    }

    /// Undo the effect of `txn`
    pub fn reverse(&self, txn: &ActualTransaction) -> LedgerResult<()> {
        match effect_of(txn) {
            Some(effect) => self.write(effect.reversed()),
            None => Ok(()),
        }
    }

    /// Replace the effect of `old` with the effect of `new`, atomically
    pub fn update(&self, old: &ActualTransaction, new: &ActualTransaction) -> LedgerResult<()> {
        check_linkage(new)?;
        self.storage.unit_of_work(|_| {
            self.reverse(old)?;
            self.apply(new)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CreditCard, TransactionId};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn txn(kind: TransactionKind, cents: i64, link: Link) -> ActualTransaction {
        ActualTransaction {
            id: TransactionId::new(1),
            description: "Test".into(),
            amount: Money::from_cents(cents),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            category: "General".into(),
            kind,
            link,
        }
    }

    /// Pure model of the store's balances, for algebraic checks
    fn apply_pure(balances: &mut BTreeMap<BalanceTarget, Money>, effect: Option<BalanceEffect>) {
        if let Some(effect) = effect {
            let entry = balances.entry(effect.target).or_default();
            *entry = effect.apply_to(*entry);
        }
    }

    fn all_cases() -> Vec<ActualTransaction> {
        let account = Link::Account(AccountId::new(1));
        let other_account = Link::Account(AccountId::new(2));
        let card = Link::CreditCard(CreditCardId::new(1));
        vec![
            txn(TransactionKind::Expense, 1_999, account),
            txn(TransactionKind::Expense, 12_345, card),
            txn(TransactionKind::Income, 250_000, account),
            txn(TransactionKind::Income, 333, other_account),
            txn(TransactionKind::Expense, 700, Link::None),
            txn(TransactionKind::Income, 700, Link::None),
        ]
    }

    #[test]
    fn test_effect_table() {
        let acct = AccountId::new(1);
        let card = CreditCardId::new(1);

        let e = effect_of(&txn(TransactionKind::Expense, 500, Link::CreditCard(card))).unwrap();
        assert_eq!(e.target, BalanceTarget::CreditCard(card));
        assert_eq!(e.delta.cents(), 500);

        let e = effect_of(&txn(TransactionKind::Expense, 500, Link::Account(acct))).unwrap();
        assert_eq!(e.delta.cents(), -500);

        let e = effect_of(&txn(TransactionKind::Income, 500, Link::Account(acct))).unwrap();
        assert_eq!(e.delta.cents(), 500);

        assert!(effect_of(&txn(TransactionKind::Income, 500, Link::CreditCard(card))).is_none());
        assert!(effect_of(&txn(TransactionKind::Expense, 500, Link::None)).is_none());
    }

    #[test]
    fn test_reverse_after_apply_is_identity() {
        for t in all_cases() {
            let mut balances = BTreeMap::new();
            balances.insert(BalanceTarget::Account(AccountId::new(1)), Money::from_cents(10_001));
            let before = balances.clone();

            apply_pure(&mut balances, effect_of(&t));
            apply_pure(&mut balances, effect_of(&t).map(BalanceEffect::reversed));

            let nonzero = |m: &BTreeMap<BalanceTarget, Money>| -> BTreeMap<BalanceTarget, Money> {
                m.iter().filter(|(_, v)| !v.is_zero()).map(|(k, v)| (*k, *v)).collect()
            };
            assert_eq!(nonzero(&balances), nonzero(&before), "{:?}", t);
        }
    }

    fn seeded_storage() -> (Storage, AccountId, AccountId, CreditCardId) {
        let storage = Storage::open_in_memory().unwrap();
        let a1 = storage.accounts.insert("Checking", Money::from_dollars(1000)).unwrap();
        let a2 = storage.accounts.insert("Savings", Money::from_dollars(50)).unwrap();
        let card = storage
            .cards
            .insert(&CreditCard {
                id: CreditCardId::new(0),
                name: "Visa".into(),
                current_balance: Money::from_dollars(200),
                statement_balance: Money::zero(),
                interest_rate: 20.0,
                due_date: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
                credit_limit: Money::from_dollars(2000),
                last_updated: None,
            })
            .unwrap();
        (storage, a1.id, a2.id, card.id)
    }

    fn snapshot(storage: &Storage) -> Vec<Money> {
        let mut out: Vec<Money> = storage
            .accounts
            .get_all()
            .unwrap()
            .iter()
            .map(|a| a.balance)
            .collect();
        out.extend(storage.cards.get_all().unwrap().iter().map(|c| c.current_balance));
        out
    }

    fn store_cases(a1: AccountId, a2: AccountId, card: CreditCardId) -> Vec<ActualTransaction> {
        vec![
            txn(TransactionKind::Expense, 4_599, Link::Account(a1)),
            txn(TransactionKind::Expense, 12_000, Link::CreditCard(card)),
            txn(TransactionKind::Income, 300_001, Link::Account(a2)),
            txn(TransactionKind::Expense, 100, Link::None),
        ]
    }

    #[test]
    fn test_store_invertibility() {
        let (storage, a1, a2, card) = seeded_storage();
        let reconciler = Reconciler::new(&storage);
        let before = snapshot(&storage);

        for t in store_cases(a1, a2, card) {
            reconciler.apply(&t).unwrap();
            reconciler.reverse(&t).unwrap();
            assert_eq!(snapshot(&storage), before, "{:?}", t);
        }
    }

    #[test]
    fn test_update_equals_reverse_then_apply() {
        let cases = {
            let (_, a1, a2, card) = seeded_storage();
            store_cases(a1, a2, card)
        };

        for old in &cases {
            for new in &cases {
                let (via_update, ..) = seeded_storage();
                let r = Reconciler::new(&via_update);
                r.apply(old).unwrap();
                r.update(old, new).unwrap();

                let (by_hand, ..) = seeded_storage();
                let r = Reconciler::new(&by_hand);
                r.apply(old).unwrap();
                r.reverse(old).unwrap();
                r.apply(new).unwrap();

                assert_eq!(snapshot(&via_update), snapshot(&by_hand), "{:?} -> {:?}", old, new);
            }
        }
    }

    #[test]
    fn test_moving_between_accounts() {
        let (storage, a1, a2, _) = seeded_storage();
        let r = Reconciler::new(&storage);
        let old = txn(TransactionKind::Expense, 10_000, Link::Account(a1));
        r.apply(&old).unwrap();

        let mut new = old.clone();
        new.link = Link::Account(a2);
        r.update(&old, &new).unwrap();

        assert_eq!(storage.accounts.get(a1).unwrap().unwrap().balance, Money::from_dollars(1000));
        assert_eq!(storage.accounts.get(a2).unwrap().unwrap().balance, Money::from_dollars(-50));
    }

    #[test]
    fn test_income_to_card_rejected() {
        let (storage, _, _, card) = seeded_storage();
        let before = snapshot(&storage);
        let t = txn(TransactionKind::Income, 500, Link::CreditCard(card));

        let err = Reconciler::new(&storage).apply(&t).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidLinkage(_)));
        assert_eq!(snapshot(&storage), before);
    }

    #[test]
    fn test_reverse_of_income_on_card_is_noop() {
        let (storage, _, _, card) = seeded_storage();
        let before = snapshot(&storage);
        let t = txn(TransactionKind::Income, 500, Link::CreditCard(card));

        Reconciler::new(&storage).reverse(&t).unwrap();
        assert_eq!(snapshot(&storage), before);

        let mut fixed = t.clone();
        fixed.kind = TransactionKind::Expense;
        Reconciler::new(&storage).update(&t, &fixed).unwrap();
        assert_eq!(storage.cards.get(card).unwrap().unwrap().current_balance.cents(), 20_500);
    }

    #[test]
    fn test_failed_update_leaves_balances_untouched() {
        let (storage, a1, _, _) = seeded_storage();
        let r = Reconciler::new(&storage);
        let old = txn(TransactionKind::Expense, 10_000, Link::Account(a1));
        r.apply(&old).unwrap();
        let before = snapshot(&storage);

        // Target account does not exist, so the apply half fails after the reversal
        let new = txn(TransactionKind::Expense, 10_000, Link::Account(AccountId::new(999)));
        assert!(r.update(&old, &new).unwrap_err().is_not_found());
        assert_eq!(snapshot(&storage), before);
    }
}
