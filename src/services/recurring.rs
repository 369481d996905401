//! Recurring rule service
//!
//! Rules are expectations, not money movements: creating, editing or
//! deleting one never touches a stored balance.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Frequency, Link, Money, RecurringRule, RecurringRuleId, TransactionKind};
use crate::storage::Storage;

use super::ensure_link_exists;

/// Service for recurring rule management
pub struct RecurringService<'a> {
    storage: &'a Storage,
}

/// Input for creating a recurring rule
#[derive(Debug, Clone)]
pub struct CreateRuleInput {
    pub description: String,
    pub amount: Money,
    pub kind: TransactionKind,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub category: String,
    pub link: Link,
}

/// Field changes for a rule; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct UpdateRuleInput {
    pub description: Option<String>,
    pub amount: Option<Money>,
    pub kind: Option<TransactionKind>,
    pub frequency: Option<Frequency>,
    pub start_date: Option<NaiveDate>,
    /// `Some(None)` clears the end date
    pub end_date: Option<Option<NaiveDate>>,
    pub category: Option<String>,
    pub link: Option<Link>,
}

/// Options for listing rules
#[derive(Debug, Clone, Default)]
pub struct RuleFilter {
    pub active_only: bool,
    pub kind: Option<TransactionKind>,
    /// Exact category (case-insensitive)
    pub category: Option<String>,
}

impl RuleFilter {
    fn matches(&self, rule: &RecurringRule) -> bool {
        self.kind.map_or(true, |k| rule.kind == k)
            && self
                .category
                .as_deref()
                .map_or(true, |c| rule.category.eq_ignore_ascii_case(c.trim()))
    }
}

fn ensure_recognized(frequency: &Frequency) -> LedgerResult<()> {
    if frequency.is_recognized() {
        return Ok(());
    }
    let known: Vec<String> = Frequency::KNOWN
        .iter()
        .map(|f| f.label().to_string())
        .collect();
    Err(LedgerError::Validation(format!(
        "Unknown frequency '{}' (expected one of: {})",
        frequency,
        known.join(", ")
    )))
}

impl<'a> RecurringService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new rule (active)
    pub fn create(&self, input: CreateRuleInput) -> LedgerResult<RecurringRule> {
        let draft = RecurringRule {
            id: RecurringRuleId::new(0),
            description: input.description.trim().to_string(),
            amount: input.amount,
            kind: input.kind,
            frequency: input.frequency,
            start_date: input.start_date,
            end_date: input.end_date,
            category: input.category.trim().to_string(),
            link: input.link,
            active: true,
        };
        draft.validate()?;
        ensure_recognized(&draft.frequency)?;

        let rule = self.storage.unit_of_work(|s| {
            ensure_link_exists(s, draft.link)?;
            s.recurring.insert(&draft)
        })?;
        info!(rule = %rule.id, description = %rule.description, "created recurring rule");

        self.storage.log_create(&rule);
        Ok(rule)
    }

    pub fn get(&self, id: RecurringRuleId) -> LedgerResult<Option<RecurringRule>> {
        self.storage.recurring.get(id)
    }

    /// Get a rule, treating a missing one as an error
    pub fn require(&self, id: RecurringRuleId) -> LedgerResult<RecurringRule> {
        self.get(id)?
            .ok_or_else(|| LedgerError::rule_not_found(id.to_string()))
    }

    /// List rules matching `filter`
    pub fn list(&self, filter: &RuleFilter) -> LedgerResult<Vec<RecurringRule>> {
        let rules = if filter.active_only {
            self.storage.recurring.get_active()?
        } else {
            self.storage.recurring.get_all()?
        };
        Ok(rules.into_iter().filter(|r| filter.matches(r)).collect())
    }

    /// Update rule fields
    pub fn update(&self, id: RecurringRuleId, input: UpdateRuleInput) -> LedgerResult<RecurringRule> {
        let before = self.require(id)?;

        let mut rule = before.clone();
        if let Some(description) = input.description {
            rule.description = description.trim().to_string();
        }
        if let Some(amount) = input.amount {
            rule.amount = amount;
        }
        if let Some(kind) = input.kind {
            rule.kind = kind;
        }
        if let Some(frequency) = input.frequency {
            ensure_recognized(&frequency)?;
            rule.frequency = frequency;
        }
        if let Some(start) = input.start_date {
            rule.start_date = start;
        }
        if let Some(end) = input.end_date {
            rule.end_date = end;
        }
        if let Some(category) = input.category {
            rule.category = category.trim().to_string();
        }
        if let Some(link) = input.link {
            rule.link = link;
        }
        rule.validate()?;

        self.save(&before, rule)
    }

    /// Pause or resume a rule
    pub fn set_active(&self, id: RecurringRuleId, active: bool) -> LedgerResult<RecurringRule> {
        let before = self.require(id)?;
        let rule = RecurringRule {
            active,
            ..before.clone()
        };
        self.save(&before, rule)
    }

    fn save(&self, before: &RecurringRule, rule: RecurringRule) -> LedgerResult<RecurringRule> {
        let rule = self.storage.unit_of_work(|s| {
            ensure_link_exists(s, rule.link)?;
            s.recurring.update(&rule)?;
            Ok(rule)
        })?;

        self.storage.log_update(before, &rule);
        Ok(rule)
    }

    /// Delete a rule
    pub fn delete(&self, id: RecurringRuleId) -> LedgerResult<RecurringRule> {
        let rule = self.require(id)?;
        self.storage.unit_of_work(|s| s.recurring.delete(id))?;
        info!(rule = %rule.id, description = %rule.description, "deleted recurring rule");

        self.storage.log_delete(&rule);
        Ok(rule)
    }
}
