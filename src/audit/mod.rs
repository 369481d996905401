//! Audit trail for ledger changes
//!
//! Every create, update and delete of an account, card, recurring rule or
//! actual transaction is appended to `audit.log` as one JSON line, with the
//! record's state before and after and a short list of changed fields.
//! Entries are written only after the database unit of work has committed.

mod logger;

pub use logger::AuditLogger;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::models::{Account, ActualTransaction, CreditCard, RecurringRule};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Types of records that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Account,
    CreditCard,
    RecurringRule,
    Transaction,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::Account => write!(f, "Account"),
            EntityType::CreditCard => write!(f, "CreditCard"),
            EntityType::RecurringRule => write!(f, "RecurringRule"),
            EntityType::Transaction => write!(f, "Transaction"),
        }
    }
}

/// A record that can appear in the audit trail
pub trait Audited: Serialize {
    const ENTITY_TYPE: EntityType;

    fn audit_id(&self) -> String;
    fn audit_name(&self) -> String;
}

impl Audited for Account {
    const ENTITY_TYPE: EntityType = EntityType::Account;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> String {
        self.name.clone()
    }
}

impl Audited for CreditCard {
    const ENTITY_TYPE: EntityType = EntityType::CreditCard;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> String {
        self.name.clone()
    }
}

impl Audited for RecurringRule {
    const ENTITY_TYPE: EntityType = EntityType::RecurringRule;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> String {
        self.description.clone()
    }
}

impl Audited for ActualTransaction {
    const ENTITY_TYPE: EntityType = EntityType::Transaction;

    fn audit_id(&self) -> String {
        self.id.to_string()
    }

    fn audit_name(&self) -> String {
        self.description.clone()
    }
}

/// A single audit log line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub entity_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Value>,

    /// "field: old -> new" for each top-level field that changed
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub changes: Vec<String>,
}

impl AuditEntry {
    fn new<T: Audited>(operation: Operation, entity: &T) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type: T::ENTITY_TYPE,
            entity_id: entity.audit_id(),
            entity_name: entity.audit_name(),
            before: None,
            after: None,
            changes: Vec::new(),
        }
    }

    pub fn created<T: Audited>(entity: &T) -> Self {
        Self {
            after: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Create, entity)
        }
    }

    pub fn updated<T: Audited>(before: &T, after: &T) -> Self {
        let before = serde_json::to_value(before).ok();
        let after_value = serde_json::to_value(after).ok();
        let changes = match (&before, &after_value) {
            (Some(b), Some(a)) => changed_fields(b, a),
            _ => Vec::new(),
        };

        Self {
            before,
            after: after_value,
            changes,
            ..Self::new(Operation::Update, after)
        }
    }

    pub fn deleted<T: Audited>(entity: &T) -> Self {
        Self {
            before: serde_json::to_value(entity).ok(),
            ..Self::new(Operation::Delete, entity)
        }
    }

    /// One-line summary for terminal output
    pub fn summary(&self) -> String {
        let mut line = format!(
            "[{}] {} {} {} ({})",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.operation,
            self.entity_type,
            self.entity_id,
            self.entity_name
        );
        if !self.changes.is_empty() {
            line.push_str(": ");
            line.push_str(&self.changes.join(", "));
        }
        line
    }
}

fn changed_fields(before: &Value, after: &Value) -> Vec<String> {
    let (Value::Object(before), Value::Object(after)) = (before, after) else {
        return Vec::new();
    };

    after
        .iter()
        .filter_map(|(key, new)| {
            let old = before.get(key).unwrap_or(&Value::Null);
            (old != new).then(|| format!("{}: {} -> {}", key, render(old), render(new)))
        })
        .collect()
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .values()
            .map(render)
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}
