//! Key-value persistence contract and the goal document codec.

use std::{
    collections::{HashMap, HashSet},
    sync::RwLock,
};

use rust_decimal::Decimal;
use savings_domain::GoalLedger;

use crate::{CoreError, CoreResult};

/// Key under which the whole goal collection is stored.
pub const GOALS_STORAGE_KEY: &str = "savings-goals";

/// A string-valued record store. `set` overwrites the whole record.
pub trait KeyValueStore: Send + Sync {
    /// Last written value, or `None` when the key was never written.
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
}

/// In-process store for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one record.
    pub fn with_record(key: &str, value: impl Into<String>) -> Self {
        let store = Self::new();
        if let Ok(mut records) = store.records.write() {
            records.insert(key.to_string(), value.into());
        }
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let records = self
            .records
            .read()
            .map_err(|_| CoreError::Persistence("memory store lock poisoned".into()))?;
        Ok(records.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| CoreError::Persistence("memory store lock poisoned".into()))?;
        records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Serializes the collection as a pretty-printed JSON array.
pub fn encode_goals(ledger: &GoalLedger) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(ledger)?)
}

/// Parses a stored document. Blank input is an empty collection.
pub fn decode_goals(raw: &str) -> CoreResult<GoalLedger> {
    if raw.trim().is_empty() {
        return Ok(GoalLedger::new());
    }
    Ok(serde_json::from_str(raw)?)
}

/// Reads the goal collection, treating a missing record as empty.
pub fn load_goals(store: &dyn KeyValueStore) -> CoreResult<GoalLedger> {
    match store.get(GOALS_STORAGE_KEY)? {
        Some(raw) => decode_goals(&raw),
        None => Ok(GoalLedger::new()),
    }
}

pub fn save_goals(store: &dyn KeyValueStore, ledger: &GoalLedger) -> CoreResult<()> {
    let encoded = encode_goals(ledger)?;
    store.set(GOALS_STORAGE_KEY, &encoded)
}

/// Human-readable descriptions of consistency problems in a loaded collection.
pub fn integrity_warnings(ledger: &GoalLedger) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut goal_ids = HashSet::new();

    for goal in ledger {
        if !goal_ids.insert(goal.id) {
            warnings.push(format!("duplicate goal id {}", goal.id));
        }
        if !goal.is_balanced() {
            warnings.push(format!(
                "goal `{}` balance {} differs from contribution total {}",
                goal.name,
                goal.current_amount,
                goal.contribution_total()
            ));
        }
        if goal.current_amount < Decimal::ZERO {
            warnings.push(format!(
                "goal `{}` has a negative balance ({})",
                goal.name, goal.current_amount
            ));
        }
        if goal.has_deadline != goal.deadline.is_some() {
            warnings.push(format!(
                "goal `{}` deadline flag does not match its deadline",
                goal.name
            ));
        }

        let mut contribution_ids = HashSet::new();
        for entry in &goal.contributions {
            if !contribution_ids.insert(entry.id) {
                warnings.push(format!(
                    "goal `{}` has duplicate contribution id {}",
                    goal.name, entry.id
                ));
            }
        }
    }
    warnings
}
