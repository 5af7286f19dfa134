//! In-memory reference implementation of the adapter contract.
//!
//! Deterministic and test-friendly. Production deployments persist to a
//! durable backend; this adapter exists so the write path can be
//! exercised end to end without one.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use warden_model::Rule;

use crate::traits::{Adapter, AdapterCapabilities};
use crate::{StorageError, StorageResult};

type RuleStore = HashMap<(String, String), Vec<Rule>>;

/// In-memory policy storage adapter. Implements both optional batch
/// capabilities.
#[derive(Debug, Default)]
pub struct MemoryAdapter {
    store: RwLock<RuleStore>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The persisted rules for one `(sec, ptype)` address, in insertion
    /// order.
    pub fn rules(&self, sec: &str, ptype: &str) -> StorageResult<Vec<Rule>> {
        let guard = self.read()?;
        Ok(guard
            .get(&(sec.to_string(), ptype.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn read(&self) -> StorageResult<std::sync::RwLockReadGuard<'_, RuleStore>> {
        self.store
            .read()
            .map_err(|_| StorageError::Backend("rule store lock poisoned".to_string()))
    }

    fn write(&self) -> StorageResult<std::sync::RwLockWriteGuard<'_, RuleStore>> {
        self.store
            .write()
            .map_err(|_| StorageError::Backend("rule store lock poisoned".to_string()))
    }
}

#[async_trait]
impl Adapter for MemoryAdapter {
    async fn add_policy(&self, sec: &str, ptype: &str, rule: &Rule) -> StorageResult<bool> {
        let mut guard = self.write()?;
        let rules = guard.entry((sec.to_string(), ptype.to_string())).or_default();
        if rules.contains(rule) {
            return Ok(false);
        }
        rules.push(rule.clone());
        Ok(true)
    }

    async fn add_policies(&self, sec: &str, ptype: &str, batch: &[Rule]) -> StorageResult<bool> {
        let mut guard = self.write()?;
        let rules = guard.entry((sec.to_string(), ptype.to_string())).or_default();
        for (i, rule) in batch.iter().enumerate() {
            if rules.contains(rule) || batch[..i].contains(rule) {
                return Ok(false);
            }
        }
        rules.extend_from_slice(batch);
        Ok(true)
    }

    async fn update_policy(
        &self,
        sec: &str,
        ptype: &str,
        old_rule: &Rule,
        new_rule: &Rule,
    ) -> StorageResult<bool> {
        let mut guard = self.write()?;
        let Some(rules) = guard.get_mut(&(sec.to_string(), ptype.to_string())) else {
            return Ok(false);
        };
        let Some(position) = rules.iter().position(|r| r == old_rule) else {
            return Ok(false);
        };
        rules[position] = new_rule.clone();
        Ok(true)
    }

    async fn update_policies(
        &self,
        sec: &str,
        ptype: &str,
        old_rules: &[Rule],
        new_rules: &[Rule],
    ) -> StorageResult<bool> {
        if old_rules.len() != new_rules.len() {
            return Ok(false);
        }
        let mut guard = self.write()?;
        let Some(rules) = guard.get_mut(&(sec.to_string(), ptype.to_string())) else {
            return Ok(false);
        };
        let mut positions = Vec::with_capacity(old_rules.len());
        for old in old_rules {
            match rules.iter().position(|r| r == old) {
                Some(position) => positions.push(position),
                None => return Ok(false),
            }
        }
        for (position, new) in positions.into_iter().zip(new_rules) {
            rules[position] = new.clone();
        }
        Ok(true)
    }

    async fn remove_policy(&self, sec: &str, ptype: &str, rule: &Rule) -> StorageResult<bool> {
        let mut guard = self.write()?;
        let Some(rules) = guard.get_mut(&(sec.to_string(), ptype.to_string())) else {
            return Ok(false);
        };
        match rules.iter().position(|r| r == rule) {
            Some(position) => {
                rules.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_policies(&self, sec: &str, ptype: &str, batch: &[Rule]) -> StorageResult<bool> {
        let mut guard = self.write()?;
        let Some(rules) = guard.get_mut(&(sec.to_string(), ptype.to_string())) else {
            return Ok(false);
        };
        if !batch.iter().all(|rule| rules.contains(rule)) {
            return Ok(false);
        }
        rules.retain(|rule| !batch.contains(rule));
        Ok(true)
    }

    async fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> StorageResult<bool> {
        let mut guard = self.write()?;
        let Some(rules) = guard.get_mut(&(sec.to_string(), ptype.to_string())) else {
            return Ok(false);
        };
        let before = rules.len();
        rules.retain(|rule| !rule.matches_filter(field_index, field_values));
        Ok(rules.len() < before)
    }

    fn capabilities(&self) -> AdapterCapabilities {
        AdapterCapabilities::all()
    }
}
