use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use warden_model::Rule;

use crate::StorageResult;

/// The optional batch operations an adapter implements.
///
/// Resolved once when the adapter is registered with the write path,
/// never probed per call. Batch update carries no flag: adapters are
/// expected to implement `update_policies` unconditionally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterCapabilities {
    /// `add_policies` is implemented.
    pub batch_add: bool,
    /// `remove_policies` is implemented.
    pub batch_remove: bool,
}

impl AdapterCapabilities {
    /// No optional operations implemented.
    pub const fn none() -> Self {
        Self {
            batch_add: false,
            batch_remove: false,
        }
    }

    /// Every optional operation implemented.
    pub const fn all() -> Self {
        Self {
            batch_add: true,
            batch_remove: true,
        }
    }
}

/// Persistent storage gateway for policy rules.
///
/// Every operation mirrors one model mutation. `Ok(false)` is the
/// adapter's failure signal for a supported operation; `Err` is an
/// underlying fault (I/O, backend) and is propagated unmodified by the
/// write path. The two batch operations are optional: an adapter that
/// leaves them at their defaults must also leave them out of
/// [`Adapter::capabilities`], and the write path will never call them.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Persist one added rule.
    async fn add_policy(&self, sec: &str, ptype: &str, rule: &Rule) -> StorageResult<bool>;

    /// Persist a batch of added rules. Optional capability.
    async fn add_policies(&self, sec: &str, ptype: &str, rules: &[Rule]) -> StorageResult<bool> {
        let _ = (sec, ptype, rules);
        Err(crate::StorageError::Unsupported("add_policies"))
    }

    /// Persist one rule replacement.
    async fn update_policy(
        &self,
        sec: &str,
        ptype: &str,
        old_rule: &Rule,
        new_rule: &Rule,
    ) -> StorageResult<bool>;

    /// Persist a batch of rule replacements over parallel slices.
    async fn update_policies(
        &self,
        sec: &str,
        ptype: &str,
        old_rules: &[Rule],
        new_rules: &[Rule],
    ) -> StorageResult<bool>;

    /// Persist one rule removal.
    async fn remove_policy(&self, sec: &str, ptype: &str, rule: &Rule) -> StorageResult<bool>;

    /// Persist a batch of rule removals. Optional capability.
    async fn remove_policies(&self, sec: &str, ptype: &str, rules: &[Rule]) -> StorageResult<bool> {
        let _ = (sec, ptype, rules);
        Err(crate::StorageError::Unsupported("remove_policies"))
    }

    /// Persist a filtered removal.
    async fn remove_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> StorageResult<bool>;

    /// Which optional operations this adapter implements.
    fn capabilities(&self) -> AdapterCapabilities {
        AdapterCapabilities::none()
    }
}
