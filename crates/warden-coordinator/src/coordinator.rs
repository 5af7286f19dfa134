use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};
use warden_model::{PolicyModel, Rule};
use warden_storage::{Adapter, AdapterCapabilities};
use warden_watcher::Watcher;

use crate::error::CoordinatorResult;

/// Write-path coordinator for policy mutations.
///
/// Every operation runs the same three stages, strictly in order: mutate
/// the model, persist through the adapter (when one is configured and
/// auto-save is on), notify the watcher. A failed stage short-circuits
/// the rest; completed stages are never undone. When the adapter rejects
/// a mutation (or lacks an optional batch capability) after the model
/// has already mutated, the caller receives `false` while the in-memory
/// model runs ahead of durable storage. Callers that need the two to
/// agree must reload the model from the adapter.
///
/// The watcher is notified only after a successful persistence stage and
/// its outcome is ignored; when persistence is skipped (auto-save off,
/// no adapter) no notification is sent.
///
/// The coordinator holds shared references to its collaborators and owns
/// none of their lifecycles. It provides no serialization across
/// concurrent calls beyond the model lock, which is held only while the
/// model mutates; the three stages are not atomic as a unit. Dropping an
/// operation future while it is suspended at the adapter call leaves the
/// model mutated but not persisted.
pub struct MutationCoordinator {
    model: Arc<RwLock<PolicyModel>>,
    adapter: Option<Arc<dyn Adapter>>,
    capabilities: AdapterCapabilities,
    watcher: Option<Arc<dyn Watcher>>,
    auto_save: bool,
}

impl MutationCoordinator {
    /// Create a coordinator with no adapter and no watcher. Auto-save is
    /// on; it has no effect until an adapter is registered.
    pub fn new(model: Arc<RwLock<PolicyModel>>) -> Self {
        CoordinatorBuilder::new(model).build()
    }

    /// The shared policy model.
    pub fn model(&self) -> Arc<RwLock<PolicyModel>> {
        Arc::clone(&self.model)
    }

    /// Whether mutations are persisted through the adapter.
    pub fn auto_save(&self) -> bool {
        self.auto_save
    }

    /// Toggle persistence. When off, the persistence and notification
    /// stages are skipped and the model outcome alone determines the
    /// result.
    pub fn set_auto_save(&mut self, enabled: bool) {
        self.auto_save = enabled;
    }

    /// Register or clear the storage adapter, re-capturing its
    /// capability table.
    pub fn set_adapter(&mut self, adapter: Option<Arc<dyn Adapter>>) {
        self.capabilities = adapter
            .as_deref()
            .map(|a| a.capabilities())
            .unwrap_or_default();
        self.adapter = adapter;
    }

    /// Register or clear the change-notification watcher.
    pub fn set_watcher(&mut self, watcher: Option<Arc<dyn Watcher>>) {
        self.watcher = watcher;
    }

    /// The capability table captured from the registered adapter.
    pub fn adapter_capabilities(&self) -> AdapterCapabilities {
        self.capabilities
    }

    /// Add one rule. Returns `false` if the rule is already present or
    /// persistence fails.
    pub async fn add_rule(&self, sec: &str, ptype: &str, rule: Rule) -> CoordinatorResult<bool> {
        let added = self.model.write().await.add_policy(sec, ptype, rule.clone());
        if !added {
            debug!(sec, ptype, %rule, "rule already present, model unchanged");
            return Ok(false);
        }

        if let Some(adapter) = self.persist_target() {
            if !adapter.add_policy(sec, ptype, &rule).await? {
                warn!(sec, ptype, %rule, "adapter rejected rule add, model is ahead of storage");
                return Ok(false);
            }
            self.notify();
        }

        Ok(true)
    }

    /// Add a batch of rules, all or nothing in the model. Returns
    /// `false` if any rule in the batch is already present, if the
    /// adapter lacks the batch add capability, or if persistence fails.
    pub async fn add_rules(
        &self,
        sec: &str,
        ptype: &str,
        rules: Vec<Rule>,
    ) -> CoordinatorResult<bool> {
        let added = self.model.write().await.add_policies(sec, ptype, &rules);
        if !added {
            debug!(sec, ptype, "rule batch rejected, model unchanged");
            return Ok(false);
        }

        if let Some(adapter) = self.persist_target() {
            if !self.capabilities.batch_add {
                warn!(
                    sec,
                    ptype, "adapter lacks the batch add capability, model is ahead of storage"
                );
                return Ok(false);
            }
            if !adapter.add_policies(sec, ptype, &rules).await? {
                warn!(sec, ptype, "adapter rejected rule batch, model is ahead of storage");
                return Ok(false);
            }
            self.notify();
        }

        Ok(true)
    }

    /// Replace one rule in place. Returns `false` if `old_rule` is
    /// absent or persistence fails.
    pub async fn update_rule(
        &self,
        sec: &str,
        ptype: &str,
        old_rule: Rule,
        new_rule: Rule,
    ) -> CoordinatorResult<bool> {
        let updated = self
            .model
            .write()
            .await
            .update_policy(sec, ptype, &old_rule, &new_rule);
        if !updated {
            debug!(sec, ptype, %old_rule, "rule update rejected, model unchanged");
            return Ok(false);
        }

        if let Some(adapter) = self.persist_target() {
            if !adapter
                .update_policy(sec, ptype, &old_rule, &new_rule)
                .await?
            {
                warn!(sec, ptype, %old_rule, "adapter rejected rule update, model is ahead of storage");
                return Ok(false);
            }
            self.notify();
        }

        Ok(true)
    }

    /// Replace a batch of rules over parallel sequences, all or nothing
    /// in the model.
    ///
    /// Unlike batch add and batch remove, batch update is not
    /// capability-gated: every adapter is expected to implement
    /// `update_policies`.
    pub async fn update_rules(
        &self,
        sec: &str,
        ptype: &str,
        old_rules: Vec<Rule>,
        new_rules: Vec<Rule>,
    ) -> CoordinatorResult<bool> {
        let updated = self
            .model
            .write()
            .await
            .update_policies(sec, ptype, &old_rules, &new_rules);
        if !updated {
            debug!(sec, ptype, "rule batch update rejected, model unchanged");
            return Ok(false);
        }

        if let Some(adapter) = self.persist_target() {
            if !adapter
                .update_policies(sec, ptype, &old_rules, &new_rules)
                .await?
            {
                warn!(
                    sec,
                    ptype, "adapter rejected rule batch update, model is ahead of storage"
                );
                return Ok(false);
            }
            self.notify();
        }

        Ok(true)
    }

    /// Remove one rule. Returns `false` if the rule is absent or
    /// persistence fails.
    pub async fn remove_rule(&self, sec: &str, ptype: &str, rule: Rule) -> CoordinatorResult<bool> {
        let removed = self.model.write().await.remove_policy(sec, ptype, &rule);
        if !removed {
            debug!(sec, ptype, %rule, "rule absent, model unchanged");
            return Ok(false);
        }

        if let Some(adapter) = self.persist_target() {
            if !adapter.remove_policy(sec, ptype, &rule).await? {
                warn!(sec, ptype, %rule, "adapter rejected rule removal, model is ahead of storage");
                return Ok(false);
            }
            self.notify();
        }

        Ok(true)
    }

    /// Remove a batch of rules, all or nothing in the model. Returns
    /// `false` if any rule is absent, if the adapter lacks the batch
    /// remove capability, or if persistence fails.
    pub async fn remove_rules(
        &self,
        sec: &str,
        ptype: &str,
        rules: Vec<Rule>,
    ) -> CoordinatorResult<bool> {
        let removed = self.model.write().await.remove_policies(sec, ptype, &rules);
        if !removed {
            debug!(sec, ptype, "rule batch removal rejected, model unchanged");
            return Ok(false);
        }

        if let Some(adapter) = self.persist_target() {
            if !self.capabilities.batch_remove {
                warn!(
                    sec,
                    ptype, "adapter lacks the batch remove capability, model is ahead of storage"
                );
                return Ok(false);
            }
            if !adapter.remove_policies(sec, ptype, &rules).await? {
                warn!(
                    sec,
                    ptype, "adapter rejected rule batch removal, model is ahead of storage"
                );
                return Ok(false);
            }
            self.notify();
        }

        Ok(true)
    }

    /// Remove every rule matching a positional filter. Returns `true`
    /// iff at least one rule was removed and persistence, when
    /// attempted, succeeded. An empty filter value matches any field at
    /// its position.
    pub async fn remove_filtered_rule(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: Vec<String>,
    ) -> CoordinatorResult<bool> {
        let removed = self.model.write().await.remove_filtered_policy(
            sec,
            ptype,
            field_index,
            &field_values,
        );
        if !removed {
            debug!(sec, ptype, field_index, "no rule matched the filter");
            return Ok(false);
        }

        if let Some(adapter) = self.persist_target() {
            if !adapter
                .remove_filtered_policy(sec, ptype, field_index, &field_values)
                .await?
            {
                warn!(
                    sec,
                    ptype, field_index, "adapter rejected filtered removal, model is ahead of storage"
                );
                return Ok(false);
            }
            self.notify();
        }

        Ok(true)
    }

    /// Remove every rule matching a positional filter and report the
    /// removed rules in their original relative order.
    ///
    /// An empty result means either that no rule matched or that
    /// persistence failed after the model had already dropped the
    /// matching rules; the two are not distinguished here.
    pub async fn remove_filtered_rule_returning_effects(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: Vec<String>,
    ) -> CoordinatorResult<Vec<Rule>> {
        let removed = self.model.write().await.remove_filtered_policy_returns_effects(
            sec,
            ptype,
            field_index,
            &field_values,
        );
        if removed.is_empty() {
            debug!(sec, ptype, field_index, "no rule matched the filter");
            return Ok(removed);
        }

        if let Some(adapter) = self.persist_target() {
            if !adapter
                .remove_filtered_policy(sec, ptype, field_index, &field_values)
                .await?
            {
                warn!(
                    sec,
                    ptype, field_index, "adapter rejected filtered removal, model is ahead of storage"
                );
                return Ok(Vec::new());
            }
            self.notify();
        }

        Ok(removed)
    }

    /// The adapter to persist through, when persistence applies.
    fn persist_target(&self) -> Option<&Arc<dyn Adapter>> {
        if self.auto_save {
            self.adapter.as_ref()
        } else {
            None
        }
    }

    /// Best-effort change notification. The outcome is ignored.
    fn notify(&self) {
        if let Some(watcher) = &self.watcher {
            watcher.update();
        }
    }
}

/// Builder for [`MutationCoordinator`].
pub struct CoordinatorBuilder {
    model: Arc<RwLock<PolicyModel>>,
    adapter: Option<Arc<dyn Adapter>>,
    watcher: Option<Arc<dyn Watcher>>,
    auto_save: bool,
}

impl CoordinatorBuilder {
    /// Start from a shared policy model. Auto-save defaults to on.
    pub fn new(model: Arc<RwLock<PolicyModel>>) -> Self {
        Self {
            model,
            adapter: None,
            watcher: None,
            auto_save: true,
        }
    }

    /// Register a storage adapter.
    pub fn with_adapter(mut self, adapter: Arc<dyn Adapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    /// Register a change-notification watcher.
    pub fn with_watcher(mut self, watcher: Arc<dyn Watcher>) -> Self {
        self.watcher = Some(watcher);
        self
    }

    /// Set the persistence flag.
    pub fn with_auto_save(mut self, enabled: bool) -> Self {
        self.auto_save = enabled;
        self
    }

    /// Build the coordinator, capturing the adapter's capability table.
    pub fn build(self) -> MutationCoordinator {
        let capabilities = self
            .adapter
            .as_deref()
            .map(|a| a.capabilities())
            .unwrap_or_default();
        MutationCoordinator {
            model: self.model,
            adapter: self.adapter,
            capabilities,
            watcher: self.watcher,
            auto_save: self.auto_save,
        }
    }
}
