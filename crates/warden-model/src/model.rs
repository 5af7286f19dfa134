use crate::rule::Rule;
use std::collections::HashMap;

/// An ordered set of unique rules for one `(sec, ptype)` address.
///
/// Insertion order is preserved. Duplicate values are rejected at
/// insertion; a rejected mutation leaves the set untouched.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn contains(&self, rule: &Rule) -> bool {
        self.rules.contains(rule)
    }

    /// The rules in insertion order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Append a rule. Returns `false` if an identical rule is already
    /// present.
    pub fn add(&mut self, rule: Rule) -> bool {
        if self.contains(&rule) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Append a batch of rules, all or nothing. Returns `false` if any
    /// incoming rule is already present or the batch repeats a rule.
    pub fn add_all(&mut self, rules: &[Rule]) -> bool {
        for (i, rule) in rules.iter().enumerate() {
            if self.contains(rule) || rules[..i].contains(rule) {
                return false;
            }
        }
        self.rules.extend_from_slice(rules);
        true
    }

    /// Replace `old` with `new` in place, preserving its position.
    /// Returns `false` if `old` is absent, or if `new` is a distinct rule
    /// that is already present.
    pub fn update(&mut self, old: &Rule, new: &Rule) -> bool {
        let Some(position) = self.rules.iter().position(|r| r == old) else {
            return false;
        };
        if new != old && self.contains(new) {
            return false;
        }
        self.rules[position] = new.clone();
        true
    }

    /// Replace a batch of rules, all or nothing, over parallel slices.
    pub fn update_all(&mut self, old_rules: &[Rule], new_rules: &[Rule]) -> bool {
        if old_rules.len() != new_rules.len() {
            return false;
        }
        let mut positions = Vec::with_capacity(old_rules.len());
        for old in old_rules {
            match self.rules.iter().position(|r| r == old) {
                Some(position) => positions.push(position),
                None => return false,
            }
        }
        for new in new_rules {
            if self.contains(new) && !old_rules.contains(new) {
                return false;
            }
        }
        for (position, new) in positions.into_iter().zip(new_rules) {
            self.rules[position] = new.clone();
        }
        true
    }

    /// Remove a rule. Returns `false` if it is absent.
    pub fn remove(&mut self, rule: &Rule) -> bool {
        match self.rules.iter().position(|r| r == rule) {
            Some(position) => {
                self.rules.remove(position);
                true
            }
            None => false,
        }
    }

    /// Remove a batch of rules, all or nothing. Returns `false` if any
    /// rule is absent.
    pub fn remove_all(&mut self, rules: &[Rule]) -> bool {
        if !rules.iter().all(|rule| self.contains(rule)) {
            return false;
        }
        self.rules.retain(|rule| !rules.contains(rule));
        true
    }

    /// Remove every rule matching a positional filter, returning the
    /// removed rules in their original relative order.
    pub fn remove_filtered(&mut self, field_index: usize, field_values: &[String]) -> Vec<Rule> {
        let mut removed = Vec::new();
        self.rules.retain(|rule| {
            if rule.matches_filter(field_index, field_values) {
                removed.push(rule.clone());
                false
            } else {
                true
            }
        });
        removed
    }
}

/// Canonical in-memory policy storage.
///
/// Rule sets are addressed by a section key (`"p"` policy rules, `"g"`
/// role-grouping rules) and a policy type key selecting one rule list
/// within the section (`"p"`, `"p2"`, ...). Sets are created lazily on
/// first insertion.
#[derive(Debug, Clone, Default)]
pub struct PolicyModel {
    sections: HashMap<String, HashMap<String, RuleSet>>,
}

impl PolicyModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn rule_set(&self, sec: &str, ptype: &str) -> Option<&RuleSet> {
        self.sections.get(sec).and_then(|ptypes| ptypes.get(ptype))
    }

    fn rule_set_mut(&mut self, sec: &str, ptype: &str) -> Option<&mut RuleSet> {
        self.sections
            .get_mut(sec)
            .and_then(|ptypes| ptypes.get_mut(ptype))
    }

    fn rule_set_entry(&mut self, sec: &str, ptype: &str) -> &mut RuleSet {
        self.sections
            .entry(sec.to_string())
            .or_default()
            .entry(ptype.to_string())
            .or_default()
    }

    /// Add a rule. Returns `false` if an identical rule is already present.
    pub fn add_policy(&mut self, sec: &str, ptype: &str, rule: Rule) -> bool {
        self.rule_set_entry(sec, ptype).add(rule)
    }

    /// Add a batch of rules, all or nothing.
    pub fn add_policies(&mut self, sec: &str, ptype: &str, rules: &[Rule]) -> bool {
        self.rule_set_entry(sec, ptype).add_all(rules)
    }

    /// Replace `old_rule` with `new_rule` in place.
    pub fn update_policy(&mut self, sec: &str, ptype: &str, old_rule: &Rule, new_rule: &Rule) -> bool {
        self.rule_set_mut(sec, ptype)
            .is_some_and(|set| set.update(old_rule, new_rule))
    }

    /// Replace a batch of rules, all or nothing, over parallel slices.
    pub fn update_policies(
        &mut self,
        sec: &str,
        ptype: &str,
        old_rules: &[Rule],
        new_rules: &[Rule],
    ) -> bool {
        self.rule_set_mut(sec, ptype)
            .is_some_and(|set| set.update_all(old_rules, new_rules))
    }

    /// Remove a rule. Returns `false` if it is absent.
    pub fn remove_policy(&mut self, sec: &str, ptype: &str, rule: &Rule) -> bool {
        self.rule_set_mut(sec, ptype)
            .is_some_and(|set| set.remove(rule))
    }

    /// Remove a batch of rules, all or nothing.
    pub fn remove_policies(&mut self, sec: &str, ptype: &str, rules: &[Rule]) -> bool {
        self.rule_set_mut(sec, ptype)
            .is_some_and(|set| set.remove_all(rules))
    }

    /// Remove every rule matching a positional filter. Returns `true` iff
    /// at least one rule was removed.
    pub fn remove_filtered_policy(
        &mut self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> bool {
        !self
            .remove_filtered_policy_returns_effects(sec, ptype, field_index, field_values)
            .is_empty()
    }

    /// Remove every rule matching a positional filter, returning the
    /// removed rules in their original relative order.
    pub fn remove_filtered_policy_returns_effects(
        &mut self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> Vec<Rule> {
        self.rule_set_mut(sec, ptype)
            .map(|set| set.remove_filtered(field_index, field_values))
            .unwrap_or_default()
    }

    /// All rules for one `(sec, ptype)` address, in insertion order.
    pub fn get_policy(&self, sec: &str, ptype: &str) -> Vec<Rule> {
        self.rule_set(sec, ptype)
            .map(|set| set.rules().to_vec())
            .unwrap_or_default()
    }

    /// The rules matching a positional filter, without removing them.
    pub fn get_filtered_policy(
        &self,
        sec: &str,
        ptype: &str,
        field_index: usize,
        field_values: &[String],
    ) -> Vec<Rule> {
        self.rule_set(sec, ptype)
            .map(|set| {
                set.rules()
                    .iter()
                    .filter(|rule| rule.matches_filter(field_index, field_values))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_policy(&self, sec: &str, ptype: &str, rule: &Rule) -> bool {
        self.rule_set(sec, ptype)
            .is_some_and(|set| set.contains(rule))
    }

    /// Number of rules stored at one `(sec, ptype)` address.
    pub fn rule_count(&self, sec: &str, ptype: &str) -> usize {
        self.rule_set(sec, ptype).map_or(0, RuleSet::len)
    }

    /// Every `(sec, ptype)` address currently holding a rule set.
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections.iter().flat_map(|(sec, ptypes)| {
            ptypes.keys().map(move |ptype| (sec.as_str(), ptype.as_str()))
        })
    }
}
