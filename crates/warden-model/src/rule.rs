use serde::{Deserialize, Serialize};
use std::fmt;

/// One policy line: an ordered, fixed-arity sequence of string fields
/// (e.g. subject, object, action). Rules are plain values compared by
/// full-field equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rule(Vec<String>);

impl Rule {
    /// Build a rule from its fields, in order.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    /// The rule's fields in order.
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Number of fields in this rule.
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    /// Whether this rule matches a positional filter.
    ///
    /// Every supplied value at position `field_index + i` must equal the
    /// field at that position. An empty value places no constraint on its
    /// position; a non-empty value past the rule's arity never matches.
    pub fn matches_filter(&self, field_index: usize, field_values: &[String]) -> bool {
        field_values.iter().enumerate().all(|(i, value)| {
            value.is_empty() || self.0.get(field_index + i) == Some(value)
        })
    }
}

impl From<Vec<String>> for Rule {
    fn from(fields: Vec<String>) -> Self {
        Self(fields)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_matches_filter_from_start() {
        let rule = Rule::new(["alice", "data1", "read"]);
        assert!(rule.matches_filter(0, &values(&["alice"])));
        assert!(rule.matches_filter(0, &values(&["alice", "data1", "read"])));
        assert!(!rule.matches_filter(0, &values(&["bob"])));
    }

    #[test]
    fn test_matches_filter_with_offset() {
        let rule = Rule::new(["alice", "data1", "read"]);
        assert!(rule.matches_filter(1, &values(&["data1"])));
        assert!(rule.matches_filter(2, &values(&["read"])));
        assert!(!rule.matches_filter(1, &values(&["read"])));
    }

    #[test]
    fn test_empty_value_is_wildcard() {
        let rule = Rule::new(["alice", "data1", "read"]);
        assert!(rule.matches_filter(0, &values(&["", "data1"])));
        assert!(rule.matches_filter(0, &values(&["", "", ""])));
        assert!(!rule.matches_filter(0, &values(&["", "data2"])));
    }

    #[test]
    fn test_values_past_arity_do_not_match() {
        let rule = Rule::new(["alice", "data1"]);
        assert!(!rule.matches_filter(1, &values(&["data1", "read"])));
        assert!(rule.matches_filter(1, &values(&["data1", ""])));
    }

    #[test]
    fn test_display_joins_fields() {
        let rule = Rule::new(["alice", "data1", "read"]);
        assert_eq!(rule.to_string(), "alice, data1, read");
    }
}
