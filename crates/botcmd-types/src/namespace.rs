//! Parsed argument values keyed by argument id.

use std::collections::BTreeMap;

use serde::Serialize;

/// A value the argument parser produced for one argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParsedValue {
    /// Boolean switch (`--silent`).
    Flag(bool),
    /// Occurrence counter (`-vvv`).
    Count(u8),
    /// One or more string values, in the order they were given.
    Values(Vec<ArgValue>),
}

/// A single parsed string value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgValue {
    pub value: String,
    /// Index of the token the value came from, when it could be located.
    /// Default values have no source token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<usize>,
}

impl ArgValue {
    pub fn new(value: impl Into<String>, token: Option<usize>) -> Self {
        Self {
            value: value.into(),
            token,
        }
    }
}

/// Mapping from argument id to parsed value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Namespace {
    values: BTreeMap<String, ParsedValue>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, value: ParsedValue) {
        self.values.insert(id.into(), value);
    }

    pub fn get(&self, id: &str) -> Option<&ParsedValue> {
        self.values.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.values.contains_key(id)
    }

    /// `true` only for a flag that is set.
    pub fn flag(&self, id: &str) -> bool {
        matches!(self.values.get(id), Some(ParsedValue::Flag(true)))
    }

    /// Counter value, `0` when absent.
    pub fn count(&self, id: &str) -> u8 {
        match self.values.get(id) {
            Some(ParsedValue::Count(n)) => *n,
            _ => 0,
        }
    }

    /// First value of a value-taking argument.
    pub fn one(&self, id: &str) -> Option<&ArgValue> {
        self.many(id).first()
    }

    /// All values of a value-taking argument; empty when absent.
    pub fn many(&self, id: &str) -> &[ArgValue] {
        match self.values.get(id) {
            Some(ParsedValue::Values(values)) => values,
            _ => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParsedValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Namespace {
        let mut ns = Namespace::new();
        ns.insert("silent", ParsedValue::Flag(true));
        ns.insert("verbose", ParsedValue::Count(2));
        ns.insert(
            "user",
            ParsedValue::Values(vec![ArgValue::new("123", Some(0))]),
        );
        ns
    }

    #[test]
    fn test_typed_accessors() {
        let ns = sample();
        assert!(ns.flag("silent"));
        assert_eq!(ns.count("verbose"), 2);
        assert_eq!(ns.one("user").unwrap().value, "123");
        assert_eq!(ns.one("user").unwrap().token, Some(0));
        assert_eq!(ns.len(), 3);
    }

    #[test]
    fn test_accessors_tolerate_missing_or_mismatched_ids() {
        let ns = sample();
        assert!(!ns.flag("user"));
        assert!(!ns.flag("missing"));
        assert_eq!(ns.count("silent"), 0);
        assert!(ns.many("silent").is_empty());
        assert!(ns.one("missing").is_none());
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["silent"]["type"], "flag");
        assert_eq!(json["user"]["value"][0]["value"], "123");
    }
}
