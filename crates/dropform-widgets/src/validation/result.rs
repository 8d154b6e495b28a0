#![forbid(unsafe_code)]

//! Per-form validation outcome.

use std::collections::BTreeMap;

/// Field name to error message.
///
/// A missing entry or an empty message both mean the field is valid, so a
/// ruleset may report every field and leave the valid ones blank.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    messages: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.set(name, message);
        self
    }

    /// Record `message` for `name`, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(name.into(), message.into());
    }

    /// Drop the entry for `name`. Returns true if a non-empty message was removed.
    pub fn clear(&mut self, name: &str) -> bool {
        self.messages.remove(name).is_some_and(|m| !m.is_empty())
    }

    /// The message for `name`, if it has a non-empty one.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.messages
            .get(name)
            .map(String::as_str)
            .filter(|m| !m.is_empty())
    }

    /// Keep only the entries for which `keep(name, message)` is true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &str) -> bool) {
        self.messages
            .retain(|name, message| keep(name.as_str(), message.as_str()));
    }

    pub fn has_error(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// True when no field carries a non-empty message.
    pub fn is_valid(&self) -> bool {
        self.messages.values().all(String::is_empty)
    }

    /// Fields with non-empty messages, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages
            .iter()
            .filter(|(_, m)| !m.is_empty())
            .map(|(n, m)| (n.as_str(), m.as_str()))
    }

    /// Number of fields with non-empty messages.
    pub fn error_count(&self) -> usize {
        self.iter().count()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut result = Self::new();
        for (k, v) in iter {
            result.set(k, v);
        }
        result
    }
}
