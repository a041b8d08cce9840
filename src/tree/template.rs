//! Template variable substitution.
//!
//! Placeholders are plain substrings (`%my_email%`), not a templating grammar:
//! every occurrence of every key is replaced in one pass, and replacement text
//! is never scanned again. When two keys match at the same position the longer
//! one wins.

use super::ConfigTree;
use crate::error::{ConfigError, Result};
use regex_lite::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

/// A compiled placeholder mapping.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    pattern: Option<Regex>,
    replacements: HashMap<String, String>,
}

impl Placeholders {
    /// Compile a placeholder -> replacement mapping.
    ///
    /// Empty keys are ignored. Non-string replacements are rendered as their
    /// JSON text; null renders as the empty string.
    pub fn new(variables: &ConfigTree) -> Result<Self> {
        let replacements: HashMap<String, String> = variables
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.clone(), render(value)))
            .collect();

        if replacements.is_empty() {
            return Ok(Self::default());
        }

        let mut keys: Vec<&String> = replacements.keys().collect();
        keys.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = keys
            .iter()
            .map(|key| regex_lite::escape(key))
            .collect::<Vec<_>>()
            .join("|");

        let pattern = Regex::new(&alternation).map_err(|e| {
            ConfigError::configuration(format!("invalid template variables: {e}"))
        })?;

        Ok(Self {
            pattern: Some(pattern),
            replacements,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_none()
    }

    /// Substitute placeholders in a single string.
    pub fn replace_str(&self, input: &str) -> String {
        match &self.pattern {
            Some(pattern) => pattern
                .replace_all(input, |caps: &Captures<'_>| {
                    self.replacements
                        .get(&caps[0])
                        .cloned()
                        .unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned(),
            None => input.to_string(),
        }
    }

    /// Substitute placeholders in every string leaf of `value`.
    pub fn apply(&self, value: Value) -> Value {
        if self.is_empty() {
            return value;
        }
        match value {
            Value::String(s) => Value::String(self.replace_str(&s)),
            Value::Array(items) => Value::Array(items.into_iter().map(|v| self.apply(v)).collect()),
            Value::Object(map) => Value::Object(self.apply_tree(map)),
            other => other,
        }
    }

    /// Substitute placeholders in every string leaf of a tree. Keys are left alone.
    pub fn apply_tree(&self, tree: ConfigTree) -> ConfigTree {
        if self.is_empty() {
            return tree;
        }
        tree.into_iter()
            .map(|(key, value)| (key, self.apply(value)))
            .collect()
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// One-shot substitution: compile `placeholders` and apply them to `value`.
pub fn substitute(value: Value, placeholders: &ConfigTree) -> Result<Value> {
    Ok(Placeholders::new(placeholders)?.apply(value))
}
