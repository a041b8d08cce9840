//! Merge and replace strategies for configuration values.
//!
//! Four strategies are exposed, and they differ only in two decisions: whether
//! nested mappings are combined recursively, and whether two sequences are
//! concatenated or the newer one replaces the older.
//!
//! | strategy           | nested mappings | sequences   |
//! |--------------------|-----------------|-------------|
//! | `Merge`            | overwritten     | concatenated|
//! | `MergeRecursive`   | recursed        | concatenated|
//! | `Replace`          | overwritten     | replaced    |
//! | `ReplaceRecursive` | recursed        | replaced    |
//!
//! Scalars always take the newer value, including an explicit null.

use super::ConfigTree;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How two values are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeStrategy {
    /// Top-level keys overwrite; sequences concatenate.
    Merge,
    /// Mappings merge recursively; sequences concatenate.
    MergeRecursive,
    /// Top-level keys overwrite; sequences are replaced.
    Replace,
    /// Mappings merge recursively; everything else is replaced.
    #[default]
    ReplaceRecursive,
}

impl MergeStrategy {
    /// Combine `base` with `overlay`, with `overlay` taking precedence.
    pub fn apply(self, base: Value, overlay: Value) -> Value {
        match self {
            MergeStrategy::Merge => shallow(base, overlay, true),
            MergeStrategy::MergeRecursive => deep_merge(base, overlay),
            MergeStrategy::Replace => shallow(base, overlay, false),
            MergeStrategy::ReplaceRecursive => deep_replace(base, overlay),
        }
    }

    /// Combine two trees. The result is always a tree.
    pub fn apply_tree(self, base: ConfigTree, overlay: ConfigTree) -> ConfigTree {
        match self.apply(Value::Object(base), Value::Object(overlay)) {
            Value::Object(map) => map,
            // mapping + mapping never yields anything else
            _ => ConfigTree::new(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MergeStrategy::Merge => "merge",
            MergeStrategy::MergeRecursive => "mergeRecursive",
            MergeStrategy::Replace => "replace",
            MergeStrategy::ReplaceRecursive => "replaceRecursive",
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MergeStrategy {
    type Err = ConfigError;

    /// Accepts `mergeRecursive`, `merge_recursive` and `merge-recursive` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "merge" => Ok(MergeStrategy::Merge),
            "mergerecursive" => Ok(MergeStrategy::MergeRecursive),
            "replace" => Ok(MergeStrategy::Replace),
            "replacerecursive" => Ok(MergeStrategy::ReplaceRecursive),
            _ => Err(ConfigError::UnsupportedStrategy(s.to_string())),
        }
    }
}

/// Deep replace two values, with `overlay` taking precedence over `base`.
///
/// - Mappings are merged recursively: keys in overlay override keys in base
/// - Sequences, strings, numbers, booleans and nulls are replaced entirely
///
/// This is the rule `load` uses to fold new data and imports into a tree.
///
/// # Example
/// ```
/// use serde_json::json;
/// use config_store::tree::deep_replace;
///
/// let base = json!({
///     "server": { "port": 8080, "host": "localhost" },
///     "features": ["a", "b"]
/// });
/// let overlay = json!({
///     "server": { "port": 9000 },
///     "features": ["c"]
/// });
/// let result = deep_replace(base, overlay);
/// assert_eq!(result, json!({
///     "server": { "port": 9000, "host": "localhost" },
///     "features": ["c"]
/// }));
/// ```
pub fn deep_replace(base: Value, overlay: Value) -> Value {
    deep(base, overlay, false)
}

/// Deep merge two values: like [`deep_replace`], but two sequences meeting at
/// the same key are concatenated, overlay elements last.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    deep(base, overlay, true)
}

fn deep(base: Value, overlay: Value, concat: bool) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                // merge in place so the base key keeps its position
                match base_map.get_mut(&key) {
                    Some(slot) => {
                        let base_value = slot.take();
                        *slot = deep(base_value, overlay_value, concat);
                    }
                    None => {
                        base_map.insert(key, overlay_value);
                    }
                }
            }
            Value::Object(base_map)
        }
        (Value::Array(mut base_items), Value::Array(overlay_items)) if concat => {
            base_items.extend(overlay_items);
            Value::Array(base_items)
        }
        (_, overlay) => overlay,
    }
}

fn shallow(base: Value, overlay: Value, concat: bool) -> Value {
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                base_map.insert(key, overlay_value);
            }
            Value::Object(base_map)
        }
        (Value::Array(mut base_items), Value::Array(overlay_items)) if concat => {
            base_items.extend(overlay_items);
            Value::Array(base_items)
        }
        (_, overlay) => overlay,
    }
}
