//! Dotted-path access into a [`ConfigTree`].
//!
//! A path such as `user.profile.age` is split on the separator into keys and
//! resolved one mapping at a time. Lookups short-circuit on the first key that
//! is missing or whose parent is not a mapping.

use super::ConfigTree;
use serde_json::{Map, Value};

/// Split `path` into keys. An empty separator yields the whole path as one key.
fn keys<'a>(path: &'a str, separator: &'a str) -> Vec<&'a str> {
    if separator.is_empty() {
        vec![path]
    } else {
        path.split(separator).collect()
    }
}

/// Look up the value at `path`, or `None` if any key along the way is missing.
pub fn get<'t>(tree: &'t ConfigTree, path: &str, separator: &str) -> Option<&'t Value> {
    let keys = keys(path, separator);
    let (last, parents) = keys.split_last()?;

    let mut current = tree;
    for key in parents {
        current = current.get(*key)?.as_object()?;
    }
    current.get(*last)
}

/// Whether every key along `path` resolves.
pub fn has(tree: &ConfigTree, path: &str, separator: &str) -> bool {
    get(tree, path, separator).is_some()
}

/// Assign `value` at `path`, creating intermediate mappings as needed.
///
/// An intermediate value that exists but is not a mapping is overwritten with
/// an empty mapping, not merged.
pub fn set(tree: &mut ConfigTree, path: &str, value: Value, separator: &str) {
    let keys = keys(path, separator);
    let Some((last, parents)) = keys.split_last() else {
        return;
    };

    let mut current = tree;
    for key in parents {
        let slot = current
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        current = map;
    }
    current.insert(last.to_string(), value);
}
