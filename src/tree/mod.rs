//! Pure operations over configuration trees.
//!
//! A configuration tree is always a mapping at its root. Values below the root
//! are plain [`serde_json::Value`]s: scalars, nested mappings or sequences.
//!
//! - [`path`]: dotted-path lookup and assignment
//! - [`merge`]: merge / replace strategies, shallow and recursive
//! - [`template`]: literal placeholder substitution

pub mod merge;
pub mod path;
pub mod template;

use serde_json::{Map, Value};

/// A configuration tree: string keys in insertion order.
pub type ConfigTree = Map<String, Value>;

/// Default path separator.
pub const DEFAULT_SEPARATOR: &str = ".";

pub use merge::{MergeStrategy, deep_merge, deep_replace};
pub use template::substitute;
