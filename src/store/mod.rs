//! The configuration store.
//!
//! A [`ConfigStore`] owns one configuration tree together with the reader and
//! writer it loads and saves through. Every option update re-resolves both the
//! reader and the writer, so a store is never left without either.
//!
//! ## Example
//! ```
//! use config_store::{ConfigStore, LoadOptions, StoreOptions};
//! use serde_json::json;
//!
//! let mut store = ConfigStore::new(Default::default(), StoreOptions::in_memory()).unwrap();
//! store.set("x.y.z", 5).unwrap();
//! assert_eq!(store.get("x.y.z"), Some(&json!(5)));
//! assert_eq!(store.get_or("x.y.w", "none"), json!("none"));
//!
//! store
//!     .load(LoadOptions::new().with_data(json!({"user": {"name": "Bo"}})).load_in_key("cfg"))
//!     .unwrap();
//! assert_eq!(store.get("cfg.user.name"), Some(&json!("Bo")));
//! ```

mod load;
mod options;

pub use options::{
    AfterLoadHook, BeforeSaveHook, LoadOptions, PathOptions, ReaderSpec, SaveOptions,
    StoreOptions, WriterSpec,
};

use crate::error::{ConfigError, Result};
use crate::reader::{FileReader, InMemoryReader, Reader};
use crate::tree::template::Placeholders;
use crate::tree::{ConfigTree, MergeStrategy, path};
use crate::writer::{FileWriter, InMemoryWriter, Writer};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// An in-memory configuration tree with pluggable persistence.
pub struct ConfigStore {
    data: ConfigTree,
    options: StoreOptions,
    placeholders: Placeholders,
    reader: Arc<dyn Reader>,
    writer: Arc<dyn Writer>,
    read_only: bool,
}

impl fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigStore")
            .field("data", &self.data)
            .field("options", &self.options)
            .field("read_only", &self.read_only)
            .finish_non_exhaustive()
    }
}

fn resolve_reader(spec: &ReaderSpec) -> Result<Arc<dyn Reader>> {
    match spec {
        ReaderSpec::Tag(tag) => match tag.as_str() {
            "array" => Ok(Arc::new(InMemoryReader::new())),
            "file" => Ok(Arc::new(FileReader::new())),
            other => Err(ConfigError::invalid_argument(format!(
                "Invalid reader \"{other}\". Valid reader strings: array, file."
            ))),
        },
        ReaderSpec::Custom(reader) => Ok(Arc::clone(reader)),
    }
}

fn resolve_writer(spec: &WriterSpec) -> Result<Arc<dyn Writer>> {
    match spec {
        WriterSpec::Tag(tag) => match tag.as_str() {
            "array" => Ok(Arc::new(InMemoryWriter::new())),
            "file" => Ok(Arc::new(FileWriter::new())),
            other => Err(ConfigError::invalid_argument(format!(
                "Invalid writer \"{other}\". Valid writer strings: array, file."
            ))),
        },
        WriterSpec::Custom(writer) => Ok(Arc::clone(writer)),
    }
}

impl ConfigStore {
    /// Create a store holding `data`, with template variables substituted.
    pub fn new(data: ConfigTree, options: StoreOptions) -> Result<Self> {
        let mut store = Self {
            data: ConfigTree::new(),
            options: StoreOptions::default(),
            placeholders: Placeholders::default(),
            reader: Arc::new(InMemoryReader::new()),
            writer: Arc::new(InMemoryWriter::new()),
            read_only: false,
        };
        store.set_options(options)?;
        store.set_data(data, true)?;
        Ok(store)
    }

    /// Create a store from any JSON-like value; the value must be a mapping.
    pub fn from_value(data: Value, options: StoreOptions) -> Result<Self> {
        match data {
            Value::Object(map) => Self::new(map, options),
            Value::Null => Self::new(ConfigTree::new(), options),
            _ => Err(ConfigError::invalid_argument(
                "Configuration data must be a mapping.",
            )),
        }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Replace the store options, re-resolving the reader, writer and template
    /// variables. On error the previous options stay in effect.
    pub fn set_options(&mut self, options: StoreOptions) -> Result<&mut Self> {
        let reader = resolve_reader(&options.reader)?;
        let writer = resolve_writer(&options.writer)?;
        let placeholders = Placeholders::new(&options.template_variables)?;

        debug!(reader = ?options.reader, writer = ?options.writer, "configuring store");
        self.reader = reader;
        self.writer = writer;
        self.placeholders = placeholders;
        self.options = options;
        Ok(self)
    }

    pub fn reader(&self) -> &dyn Reader {
        self.reader.as_ref()
    }

    /// Use `reader` until the next option update.
    pub fn set_reader(&mut self, reader: impl Reader + 'static) -> &mut Self {
        self.reader = Arc::new(reader);
        self
    }

    pub fn writer(&self) -> &dyn Writer {
        self.writer.as_ref()
    }

    /// Use `writer` until the next option update.
    pub fn set_writer(&mut self, writer: impl Writer + 'static) -> &mut Self {
        self.writer = Arc::new(writer);
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// While read-only, every mutating operation fails with
    /// [`ConfigError::ReadOnly`] and leaves the tree untouched.
    pub fn set_read_only(&mut self, read_only: bool) -> &mut Self {
        self.read_only = read_only;
        self
    }

    fn ensure_writable(&self, action: &'static str) -> Result<()> {
        if self.read_only {
            return Err(ConfigError::ReadOnly(action));
        }
        Ok(())
    }

    pub fn data(&self) -> &ConfigTree {
        &self.data
    }

    pub fn into_data(self) -> ConfigTree {
        self.data
    }

    /// Replace the whole tree, optionally substituting template variables.
    pub fn set_data(&mut self, data: ConfigTree, substitute: bool) -> Result<&mut Self> {
        self.ensure_writable("replace data")?;
        self.data = if substitute {
            self.placeholders.apply_tree(data)
        } else {
            data
        };
        Ok(self)
    }

    /// Substitute the store's template variables in `value`.
    pub fn replace_template_variables(&self, value: Value) -> Value {
        self.placeholders.apply(value)
    }

    fn separator<'a>(&'a self, options: &PathOptions<'a>) -> &'a str {
        options.separator.unwrap_or(&self.options.separator)
    }

    pub fn get(&self, index: &str) -> Option<&Value> {
        self.get_with(index, &PathOptions::default())
    }

    /// The value at `index`, or `default` when the path does not resolve.
    pub fn get_or(&self, index: &str, default: impl Into<Value>) -> Value {
        self.get(index).cloned().unwrap_or_else(|| default.into())
    }

    pub fn get_with(&self, index: &str, options: &PathOptions<'_>) -> Option<&Value> {
        path::get(&self.data, index, self.separator(options))
    }

    pub fn has(&self, index: &str) -> bool {
        self.has_with(index, &PathOptions::default())
    }

    pub fn has_with(&self, index: &str, options: &PathOptions<'_>) -> bool {
        path::has(&self.data, index, self.separator(options))
    }

    pub fn set(&mut self, index: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.set_with(index, value, &PathOptions::default())
    }

    pub fn set_with(
        &mut self,
        index: &str,
        value: impl Into<Value>,
        options: &PathOptions<'_>,
    ) -> Result<&mut Self> {
        self.ensure_writable("set")?;
        let separator = options.separator.unwrap_or(&self.options.separator);
        path::set(&mut self.data, index, value.into(), separator);
        Ok(self)
    }

    /// Shallow merge `value` into the value at `index`.
    pub fn merge(&mut self, index: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.combine(MergeStrategy::Merge, index, value.into(), empty(), &PathOptions::default())
    }

    /// Recursively merge `value` into the value at `index`.
    pub fn merge_recursive(&mut self, index: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.combine(
            MergeStrategy::MergeRecursive,
            index,
            value.into(),
            empty(),
            &PathOptions::default(),
        )
    }

    /// Shallow replace keys of the value at `index` with those of `value`.
    pub fn replace(&mut self, index: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.combine(MergeStrategy::Replace, index, value.into(), empty(), &PathOptions::default())
    }

    /// Recursively replace keys of the value at `index` with those of `value`.
    pub fn replace_recursive(&mut self, index: &str, value: impl Into<Value>) -> Result<&mut Self> {
        self.combine(
            MergeStrategy::ReplaceRecursive,
            index,
            value.into(),
            empty(),
            &PathOptions::default(),
        )
    }

    /// Combine the value at `index` (or `default` when absent) with `value`
    /// and store the result back at `index`.
    pub fn combine(
        &mut self,
        strategy: MergeStrategy,
        index: &str,
        value: Value,
        default: Value,
        options: &PathOptions<'_>,
    ) -> Result<&mut Self> {
        self.ensure_writable(strategy.as_str())?;
        let current = self.get_with(index, options).cloned().unwrap_or(default);
        let combined = strategy.apply(current, value);
        self.set_with(index, combined, options)
    }

    /// Combine by strategy name (`merge`, `mergeRecursive`, `replace`,
    /// `replaceRecursive`). Unknown names fail with
    /// [`ConfigError::UnsupportedStrategy`].
    pub fn call_function(
        &mut self,
        name: &str,
        index: &str,
        value: Value,
        default: Value,
        options: &PathOptions<'_>,
    ) -> Result<&mut Self> {
        let strategy: MergeStrategy = name.parse()?;
        self.combine(strategy, index, value, default, options)
    }
}

fn empty() -> Value {
    Value::Object(Map::new())
}
