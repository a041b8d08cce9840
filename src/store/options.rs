//! Store-level and per-call options.

use super::ConfigStore;
use crate::codec::kind_of;
use crate::error::{ConfigError, Result};
use crate::reader::Reader;
use crate::tree::{ConfigTree, DEFAULT_SEPARATOR, MergeStrategy, deep_replace};
use crate::writer::Writer;
use serde_json::{Value, json};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Called after every successful `load` with the resolved load options.
pub type AfterLoadHook = Arc<dyn Fn(&ConfigStore, &LoadOptions) -> anyhow::Result<()> + Send + Sync>;

/// Called before every `save` with the resolved save options.
pub type BeforeSaveHook =
    Arc<dyn Fn(&ConfigStore, &SaveOptions) -> anyhow::Result<()> + Send + Sync>;

/// Which reader a store uses: a built-in tag (`"array"`, `"file"`) or a custom
/// implementation.
#[derive(Clone)]
pub enum ReaderSpec {
    Tag(String),
    Custom(Arc<dyn Reader>),
}

impl ReaderSpec {
    pub fn custom(reader: impl Reader + 'static) -> Self {
        ReaderSpec::Custom(Arc::new(reader))
    }
}

impl From<&str> for ReaderSpec {
    fn from(tag: &str) -> Self {
        ReaderSpec::Tag(tag.to_string())
    }
}

impl From<String> for ReaderSpec {
    fn from(tag: String) -> Self {
        ReaderSpec::Tag(tag)
    }
}

impl fmt::Debug for ReaderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReaderSpec::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            ReaderSpec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Which writer a store uses: a built-in tag (`"array"`, `"file"`) or a custom
/// implementation.
#[derive(Clone)]
pub enum WriterSpec {
    Tag(String),
    Custom(Arc<dyn Writer>),
}

impl WriterSpec {
    pub fn custom(writer: impl Writer + 'static) -> Self {
        WriterSpec::Custom(Arc::new(writer))
    }
}

impl From<&str> for WriterSpec {
    fn from(tag: &str) -> Self {
        WriterSpec::Tag(tag.to_string())
    }
}

impl From<String> for WriterSpec {
    fn from(tag: String) -> Self {
        WriterSpec::Tag(tag)
    }
}

impl fmt::Debug for WriterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriterSpec::Tag(tag) => f.debug_tuple("Tag").field(tag).finish(),
            WriterSpec::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Options a [`ConfigStore`] is constructed or reconfigured with.
#[derive(Clone)]
pub struct StoreOptions {
    /// Reader used by `load`. Defaults to `"file"`.
    pub reader: ReaderSpec,
    /// Writer used by `save`. Defaults to `"file"`.
    pub writer: WriterSpec,
    /// Path separator for `get`/`has`/`set`. Defaults to `.`.
    pub separator: String,
    pub on_after_load: Option<AfterLoadHook>,
    pub on_before_save: Option<BeforeSaveHook>,
    /// Placeholder -> replacement, applied to data entering the store.
    pub template_variables: ConfigTree,
    /// How `load` combines new data with what the store already holds.
    pub default_load_strategy: MergeStrategy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            reader: ReaderSpec::from("file"),
            writer: WriterSpec::from("file"),
            separator: DEFAULT_SEPARATOR.to_string(),
            on_after_load: None,
            on_before_save: None,
            template_variables: ConfigTree::new(),
            default_load_strategy: MergeStrategy::default(),
        }
    }
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOptions")
            .field("reader", &self.reader)
            .field("writer", &self.writer)
            .field("separator", &self.separator)
            .field("on_after_load", &self.on_after_load.is_some())
            .field("on_before_save", &self.on_before_save.is_some())
            .field("template_variables", &self.template_variables)
            .field("default_load_strategy", &self.default_load_strategy)
            .finish()
    }
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a store that neither reads nor writes files.
    pub fn in_memory() -> Self {
        Self::default().with_reader("array").with_writer("array")
    }

    pub fn with_reader(mut self, reader: impl Into<ReaderSpec>) -> Self {
        self.reader = reader.into();
        self
    }

    pub fn with_writer(mut self, writer: impl Into<WriterSpec>) -> Self {
        self.writer = writer.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_template_variables(mut self, variables: ConfigTree) -> Self {
        self.template_variables = variables;
        self
    }

    pub fn with_template_variable(mut self, placeholder: impl Into<String>, value: impl Into<Value>) -> Self {
        self.template_variables.insert(placeholder.into(), value.into());
        self
    }

    pub fn with_default_load_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.default_load_strategy = strategy;
        self
    }

    pub fn on_after_load<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ConfigStore, &LoadOptions) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_after_load = Some(Arc::new(hook));
        self
    }

    pub fn on_before_save<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ConfigStore, &SaveOptions) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_before_save = Some(Arc::new(hook));
        self
    }
}

/// Per-call override of the path separator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PathOptions<'a> {
    pub separator: Option<&'a str>,
}

impl<'a> PathOptions<'a> {
    pub fn separator(separator: &'a str) -> Self {
        Self {
            separator: Some(separator),
        }
    }
}

/// Options for a single `load` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadOptions {
    /// Data for the in-memory reader.
    pub data: Option<Value>,
    /// File for the file reader; relative imports resolve against its directory.
    pub file: Option<String>,
    /// Load the data under this path instead of the root.
    pub load_in_key: Option<String>,
    /// Follow the `import` directive of the loaded data.
    pub process_imports: bool,
    /// Empty the store before applying the loaded data.
    pub clear_first: bool,
    /// Options handed to the reader. `file` and `data` are mirrored in when unset.
    pub reader_options: ConfigTree,
    /// Overrides the store's default load strategy.
    pub strategy: Option<MergeStrategy>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, data: impl Into<Value>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn with_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = Some(file.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn load_in_key(mut self, key: impl Into<String>) -> Self {
        self.load_in_key = Some(key.into());
        self
    }

    pub fn process_imports(mut self, enabled: bool) -> Self {
        self.process_imports = enabled;
        self
    }

    pub fn clear_first(mut self, enabled: bool) -> Self {
        self.clear_first = enabled;
        self
    }

    pub fn with_reader_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.reader_options.insert(key.into(), value.into());
        self
    }

    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Parse load options from a loosely typed mapping (camelCase keys).
    ///
    /// The mapping is deep-merged over the defaults before fields are
    /// extracted, so a partial mapping is fine. Unknown keys are ignored.
    pub fn from_value(options: Value) -> Result<Self> {
        let defaults = json!({
            "data": null,
            "file": null,
            "loadInKey": null,
            "processImports": false,
            "clearFirst": false,
            "readerOptions": {},
            "strategy": null
        });
        let merged = match options {
            Value::Object(_) => deep_replace(defaults, options),
            Value::Null => defaults,
            other => {
                return Err(ConfigError::invalid_argument(format!(
                    "Load options must be a mapping, found {}.",
                    kind_of(&other)
                )));
            }
        };
        let Value::Object(mut map) = merged else {
            return Err(ConfigError::invalid_argument("Load options must be a mapping."));
        };

        Ok(Self {
            data: map.remove("data").filter(|v| !v.is_null()),
            file: optional_string(&map, "file")?,
            load_in_key: optional_string(&map, "loadInKey")?,
            process_imports: boolean(&map, "processImports")?,
            clear_first: boolean(&map, "clearFirst")?,
            reader_options: mapping(&mut map, "readerOptions")?,
            strategy: optional_string(&map, "strategy")?
                .map(|s| s.parse::<MergeStrategy>())
                .transpose()?,
        })
    }
}

/// Options for a single `save` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveOptions {
    /// Target file; always mirrored into `writer_options`.
    pub file: Option<String>,
    /// Options handed to the writer.
    pub writer_options: ConfigTree,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = Some(file.as_ref().to_string_lossy().into_owned());
        self
    }

    pub fn with_writer_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.writer_options.insert(key.into(), value.into());
        self
    }

    /// Parse save options from a loosely typed mapping (camelCase keys).
    ///
    /// Unlike load options the mapping replaces defaults key by key, without
    /// recursing into `writerOptions`.
    pub fn from_value(options: Value) -> Result<Self> {
        let mut map = match options {
            Value::Object(map) => map,
            Value::Null => ConfigTree::new(),
            other => {
                return Err(ConfigError::invalid_argument(format!(
                    "Save options must be a mapping, found {}.",
                    kind_of(&other)
                )));
            }
        };

        Ok(Self {
            file: optional_string(&map, "file")?,
            writer_options: mapping(&mut map, "writerOptions")?,
        })
    }
}

fn optional_string(map: &ConfigTree, key: &str) -> Result<Option<String>> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::invalid_option_type(key, &["string"])),
    }
}

fn boolean(map: &ConfigTree, key: &str) -> Result<bool> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ConfigError::invalid_option_type(key, &["bool"])),
    }
}

fn mapping(map: &mut ConfigTree, key: &str) -> Result<ConfigTree> {
    match map.remove(key) {
        None | Some(Value::Null) => Ok(ConfigTree::new()),
        Some(Value::Object(inner)) => Ok(inner),
        Some(_) => Err(ConfigError::invalid_option_type(key, &["mapping"])),
    }
}
