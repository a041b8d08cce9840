//! Loading into and saving from a [`ConfigStore`].

use super::{ConfigStore, LoadOptions, SaveOptions};
use crate::error::{ConfigError, Result};
use crate::tree::{ConfigTree, MergeStrategy, path};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level key naming additional sources to merge in.
pub const IMPORT_KEY: &str = "import";

const FILE_KEY: &str = "file";

/// Resolve an import's `file` against the directory of the importing file.
/// Absolute paths are used as-is.
fn resolve_import_path(file: &str, base_file: Option<&str>) -> PathBuf {
    let path = Path::new(file);
    if file.starts_with('/') || path.is_absolute() {
        return path.to_path_buf();
    }
    match base_file.and_then(|base| Path::new(base).parent()) {
        Some(dir) => dir.join(path),
        None => path.to_path_buf(),
    }
}

fn mirror(options: &mut ConfigTree, key: &str, value: Option<Value>) {
    let unset = options.get(key).is_none_or(Value::is_null);
    if unset {
        options.insert(key.to_string(), value.unwrap_or(Value::Null));
    }
}

impl ConfigStore {
    /// Read data through the store's reader and fold it into the tree.
    ///
    /// Steps, in order: read, follow imports (when enabled), clear (when
    /// enabled), combine with the current tree (or the subtree at
    /// `load_in_key`) using the load strategy, substitute template variables,
    /// then call the after-load hook.
    ///
    /// A failure after `clear_first` has emptied the tree leaves it empty.
    pub fn load(&mut self, options: LoadOptions) -> Result<&mut Self> {
        self.ensure_writable("load")?;

        let mut options = options;
        let file = options.file.clone().map(Value::String);
        let data = options.data.clone();
        mirror(&mut options.reader_options, FILE_KEY, file);
        mirror(&mut options.reader_options, "data", data);

        debug!(
            file = ?options.file,
            load_in_key = ?options.load_in_key,
            process_imports = options.process_imports,
            clear_first = options.clear_first,
            "loading configuration"
        );

        let mut raw = self.reader.read(&options.reader_options)?;

        if options.process_imports {
            self.process_imports(&options, &mut raw)?;
        }

        if options.clear_first {
            self.data = ConfigTree::new();
        }

        let strategy = options.strategy.unwrap_or(self.options.default_load_strategy);
        match &options.load_in_key {
            Some(key) => {
                let current = path::get(&self.data, key, &self.options.separator)
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new()));
                let merged = self
                    .placeholders
                    .apply(strategy.apply(current, Value::Object(raw)));
                path::set(&mut self.data, key, merged, &self.options.separator);
            }
            None => {
                let current = std::mem::take(&mut self.data);
                self.data = self.placeholders.apply_tree(strategy.apply_tree(current, raw));
            }
        }

        if let Some(hook) = &self.options.on_after_load {
            hook(&*self, &options).map_err(|e| {
                ConfigError::configuration(format!("onAfterLoad hook failed: {e:#}"))
            })?;
        }

        Ok(self)
    }

    /// Merge every entry of the `import` directive into `raw`, in order.
    fn process_imports(&self, options: &LoadOptions, raw: &mut ConfigTree) -> Result<()> {
        let entries = match raw.get(IMPORT_KEY) {
            None | Some(Value::Null) => return Ok(()),
            Some(Value::Array(entries)) => entries.clone(),
            Some(_) => {
                return Err(ConfigError::import(
                    "\"import\" parameter must be a sequence.",
                ));
            }
        };

        for entry in entries {
            let Value::Object(mut entry) = entry else {
                return Err(ConfigError::import(
                    "Each \"import\" element must be a mapping.",
                ));
            };

            if let Some(Value::String(file)) = entry.get(FILE_KEY) {
                let resolved = resolve_import_path(file, options.file.as_deref());
                if !resolved.is_file() {
                    debug!(file = %resolved.display(), "skipping missing import");
                    continue;
                }
                entry.insert(
                    FILE_KEY.to_string(),
                    Value::String(resolved.to_string_lossy().into_owned()),
                );
            }

            let read_options =
                MergeStrategy::ReplaceRecursive.apply_tree(options.reader_options.clone(), entry);
            debug!(file = ?read_options.get(FILE_KEY), "processing import");
            let imported = self.reader.read(&read_options)?;
            *raw = MergeStrategy::ReplaceRecursive.apply_tree(std::mem::take(raw), imported);
        }

        Ok(())
    }

    /// Hand the tree to the store's writer. `file` always overrides
    /// `writer_options.file`.
    pub fn save(&self, options: SaveOptions) -> Result<&Self> {
        let mut options = options;
        let file = options.file.clone().map(Value::String).unwrap_or(Value::Null);
        options.writer_options.insert(FILE_KEY.to_string(), file);

        if let Some(hook) = &self.options.on_before_save {
            hook(self, &options).map_err(|e| {
                ConfigError::configuration(format!("onBeforeSave hook failed: {e:#}"))
            })?;
        }

        debug!(file = ?options.file, "saving configuration");
        self.writer.write(&self.data, &options.writer_options)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::store::StoreOptions;
    use crate::writer::Writer;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn tree(value: Value) -> ConfigTree {
        value.as_object().cloned().unwrap()
    }

    fn store(data: Value) -> ConfigStore {
        ConfigStore::new(tree(data), StoreOptions::in_memory()).unwrap()
    }

    #[test]
    fn test_resolve_import_path() {
        assert_eq!(
            resolve_import_path("routes.yml", Some("/etc/app/config.yml")),
            PathBuf::from("/etc/app/routes.yml")
        );
        assert_eq!(
            resolve_import_path("/abs/routes.yml", Some("/etc/app/config.yml")),
            PathBuf::from("/abs/routes.yml")
        );
        assert_eq!(
            resolve_import_path("routes.yml", Some("config.yml")),
            PathBuf::from("routes.yml")
        );
        assert_eq!(resolve_import_path("routes.yml", None), PathBuf::from("routes.yml"));
    }

    #[test]
    fn test_load_merges_into_root() {
        let mut s = store(json!({"b": 2, "nested": {"x": 1}}));
        s.load(LoadOptions::new().with_data(json!({"a": 1, "nested": {"y": 2}})))
            .unwrap();
        assert_eq!(
            s.data(),
            &tree(json!({"b": 2, "nested": {"x": 1, "y": 2}, "a": 1}))
        );
    }

    #[test]
    fn test_load_clear_first() {
        let mut s = store(json!({"b": 2}));
        s.load(LoadOptions::new().with_data(json!({"a": 1})).clear_first(true))
            .unwrap();
        assert_eq!(s.data(), &tree(json!({"a": 1})));
    }

    #[test]
    fn test_load_in_key() {
        let mut s = store(json!({}));
        s.load(
            LoadOptions::new()
                .with_data(json!({"user": {"username": "test"}}))
                .load_in_key("testComponent"),
        )
        .unwrap();
        assert_eq!(s.get("testComponent.user.username"), Some(&json!("test")));
    }

    #[test]
    fn test_load_in_key_merges_with_existing_subtree() {
        let mut s = store(json!({"cfg": {"keep": true, "user": {"name": "Al"}}}));
        s.load(
            LoadOptions::new()
                .with_data(json!({"user": {"name": "Bo"}}))
                .load_in_key("cfg"),
        )
        .unwrap();
        assert_eq!(s.get("cfg.user.name"), Some(&json!("Bo")));
        assert_eq!(s.get("cfg.keep"), Some(&json!(true)));
    }

    #[test]
    fn test_load_substitutes_template_variables() {
        let options = StoreOptions::in_memory().with_template_variable("%car%", "Porsche 911");
        let mut s = ConfigStore::new(ConfigTree::new(), options).unwrap();

        s.load(LoadOptions::new().with_data(json!({"car": "%car%"}))).unwrap();
        assert_eq!(s.get("car"), Some(&json!("Porsche 911")));

        s.load(LoadOptions::new().with_data(json!({"car": "%car%"})).load_in_key("garage"))
            .unwrap();
        assert_eq!(s.get("garage.car"), Some(&json!("Porsche 911")));
    }

    #[test]
    fn test_load_strategy_override() {
        let mut s = store(json!({"list": [1]}));
        s.load(LoadOptions::new().with_data(json!({"list": [2]}))).unwrap();
        assert_eq!(s.get("list"), Some(&json!([2])));

        s.load(
            LoadOptions::new()
                .with_data(json!({"list": [3]}))
                .with_strategy(MergeStrategy::MergeRecursive),
        )
        .unwrap();
        assert_eq!(s.get("list"), Some(&json!([2, 3])));
    }

    #[test]
    fn test_default_load_strategy_option() {
        let options = StoreOptions::in_memory().with_default_load_strategy(MergeStrategy::Replace);
        let mut s = ConfigStore::new(tree(json!({"a": {"x": 1}})), options).unwrap();
        s.load(LoadOptions::new().with_data(json!({"a": {"y": 2}}))).unwrap();
        assert_eq!(s.get("a"), Some(&json!({"y": 2})));
    }

    #[test]
    fn test_missing_import_file_is_skipped() {
        let mut s = store(json!({}));
        s.load(
            LoadOptions::new()
                .with_data(json!({"import": [{"file": "missing.yml"}], "a": 1}))
                .process_imports(true),
        )
        .unwrap();
        assert_eq!(s.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_import_with_in_memory_data() {
        let mut s = store(json!({}));
        s.load(
            LoadOptions::new()
                .with_data(json!({
                    "a": 1,
                    "import": [{"data": {"b": 2}}, {"data": {"a": 3}}]
                }))
                .process_imports(true),
        )
        .unwrap();
        assert_eq!(s.get("a"), Some(&json!(3)));
        assert_eq!(s.get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_null_import_is_ignored() {
        let mut s = store(json!({}));
        s.load(
            LoadOptions::new()
                .with_data(json!({"a": 1, "import": null}))
                .process_imports(true),
        )
        .unwrap();
        assert_eq!(s.get("a"), Some(&json!(1)));
        assert!(s.has("import"));
    }

    #[test]
    fn test_imports_ignored_unless_enabled() {
        let mut s = store(json!({}));
        s.load(LoadOptions::new().with_data(json!({"import": "not a list", "a": 1})))
            .unwrap();
        assert_eq!(s.get("import"), Some(&json!("not a list")));
    }

    #[test]
    fn test_import_must_be_sequence_of_mappings() {
        let mut s = store(json!({}));
        let err = s
            .load(
                LoadOptions::new()
                    .with_data(json!({"import": "routes.yml"}))
                    .process_imports(true),
            )
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ImportError);

        let err = s
            .load(
                LoadOptions::new()
                    .with_data(json!({"import": ["routes.yml"]}))
                    .process_imports(true),
            )
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ImportError);
    }

    #[test]
    fn test_failed_load_after_clear_leaves_tree_cleared() {
        let options = StoreOptions::in_memory().on_after_load(|_, _| anyhow::bail!("boom"));
        let mut s = ConfigStore::new(tree(json!({"keep": 1})), options).unwrap();

        // the hook fails after the tree has been cleared and reloaded
        let err = s
            .load(LoadOptions::new().with_data(json!({"a": 1})).clear_first(true))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
        assert!(err.to_string().contains("boom"));
        assert_eq!(s.get("keep"), None);
        assert_eq!(s.get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_after_load_hook_receives_resolved_options() {
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let options = StoreOptions::in_memory().on_after_load(move |store, options| {
            *sink.lock().unwrap() = Some((
                store.get("a").cloned(),
                options.reader_options.get("data").cloned(),
            ));
            Ok(())
        });
        let mut s = ConfigStore::new(ConfigTree::new(), options).unwrap();

        s.load(LoadOptions::new().with_data(json!({"a": 1}))).unwrap();
        let (value, data) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(value, Some(json!(1)));
        assert_eq!(data, Some(json!({"a": 1})));
    }

    #[test]
    fn test_load_is_chainable() {
        let mut s = store(json!({}));
        s.load(LoadOptions::new().with_data(json!({"a": 1})))
            .unwrap()
            .set("b", 2)
            .unwrap();
        assert_eq!(s.data(), &tree(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn test_load_rejected_when_read_only() {
        let mut s = store(json!({"a": 1}));
        s.set_read_only(true);
        let err = s
            .load(LoadOptions::new().with_data(json!({"a": 2})).clear_first(true))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ReadOnly);
        assert_eq!(s.get("a"), Some(&json!(1)));
    }

    #[derive(Default)]
    struct RecordingWriter {
        calls: Mutex<Vec<(ConfigTree, ConfigTree)>>,
    }

    impl Writer for RecordingWriter {
        fn write(&self, tree: &ConfigTree, options: &ConfigTree) -> Result<()> {
            self.calls.lock().unwrap().push((tree.clone(), options.clone()));
            Ok(())
        }
    }

    #[test]
    fn test_save_mirrors_file_and_calls_hook() {
        let writer = Arc::new(RecordingWriter::default());
        let hooked = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&hooked);
        let options = StoreOptions::in_memory()
            .with_writer(crate::store::WriterSpec::Custom(writer.clone()))
            .on_before_save(move |_, options| {
                sink.lock().unwrap().push(options.file.clone());
                Ok(())
            });
        let s = ConfigStore::new(tree(json!({"a": 1})), options).unwrap();

        s.save(
            SaveOptions::new()
                .with_file("out.yml")
                .with_writer_option("file", "ignored.yml")
                .with_writer_option("pretty", false),
        )
        .unwrap();

        let calls = writer.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, tree(json!({"a": 1})));
        assert_eq!(calls[0].1.get("file"), Some(&json!("out.yml")));
        assert_eq!(calls[0].1.get("pretty"), Some(&json!(false)));
        assert_eq!(*hooked.lock().unwrap(), vec![Some("out.yml".to_string())]);
    }

    #[test]
    fn test_save_hook_failure_prevents_write() {
        let writer = Arc::new(RecordingWriter::default());
        let options = StoreOptions::in_memory()
            .with_writer(crate::store::WriterSpec::Custom(writer.clone()))
            .on_before_save(|_, _| anyhow::bail!("refused"));
        let s = ConfigStore::new(ConfigTree::new(), options).unwrap();

        let err = s.save(SaveOptions::new()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
        assert!(writer.calls.lock().unwrap().is_empty());
    }
}
