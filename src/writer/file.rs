use super::Writer;
use crate::codec;
use crate::error::{ConfigError, Result};
use crate::tree::ConfigTree;
use serde_json::Value;
use std::path::Path;

/// Writes the tree to the file named by the `file` option.
///
/// Remaining options go to the codec: `format`, `pretty`, `createDirs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileWriter;

impl FileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Writer for FileWriter {
    fn write(&self, tree: &ConfigTree, options: &ConfigTree) -> Result<()> {
        let file = match options.get("file") {
            None | Some(Value::Null) => {
                return Err(ConfigError::invalid_argument("Parameter \"file\" is mandatory."));
            }
            Some(Value::String(file)) if !file.is_empty() => file,
            Some(_) => {
                return Err(ConfigError::invalid_argument(
                    "Parameter \"file\" must be a non-empty string.",
                ));
            }
        };

        codec::write_file(Path::new(file), tree, options)
    }
}
