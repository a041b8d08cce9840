use super::Reader;
use crate::codec;
use crate::error::{ConfigError, Result};
use crate::tree::ConfigTree;
use serde_json::Value;
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

/// Reads configuration from the file named by the `file` option.
///
/// Other options are passed through to the codec (for example `format`).
#[derive(Debug, Clone, Copy, Default)]
pub struct FileReader;

impl FileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Reader for FileReader {
    fn read(&self, options: &ConfigTree) -> Result<ConfigTree> {
        let file = match options.get("file") {
            None | Some(Value::Null) => return Err(ConfigError::missing_option("file")),
            Some(Value::String(file)) => file,
            Some(_) => return Err(ConfigError::invalid_option_type("file", &["string"])),
        };

        let path = Path::new(file);
        if !path.is_file() {
            return Err(ConfigError::FileDoesNotExist(path.to_path_buf()));
        }

        if let Err(e) = File::open(path) {
            return Err(match e.kind() {
                ErrorKind::PermissionDenied => ConfigError::FileIsNotReadable(path.to_path_buf()),
                _ => ConfigError::Io(e),
            });
        }

        codec::read_file(path, options)
    }
}
