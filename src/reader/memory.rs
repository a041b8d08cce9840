use super::Reader;
use crate::codec::kind_of;
use crate::error::{ConfigError, Result};
use crate::tree::ConfigTree;
use serde_json::Value;

/// Reads configuration from the `data` option.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryReader;

impl InMemoryReader {
    pub fn new() -> Self {
        Self
    }
}

impl Reader for InMemoryReader {
    fn read(&self, options: &ConfigTree) -> Result<ConfigTree> {
        match options.get("data") {
            None | Some(Value::Null) => Err(ConfigError::invalid_argument(
                "Parameter \"data\" is mandatory.",
            )),
            Some(Value::Object(data)) => Ok(data.clone()),
            Some(other) => Err(ConfigError::invalid_argument(format!(
                "Parameter \"data\" must be a mapping, found {}.",
                kind_of(other)
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    fn options(value: Value) -> ConfigTree {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_returns_data_verbatim() {
        let data = json!({"user": {"name": "Bo"}, "list": [1, 2]});
        let tree = InMemoryReader::new()
            .read(&options(json!({"data": data.clone(), "file": null})))
            .unwrap();
        assert_eq!(Value::Object(tree), data);
    }

    #[test]
    fn test_missing_data_is_invalid_argument() {
        let err = InMemoryReader.read(&ConfigTree::new()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);

        let err = InMemoryReader.read(&options(json!({"data": null}))).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_non_mapping_data_is_invalid_argument() {
        let err = InMemoryReader
            .read(&options(json!({"data": ["a"]})))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert!(err.to_string().contains("sequence"));
    }
}
