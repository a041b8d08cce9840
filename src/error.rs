//! Error types for configuration stores, readers and writers.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Option validation
    InvalidArgument,
    MissingOption,
    InvalidOptionType,

    // Filesystem preconditions
    FileDoesNotExist,
    FileIsNotReadable,

    // Load / store behaviour
    ImportError,
    ConfigurationError,
    UnsupportedStrategy,
    ReadOnly,

    // Underlying codec / IO
    CodecError,
    IoError,
}

/// Errors raised by [`crate::ConfigStore`] and its readers and writers.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Option \"{0}\" is mandatory.")]
    MissingOption(String),

    #[error("Option \"{option}\" must be one of the following types \"{expected}\".")]
    InvalidOptionType { option: String, expected: String },

    #[error("File \"{}\" does not exist.", .0.display())]
    FileDoesNotExist(PathBuf),

    #[error("File \"{}\" is not readable.", .0.display())]
    FileIsNotReadable(PathBuf),

    #[error("Import error: {0}")]
    Import(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported merge strategy: {0}")]
    UnsupportedStrategy(String),

    #[error("Configuration is read-only; cannot {0}")]
    ReadOnly(&'static str),

    #[error("Failed to {action} {}: {message}", .path.display())]
    Codec {
        action: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn missing_option(option: &str) -> Self {
        Self::MissingOption(option.to_string())
    }

    pub fn invalid_option_type(option: &str, expected: &[&str]) -> Self {
        Self::InvalidOptionType {
            option: option.to_string(),
            expected: expected.join(", "),
        }
    }

    pub fn import(msg: impl Into<String>) -> Self {
        Self::Import(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// The programmatic code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::MissingOption(_) => ErrorCode::MissingOption,
            Self::InvalidOptionType { .. } => ErrorCode::InvalidOptionType,
            Self::FileDoesNotExist(_) => ErrorCode::FileDoesNotExist,
            Self::FileIsNotReadable(_) => ErrorCode::FileIsNotReadable,
            Self::Import(_) => ErrorCode::ImportError,
            Self::Configuration(_) => ErrorCode::ConfigurationError,
            Self::UnsupportedStrategy(_) => ErrorCode::UnsupportedStrategy,
            Self::ReadOnly(_) => ErrorCode::ReadOnly,
            Self::Codec { .. } => ErrorCode::CodecError,
            Self::Io(_) => ErrorCode::IoError,
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
