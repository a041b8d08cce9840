//! config-store
//!
//! An in-memory configuration container: load key/value data from in-memory
//! values or YAML/JSON files, follow `import` directives between files, read
//! and write values by dotted path, combine subtrees with merge/replace
//! strategies, and substitute template variables.

pub mod cli;
pub mod codec;
pub mod error;
pub mod reader;
pub mod store;
pub mod tree;
pub mod writer;

pub use error::{ConfigError, ErrorCode, Result};
pub use reader::{FileReader, InMemoryReader, Reader};
pub use store::{
    ConfigStore, LoadOptions, PathOptions, ReaderSpec, SaveOptions, StoreOptions, WriterSpec,
};
pub use tree::{ConfigTree, MergeStrategy};
pub use writer::{FileWriter, InMemoryWriter, Writer};
