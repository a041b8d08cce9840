//! Readers produce a [`ConfigTree`] from a declared source.
//!
//! A reader receives an options mapping rather than a typed struct: `load`
//! deep-merges each import entry over the base reader options, so readers must
//! accept whatever keys the caller put there.

mod file;
mod memory;

pub use file::FileReader;
pub use memory::InMemoryReader;

use crate::error::Result;
use crate::tree::ConfigTree;
use std::sync::Arc;

/// The reader capability.
pub trait Reader: Send + Sync {
    /// Read configuration data described by `options`.
    fn read(&self, options: &ConfigTree) -> Result<ConfigTree>;
}

impl<R: Reader + ?Sized> Reader for Arc<R> {
    fn read(&self, options: &ConfigTree) -> Result<ConfigTree> {
        (**self).read(options)
    }
}

impl<R: Reader + ?Sized> Reader for Box<R> {
    fn read(&self, options: &ConfigTree) -> Result<ConfigTree> {
        (**self).read(options)
    }
}
