//! Writers persist a [`ConfigTree`] to a declared sink.

mod file;
mod memory;

pub use file::FileWriter;
pub use memory::InMemoryWriter;

use crate::error::Result;
use crate::tree::ConfigTree;
use std::sync::Arc;

/// The writer capability.
pub trait Writer: Send + Sync {
    /// Persist `tree` to the sink described by `options`.
    fn write(&self, tree: &ConfigTree, options: &ConfigTree) -> Result<()>;
}

impl<W: Writer + ?Sized> Writer for Arc<W> {
    fn write(&self, tree: &ConfigTree, options: &ConfigTree) -> Result<()> {
        (**self).write(tree, options)
    }
}

impl<W: Writer + ?Sized> Writer for Box<W> {
    fn write(&self, tree: &ConfigTree, options: &ConfigTree) -> Result<()> {
        (**self).write(tree, options)
    }
}
