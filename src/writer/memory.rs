use super::Writer;
use crate::error::Result;
use crate::tree::ConfigTree;

/// A writer that discards everything. The tree already lives in memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct InMemoryWriter;

impl InMemoryWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Writer for InMemoryWriter {
    fn write(&self, _tree: &ConfigTree, _options: &ConfigTree) -> Result<()> {
        Ok(())
    }
}
