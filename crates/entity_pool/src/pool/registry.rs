//! Entity Registry
//!
//! Maps template identity to the index of its recycling store. Entries are
//! only ever added; an index stays valid for the lifetime of the pool.

use super::spec::TemplateId;
use std::collections::HashMap;
use std::fmt;

/// Handle identifying one pooled kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolIndex(usize);

impl PoolIndex {
    /// Position of the kind's store
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PoolIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Template identity to pool index mapping
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    indices: HashMap<TemplateId, PoolIndex>,
}

impl TemplateRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, returning its index and whether it was newly added
    ///
    /// Already-registered templates keep their original index. New templates
    /// receive the next free index.
    pub fn register(&mut self, template: &TemplateId) -> (PoolIndex, bool) {
        if let Some(&index) = self.indices.get(template) {
            return (index, false);
        }
        let index = PoolIndex(self.indices.len());
        self.indices.insert(template.clone(), index);
        (index, true)
    }

    /// Look up the index of a template
    pub fn lookup(&self, template: &TemplateId) -> Option<PoolIndex> {
        self.indices.get(template).copied()
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing has been registered yet
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
