//! Prefab (template) definitions for the reference scene

use crate::foundation::math::Transform;
use crate::pool::PoolAware;
use std::fmt;
use std::rc::Rc;

/// Builds a fresh handler for each instantiated node
pub type HandlerFactory = Rc<dyn Fn() -> Rc<dyn PoolAware>>;

/// Blueprint of a node hierarchy
///
/// Handlers are produced by factories so every instance gets its own set,
/// enumerated once when the instance is built.
#[derive(Clone)]
pub struct Prefab {
    /// Node name
    pub name: String,
    /// Local transform of the node
    pub transform: Transform,
    /// Whether the node is active on its own once built
    pub active: bool,
    /// Handler factories for the node
    pub handlers: Vec<HandlerFactory>,
    /// Child prefabs
    pub children: Vec<Prefab>,
}

impl Prefab {
    /// Single active node with no handlers
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::identity(),
            active: true,
            handlers: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attach a handler factory (builder pattern)
    pub fn with_handler<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Rc<dyn PoolAware> + 'static,
    {
        self.handlers.push(Rc::new(factory));
        self
    }

    /// Attach a child prefab (builder pattern)
    pub fn with_child(mut self, child: Prefab) -> Self {
        self.children.push(child);
        self
    }

    /// Mark the node as inactive on its own (builder pattern)
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Set the local transform (builder pattern)
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

impl fmt::Debug for Prefab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prefab")
            .field("name", &self.name)
            .field("active", &self.active)
            .field("handlers", &self.handlers.len())
            .field("children", &self.children)
            .finish()
    }
}
