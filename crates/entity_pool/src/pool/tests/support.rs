//! Shared fixtures for pool scenarios

use crate::ecs::Entity;
use crate::pool::{ObjectPool, PoolAware, PoolDefinition, TemplateId};
use crate::scene::{Prefab, SceneGraph};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handler counting the events it receives
#[derive(Default)]
pub struct CountingHandler {
    pub enabled: Cell<usize>,
    pub disabled: Cell<usize>,
}

impl PoolAware for CountingHandler {
    fn on_enable_by_pool(&self, _pool: &ObjectPool) {
        self.enabled.set(self.enabled.get() + 1);
    }

    fn on_disable_by_pool(&self, _pool: &ObjectPool) {
        self.disabled.set(self.disabled.get() + 1);
    }
}

impl CountingHandler {
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Factory handing the same counter to every instance
    pub fn factory(counter: &Rc<Self>) -> impl Fn() -> Rc<dyn PoolAware> + 'static {
        let counter = Rc::clone(counter);
        move || -> Rc<dyn PoolAware> { counter.clone() }
    }
}

/// Scene, pool and the template ids used by a scenario
pub struct Fixture {
    pub scene: Rc<RefCell<SceneGraph>>,
    pub pool: ObjectPool,
}

impl Fixture {
    /// Register a plain prefab for every item, then initialize
    pub fn plain(definition: &PoolDefinition) -> Self {
        let mut scene = SceneGraph::new();
        for item in &definition.items {
            scene.register_prefab(item.template.clone(), Prefab::new(item.template.as_str()));
        }
        Self::with_scene(scene, definition)
    }

    /// Initialize against a scene whose prefabs are already registered
    pub fn with_scene(scene: SceneGraph, definition: &PoolDefinition) -> Self {
        let scene = Rc::new(RefCell::new(scene));
        let pool =
            ObjectPool::with_definition(scene.clone(), definition).expect("valid definition");
        Self { scene, pool }
    }

    pub fn available(&self, template: &TemplateId) -> Vec<Entity> {
        self.pool.available_entities(template).expect("registered template")
    }

    pub fn acquire(&self, template: &TemplateId) -> Option<Entity> {
        self.pool.acquire(template).expect("registered template")
    }

    /// Check that the two partitions of `template` never share an entity
    pub fn assert_disjoint(&self, template: &TemplateId) {
        let available = self.available(template);
        for entity in &available {
            assert!(!self.pool.is_in_use(*entity), "{entity:?} is both available and in use");
        }
        let total = self.pool.total_count(template).unwrap();
        assert_eq!(total, available.len() + self.pool.in_use_count(template).unwrap());
    }
}
