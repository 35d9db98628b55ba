//! Scene graph
//!
//! Minimal node hierarchy implementing [`PoolHost`]. Nodes live in a slot map
//! keyed by [`Entity`], so destroying a node invalidates every outstanding key
//! to it.

use super::prefab::Prefab;
use crate::ecs::Entity;
use crate::foundation::collections::EntityMap;
use crate::foundation::math::Transform;
use crate::pool::{NotificationScope, Placement, PoolAware, PoolHost, TemplateId};
use std::collections::HashMap;
use std::rc::Rc;

/// One node of the scene hierarchy
pub struct SceneNode {
    /// Node name
    pub name: String,
    /// Template the node was built from (roots of instances only)
    pub template: Option<TemplateId>,
    /// Active flag of the node itself
    pub active: bool,
    /// Parent node
    pub parent: Option<Entity>,
    /// Child nodes
    pub children: Vec<Entity>,
    /// Local transform
    pub transform: Transform,
    /// Lifecycle handlers registered on this node
    pub handlers: Vec<Rc<dyn PoolAware>>,
}

impl SceneNode {
    fn new(name: impl Into<String>, parent: Option<Entity>) -> Self {
        Self {
            name: name.into(),
            template: None,
            active: true,
            parent,
            children: Vec::new(),
            transform: Transform::identity(),
            handlers: Vec::new(),
        }
    }
}

/// Reference scene host
#[derive(Default)]
pub struct SceneGraph {
    nodes: EntityMap<SceneNode>,
    prefabs: HashMap<TemplateId, Prefab>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the blueprint used to instantiate `template`
    pub fn register_prefab(&mut self, template: TemplateId, prefab: Prefab) {
        self.prefabs.insert(template, prefab);
    }

    /// Create an active, empty node
    pub fn spawn(&mut self, name: &str, parent: Option<Entity>) -> Entity {
        let parent = parent.filter(|&parent| self.nodes.contains_key(parent));
        let entity = self.nodes.insert(SceneNode::new(name, parent));
        if let Some(parent) = parent {
            self.nodes[parent].children.push(entity);
        }
        entity
    }

    /// Build a node hierarchy from `prefab`, returning its root
    pub fn instantiate_prefab(&mut self, prefab: &Prefab, parent: Option<Entity>) -> Entity {
        build(&mut self.nodes, prefab, parent)
    }

    /// Destroy a node and its whole subtree
    pub fn destroy(&mut self, entity: Entity) {
        let Some(node) = self.nodes.get(entity) else {
            return;
        };
        if let Some(parent) = node.parent {
            if let Some(parent) = self.nodes.get_mut(parent) {
                parent.children.retain(|&child| child != entity);
            }
        }

        let mut pending = vec![entity];
        while let Some(current) = pending.pop() {
            if let Some(node) = self.nodes.remove(current) {
                pending.extend(node.children);
            }
        }
    }

    /// Whether the node exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.nodes.contains_key(entity)
    }

    /// Node data
    pub fn node(&self, entity: Entity) -> Option<&SceneNode> {
        self.nodes.get(entity)
    }

    /// Parent of a node
    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.nodes.get(entity).and_then(|node| node.parent)
    }

    /// Children of a node
    pub fn children(&self, entity: Entity) -> &[Entity] {
        self.nodes.get(entity).map(|node| node.children.as_slice()).unwrap_or_default()
    }

    /// Active flag of the node itself
    pub fn is_active(&self, entity: Entity) -> bool {
        self.nodes.get(entity).is_some_and(|node| node.active)
    }

    /// Whether the node and all its ancestors are active
    pub fn is_active_in_hierarchy(&self, entity: Entity) -> bool {
        let mut current = Some(entity);
        while let Some(entity) = current {
            match self.nodes.get(entity) {
                Some(node) if node.active => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Local transform of a node
    pub fn transform(&self, entity: Entity) -> Option<&Transform> {
        self.nodes.get(entity).map(|node| &node.transform)
    }

    /// Move a node under a new parent (or to the scene root)
    pub fn set_parent(&mut self, entity: Entity, parent: Option<Entity>) {
        if !self.nodes.contains_key(entity) || parent == Some(entity) {
            return;
        }
        let parent = parent.filter(|&parent| self.nodes.contains_key(parent));

        if let Some(old) = self.nodes[entity].parent {
            if let Some(old) = self.nodes.get_mut(old) {
                old.children.retain(|&child| child != entity);
            }
        }
        self.nodes[entity].parent = parent;
        if let Some(parent) = parent {
            self.nodes[parent].children.push(entity);
        }
    }

    /// Register a handler on an existing node
    pub fn attach_handler(&mut self, entity: Entity, handler: Rc<dyn PoolAware>) {
        if let Some(node) = self.nodes.get_mut(entity) {
            node.handlers.push(handler);
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Destroy every node that is not under `keep`, simulating a scene reload
    pub fn unload_except(&mut self, keep: Entity) {
        let doomed: Vec<Entity> = self
            .nodes
            .iter()
            .filter(|(_, node)| node.parent.is_none())
            .map(|(entity, _)| entity)
            .filter(|&entity| entity != keep)
            .collect();
        for entity in doomed {
            self.destroy(entity);
        }
    }
}

fn build(nodes: &mut EntityMap<SceneNode>, prefab: &Prefab, parent: Option<Entity>) -> Entity {
    let mut node = SceneNode::new(prefab.name.clone(), parent);
    node.active = prefab.active;
    node.transform = prefab.transform.clone();
    node.handlers = prefab.handlers.iter().map(|factory| factory()).collect();
    let entity = nodes.insert(node);

    if let Some(parent) = parent {
        nodes[parent].children.push(entity);
    }
    for child in &prefab.children {
        build(nodes, child, Some(entity));
    }
    entity
}

impl PoolHost for SceneGraph {
    fn create_pool_root(&mut self) -> Entity {
        self.spawn("ObjectPool", None)
    }

    fn instantiate(&mut self, template: &TemplateId, parent: Entity) -> Option<Entity> {
        let prefab = self.prefabs.get(template)?;
        let parent = self.nodes.contains_key(parent).then_some(parent);
        let entity = build(&mut self.nodes, prefab, parent);
        self.nodes[entity].template = Some(template.clone());
        Some(entity)
    }

    fn is_alive(&self, entity: Entity) -> bool {
        self.contains(entity)
    }

    fn set_active(&mut self, entity: Entity, active: bool) {
        if let Some(node) = self.nodes.get_mut(entity) {
            node.active = active;
        }
    }

    fn reparent_to_pool(&mut self, entity: Entity, pool_root: Entity) {
        self.set_parent(entity, Some(pool_root));
    }

    fn apply_placement(&mut self, entity: Entity, placement: &Placement) {
        if let Some(parent) = placement.parent {
            self.set_parent(entity, Some(parent));
        }
        if let Some(node) = self.nodes.get_mut(entity) {
            if let Some(position) = placement.position {
                node.transform.position = position;
            }
            if let Some(rotation) = placement.rotation {
                node.transform.rotation = rotation;
            }
        }
    }

    fn handlers(&self, entity: Entity, scope: NotificationScope) -> Vec<Rc<dyn PoolAware>> {
        let Some(node) = self.nodes.get(entity) else {
            return Vec::new();
        };
        match scope {
            NotificationScope::Root => node.handlers.clone(),
            NotificationScope::Subtree => {
                let mut handlers = Vec::new();
                let mut pending = vec![entity];
                while let Some(current) = pending.pop() {
                    if let Some(node) = self.nodes.get(current) {
                        handlers.extend(node.handlers.iter().cloned());
                        pending.extend(node.children.iter().rev().copied());
                    }
                }
                handlers
            }
        }
    }
}
