//! Host environment seam
//!
//! The scene graph, transforms and template instantiation belong to the host
//! engine. The pool reaches them only through [`PoolHost`], and recycled
//! entities receive lifecycle events through [`PoolAware`] handlers that the
//! host enumerates when an instance is built.

use super::manager::ObjectPool;
use super::spec::{NotificationScope, TemplateId};
use crate::ecs::Entity;
use crate::foundation::math::{Quat, Vec3};
use std::rc::Rc;

/// Capability implemented by handlers that want pool lifecycle events
///
/// Handlers receive the pool so they can acquire or release other instances
/// from inside the callback.
pub trait PoolAware {
    /// Called after the owning entity has been handed out by the pool
    fn on_enable_by_pool(&self, pool: &ObjectPool);

    /// Called after the owning entity has been returned to the pool
    fn on_disable_by_pool(&self, pool: &ObjectPool);
}

/// Services the pool needs from the host engine
pub trait PoolHost {
    /// Create the container that idle instances are parented under
    fn create_pool_root(&mut self) -> Entity;

    /// Build a new inactive instance of `template` under `parent`
    ///
    /// Returns `None` when the host has no blueprint for the template.
    fn instantiate(&mut self, template: &TemplateId, parent: Entity) -> Option<Entity>;

    /// Whether the instance still exists
    fn is_alive(&self, entity: Entity) -> bool;

    /// Activate or deactivate an instance
    fn set_active(&mut self, entity: Entity, active: bool);

    /// Move a released instance back under the pool's container
    fn reparent_to_pool(&mut self, entity: Entity, pool_root: Entity);

    /// Apply caller-supplied placement after acquisition
    fn apply_placement(&mut self, entity: Entity, placement: &Placement);

    /// Lifecycle handlers registered on the instance within `scope`
    fn handlers(&self, entity: Entity, scope: NotificationScope) -> Vec<Rc<dyn PoolAware>>;
}

/// Where to put an acquired instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placement {
    /// New parent in the scene hierarchy
    pub parent: Option<Entity>,
    /// Local position
    pub position: Option<Vec3>,
    /// Local rotation
    pub rotation: Option<Quat>,
}

impl Placement {
    /// Placement that only re-parents
    pub fn under(parent: Entity) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    /// Placement that only moves
    pub fn at(position: Vec3) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    /// Set the parent (builder pattern)
    pub fn with_parent(mut self, parent: Entity) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the position (builder pattern)
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = Some(position);
        self
    }

    /// Set the rotation (builder pattern)
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;

    #[test]
    fn test_placement_builders_fill_only_requested_fields() {
        let mut scene = SceneGraph::new();
        let holder = scene.spawn("Holder", None);

        let moved = Placement::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.position, Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(moved.parent, None);
        assert_eq!(moved.rotation, None);

        let combined = Placement::at(Vec3::zeros()).with_parent(holder);
        assert_eq!(combined, Placement::under(holder).with_position(Vec3::zeros()));
    }
}
