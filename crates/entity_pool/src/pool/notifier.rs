//! Lifecycle Notifier
//!
//! Collects the handlers that should hear about an acquire or release and
//! delivers the event once the pool has released every internal borrow, so
//! handlers are free to call back into the pool.

use super::host::{PoolAware, PoolHost};
use super::manager::ObjectPool;
use super::spec::NotificationMode;
use crate::ecs::Entity;
use std::rc::Rc;

/// Lifecycle transition being announced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Instance moved from available to in-use
    Enable,
    /// Instance moved from in-use to available
    Disable,
}

/// Handlers gathered for one transition, not yet invoked
pub struct PendingNotification {
    entity: Entity,
    event: LifecycleEvent,
    handlers: Vec<Rc<dyn PoolAware>>,
}

impl PendingNotification {
    /// Notification that reaches nobody
    pub fn empty(entity: Entity, event: LifecycleEvent) -> Self {
        Self {
            entity,
            event,
            handlers: Vec::new(),
        }
    }

    /// Gather handlers on `entity` according to `mode`
    pub fn collect(
        host: &dyn PoolHost,
        entity: Entity,
        mode: NotificationMode,
        event: LifecycleEvent,
    ) -> Self {
        match mode.scope() {
            Some(scope) => Self {
                entity,
                event,
                handlers: host.handlers(entity, scope),
            },
            None => Self::empty(entity, event),
        }
    }

    /// Number of handlers that will be called
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether delivery is a no-op
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Invoke every handler synchronously, returning how many were called
    ///
    /// Must be called without holding any borrow of the pool's state.
    pub fn deliver(self, pool: &ObjectPool) -> usize {
        if !self.handlers.is_empty() {
            log::trace!(
                "Delivering {:?} to {} handlers on {:?}",
                self.event,
                self.handlers.len(),
                self.entity
            );
        }
        for handler in &self.handlers {
            match self.event {
                LifecycleEvent::Enable => handler.on_enable_by_pool(pool),
                LifecycleEvent::Disable => handler.on_disable_by_pool(pool),
            }
        }
        self.handlers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::TemplateId;
    use crate::scene::{Prefab, SceneGraph};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Tally {
        enabled: Cell<usize>,
        disabled: Cell<usize>,
    }

    impl PoolAware for Tally {
        fn on_enable_by_pool(&self, _pool: &ObjectPool) {
            self.enabled.set(self.enabled.get() + 1);
        }

        fn on_disable_by_pool(&self, _pool: &ObjectPool) {
            self.disabled.set(self.disabled.get() + 1);
        }
    }

    fn ship_with_engines(tally: &Rc<Tally>) -> (Rc<RefCell<SceneGraph>>, Entity) {
        let factory = {
            let tally = Rc::clone(tally);
            move || -> Rc<dyn PoolAware> { tally.clone() }
        };
        let prefab = Prefab::new("Ship")
            .with_handler(factory.clone())
            .with_child(Prefab::new("Engine").with_handler(factory.clone()))
            .with_child(Prefab::new("Engine").with_handler(factory));

        let mut scene = SceneGraph::new();
        let template = TemplateId::new("ship");
        scene.register_prefab(template.clone(), prefab);
        let root = scene.spawn("Pool", None);
        let ship = scene.instantiate(&template, root).unwrap();
        (Rc::new(RefCell::new(scene)), ship)
    }

    #[test]
    fn test_collect_respects_notification_mode() {
        let tally = Rc::new(Tally::default());
        let (scene, ship) = ship_with_engines(&tally);
        let scene = scene.borrow();

        let collect =
            |mode| PendingNotification::collect(&*scene, ship, mode, LifecycleEvent::Enable);

        assert!(collect(NotificationMode::None).is_empty());
        assert_eq!(collect(NotificationMode::ShallowNotify).len(), 1);
        assert_eq!(collect(NotificationMode::DeepNotify).len(), 3);
    }

    #[test]
    fn test_deliver_dispatches_by_event() {
        let tally = Rc::new(Tally::default());
        let (scene, ship) = ship_with_engines(&tally);
        let pool = ObjectPool::new(scene.clone());

        let enable = PendingNotification::collect(
            &*scene.borrow(),
            ship,
            NotificationMode::DeepNotify,
            LifecycleEvent::Enable,
        );
        assert_eq!(enable.deliver(&pool), 3);
        assert_eq!(tally.enabled.get(), 3);
        assert_eq!(tally.disabled.get(), 0);

        let disable = PendingNotification::collect(
            &*scene.borrow(),
            ship,
            NotificationMode::ShallowNotify,
            LifecycleEvent::Disable,
        );
        assert_eq!(disable.deliver(&pool), 1);
        assert_eq!(tally.disabled.get(), 1);

        assert_eq!(PendingNotification::empty(ship, LifecycleEvent::Enable).deliver(&pool), 0);
    }
}
