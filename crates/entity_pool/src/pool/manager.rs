//! Pool Manager
//!
//! Composition root of the pooling system. Owns the template registry, the
//! per-kind specs and recycling stores, and the injected host.
//!
//! # Reentrancy
//!
//! Every public method takes `&self`. State lives behind a `RefCell` and is
//! never borrowed while lifecycle handlers run, so a handler may acquire or
//! release other instances (or reinitialize the pool) from inside its
//! callback.
//!
//! # Usage
//!
//! ```rust,ignore
//! let scene = Rc::new(RefCell::new(SceneGraph::new()));
//! let pool = ObjectPool::new(scene.clone());
//! pool.initialize(&PoolDefinition::load_from_file("pools.ron")?)?;
//!
//! if let Some(bullet) = pool.acquire(&TemplateId::new("bullet"))? {
//!     // ...
//!     pool.release(bullet);
//! }
//! ```

use super::error::{PoolError, PoolResult};
use super::host::{Placement, PoolHost};
use super::notifier::{LifecycleEvent, PendingNotification};
use super::registry::{PoolIndex, TemplateRegistry};
use super::spec::{PoolDefinition, PoolItemSpec, TemplateId};
use super::stats::PoolStats;
use super::store::RecyclingStore;
use crate::config::Config;
use crate::ecs::Entity;
use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;

#[derive(Default)]
struct PoolState {
    registry: TemplateRegistry,
    /// Indexed by `PoolIndex`, parallel to `stores`
    specs: Vec<PoolItemSpec>,
    stores: Vec<RecyclingStore>,
    stats: PoolStats,
}

impl PoolState {
    fn in_use_total(&self) -> usize {
        self.stores.iter().map(RecyclingStore::in_use_len).sum()
    }

    fn store(&self, template: &TemplateId) -> Option<&RecyclingStore> {
        let index = self.registry.lookup(template)?;
        self.stores.get(index.index())
    }
}

/// Recycling pool for heavyweight entities of several kinds
pub struct ObjectPool {
    host: Rc<RefCell<dyn PoolHost>>,
    root: Entity,
    state: RefCell<PoolState>,
}

impl ObjectPool {
    /// Create an empty pool bound to `host`
    ///
    /// The host is asked for the container idle instances live under.
    pub fn new(host: Rc<RefCell<dyn PoolHost>>) -> Self {
        let root = host.borrow_mut().create_pool_root();
        log::debug!("Created ObjectPool with root container {:?}", root);
        Self {
            host,
            root,
            state: RefCell::new(PoolState::default()),
        }
    }

    /// Create a pool and run the first initialization
    pub fn with_definition(
        host: Rc<RefCell<dyn PoolHost>>,
        definition: &PoolDefinition,
    ) -> PoolResult<Self> {
        let pool = Self::new(host);
        pool.initialize(definition)?;
        Ok(pool)
    }

    /// Load a pool definition asset and initialize from it
    pub fn initialize_from_file(&self, path: impl AsRef<Path>) -> PoolResult<()> {
        let definition = PoolDefinition::load_from_file(path)?;
        self.initialize(&definition)
    }

    /// Register new kinds, reclaim the previous generation and top up every store
    ///
    /// Safe to call repeatedly, for example after every scene reload:
    /// - templates already registered keep their index; their spec is
    ///   replaced by the one in `definition`
    /// - instances still in use are treated as released (owners are gone),
    ///   deactivated and moved back under the pool root without notification
    /// - instances destroyed outside the pool are forgotten
    /// - each store is filled with new inactive instances up to its
    ///   `amount_to_pool`
    ///
    /// Stores are never shrunk. Lowering `amount_to_pool` on a kind that
    /// cannot expand leaves its existing instances in place, so the total
    /// may stay above the new capacity until those instances are destroyed.
    pub fn initialize(&self, definition: &PoolDefinition) -> PoolResult<()> {
        definition.validate()?;

        let mut state = self.state.borrow_mut();
        let mut host = self.host.borrow_mut();
        let state = &mut *state;

        for item in &definition.items {
            let (index, added) = state.registry.register(&item.template);
            if added {
                state.specs.push(item.clone());
                state.stores.push(RecyclingStore::new());
            } else {
                state.specs[index.index()] = item.clone();
            }
        }

        let mut reclaimed = 0;
        let mut dropped = 0;
        let mut created = 0;
        for (spec, store) in state.specs.iter().zip(state.stores.iter_mut()) {
            let outcome = store.reclaim(&mut *host, self.root);
            reclaimed += outcome.reclaimed;
            dropped += outcome.dropped;
            created += store.top_up(spec, &mut *host, self.root);
        }

        state.stats.generations += 1;
        state.stats.discarded_invalid += dropped as u64;
        state.stats.track_in_use(0);

        if reclaimed > 0 || dropped > 0 {
            log::debug!(
                "Reclaimed {} in-use instances, dropped {} destroyed instances",
                reclaimed,
                dropped
            );
        }
        log::info!(
            "Initialized ObjectPool generation {}: {} kinds, {} instances created",
            state.stats.generations,
            state.stores.len(),
            created
        );
        Ok(())
    }

    /// Acquire an instance of `template`
    ///
    /// Returns `Ok(None)` when the kind is exhausted and may not grow, or
    /// when an enable handler handed the instance straight back.
    /// An unregistered template is a usage error.
    pub fn acquire(&self, template: &TemplateId) -> PoolResult<Option<Entity>> {
        let index = self.kind_of(template).ok_or_else(|| PoolError::UnregisteredTemplate {
            template: template.clone(),
        })?;
        self.acquire_by_index(index)
    }

    /// Acquire an instance and apply `placement` to it
    ///
    /// Enable handlers run before the placement is applied. Nothing is
    /// placed when the acquisition yields no instance.
    pub fn acquire_with_placement(
        &self,
        template: &TemplateId,
        placement: &Placement,
    ) -> PoolResult<Option<Entity>> {
        let acquired = self.acquire(template)?;
        if let Some(entity) = acquired {
            self.host.borrow_mut().apply_placement(entity, placement);
        }
        Ok(acquired)
    }

    /// Acquire an instance of the kind at `index`
    pub fn acquire_by_index(&self, index: PoolIndex) -> PoolResult<Option<Entity>> {
        let (entity, notification) = {
            let mut state = self.state.borrow_mut();
            let mut host = self.host.borrow_mut();
            let state = &mut *state;

            let kind = index.index();
            let (Some(spec), Some(store)) = (state.specs.get(kind), state.stores.get_mut(kind))
            else {
                return Err(PoolError::KindOutOfRange { index });
            };

            let outcome = store.acquire(spec, &mut *host, self.root);
            state.stats.discarded_invalid += outcome.discarded as u64;
            if outcome.grown {
                state.stats.growth_events += 1;
                log::debug!("Grew pool '{}' to {} instances", spec.template, store.total_len());
            }

            let Some(entity) = outcome.entity else {
                state.stats.exhaustions += 1;
                log::trace!("Pool '{}' exhausted ({} in use)", spec.template, store.in_use_len());
                return Ok(None);
            };

            host.set_active(entity, true);
            let notification = PendingNotification::collect(
                &*host,
                entity,
                spec.message_type,
                LifecycleEvent::Enable,
            );
            log::trace!("Acquired {:?} from '{}'", entity, spec.template);

            let in_use = state.in_use_total();
            state.stats.record_acquire(in_use);
            (entity, notification)
        };

        notification.deliver(self);
        if !self.is_in_use(entity) {
            log::debug!("{:?} was released by its enable handlers; not handing it out", entity);
            return Ok(None);
        }
        Ok(Some(entity))
    }

    /// Return an instance to its pool
    ///
    /// The instance is deactivated, re-parented under the pool root and
    /// queued behind every other idle instance of its kind. Releasing an
    /// instance that is not in use (double release, or never pooled) logs a
    /// warning and does nothing.
    pub fn release(&self, entity: Entity) {
        let notification = {
            let mut state = self.state.borrow_mut();
            let mut host = self.host.borrow_mut();
            let state = &mut *state;

            let Some(kind) = state.stores.iter().position(|store| store.is_in_use(entity)) else {
                state.stats.ignored_releases += 1;
                log::warn!(
                    "Instance {:?} is not in use by the object pool; release ignored",
                    entity
                );
                return;
            };
            let spec = &state.specs[kind];
            let store = &mut state.stores[kind];

            if !host.is_alive(entity) {
                store.take_in_use(entity);
                state.stats.discarded_invalid += 1;
                log::warn!(
                    "Released instance {:?} of '{}' was already destroyed; dropping it",
                    entity,
                    spec.template
                );
                let in_use = state.in_use_total();
                state.stats.track_in_use(in_use);
                return;
            }

            store.release(entity);
            host.set_active(entity, false);
            host.reparent_to_pool(entity, self.root);
            let notification = PendingNotification::collect(
                &*host,
                entity,
                spec.message_type,
                LifecycleEvent::Disable,
            );
            log::trace!("Released {:?} back to '{}'", entity, spec.template);

            let in_use = state.in_use_total();
            state.stats.record_release(in_use);
            notification
        };

        notification.deliver(self);
    }

    /// Index of the kind built from `template`
    pub fn kind_of(&self, template: &TemplateId) -> Option<PoolIndex> {
        self.state.borrow().registry.lookup(template)
    }

    /// Current spec of the kind at `index`
    pub fn spec(&self, index: PoolIndex) -> Option<PoolItemSpec> {
        self.state.borrow().specs.get(index.index()).cloned()
    }

    /// Number of registered kinds
    pub fn kind_count(&self) -> usize {
        self.state.borrow().stores.len()
    }

    /// Idle instances of `template`
    pub fn available_count(&self, template: &TemplateId) -> Option<usize> {
        self.state.borrow().store(template).map(RecyclingStore::available_len)
    }

    /// Instances of `template` currently handed out
    pub fn in_use_count(&self, template: &TemplateId) -> Option<usize> {
        self.state.borrow().store(template).map(RecyclingStore::in_use_len)
    }

    /// Instances of `template` tracked in either partition
    pub fn total_count(&self, template: &TemplateId) -> Option<usize> {
        self.state.borrow().store(template).map(RecyclingStore::total_len)
    }

    /// Idle instances of `template` in the order they will be reused
    pub fn available_entities(&self, template: &TemplateId) -> Option<Vec<Entity>> {
        self.state.borrow().store(template).map(|store| store.available().collect())
    }

    /// Whether `entity` is currently handed out by any kind
    pub fn is_in_use(&self, entity: Entity) -> bool {
        self.state.borrow().stores.iter().any(|store| store.is_in_use(entity))
    }

    /// Container idle instances are parented under
    pub fn pool_root(&self) -> Entity {
        self.root
    }

    /// Snapshot of usage counters
    pub fn stats(&self) -> PoolStats {
        self.state.borrow().stats.clone()
    }

    /// Shared handle to the injected host
    pub fn host(&self) -> Rc<RefCell<dyn PoolHost>> {
        Rc::clone(&self.host)
    }
}

impl fmt::Debug for ObjectPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ObjectPool")
            .field("root", &self.root)
            .field("specs", &state.specs)
            .field("stores", &state.stores)
            .field("stats", &state.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::spec::NotificationMode;
    use crate::scene::{Prefab, SceneGraph};

    fn pool_with(definition: &PoolDefinition) -> (Rc<RefCell<SceneGraph>>, ObjectPool) {
        let mut scene = SceneGraph::new();
        for item in &definition.items {
            scene.register_prefab(item.template.clone(), Prefab::new(item.template.as_str()));
        }
        let scene = Rc::new(RefCell::new(scene));
        let pool =
            ObjectPool::with_definition(scene.clone(), definition).expect("valid definition");
        (scene, pool)
    }

    fn bullets(amount: usize) -> PoolDefinition {
        PoolDefinition::new().with_item(PoolItemSpec::new("bullet", amount))
    }

    #[test]
    fn test_initialize_creates_inactive_instances_under_root() {
        let bullet = TemplateId::new("bullet");
        let (scene, pool) = pool_with(&bullets(4));

        assert_eq!(pool.available_count(&bullet), Some(4));
        assert_eq!(pool.in_use_count(&bullet), Some(0));

        let scene = scene.borrow();
        for entity in pool.available_entities(&bullet).unwrap() {
            assert!(!scene.is_active(entity));
            assert_eq!(scene.parent(entity), Some(pool.pool_root()));
        }
    }

    #[test]
    fn test_acquire_activates_and_release_reparents() {
        let bullet = TemplateId::new("bullet");
        let (scene, pool) = pool_with(&bullets(1));
        let holder = scene.borrow_mut().spawn("Turret", None);

        let entity = pool
            .acquire_with_placement(&bullet, &Placement::under(holder))
            .unwrap()
            .expect("one idle instance");
        assert!(scene.borrow().is_active(entity));
        assert_eq!(scene.borrow().parent(entity), Some(holder));
        assert!(pool.is_in_use(entity));

        pool.release(entity);
        assert!(!scene.borrow().is_active(entity));
        assert_eq!(scene.borrow().parent(entity), Some(pool.pool_root()));
        assert!(!pool.is_in_use(entity));
    }

    #[test]
    fn test_unregistered_template_is_an_error() {
        let (_scene, pool) = pool_with(&bullets(1));

        let result = pool.acquire(&TemplateId::new("rocket"));
        assert!(matches!(result, Err(PoolError::UnregisteredTemplate { .. })));
    }

    #[test]
    fn test_acquire_by_out_of_range_index() {
        let (_scene, pool) = pool_with(&PoolDefinition::new());
        let bogus = {
            let mut registry = TemplateRegistry::new();
            registry.register(&TemplateId::new("a"));
            registry.register(&TemplateId::new("b")).0
        };

        assert!(matches!(pool.acquire_by_index(bogus), Err(PoolError::KindOutOfRange { .. })));
    }

    #[test]
    fn test_duplicate_template_definition_is_rejected() {
        let scene = Rc::new(RefCell::new(SceneGraph::new()));
        let pool = ObjectPool::new(scene);
        let definition = PoolDefinition::new()
            .with_item(PoolItemSpec::new("bullet", 1))
            .with_item(PoolItemSpec::new("bullet", 2));

        assert!(matches!(pool.initialize(&definition), Err(PoolError::Config(_))));
        assert_eq!(pool.kind_count(), 0);
    }

    #[test]
    fn test_unknown_release_is_ignored() {
        let bullet = TemplateId::new("bullet");
        let (scene, pool) = pool_with(&bullets(2));
        let stranger = scene.borrow_mut().spawn("Stranger", None);

        pool.release(stranger);
        assert_eq!(pool.available_count(&bullet), Some(2));
        assert_eq!(pool.stats().ignored_releases, 1);
        assert_eq!(scene.borrow().parent(stranger), None);
    }

    #[test]
    fn test_double_release_is_ignored() {
        let bullet = TemplateId::new("bullet");
        let (_scene, pool) = pool_with(&bullets(2));

        let entity = pool.acquire(&bullet).unwrap().unwrap();
        pool.release(entity);
        pool.release(entity);

        assert_eq!(pool.available_count(&bullet), Some(2));
        assert_eq!(pool.stats().releases, 1);
        assert_eq!(pool.stats().ignored_releases, 1);
    }

    #[test]
    fn test_releasing_destroyed_in_use_instance_drops_it() {
        let bullet = TemplateId::new("bullet");
        let (scene, pool) = pool_with(&bullets(2));

        let entity = pool.acquire(&bullet).unwrap().unwrap();
        scene.borrow_mut().destroy(entity);
        pool.release(entity);

        assert_eq!(pool.in_use_count(&bullet), Some(0));
        assert_eq!(pool.total_count(&bullet), Some(1));
    }

    #[test]
    fn test_reinitialize_with_lower_capacity_keeps_existing_instances() {
        let bullet = TemplateId::new("bullet");
        let (_scene, pool) = pool_with(&bullets(4));

        pool.initialize(&bullets(2)).unwrap();

        assert_eq!(pool.total_count(&bullet), Some(4));
        assert_eq!(pool.available_count(&bullet), Some(4));
        assert_eq!(pool.spec(pool.kind_of(&bullet).unwrap()).unwrap().amount_to_pool, 2);
    }

    #[test]
    fn test_reinitialize_updates_spec_of_known_kind() {
        let bullet = TemplateId::new("bullet");
        let (_scene, pool) = pool_with(&bullets(1));

        let deeper = PoolItemSpec::new("bullet", 3).with_notification(NotificationMode::DeepNotify);
        pool.initialize(&PoolDefinition::new().with_item(deeper)).unwrap();

        let index = pool.kind_of(&bullet).unwrap();
        assert_eq!(index.index(), 0);
        assert_eq!(pool.spec(index).unwrap().message_type, NotificationMode::DeepNotify);
        assert_eq!(pool.total_count(&bullet), Some(3));
    }

    #[test]
    fn test_stats_track_peak_usage() {
        let bullet = TemplateId::new("bullet");
        let (_scene, pool) = pool_with(&bullets(3));

        let a = pool.acquire(&bullet).unwrap().unwrap();
        let b = pool.acquire(&bullet).unwrap().unwrap();
        pool.release(a);
        pool.release(b);
        let _c = pool.acquire(&bullet).unwrap().unwrap();

        let stats = pool.stats();
        assert_eq!(stats.acquisitions, 3);
        assert_eq!(stats.releases, 2);
        assert_eq!(stats.in_use, 1);
        assert_eq!(stats.peak_in_use, 2);
        assert_eq!(stats.generations, 1);
    }
}
