//! Recycling Store
//!
//! Per-kind pair of partitions: a FIFO queue of idle instances and an
//! unordered set of instances handed out to callers. Every live instance the
//! store created sits in exactly one of the two.
//!
//! # State machine
//!
//! ```text
//!            grow
//!   (host) ───────► Available ──acquire──► InUse
//!                       ▲                    │
//!                       └──────release───────┘
//! ```
//!
//! Entries destroyed behind the pool's back are dropped when they reach the
//! head of the queue.

use super::host::PoolHost;
use super::spec::PoolItemSpec;
use crate::ecs::Entity;
use std::collections::VecDeque;

/// Result of one acquisition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AcquireOutcome {
    /// Instance now in use, `None` when the kind is exhausted
    pub entity: Option<Entity>,
    /// Whether a new instance had to be created
    pub grown: bool,
    /// Dead entries dropped from the head of the queue
    pub discarded: usize,
}

/// Result of moving a previous generation's instances back to idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReclaimOutcome {
    /// Live in-use instances returned to the available queue
    pub reclaimed: usize,
    /// Dead instances dropped from either partition
    pub dropped: usize,
}

/// Available and in-use partitions of one pooled kind
#[derive(Debug, Default)]
pub struct RecyclingStore {
    available: VecDeque<Entity>,
    in_use: Vec<Entity>,
}

impl RecyclingStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of idle instances
    pub fn available_len(&self) -> usize {
        self.available.len()
    }

    /// Number of instances handed out
    pub fn in_use_len(&self) -> usize {
        self.in_use.len()
    }

    /// Instances tracked in either partition
    pub fn total_len(&self) -> usize {
        self.available.len() + self.in_use.len()
    }

    /// Idle instances in reuse order
    pub fn available(&self) -> impl Iterator<Item = Entity> + '_ {
        self.available.iter().copied()
    }

    /// Instances currently handed out
    pub fn in_use(&self) -> impl Iterator<Item = Entity> + '_ {
        self.in_use.iter().copied()
    }

    /// Whether `entity` is currently handed out from this store
    pub fn is_in_use(&self, entity: Entity) -> bool {
        self.in_use.contains(&entity)
    }

    /// Whether `entity` is waiting in the available queue
    pub fn is_available(&self, entity: Entity) -> bool {
        self.available.contains(&entity)
    }

    /// Whether acquisition may create a new instance
    pub fn can_grow(&self, spec: &PoolItemSpec) -> bool {
        spec.should_expand || self.in_use.len() < spec.amount_to_pool
    }

    /// Run the acquisition algorithm
    ///
    /// Dequeues the oldest idle instance, skipping entries the host no longer
    /// knows about. When the queue runs dry a single instance is grown if the
    /// spec allows it. The returned entity has already been moved into the
    /// in-use partition.
    pub fn acquire(
        &mut self,
        spec: &PoolItemSpec,
        host: &mut dyn PoolHost,
        pool_root: Entity,
    ) -> AcquireOutcome {
        let mut outcome = AcquireOutcome::default();

        loop {
            while let Some(entity) = self.available.pop_front() {
                if host.is_alive(entity) {
                    self.in_use.push(entity);
                    outcome.entity = Some(entity);
                    return outcome;
                }
                log::warn!(
                    "Pooled instance {:?} of '{}' was destroyed outside the pool; discarding",
                    entity,
                    spec.template
                );
                outcome.discarded += 1;
            }

            if outcome.grown || !self.can_grow(spec) {
                return outcome;
            }

            if self.grow(spec, host, pool_root).is_none() {
                return outcome;
            }
            outcome.grown = true;
        }
    }

    /// Create one inactive instance at the tail of the available queue
    pub fn grow(
        &mut self,
        spec: &PoolItemSpec,
        host: &mut dyn PoolHost,
        pool_root: Entity,
    ) -> Option<Entity> {
        let Some(entity) = host.instantiate(&spec.template, pool_root) else {
            log::warn!("Host could not instantiate template '{}'", spec.template);
            return None;
        };
        host.set_active(entity, false);
        self.available.push_back(entity);
        Some(entity)
    }

    /// Move an in-use instance to the tail of the available queue
    ///
    /// Returns `false` when the instance is not in use here.
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.take_in_use(entity) {
            return false;
        }
        self.available.push_back(entity);
        true
    }

    /// Remove an instance from the in-use partition without re-queueing it
    pub fn take_in_use(&mut self, entity: Entity) -> bool {
        match self.in_use.iter().position(|&candidate| candidate == entity) {
            Some(position) => {
                self.in_use.swap_remove(position);
                true
            }
            None => false,
        }
    }

    /// Treat every in-use instance as released and forget dead entries
    ///
    /// Used when the environment reloads and previous owners no longer exist.
    pub fn reclaim(&mut self, host: &mut dyn PoolHost, pool_root: Entity) -> ReclaimOutcome {
        let mut outcome = ReclaimOutcome::default();

        let before = self.available.len();
        self.available.retain(|&entity| host.is_alive(entity));
        outcome.dropped += before - self.available.len();

        for entity in self.in_use.drain(..) {
            if host.is_alive(entity) {
                host.set_active(entity, false);
                host.reparent_to_pool(entity, pool_root);
                self.available.push_back(entity);
                outcome.reclaimed += 1;
            } else {
                outcome.dropped += 1;
            }
        }

        outcome
    }

    /// Create instances until the store holds `amount_to_pool`
    ///
    /// Returns how many were created. Stops early if the host cannot build
    /// the template.
    pub fn top_up(
        &mut self,
        spec: &PoolItemSpec,
        host: &mut dyn PoolHost,
        pool_root: Entity,
    ) -> usize {
        let mut created = 0;
        while self.total_len() < spec.amount_to_pool {
            if self.grow(spec, host, pool_root).is_none() {
                break;
            }
            created += 1;
        }
        created
    }
}
