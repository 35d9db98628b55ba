//! # Entity Pool
//!
//! Recycling pool for heavyweight game entities. Instead of destroying and
//! re-creating projectiles, effects or enemies every frame, the pool keeps a
//! configured number of inactive instances per kind and hands them out again.
//!
//! ## Features
//!
//! - **FIFO Reuse**: Oldest released instance is reused first
//! - **Bounded or Growing Kinds**: Per-kind capacity with optional growth
//! - **Lifecycle Notifications**: Enable/disable events to root or subtree handlers
//! - **Reload Safe**: Reinitialization reclaims orphaned instances and tops stores up
//! - **Asset Driven**: Pool definitions load from RON or TOML
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use entity_pool::prelude::*;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = SceneGraph::new();
//!     scene.register_prefab(TemplateId::new("bullet"), Prefab::new("Bullet"));
//!     let scene = Rc::new(RefCell::new(scene));
//!
//!     let pool = ObjectPool::new(scene.clone());
//!     pool.initialize(&PoolDefinition::new().with_item(PoolItemSpec::new("bullet", 16)))?;
//!
//!     let bullet = TemplateId::new("bullet");
//!     if let Some(instance) = pool.acquire(&bullet)? {
//!         pool.release(instance);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod pool;
pub mod scene;

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat},
        ecs::Entity,
        foundation::math::{Quat, Vec3},
        pool::{
            NotificationMode, ObjectPool, Placement, PoolAware, PoolDefinition, PoolError, PoolHost,
            PoolItemSpec, PoolResult, PoolStats, TemplateId,
        },
        scene::{Prefab, SceneGraph},
    };
}
