//! Specialized collection types

pub use slotmap::SlotMap;

use crate::ecs::Entity;

/// Handle-based map keyed by entity for stable, generation-checked references
pub type EntityMap<T> = SlotMap<Entity, T>;
