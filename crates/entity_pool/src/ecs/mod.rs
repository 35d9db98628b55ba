//! Entity identifiers shared between the pool and its host

pub mod entity;

pub use entity::Entity;
