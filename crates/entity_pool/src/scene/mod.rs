//! Reference scene host
//!
//! A small node hierarchy that implements the pool's host seam. Engines with
//! their own scene graph implement [`PoolHost`](crate::pool::PoolHost)
//! directly; this one backs the demo application and the test suite.

mod prefab;
mod scene_graph;

pub use prefab::{HandlerFactory, Prefab};
pub use scene_graph::{SceneGraph, SceneNode};
