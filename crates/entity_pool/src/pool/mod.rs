//! Object pooling for heavyweight entities
//!
//! Recycles entities instead of destroying and re-creating them. Each pooled
//! kind is described by a [`PoolItemSpec`] and owns a [`RecyclingStore`] with
//! an ordered queue of idle instances and a set of instances in use.
//!
//! # Architecture
//!
//! ```text
//! ObjectPool (composition root)
//!     ├── TemplateRegistry   template → PoolIndex
//!     ├── PoolItemSpec[]     capacity, growth, notification mode
//!     ├── RecyclingStore[]   available (FIFO) / in-use partitions
//!     └── dyn PoolHost       scene services supplied by the engine
//!                 ↓
//!         PendingNotification → PoolAware handlers
//! ```

pub mod error;
pub mod host;
pub mod manager;
pub mod notifier;
pub mod registry;
pub mod spec;
pub mod stats;
pub mod store;

#[cfg(test)]
mod tests;

pub use error::{PoolError, PoolResult};
pub use host::{Placement, PoolAware, PoolHost};
pub use manager::ObjectPool;
pub use notifier::{LifecycleEvent, PendingNotification};
pub use registry::{PoolIndex, TemplateRegistry};
pub use spec::{NotificationMode, NotificationScope, PoolDefinition, PoolItemSpec, TemplateId};
pub use stats::PoolStats;
pub use store::{AcquireOutcome, RecyclingStore, ReclaimOutcome};
