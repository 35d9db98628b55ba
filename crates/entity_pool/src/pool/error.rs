//! Pool error types

use super::registry::PoolIndex;
use super::spec::TemplateId;
use crate::config::ConfigError;
use thiserror::Error;

/// Errors surfaced by the pool manager
///
/// Exhaustion and unknown-instance release are deliberately absent: the
/// former is `Ok(None)` from acquire, the latter a logged no-op.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Acquire requested for a template that no configuration registered
    #[error("Template '{template}' is not registered with the pool")]
    UnregisteredTemplate {
        /// The template that was requested
        template: TemplateId,
    },

    /// No store exists for the given index
    #[error("No pooled kind at index {index}")]
    KindOutOfRange {
        /// The index that was requested
        index: PoolIndex,
    },

    /// Pool definition could not be loaded or is invalid
    #[error("Pool configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for pool operations
pub type PoolResult<T> = Result<T, PoolError>;
