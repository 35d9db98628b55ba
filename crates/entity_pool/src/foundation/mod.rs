//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types for placement
//! - Collections keyed by entity handles
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
