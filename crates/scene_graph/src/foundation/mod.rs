//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the scene graph:
//! - Math types and operations
//! - Lazily recomputed value caches
//! - Logging utilities

pub mod math;
pub mod cache;
pub mod logging;
