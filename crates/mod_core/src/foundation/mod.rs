//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Logging setup and re-exported macros
//! - Handle-based collections for registries

pub mod collections;
pub mod logging;
