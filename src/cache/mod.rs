//! Versioned offline asset cache
//!
//! This module contains:
//! - Static assets bundled into the binary (the origin)
//! - The on-disk cache store with its install/activate/fetch lifecycle

pub mod assets;
pub mod store;
