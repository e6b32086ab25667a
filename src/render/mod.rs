//! Annotation rendering module
//!
//! This module contains:
//! - Geometry constants and math shared by the drawing functions
//! - Image rendering using tiny-skia and direct pixel access

pub mod geometry;
pub mod image;
