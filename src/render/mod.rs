//! Annotation rendering module
//!
//! This module contains:
//! - Geometry constants shared by the renderers
//! - Image rendering using tiny-skia (for saving and copying)

pub mod geometry;
pub mod image;
