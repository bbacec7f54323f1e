//! Annotation surface and pointer handlers
//!
//! This module provides:
//! - The annotation surface (committed set + in-progress gesture)
//! - Message handlers for PointerMsg

pub mod handlers;
pub mod surface;

pub use surface::{AnnotationSurface, Preview};
