//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the application.
//! Types here should not depend on rendering, capture or I/O code.

pub mod annotation;
pub mod geometry;

pub use annotation::*;
pub use geometry::*;
