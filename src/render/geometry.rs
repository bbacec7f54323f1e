//! Shared geometry constants for annotation rendering

/// Freehand stroke constants
pub mod stroke {
    /// Alpha applied to marker strokes (out of 255)
    pub const MARKER_ALPHA: u8 = 100;
}

/// Shape (rectangle/ellipse) constants
pub mod shape {
    /// Ellipse bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;
}
