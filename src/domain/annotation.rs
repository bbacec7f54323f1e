//! Annotation types for drawing on screenshots
//!
//! All annotation types store coordinates in canvas (image pixel) coordinates.

use super::geometry::{Bounds, Point, polyline_hit};
use crate::config::{RgbaColor, StrokeWidth};

/// How a freehand stroke is painted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Opaque pen line
    Solid,
    /// Semi-transparent marker with round caps and joins
    Highlight,
}

/// Freehand path drawn with the pen or marker
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub color: RgbaColor,
    pub width: StrokeWidth,
    pub mode: RenderMode,
}

impl Stroke {
    pub fn new(start: Point, color: RgbaColor, width: StrokeWidth, mode: RenderMode) -> Self {
        Self {
            points: vec![start],
            color,
            width,
            mode,
        }
    }

    /// Check if a point touches the painted line
    pub fn hit(&self, p: Point) -> bool {
        let radius = (self.width.get() as f32 * 0.5).max(1.0);
        polyline_hit(&self.points, p, radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShapeKind {
    Rectangle,
    Ellipse,
}

/// Outline shape (no fill) spanning a normalized bounding box
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub bounds: Bounds,
    pub color: RgbaColor,
    pub width: StrokeWidth,
}

impl Shape {
    /// Check if a point falls inside the shape's painted area
    pub fn hit(&self, p: Point) -> bool {
        let half_width = self.width.get() as f32 * 0.5;
        match self.kind {
            ShapeKind::Rectangle => self.bounds.inflate(half_width).contains(p),
            ShapeKind::Ellipse => self.bounds.ellipse_contains(p, half_width),
        }
    }
}

/// Committed annotation, drawn in insertion order
#[derive(Clone, Debug, PartialEq)]
pub enum Annotation {
    Stroke(Stroke),
    Shape(Shape),
}

impl Annotation {
    pub fn hit(&self, p: Point) -> bool {
        match self {
            Annotation::Stroke(stroke) => stroke.hit(p),
            Annotation::Shape(shape) => shape.hit(p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(kind: ShapeKind, a: (f32, f32), b: (f32, f32), width: u32) -> Shape {
        Shape {
            kind,
            bounds: Bounds::from_corners(a.into(), b.into()),
            color: RgbaColor::RED,
            width: StrokeWidth::new(width),
        }
    }

    #[test]
    fn test_stroke_hit_uses_half_width() {
        let mut stroke = Stroke::new(
            Point::new(0.0, 0.0),
            RgbaColor::RED,
            StrokeWidth::new(10),
            RenderMode::Solid,
        );
        stroke.points.push(Point::new(100.0, 0.0));
        assert!(stroke.hit(Point::new(50.0, 4.5)));
        assert!(!stroke.hit(Point::new(50.0, 6.0)));
    }

    #[test]
    fn test_thin_stroke_still_hittable() {
        let mut stroke = Stroke::new(
            Point::new(0.0, 0.0),
            RgbaColor::RED,
            StrokeWidth::new(1),
            RenderMode::Highlight,
        );
        stroke.points.push(Point::new(0.0, 10.0));
        assert!(stroke.hit(Point::new(0.9, 5.0)));
    }

    #[test]
    fn test_rectangle_hit_includes_interior_and_pen() {
        let shape = rect(ShapeKind::Rectangle, (10.0, 10.0), (50.0, 50.0), 4);
        assert!(shape.hit(Point::new(30.0, 30.0)));
        assert!(shape.hit(Point::new(8.5, 30.0)));
        assert!(!shape.hit(Point::new(7.0, 30.0)));
    }

    #[test]
    fn test_ellipse_hit_excludes_corners() {
        let shape = rect(ShapeKind::Ellipse, (0.0, 0.0), (100.0, 50.0), 2);
        assert!(shape.hit(Point::new(50.0, 25.0)));
        assert!(!shape.hit(Point::new(2.0, 2.0)));
    }

    #[test]
    fn test_degenerate_ellipse_hit_matches_drawn_outline() {
        // Drawn with radius 1 and a 2px pen, so the paint reaches 2px out
        let shape = rect(ShapeKind::Ellipse, (10.0, 10.0), (10.0, 10.0), 2);
        assert!(shape.hit(Point::new(11.5, 10.0)));
        assert!(shape.hit(Point::new(10.0, 8.2)));
        assert!(!shape.hit(Point::new(12.5, 10.0)));
    }
}
