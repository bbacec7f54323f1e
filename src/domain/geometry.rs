//! Geometric types for canvas coordinates and hit-testing

use serde::{Deserialize, Serialize};

/// A point in canvas coordinates (image pixels, origin top-left)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f32, f32)", into = "(f32, f32)")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Distance from this point to the segment `a`-`b`
    pub fn distance_to_segment(self, a: Point, b: Point) -> f32 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return self.distance(a);
        }

        // Project onto the segment and clamp to its ends
        let t = (((self.x - a.x) * dx + (self.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        self.distance(Point::new(a.x + t * dx, a.y + t * dy))
    }
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

impl From<Point> for (f32, f32) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Axis-aligned bounding box with `min <= max` on both axes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    /// Build a normalized box from two arbitrary corners (any drag direction)
    pub fn from_corners(a: Point, b: Point) -> Self {
        let (min_x, min_y, max_x, max_y) = normalize_rect(a.x, a.y, b.x, b.y);
        Self {
            min: Point::new(min_x, min_y),
            max: Point::new(max_x, max_y),
        }
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Grow the box by `amount` on every side
    pub fn inflate(&self, amount: f32) -> Bounds {
        Bounds {
            min: Point::new(self.min.x - amount, self.min.y - amount),
            max: Point::new(self.max.x + amount, self.max.y + amount),
        }
    }

    /// Check if the box contains a point (edges inclusive)
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Center and radii of the ellipse inscribed in this box
    ///
    /// Radii never drop below one pixel, so a degenerate box still yields a
    /// drawable ellipse.
    pub fn ellipse(&self) -> (Point, f32, f32) {
        let rx = (self.width() * 0.5).max(1.0);
        let ry = (self.height() * 0.5).max(1.0);
        (self.center(), rx, ry)
    }

    /// Check if the inscribed ellipse, with both radii grown by `margin`,
    /// contains a point
    pub fn ellipse_contains(&self, p: Point, margin: f32) -> bool {
        let (c, rx, ry) = self.ellipse();
        let (rx, ry) = (rx + margin, ry + margin);
        let nx = (p.x - c.x) / rx;
        let ny = (p.y - c.y) / ry;
        nx * nx + ny * ny <= 1.0
    }
}

/// Normalize min/max coordinates from arbitrary start/end points
#[inline]
pub fn normalize_rect(x1: f32, y1: f32, x2: f32, y2: f32) -> (f32, f32, f32, f32) {
    let (min_x, max_x) = if x1 < x2 { (x1, x2) } else { (x2, x1) };
    let (min_y, max_y) = if y1 < y2 { (y1, y2) } else { (y2, y1) };
    (min_x, min_y, max_x, max_y)
}

/// Check if a point lies within `radius` of a polyline
pub fn polyline_hit(points: &[Point], p: Point, radius: f32) -> bool {
    match points {
        [] => false,
        [only] => only.distance(p) <= radius,
        _ => points
            .windows(2)
            .any(|seg| p.distance_to_segment(seg[0], seg[1]) <= radius),
    }
}
