//! Image rendering for annotations using tiny-skia
//!
//! These functions flatten the screenshot and its annotations into one
//! RgbaImage for saving to disk or copying to the clipboard.

use image::RgbaImage;
use tiny_skia::{ColorU8, FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Transform};

use super::geometry::{shape, stroke};
use crate::config::RgbaColor;
use crate::domain::{Annotation, RenderMode, Shape, ShapeKind, Stroke};

/// Premultiply an RgbaImage into a Pixmap
fn pixmap_from_rgba(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Demultiply a Pixmap back into an RgbaImage
fn rgba_from_pixmap(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

fn paint(color: RgbaColor) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba_u8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Build an ellipse path using cubic bezier curves
fn build_ellipse_path(cx: f32, cy: f32, rx: f32, ry: f32) -> Option<tiny_skia::Path> {
    let kx = rx * shape::BEZIER_K;
    let ky = ry * shape::BEZIER_K;

    let mut pb = PathBuilder::new();

    // Start at top
    pb.move_to(cx, cy - ry);

    // Top to right
    pb.cubic_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);

    // Right to bottom
    pb.cubic_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);

    // Bottom to left
    pb.cubic_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);

    // Left to top
    pb.cubic_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);

    pb.close();
    pb.finish()
}

fn build_rect_path(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(min_x, min_y);
    pb.line_to(max_x, min_y);
    pb.line_to(max_x, max_y);
    pb.line_to(min_x, max_y);
    pb.close();
    pb.finish()
}

/// Draw a pen or marker stroke
pub fn draw_stroke(pixmap: &mut Pixmap, s: &Stroke) {
    let (color, line_cap, line_join) = match s.mode {
        RenderMode::Solid => (s.color, LineCap::Square, LineJoin::Bevel),
        RenderMode::Highlight => (
            s.color.with_alpha(stroke::MARKER_ALPHA),
            LineCap::Round,
            LineJoin::Round,
        ),
    };
    let paint = paint(color);
    let width = s.width.get() as f32;

    let [first, rest @ ..] = s.points.as_slice() else {
        return;
    };

    // A click without movement leaves a dot
    if rest.is_empty() {
        if let Some(dot) = PathBuilder::from_circle(first.x, first.y, width * 0.5) {
            pixmap.fill_path(&dot, &paint, FillRule::Winding, Transform::identity(), None);
        }
        return;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    let Some(path) = pb.finish() else {
        return;
    };

    let sk_stroke = tiny_skia::Stroke {
        width,
        line_cap,
        line_join,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &sk_stroke, Transform::identity(), None);
}

/// Draw a rectangle or ellipse outline
pub fn draw_shape(pixmap: &mut Pixmap, s: &Shape) {
    let (min, max) = (s.bounds.min(), s.bounds.max());
    let path = match s.kind {
        ShapeKind::Rectangle => build_rect_path(min.x, min.y, max.x, max.y),
        ShapeKind::Ellipse => {
            let (c, rx, ry) = s.bounds.ellipse();
            build_ellipse_path(c.x, c.y, rx, ry)
        }
    };
    let Some(path) = path else {
        return;
    };

    let sk_stroke = tiny_skia::Stroke {
        width: s.width.get() as f32,
        line_cap: LineCap::Square,
        line_join: LineJoin::Bevel,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint(s.color), &sk_stroke, Transform::identity(), None);
}

/// Draw all annotations in insertion order (later ones on top)
pub fn draw_annotations_in_order(pixmap: &mut Pixmap, annotations: &[Annotation]) {
    for annotation in annotations {
        match annotation {
            Annotation::Stroke(s) => draw_stroke(pixmap, s),
            Annotation::Shape(s) => draw_shape(pixmap, s),
        }
    }
}

/// Composite the screenshot and annotations into a flat bitmap
///
/// The canvas has the screenshot's size, so there is no area outside it
/// to leave transparent. Pure and deterministic for the same inputs.
pub fn export(base: &RgbaImage, annotations: &[Annotation]) -> RgbaImage {
    let Some(mut pixmap) = pixmap_from_rgba(base) else {
        // Zero-sized image, nothing to draw on
        return base.clone();
    };
    draw_annotations_in_order(&mut pixmap, annotations);
    rgba_from_pixmap(&pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StrokeWidth;
    use crate::domain::Bounds;

    const WHITE: image::Rgba<u8> = image::Rgba([255, 255, 255, 255]);

    fn white(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, WHITE)
    }

    fn line(points: &[(f32, f32)], color: RgbaColor, width: u32, mode: RenderMode) -> Annotation {
        Annotation::Stroke(Stroke {
            points: points.iter().map(|&p| p.into()).collect(),
            color,
            width: StrokeWidth::new(width),
            mode,
        })
    }

    fn outline(kind: ShapeKind, a: (f32, f32), b: (f32, f32), width: u32) -> Annotation {
        Annotation::Shape(Shape {
            kind,
            bounds: Bounds::from_corners(a.into(), b.into()),
            color: RgbaColor::RED,
            width: StrokeWidth::new(width),
        })
    }

    #[test]
    fn test_export_without_annotations_is_identity() {
        let base = RgbaImage::from_fn(5, 5, |x, y| image::Rgba([x as u8 * 50, y as u8 * 50, 7, 255]));
        assert_eq!(export(&base, &[]), base);
    }

    #[test]
    fn test_pen_stroke_is_opaque() {
        let base = white(40, 40);
        let annotations = [line(
            &[(10.0, 10.0), (30.0, 10.0)],
            RgbaColor::RED,
            2,
            RenderMode::Solid,
        )];
        let out = export(&base, &annotations);
        assert_eq!(out.get_pixel(15, 10).0, [255, 0, 0, 255]);
        assert_eq!(*out.get_pixel(15, 20), WHITE);
    }

    #[test]
    fn test_marker_is_semi_transparent() {
        let base = white(40, 40);
        let annotations = [line(
            &[(5.0, 20.0), (35.0, 20.0)],
            RgbaColor::RED,
            10,
            RenderMode::Highlight,
        )];
        let [r, g, b, a] = export(&base, &annotations).get_pixel(20, 20).0;
        assert!(r >= 250, "red channel {r}");
        assert!((145..=165).contains(&g), "green channel {g}");
        assert!((145..=165).contains(&b), "blue channel {b}");
        assert_eq!(a, 255);
    }

    #[test]
    fn test_single_point_stroke_draws_dot() {
        let base = white(20, 20);
        let annotations = [line(&[(10.0, 10.0)], RgbaColor::RED, 6, RenderMode::Solid)];
        let out = export(&base, &annotations);
        assert_eq!(out.get_pixel(10, 10).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_later_annotations_paint_on_top() {
        let base = white(40, 40);
        let green = RgbaColor::rgb(0, 255, 0);
        let annotations = [
            line(&[(0.0, 20.0), (40.0, 20.0)], RgbaColor::RED, 6, RenderMode::Solid),
            line(&[(20.0, 0.0), (20.0, 40.0)], green, 6, RenderMode::Solid),
        ];
        let out = export(&base, &annotations);
        assert_eq!(out.get_pixel(20, 20).0, [0, 255, 0, 255]);
        assert_eq!(out.get_pixel(5, 20).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_shapes_are_outlines_only() {
        let base = white(60, 40);
        let annotations = [outline(ShapeKind::Ellipse, (50.0, 30.0), (10.0, 10.0), 4)];
        let out = export(&base, &annotations);
        // Center untouched, right edge painted
        assert_eq!(*out.get_pixel(30, 20), WHITE);
        let [r, g, _, _] = out.get_pixel(49, 20).0;
        assert!(r > 200 && g < 100);
    }

    #[test]
    fn test_transparent_base_stays_transparent_outside_annotations() {
        let base = RgbaImage::new(30, 30);
        let annotations = [outline(ShapeKind::Rectangle, (5.0, 5.0), (25.0, 25.0), 2)];
        let out = export(&base, &annotations);
        assert_eq!(out.get_pixel(15, 15).0, [0, 0, 0, 0]);
        assert_eq!(out.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(out.get_pixel(5, 15).0[3], 255);
    }

    #[test]
    fn test_export_is_deterministic() {
        let base = white(64, 48);
        let annotations = [
            line(&[(3.0, 3.0), (40.0, 30.0), (60.0, 5.0)], RgbaColor::RED, 3, RenderMode::Solid),
            line(&[(0.0, 40.0), (64.0, 40.0)], RgbaColor::rgb(255, 255, 0), 12, RenderMode::Highlight),
            outline(ShapeKind::Ellipse, (10.0, 10.0), (50.0, 44.0), 5),
            outline(ShapeKind::Rectangle, (2.0, 2.0), (20.0, 20.0), 1),
        ];
        let first = export(&base, &annotations);
        let second = export(&base, &annotations);
        assert_eq!(first.as_raw(), second.as_raw());
        assert_ne!(first.as_raw(), base.as_raw());
    }
}
