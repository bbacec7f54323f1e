//! Pointer message handlers
//!
//! Turns press/move/release sequences into annotation set mutations.
//! The gesture kind is picked once on press; color and width are copied
//! into the new object at that moment.

use super::surface::{AnnotationSurface, Gesture};
use crate::config::Tool;
use crate::domain::{Annotation, Bounds, Point, RenderMode, Shape, ShapeKind, Stroke};
use crate::session::messages::{PointerButton, PointerMsg};
use crate::session::state::ToolSettings;

/// Handle a PointerMsg, modifying the surface
///
/// Only the primary button draws; other buttons and hover moves are ignored.
pub fn handle_pointer_msg(surface: &mut AnnotationSurface, settings: &ToolSettings, msg: PointerMsg) {
    match msg {
        PointerMsg::Press {
            at,
            button: PointerButton::Primary,
        } => press(surface, settings, at),
        PointerMsg::Move {
            at,
            primary_held: true,
        } => drag(surface, at),
        PointerMsg::Release {
            at,
            button: PointerButton::Primary,
        } => release(surface, at),
        _ => {}
    }
}

fn press(surface: &mut AnnotationSurface, settings: &ToolSettings, at: Point) {
    // A lost release leaves a gesture open; finish it where it last was
    if let Some(pending) = surface.gesture.take() {
        log::debug!("Press while a gesture is open, finishing it first");
        finish(surface, pending, None);
    }

    let gesture = match settings.tool {
        Tool::Pen => start_freehand(settings, at, RenderMode::Solid),
        Tool::Marker => start_freehand(settings, at, RenderMode::Highlight),
        Tool::Rectangle => start_shape(settings, at, ShapeKind::Rectangle),
        Tool::Ellipse => start_shape(settings, at, ShapeKind::Ellipse),
        Tool::Eraser => Gesture::Erase,
        Tool::Arrow => Gesture::Arrow { start: at, end: at },
    };
    log::debug!("Gesture started with {} at ({}, {})", settings.tool, at.x, at.y);
    surface.gesture = Some(gesture);
}

fn drag(surface: &mut AnnotationSurface, at: Point) {
    let erasing = match surface.gesture.as_mut() {
        None => return,
        Some(Gesture::Freehand(stroke)) => {
            stroke.points.push(at);
            false
        }
        Some(Gesture::Shape { anchor, shape }) => {
            shape.bounds = Bounds::from_corners(*anchor, at);
            false
        }
        Some(Gesture::Arrow { end, .. }) => {
            *end = at;
            false
        }
        Some(Gesture::Erase) => true,
    };

    if erasing {
        let removed = surface.erase_at(at);
        if removed > 0 {
            log::debug!("Erased {} annotation(s) at ({}, {})", removed, at.x, at.y);
        }
    }
}

fn release(surface: &mut AnnotationSurface, at: Point) {
    if let Some(gesture) = surface.gesture.take() {
        finish(surface, gesture, Some(at));
    }
}

/// Commit a gesture; `at` is the release position when there was one
fn finish(surface: &mut AnnotationSurface, gesture: Gesture, at: Option<Point>) {
    match gesture {
        Gesture::Freehand(stroke) => {
            log::debug!("Stroke committed with {} point(s)", stroke.points.len());
            surface.commit(Annotation::Stroke(stroke));
        }
        Gesture::Shape { anchor, mut shape } => {
            if let Some(at) = at {
                shape.bounds = Bounds::from_corners(anchor, at);
            }
            log::debug!(
                "{:?} committed ({}x{})",
                shape.kind,
                shape.bounds.width(),
                shape.bounds.height()
            );
            surface.commit(Annotation::Shape(shape));
        }
        Gesture::Erase => {}
        Gesture::Arrow { start, end } => {
            log::debug!(
                "Arrow tool is not implemented, dropping ({}, {}) -> ({}, {})",
                start.x,
                start.y,
                end.x,
                end.y
            );
        }
    }
}

// ============================================================================
// Gesture constructors
// ============================================================================

fn start_freehand(settings: &ToolSettings, at: Point, mode: RenderMode) -> Gesture {
    Gesture::Freehand(Stroke::new(at, settings.color, settings.width, mode))
}

fn start_shape(settings: &ToolSettings, at: Point, kind: ShapeKind) -> Gesture {
    Gesture::Shape {
        anchor: at,
        shape: Shape {
            kind,
            bounds: Bounds::from_corners(at, at),
            color: settings.color,
            width: settings.width,
        },
    }
}
