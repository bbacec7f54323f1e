//! Annotation surface: the committed annotation set plus the gesture in progress

use crate::domain::{Annotation, Point, Shape, Stroke};

/// In-progress gesture, chosen once from the active tool on press
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Gesture {
    /// Pen or marker stroke being drawn
    Freehand(Stroke),
    /// Provisional rectangle/ellipse anchored at the press point
    Shape { anchor: Point, shape: Shape },
    /// Eraser held down; removal happens on every move
    Erase,
    /// Arrow tool is not implemented: the drag is tracked but never drawn
    Arrow { start: Point, end: Point },
}

/// Live view of the object being drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Preview<'a> {
    Stroke(&'a Stroke),
    Shape(&'a Shape),
}

#[derive(Clone, Debug, Default)]
pub struct AnnotationSurface {
    pub(crate) annotations: Vec<Annotation>,
    pub(crate) gesture: Option<Gesture>,
}

impl AnnotationSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed annotations in paint order (last is on top)
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Whether a gesture is in progress
    pub fn is_drawing(&self) -> bool {
        self.gesture.is_some()
    }

    /// The uncommitted stroke or shape, if one is being drawn
    pub fn preview(&self) -> Option<Preview<'_>> {
        match self.gesture.as_ref()? {
            Gesture::Freehand(stroke) => Some(Preview::Stroke(stroke)),
            Gesture::Shape { shape, .. } => Some(Preview::Shape(shape)),
            Gesture::Erase | Gesture::Arrow { .. } => None,
        }
    }

    pub(crate) fn commit(&mut self, annotation: Annotation) {
        self.annotations.push(annotation);
    }

    /// Remove every committed annotation hit at `p`, returning how many were removed
    pub(crate) fn erase_at(&mut self, p: Point) -> usize {
        let before = self.annotations.len();
        self.annotations.retain(|a| !a.hit(p));
        before - self.annotations.len()
    }
}
