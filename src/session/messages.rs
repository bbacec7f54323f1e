//! Messages delivered to an editing session

use serde::{Deserialize, Serialize};

use crate::config::{RgbaColor, StrokeWidth, Tool};
use crate::domain::Point;

/// Mouse button reported with press/release events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
}

/// Pointer input in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMsg {
    Press { at: Point, button: PointerButton },
    /// Pointer moved; `primary_held` reports whether the primary button is down
    Move { at: Point, primary_held: bool },
    Release { at: Point, button: PointerButton },
}

impl PointerMsg {
    pub fn press(x: f32, y: f32) -> Self {
        PointerMsg::Press {
            at: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    pub fn drag(x: f32, y: f32) -> Self {
        PointerMsg::Move {
            at: Point::new(x, y),
            primary_held: true,
        }
    }

    pub fn release(x: f32, y: f32) -> Self {
        PointerMsg::Release {
            at: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }
}

/// Everything the editor UI can send to a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditMsg {
    Tool(Tool),
    Color(RgbaColor),
    Width(StrokeWidth),
    Pointer(PointerMsg),
}

impl From<PointerMsg> for EditMsg {
    fn from(msg: PointerMsg) -> Self {
        EditMsg::Pointer(msg)
    }
}
