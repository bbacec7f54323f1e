//! Gesture scripts: recorded toolbar changes and pointer input
//!
//! A script is JSON of the form
//!
//! ```json
//! { "steps": [
//!     { "tool": "rectangle" }, { "color": "#00ff00" }, { "width": 4 },
//!     { "press": [50, 50] }, { "move": [10, 10] }, { "release": [10, 10] }
//! ] }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::messages::{EditMsg, PointerButton, PointerMsg};
use super::state::EditSession;
use crate::annotations::Preview;
use crate::config::{RgbaColor, StrokeWidth, Tool};
use crate::domain::Point;

/// Press or release position, optionally naming the button
///
/// `[x, y]` means the primary button, `{"at": [x, y], "button": "secondary"}`
/// names one explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ButtonAt {
    Primary(Point),
    With { at: Point, button: PointerButton },
}

impl ButtonAt {
    fn parts(self) -> (Point, PointerButton) {
        match self {
            ButtonAt::Primary(at) => (at, PointerButton::Primary),
            ButtonAt::With { at, button } => (at, button),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Tool(Tool),
    Color(RgbaColor),
    Width(StrokeWidth),
    /// Button down
    Press(ButtonAt),
    /// Pointer moved with the primary button held
    Move(Point),
    /// Pointer moved with no button held
    Hover(Point),
    /// Button up
    Release(ButtonAt),
}

impl From<Step> for EditMsg {
    fn from(step: Step) -> Self {
        match step {
            Step::Tool(tool) => EditMsg::Tool(tool),
            Step::Color(color) => EditMsg::Color(color),
            Step::Width(width) => EditMsg::Width(width),
            Step::Press(pressed) => {
                let (at, button) = pressed.parts();
                PointerMsg::Press { at, button }.into()
            }
            Step::Move(at) => PointerMsg::drag(at.x, at.y).into(),
            Step::Hover(at) => PointerMsg::Move {
                at,
                primary_held: false,
            }
            .into(),
            Step::Release(released) => {
                let (at, button) = released.parts();
                PointerMsg::Release { at, button }.into()
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read gesture script: {}", path.display()))?;
        Self::parse(&json).with_context(|| format!("Invalid gesture script: {}", path.display()))
    }

    pub fn parse(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Feed every step into the session in order
    pub fn replay(&self, session: &mut EditSession) {
        log::debug!("Replaying {} script step(s)", self.steps.len());
        for step in &self.steps {
            session.handle((*step).into());
        }
        if session.is_drawing() {
            let pending = match session.preview() {
                Some(Preview::Stroke(_)) => "stroke",
                Some(Preview::Shape(_)) => "shape",
                None => "gesture",
            };
            log::warn!("Gesture script ended without a release; the last {pending} is not committed");
        }
    }
}
