//! Editing session management module
//!
//! This module contains:
//! - Session state (screenshot, annotation surface, toolbar settings)
//! - Message types for editor interactions
//! - Gesture scripts replayed into a session

pub mod messages;
pub mod script;
pub mod state;

pub use state::{EditSession, ToolSettings};
