use std::path::Path;

use anyhow::Result;
use image::RgbaImage;

use super::messages::EditMsg;
use crate::annotations::handlers::handle_pointer_msg;
use crate::annotations::{AnnotationSurface, Preview};
use crate::capture::image::ScreenshotImage;
use crate::clipboard::{self, ClipboardProvider};
use crate::config::{AppConfig, RgbaColor, StrokeWidth, Tool};
use crate::domain::Annotation;
use crate::render;

/// Tool, color and width picked in the editor toolbar
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ToolSettings {
    pub tool: Tool,
    pub color: RgbaColor,
    pub width: StrokeWidth,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: RgbaColor::RED,
            width: StrokeWidth::default(),
        }
    }
}

impl From<&AppConfig> for ToolSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            tool: config.tool,
            color: config.color,
            width: config.width,
        }
    }
}

/// One editing session: a screenshot, its annotations and the toolbar state
pub struct EditSession {
    base: ScreenshotImage,
    surface: AnnotationSurface,
    pub settings: ToolSettings,
}

impl EditSession {
    pub fn new(base: ScreenshotImage, settings: ToolSettings) -> Self {
        Self {
            base,
            surface: AnnotationSurface::new(),
            settings,
        }
    }

    /// Open a session on an image file
    pub fn open(path: &Path, settings: ToolSettings) -> Result<Self> {
        Ok(Self::new(ScreenshotImage::load(path)?, settings))
    }

    pub fn base(&self) -> &ScreenshotImage {
        &self.base
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.surface.annotations()
    }

    pub fn preview(&self) -> Option<Preview<'_>> {
        self.surface.preview()
    }

    /// A press has started a gesture that has not been released yet
    pub fn is_drawing(&self) -> bool {
        self.surface.is_drawing()
    }

    pub fn handle(&mut self, msg: EditMsg) {
        match msg {
            EditMsg::Tool(tool) => self.settings.tool = tool,
            EditMsg::Color(color) => self.settings.color = color,
            EditMsg::Width(width) => self.settings.width = width,
            EditMsg::Pointer(pointer) => {
                handle_pointer_msg(&mut self.surface, &self.settings, pointer)
            }
        }
    }

    /// Flatten the screenshot and committed annotations into one bitmap
    pub fn export(&self) -> RgbaImage {
        render::image::export(&self.base.rgba, self.surface.annotations())
    }

    /// Export and write to `path` (PNG or JPEG by extension)
    pub fn save(&self, path: &Path) -> Result<()> {
        crate::output::save_image(&self.export(), path)
    }

    /// Export and hand the bitmap to the clipboard provider
    pub fn copy_to_clipboard(&self, provider: &dyn ClipboardProvider) -> Result<()> {
        clipboard::copy_image(provider, &self.export())
    }
}
