//! Screenshot image type for captured screenshots

use std::path::Path;

use anyhow::Context;
use image::RgbaImage;

/// A captured screenshot decoded to raw RGBA
#[derive(Clone, Debug)]
pub struct ScreenshotImage {
    pub rgba: RgbaImage,
}

impl ScreenshotImage {
    /// Decode an image file written by the capture program
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let rgba = image::open(path)
            .with_context(|| format!("Failed to decode screenshot: {}", path.display()))?
            .to_rgba8();
        log::debug!(
            "ScreenshotImage loaded: {}x{} pixels",
            rgba.width(),
            rgba.height()
        );
        Ok(Self { rgba })
    }

    pub fn from_rgba(rgba: RgbaImage) -> Self {
        Self { rgba }
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }
}
