//! Writing exported screenshots to disk

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::RgbaImage;
use image::codecs::jpeg::JpegEncoder;

use crate::config::SaveLocation;

const JPEG_QUALITY: u8 = 90;

/// Raster format picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
}

impl OutputFormat {
    /// `.png` or no extension is PNG, `.jpg`/`.jpeg` is JPEG
    pub fn from_path(path: &Path) -> Result<Self> {
        let Some(ext) = path.extension() else {
            return Ok(OutputFormat::Png);
        };
        match ext.to_string_lossy().to_ascii_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpg" | "jpeg" => Ok(OutputFormat::Jpeg),
            other => anyhow::bail!("Unsupported image format: .{other} (use .png or .jpg)"),
        }
    }
}

pub fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

/// JPEG has no alpha channel, so it is dropped
pub fn write_jpeg<W: io::Write>(w: W, image: &RgbaImage) -> image::ImageResult<()> {
    let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
    JpegEncoder::new_with_quality(w, JPEG_QUALITY).encode_image(&rgb)
}

/// Encode `img` into `path`, surfacing any file-system error
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format = OutputFormat::from_path(path)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = io::BufWriter::new(file);
    match format {
        OutputFormat::Png => write_png(&mut writer, img)?,
        OutputFormat::Jpeg => write_jpeg(&mut writer, img)?,
    }
    io::Write::flush(&mut writer).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Saved screenshot to {}", path.display());
    Ok(())
}

/// File name suggested for a new screenshot
pub fn default_file_name() -> String {
    chrono::Local::now()
        .format("Screenshot_%Y%m%d_%H%M%S.png")
        .to_string()
}

pub fn get_img_path(location: SaveLocation) -> Option<PathBuf> {
    let mut path = location.dir()?;
    path.push(default_file_name());
    Some(path)
}

/// Ask for a destination with the native save dialog
pub fn pick_save_path(location: SaveLocation) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new()
        .set_title("Save screenshot")
        .set_file_name(default_file_name())
        .add_filter("PNG Files", &["png"])
        .add_filter("JPEG Files", &["jpg", "jpeg"]);
    if let Some(dir) = location.dir() {
        dialog = dialog.set_directory(dir);
    }
    dialog.save_file()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(8, 4, |x, y| image::Rgba([x as u8 * 30, y as u8 * 60, 90, 255]))
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a.png")).unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("a.JPG")).unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("a.jpeg")).unwrap(), OutputFormat::Jpeg);
        assert_eq!(OutputFormat::from_path(Path::new("shot")).unwrap(), OutputFormat::Png);
        assert!(OutputFormat::from_path(Path::new("a.gif")).is_err());
    }

    #[test]
    fn test_save_png_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save_image(&sample(), &path).unwrap();
        assert_eq!(image::open(&path).unwrap().to_rgba8(), sample());
    }

    #[test]
    fn test_save_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        save_image(&sample(), &path).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
        assert_eq!(image::ImageFormat::from_path(&path).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn test_unsupported_extension_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bmp");
        assert!(save_image(&sample(), &path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_default_file_name_shape() {
        let name = default_file_name();
        assert!(name.starts_with("Screenshot_"));
        assert!(name.ends_with(".png"));
        assert_eq!(name.len(), "Screenshot_20250101_120000.png".len());
    }
}
