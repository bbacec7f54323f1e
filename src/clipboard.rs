//! Clipboard transfer through an external clipboard program

use std::ffi::OsString;
use std::io::{Read, Seek};
use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use image::RgbaImage;

/// Something that can put a PNG file on the system clipboard
pub trait ClipboardProvider {
    fn copy_png(&self, path: &Path) -> Result<()>;
}

/// Runs an xclip compatible program
#[derive(Debug, Clone)]
pub struct CommandClipboard {
    program: String,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn args(path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = ["-selection", "clipboard", "-t", "image/png", "-i"]
            .into_iter()
            .map(OsString::from)
            .collect();
        args.push(path.as_os_str().to_owned());
        args
    }
}

impl ClipboardProvider for CommandClipboard {
    /// xclip forks a child that keeps serving the selection with our stdio
    /// inherited, so only the parent's exit status is awaited. stderr goes to
    /// a file rather than a pipe that the child would hold open.
    fn copy_png(&self, path: &Path) -> Result<()> {
        let mut stderr = tempfile::tempfile()?;
        let status = Command::new(&self.program)
            .args(Self::args(path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(stderr.try_clone()?)
            .status()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !status.success() {
            let mut message = String::new();
            stderr.rewind()?;
            stderr.read_to_string(&mut message)?;
            anyhow::bail!("{} failed ({}): {}", self.program, status, message.trim());
        }
        Ok(())
    }
}

/// Copy an image file as-is (e.g. the unedited capture)
pub fn copy_file(provider: &dyn ClipboardProvider, path: &Path) -> Result<()> {
    provider
        .copy_png(path)
        .context("Failed to copy screenshot to clipboard")?;
    log::info!("Copied {} to clipboard", path.display());
    Ok(())
}

/// Stage an image as a temporary PNG and copy it
pub fn copy_image(provider: &dyn ClipboardProvider, img: &RgbaImage) -> Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix("clipboard-")
        .suffix(".png")
        .tempfile()?;
    crate::output::write_png(&mut file, img)?;
    let path = file.into_temp_path();
    copy_file(provider, &path)
}
