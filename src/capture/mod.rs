//! Screen capture through an external screenshot program
//!
//! This module consolidates:
//! - Capture modes and the provider seam
//! - The command-line provider (gnome-screenshot by default)
//! - Screenshot image type (image.rs)

pub mod image;

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::TempPath;

/// Region the user wants to capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureMode {
    #[default]
    Rectangle,
    Freeform,
    Window,
    Fullscreen,
}

impl CaptureMode {
    pub const ALL: [CaptureMode; 4] = [
        CaptureMode::Rectangle,
        CaptureMode::Freeform,
        CaptureMode::Window,
        CaptureMode::Fullscreen,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CaptureMode::Rectangle => "rectangle",
            CaptureMode::Freeform => "freeform",
            CaptureMode::Window => "window",
            CaptureMode::Fullscreen => "fullscreen",
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaptureMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        CaptureMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s))
            .with_context(|| format!("unknown capture mode {s:?}"))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureOptions {
    /// Include the mouse pointer in the image
    pub include_cursor: bool,
}

/// Something that can write a screenshot to a file
///
/// Providers are called from the blocking thread pool.
pub trait CaptureProvider: Send + Sync {
    /// Capture into `dest`. Success is judged afterwards by the file on disk.
    fn capture(&self, mode: CaptureMode, options: &CaptureOptions, dest: &Path) -> Result<()>;
}

/// Runs a gnome-screenshot compatible program
#[derive(Debug, Clone)]
pub struct CommandCapture {
    program: String,
}

impl CommandCapture {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments for a capture into `dest`
    pub fn args(mode: CaptureMode, options: &CaptureOptions, dest: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::new();
        match mode {
            CaptureMode::Rectangle => args.push("-a".into()),
            CaptureMode::Freeform => {
                log::warn!("Freeform capture is not supported by the capture program, using rectangle");
                args.push("-a".into());
            }
            CaptureMode::Window => args.push("-w".into()),
            CaptureMode::Fullscreen => {}
        }
        if options.include_cursor {
            args.push("-p".into());
        }
        args.push("-f".into());
        args.push(dest.as_os_str().to_owned());
        args
    }
}

impl CaptureProvider for CommandCapture {
    fn capture(&self, mode: CaptureMode, options: &CaptureOptions, dest: &Path) -> Result<()> {
        let args = Self::args(mode, options, dest);
        log::info!("Running {} {:?}", self.program, args);
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .with_context(|| format!("Failed to run {}", self.program))?;
        if !status.success() {
            log::warn!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

/// Screenshot file in the temp directory, removed on drop
#[derive(Debug)]
pub struct CapturedFile {
    path: TempPath,
}

impl CapturedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Capture into a fresh temp file and check that something was written
pub fn capture_to_temp(
    provider: &dyn CaptureProvider,
    mode: CaptureMode,
    options: &CaptureOptions,
) -> Result<CapturedFile> {
    let path = tempfile::Builder::new()
        .prefix("screenshot-")
        .suffix(".png")
        .tempfile()?
        .into_temp_path();

    provider
        .capture(mode, options, &path)
        .context("Screenshot could not be created")?;
    let size = verify_capture(&path)?;
    log::info!("Captured {} ({} bytes) to {}", mode, size, path.display());

    Ok(CapturedFile { path })
}

/// The capture succeeded iff the file exists and is not empty
pub fn verify_capture(path: &Path) -> Result<u64> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => Ok(meta.len()),
        Ok(_) => anyhow::bail!("Screenshot could not be created: {} is empty", path.display()),
        Err(err) => Err(err).with_context(|| {
            format!("Screenshot could not be created: {} is missing", path.display())
        }),
    }
}
