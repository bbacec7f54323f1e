//! Configuration persistence for snipmark settings

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::capture::CaptureMode;

/// RGBA color (0-255 per channel), stored as `#rrggbb` or `#rrggbbaa`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RgbaColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl RgbaColor {
    pub const RED: RgbaColor = RgbaColor::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Convert to image crate RGBA format
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for RgbaColor {
    fn default() -> Self {
        Self::RED
    }
}

impl FromStr for RgbaColor {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            anyhow::bail!("invalid color {s:?}, expected #rrggbb or #rrggbbaa");
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .with_context(|| format!("invalid color {s:?}, bad hex digits"))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a,
        })
    }
}

impl TryFrom<String> for RgbaColor {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<RgbaColor> for String {
    fn from(c: RgbaColor) -> Self {
        c.to_string()
    }
}

impl fmt::Display for RgbaColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Stroke width in pixels, clamped to the picker range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct StrokeWidth(u32);

impl StrokeWidth {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 20;

    pub fn new(width: u32) -> Self {
        Self(width.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for StrokeWidth {
    fn default() -> Self {
        Self(2)
    }
}

impl From<u32> for StrokeWidth {
    fn from(width: u32) -> Self {
        Self::new(width)
    }
}

impl From<StrokeWidth> for u32 {
    fn from(width: StrokeWidth) -> Self {
        width.0
    }
}

/// Drawing tool selected in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    #[default]
    Pen,
    Marker,
    Eraser,
    Rectangle,
    Ellipse,
    /// Declared but not drawn yet
    Arrow,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Pen,
        Tool::Marker,
        Tool::Eraser,
        Tool::Rectangle,
        Tool::Ellipse,
        Tool::Arrow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::Pen => "pen",
            Tool::Marker => "marker",
            Tool::Eraser => "eraser",
            Tool::Rectangle => "rectangle",
            Tool::Ellipse => "ellipse",
            Tool::Arrow => "arrow",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(s))
            .with_context(|| format!("unknown tool {s:?}"))
    }
}

/// Default save location for screenshots (Pictures or Documents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
}

impl SaveLocation {
    /// Resolve the directory, falling back to a folder under $HOME
    pub fn dir(self) -> Option<PathBuf> {
        match self {
            SaveLocation::Pictures => {
                dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
            }
            SaveLocation::Documents => {
                dirs::document_dir().or_else(|| dirs::home_dir().map(|h| h.join("Documents")))
            }
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Tool selected when the editor opens
    pub tool: Tool,
    /// Color for strokes and shapes
    pub color: RgbaColor,
    /// Stroke width for strokes and shapes (1-20)
    pub width: StrokeWidth,
    /// Capture mode used when none is given
    pub capture_mode: CaptureMode,
    /// Capture delay in seconds (0-10)
    pub delay: u32,
    /// Whether the mouse pointer is included in captures
    pub include_cursor: bool,
    /// Where to save screenshots when no path is given
    pub save_location: SaveLocation,
    /// Whether to also copy to clipboard when saving to file
    pub copy_to_clipboard_on_save: bool,
    /// External screenshot program
    pub capture_program: String,
    /// External clipboard program
    pub clipboard_program: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tool: Tool::Pen,
            color: RgbaColor::RED,
            width: StrokeWidth::default(),
            capture_mode: CaptureMode::Rectangle,
            delay: 0,
            include_cursor: false,
            save_location: SaveLocation::Pictures,
            copy_to_clipboard_on_save: false,
            capture_program: "gnome-screenshot".to_string(),
            clipboard_program: "xclip".to_string(),
        }
    }
}

impl AppConfig {
    /// Directory name under the user's config dir
    pub const ID: &'static str = "snipmark";
    /// Longest supported capture delay in seconds
    pub const MAX_DELAY: u32 = 10;

    /// Path of the config file
    pub fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("No config directory for this user")?;
        Ok(dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let path = match Self::path() {
            Ok(path) => path,
            Err(err) => {
                log::warn!("Could not locate config file: {:?}", err);
                return Self::default();
            }
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
