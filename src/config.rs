//! Configuration persistence for mosaic settings

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::render::geometry::{dash, mosaic};

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for ShapeColor {
    fn default() -> Self {
        // Default red color for outline rectangles
        Self {
            r: 0.9,
            g: 0.1,
            b: 0.1,
        }
    }
}

impl ShapeColor {
    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
            255,
        ]
    }
}

/// Save location for redacted images (Pictures or Documents)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    #[default]
    Pictures,
    Documents,
}

impl SaveLocation {
    /// Resolve the directory for this location, falling back to the
    /// current directory when the XDG lookup fails.
    pub fn directory(self) -> PathBuf {
        let dir = match self {
            SaveLocation::Pictures => dirs::picture_dir(),
            SaveLocation::Documents => dirs::document_dir(),
        };
        dir.unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Redaction tool type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RedactTool {
    #[default]
    Redact,
    Pixelate,
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MosaicConfig {
    /// Where to save redacted images
    pub save_location: SaveLocation,
    /// Color for outline rectangles
    pub shape_color: ShapeColor,
    /// Dash pattern for outline rectangles (on/off run lengths)
    pub dash_pattern: Vec<f32>,
    /// Fill tool applied to sensitive regions
    pub primary_redact_tool: RedactTool,
    /// Block edge length for pixelation, in pixels
    pub pixelation_block_size: u32,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            save_location: SaveLocation::default(),
            shape_color: ShapeColor::default(),
            dash_pattern: dash::PATTERN.to_vec(),
            primary_redact_tool: RedactTool::default(),
            pixelation_block_size: mosaic::BLOCK_SIZE,
        }
    }
}

impl MosaicConfig {
    /// Load the persisted configuration, falling back to defaults when the
    /// config file is missing or unreadable. On first run the defaults
    /// are written out so the file exists to edit.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            return Self::default();
        };
        if !path.exists() {
            let config = Self::default();
            if let Err(e) = config.save() {
                log::warn!("Failed to write default config: {:?}", e);
            }
            return config;
        }
        Self::load_from(&path)
    }

    /// Persist the configuration
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path().context("no config directory available")?;
        self.save_to(&path)
    }

    fn path() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("mosaic").join("config.json"))
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!("Ignoring malformed config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }
}
