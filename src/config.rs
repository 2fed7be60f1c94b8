//! Configuration persistence for stickerpea settings

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{Position, Size};

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for RgbColor {
    fn default() -> Self {
        // Light cyan backdrop
        Self {
            r: 0.878,
            g: 0.969,
            b: 0.980,
        }
    }
}

impl RgbColor {
    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            255,
        ]
    }
}

/// Folder exported compositions are saved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaveLocation {
    Pictures,
    #[default]
    Documents,
}

impl SaveLocation {
    /// Resolve the folder, falling back to a folder under $HOME
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

/// How exported files are named
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileNaming {
    /// Always the same name; a new export replaces the previous one
    Fixed(String),
    /// `Sticker_<date>_<time>` so exports accumulate
    Timestamped,
}

impl Default for FileNaming {
    fn default() -> Self {
        FileNaming::Fixed(DEFAULT_FILE_STEM.to_string())
    }
}

pub const DEFAULT_FILE_STEM: &str = "sticker-composition";

impl FileNaming {
    /// File name including the extension for `format`
    pub fn file_name(&self, format: OutputFormat) -> String {
        let stem = match self {
            FileNaming::Fixed(stem) => stem.clone(),
            FileNaming::Timestamped => chrono::Local::now()
                .format("Sticker_%Y-%m-%d_%H-%M-%S")
                .to_string(),
        };
        format!("{stem}.{}", format.extension())
    }
}

/// Raster encoding of exported files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg {
        quality: u8,
    },
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg { .. } => "jpg",
        }
    }
}

/// A selectable sticker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub path: PathBuf,
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StickerConfig {
    /// Size the sticker is drawn at, in surface units
    pub sticker_size: Size,
    /// Where a freshly selected sticker is placed
    pub default_position: Position,
    /// Radius of the sticker's rounded corners
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f32,
    /// Fill shown where no base image covers the surface
    #[serde(default)]
    pub background: RgbColor,
    /// Where to save exports
    pub save_location: SaveLocation,
    /// Export file naming
    #[serde(default)]
    pub naming: FileNaming,
    /// Export encoding
    #[serde(default)]
    pub format: OutputFormat,
    /// Stickers offered by the catalog picker
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
}

fn default_corner_radius() -> f32 {
    10.0
}

impl StickerConfig {
    /// Configuration directory name
    pub const ID: &'static str = "stickerpea";

    /// Default config file location
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
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

    /// Read configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::path() else {
            log::error!("No config directory available, settings not saved");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    /// Write configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Look up a catalog sticker by id
    pub fn sticker(&self, id: &str) -> Option<&CatalogEntry> {
        self.catalog.iter().find(|e| e.id == id)
    }
}

impl Default for StickerConfig {
    fn default() -> Self {
        Self {
            sticker_size: Size::new(100.0, 100.0),
            default_position: Position::new(0.0, 0.0),
            corner_radius: default_corner_radius(),
            background: RgbColor::default(),
            save_location: SaveLocation::Documents,
            naming: FileNaming::default(),
            format: OutputFormat::Png,
            catalog: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_name_is_stable() {
        let naming = FileNaming::default();
        assert_eq!(naming.file_name(OutputFormat::Png), "sticker-composition.png");
        assert_eq!(
            naming.file_name(OutputFormat::Jpeg { quality: 90 }),
            "sticker-composition.jpg"
        );
    }

    #[test]
    fn test_timestamped_name_shape() {
        let name = FileNaming::Timestamped.file_name(OutputFormat::Png);
        assert!(name.starts_with("Sticker_"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let config = StickerConfig {
            sticker_size: Size::new(64.0, 48.0),
            catalog: vec![CatalogEntry {
                id: "star".into(),
                path: "/tmp/star.png".into(),
            }],
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = StickerConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.sticker("star").unwrap().path, PathBuf::from("/tmp/star.png"));
        assert!(loaded.sticker("moon").is_none());
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let json = r#"{
            "sticker_size": { "width": 100.0, "height": 100.0 },
            "default_position": { "x": 0.0, "y": 0.0 },
            "save_location": "Pictures"
        }"#;
        let config: StickerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.corner_radius, 10.0);
        assert_eq!(config.format, OutputFormat::Png);
        assert_eq!(config.naming, FileNaming::default());
        assert!(config.catalog.is_empty());
    }

    #[test]
    fn test_background_to_rgba() {
        let c = RgbColor {
            r: 1.0,
            g: 0.0,
            b: 2.0,
        };
        assert_eq!(c.to_rgba_u8(), [255, 0, 255, 255]);
    }
}
