//! Command line interface

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};

use crate::config::{FileNaming, OutputFormat, StickerConfig};
use crate::domain::{Position, Size};
use crate::export::ExportTarget;
use crate::session::GestureMsg;
use crate::session::messages::{drag_through, parse_script};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Png,
    Jpeg,
}

#[derive(Parser, Debug)]
#[command(
    name = "stickerpea",
    version,
    about = "Place a sticker on an image and save the result"
)]
pub struct Cli {
    /// Base image
    #[arg(long)]
    pub base: Option<PathBuf>,

    /// Sticker image
    #[arg(long, conflicts_with = "sticker_id")]
    pub sticker: Option<PathBuf>,

    /// Sticker from the configured catalog
    #[arg(long)]
    pub sticker_id: Option<String>,

    /// Choose the base image and sticker with file dialogs
    #[arg(long, conflicts_with_all = ["base", "sticker", "sticker_id"])]
    pub pick: bool,

    /// JSON gesture script, e.g. [{"start":[100,100]},{"move":[150,140]},{"end":[150,140]}]
    #[arg(long, conflicts_with = "drag")]
    pub script: Option<PathBuf>,

    /// Drag the sticker through these points (x,y), in order
    #[arg(long, value_parser = parse_point)]
    pub drag: Vec<Position>,

    /// Surface size (WxH); defaults to the base image size
    #[arg(long, value_parser = parse_size)]
    pub viewport: Option<Size>,

    /// Sticker size (WxH)
    #[arg(long, value_parser = parse_size)]
    pub sticker_size: Option<Size>,

    /// Output file; overrides the configured folder and name
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Output encoding
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// JPEG quality (1-100)
    #[arg(long, default_value_t = 90, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Store the effective settings as the new defaults
    #[arg(long)]
    pub save_config: bool,
}

impl Cli {
    /// Override config values given on the command line
    pub fn apply(&self, config: &mut StickerConfig) {
        if let Some(size) = self.sticker_size {
            config.sticker_size = size;
        }
        if let Some(format) = self.output_format() {
            config.format = format;
        }
    }

    fn output_format(&self) -> Option<OutputFormat> {
        let from_ext = self
            .output
            .as_ref()
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match (self.format, from_ext.as_deref()) {
            (Some(FormatArg::Jpeg), _) | (None, Some("jpg" | "jpeg")) => Some(OutputFormat::Jpeg {
                quality: self.quality,
            }),
            (Some(FormatArg::Png), _) | (None, Some("png")) => Some(OutputFormat::Png),
            _ => None,
        }
    }

    /// Export target for `--output`, if given
    pub fn output_target(&self, config: &StickerConfig) -> Option<ExportTarget> {
        let output = self.output.as_ref()?;
        let dir = match output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| crate::config::DEFAULT_FILE_STEM.to_string());
        Some(ExportTarget {
            dir,
            naming: FileNaming::Fixed(stem),
            format: config.format,
        })
    }

    /// Pointer events to replay
    pub fn gestures(&self) -> Result<Vec<GestureMsg>> {
        if let Some(path) = &self.script {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read gesture script: {}", path.display()))?;
            return parse_script(&json)
                .with_context(|| format!("Invalid gesture script: {}", path.display()));
        }
        Ok(drag_through(&self.drag))
    }
}

fn parse_pair(s: &str, sep: char) -> Result<(f32, f32)> {
    let Some((a, b)) = s.split_once(sep) else {
        bail!("expected two numbers separated by '{sep}'");
    };
    Ok((a.trim().parse()?, b.trim().parse()?))
}

/// Parse `x,y`
pub fn parse_point(s: &str) -> Result<Position> {
    parse_pair(s, ',').map(Position::from)
}

/// Parse `WxH`
pub fn parse_size(s: &str) -> Result<Size> {
    let (w, h) = parse_pair(&s.to_ascii_lowercase(), 'x')?;
    if !w.is_finite() || !h.is_finite() {
        bail!("size must be a finite number");
    }
    if w < 0.0 || h < 0.0 {
        bail!("size must not be negative");
    }
    Ok(Size::new(w, h))
}
