//! Layered description of the composition
//!
//! A scene is what the surface hands to the presentation layer every frame
//! and what the rasterizer flattens on export. It holds references only;
//! building one never decodes an image.

use crate::config::RgbColor;
use crate::domain::{ImageReference, Rect, Size};

/// Which part of the composition a layer is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Base,
    Sticker,
}

/// An image placed on the surface
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub kind: LayerKind,
    pub image: ImageReference,
    /// Placement in surface units; may extend past the surface
    pub bounds: Rect,
    pub corner_radius: f32,
    /// Presentational: drawn above siblings while dragged
    pub raised: bool,
}

/// Bottom-to-top stack of layers
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub size: Size,
    pub background: RgbColor,
    pub layers: Vec<Layer>,
}

impl Scene {
    pub fn base(&self) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind == LayerKind::Base)
    }

    pub fn sticker(&self) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind == LayerKind::Sticker)
    }
}
