//! Image handles and the single-overlay placement state

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;

use super::geometry::Position;

/// Opaque, immutable handle to an image
///
/// Either a filesystem locator or in-memory encoded bytes. Cloning is cheap;
/// the bytes are only decoded when a snapshot is rasterized.
#[derive(Clone, PartialEq, Eq)]
pub enum ImageReference {
    Path(Arc<Path>),
    Bytes(Arc<[u8]>),
}

impl ImageReference {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(Arc::from(path.into()))
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(Arc::from(bytes.into()))
    }

    /// Path of the image, if it refers to a file
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            Self::Bytes(_) => None,
        }
    }

    /// Decode the referenced image into RGBA8
    ///
    /// Blocking: reads the file and decodes it.
    pub fn load(&self) -> image::ImageResult<RgbaImage> {
        let img = match self {
            Self::Path(path) => image::open(path)?,
            Self::Bytes(bytes) => image::load_from_memory(bytes)?,
        };
        Ok(img.into_rgba8())
    }
}

impl fmt::Debug for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "ImageReference({})", path.display()),
            Self::Bytes(bytes) => write!(f, "ImageReference(<{} bytes>)", bytes.len()),
        }
    }
}

/// Placement state of the single active overlay
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayState {
    /// Selected sticker, `None` when nothing is placed
    pub overlay: Option<ImageReference>,
    /// Top-left corner of the sticker; only meaningful while `overlay` is set
    pub position: Position,
    /// Drawn above sibling layers while a drag is in progress
    pub raised: bool,
}

impl OverlayState {
    /// Position of the overlay if one is selected
    pub fn placement(&self) -> Option<(&ImageReference, Position)> {
        self.overlay.as_ref().map(|r| (r, self.position))
    }
}
