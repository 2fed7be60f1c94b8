//! Snapshot type for captured compositions

use image::RgbaImage;

/// An immutable raster capture of the composition surface
#[derive(Clone, Debug)]
pub struct CompositionSnapshot {
    rgba: RgbaImage,
    /// Mount generation of the surface it was taken from
    generation: u64,
}

impl CompositionSnapshot {
    pub(crate) fn new(rgba: RgbaImage, generation: u64) -> Self {
        log::debug!(
            "CompositionSnapshot captured: {}x{} pixels",
            rgba.width(),
            rgba.height()
        );
        Self { rgba, generation }
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Get the width of the image
    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    /// Get the height of the image
    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
