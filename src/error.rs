//! Error types for picking, capture and export
//!
//! Every kind is terminal where it occurs: nothing in the crate retries.
//! A dismissed picker is not an error and is reported as `Ok(None)`.

use thiserror::Error;

/// Errors from an asset picker
#[derive(Error, Debug)]
pub enum PickError {
    /// Media access was declined, or the OS refused to open the asset
    #[error("permission to access the media library was denied")]
    PermissionDenied,

    /// The chosen asset could not be read
    #[error("failed to read asset: {0}")]
    Io(#[source] std::io::Error),

    /// No catalog entry with that id
    #[error("unknown sticker id: {0}")]
    UnknownSticker(String),
}

impl From<std::io::Error> for PickError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => PickError::PermissionDenied,
            _ => PickError::Io(err),
        }
    }
}

/// The composition surface could not be rasterized
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Surface is not (or no longer) mounted
    #[error("composition surface is not mounted")]
    NotMounted,

    /// Surface has no area to rasterize
    #[error("composition surface has zero size ({width}x{height})")]
    ZeroSize { width: f32, height: f32 },

    /// Surface is too large (or not finite) to rasterize
    #[error("composition surface is too large to capture ({width}x{height})")]
    TooLarge { width: f32, height: f32 },

    /// A layer image could not be decoded
    #[error("failed to decode layer image: {0}")]
    Decode(#[from] image::ImageError),

    /// Rasterization task did not complete
    #[error("rasterization task failed: {0}")]
    Task(String),
}

/// Errors from the export pipeline
#[derive(Error, Debug)]
pub enum ExportError {
    /// Storage write access was not granted
    #[error("permission to save images was denied")]
    PermissionDenied,

    /// Snapshot failed
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// Encoding or writing the image failed
    #[error("failed to save image: {0}")]
    Persistence(#[source] std::io::Error),

    /// Another export is still in flight
    #[error("an export is already in progress")]
    AlreadyExporting,

    /// Surface went away while exporting; the result was discarded
    #[error("composition surface was closed before the export finished")]
    SurfaceGone,
}

impl ExportError {
    /// Whether retrying the same request could succeed without user action
    /// on a permission prompt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExportError::Capture(_) | ExportError::Persistence(_) | ExportError::AlreadyExporting
        )
    }
}
