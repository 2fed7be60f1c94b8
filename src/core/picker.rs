//! Asset pickers
//!
//! A picker answers `Ok(None)` when the user dismisses it without choosing;
//! that is a no-op for the caller, not an error.

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::config::StickerConfig;
use crate::domain::ImageReference;
use crate::error::PickError;

/// Image file extensions offered by dialogs
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "bmp"];

/// Source of base images and stickers
pub trait AssetPicker {
    fn pick_image(&self) -> impl Future<Output = Result<Option<ImageReference>, PickError>>;
    fn pick_overlay(&self) -> impl Future<Output = Result<Option<ImageReference>, PickError>>;
}

/// Picker with preset answers, used by the command line
#[derive(Debug, Clone)]
pub struct PathPicker {
    image: Option<PathBuf>,
    overlay: Option<PathBuf>,
}

impl PathPicker {
    pub fn new(image: Option<PathBuf>, overlay: Option<PathBuf>) -> Self {
        Self { image, overlay }
    }
}

impl AssetPicker for PathPicker {
    async fn pick_image(&self) -> Result<Option<ImageReference>, PickError> {
        self.image.as_deref().map(open_asset).transpose()
    }

    async fn pick_overlay(&self) -> Result<Option<ImageReference>, PickError> {
        self.overlay.as_deref().map(open_asset).transpose()
    }
}

/// Native file dialogs
#[derive(Debug, Clone, Copy, Default)]
pub struct DialogPicker;

impl DialogPicker {
    async fn pick(title: &str) -> Result<Option<ImageReference>, PickError> {
        let Some(file) = rfd::AsyncFileDialog::new()
            .set_title(title)
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_file()
            .await
        else {
            return Ok(None);
        };
        open_asset(file.path()).map(Some)
    }
}

impl AssetPicker for DialogPicker {
    async fn pick_image(&self) -> Result<Option<ImageReference>, PickError> {
        Self::pick("Select an Image").await
    }

    async fn pick_overlay(&self) -> Result<Option<ImageReference>, PickError> {
        Self::pick("Select a Sticker").await
    }
}

/// Open the chosen file once so access problems surface at pick time
fn open_asset(path: &Path) -> Result<ImageReference, PickError> {
    std::fs::File::open(path).map_err(|err| access_error(path, err))?;
    Ok(ImageReference::from_path(path))
}

fn access_error(path: &Path, err: std::io::Error) -> PickError {
    let err = PickError::from(err);
    match &err {
        PickError::PermissionDenied => log::warn!("Access to {} was denied", path.display()),
        _ => log::warn!("Cannot open {}: {}", path.display(), err),
    }
    err
}

/// Resolve a catalog sticker id to its file
pub fn catalog_sticker(config: &StickerConfig, id: &str) -> Result<PathBuf, PickError> {
    config
        .sticker(id)
        .map(|e| e.path.clone())
        .ok_or_else(|| PickError::UnknownSticker(id.to_string()))
}
