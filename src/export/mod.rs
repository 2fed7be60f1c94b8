//! Capture/export pipeline
//!
//! Export is a strict sequence: authorize, snapshot, encode, persist. Either
//! every step succeeds or exactly one error is reported, and a caller never
//! sees a half-written file. Only one export may be in flight at a time.

pub mod permission;
pub mod storage;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::capture::CompositionSurface;
use crate::config::{FileNaming, OutputFormat, StickerConfig};
use crate::error::ExportError;

pub use permission::{Access, DirectoryAuthority, PermissionAuthority, Preapproved};
pub use storage::{FsStorage, Storage};

/// Successful export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    /// Where the file was stored
    pub locator: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Where and how exports are written
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTarget {
    pub dir: PathBuf,
    pub naming: FileNaming,
    pub format: OutputFormat,
}

impl ExportTarget {
    /// Target from config, `None` if the save folder cannot be resolved
    pub fn from_config(config: &StickerConfig) -> Option<Self> {
        Some(Self {
            dir: config.save_location.dir()?,
            naming: config.naming.clone(),
            format: config.format,
        })
    }

    /// Destination of the next export
    pub fn path(&self) -> PathBuf {
        self.dir.join(self.naming.file_name(self.format))
    }
}

/// Clears the in-flight flag when the export finishes, however it ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct ExportPipeline<A, S> {
    authority: A,
    storage: S,
    target: ExportTarget,
    in_flight: AtomicBool,
}

impl<A: PermissionAuthority, S: Storage> ExportPipeline<A, S> {
    pub fn new(authority: A, storage: S, target: ExportTarget) -> Self {
        Self {
            authority,
            storage,
            target,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn target(&self) -> &ExportTarget {
        &self.target
    }

    pub fn is_exporting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Flatten the surface and save it
    pub async fn export_composition(
        &self,
        surface: &CompositionSurface,
    ) -> Result<ExportResult, ExportError> {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            log::warn!("Export requested while another export is running");
            return Err(ExportError::AlreadyExporting);
        };

        if self.authority.request_write_access().await == Access::Denied {
            log::warn!("Storage write permission denied, export aborted");
            return Err(ExportError::PermissionDenied);
        }

        let snapshot = surface.snapshot().await?;
        let (width, height) = (snapshot.width(), snapshot.height());

        let format = self.target.format;
        let (bytes, snapshot) = tokio::task::spawn_blocking(move || {
            storage::encode(snapshot.rgba(), format).map(|bytes| (bytes, snapshot))
        })
        .await
        .map_err(|e| ExportError::Persistence(std::io::Error::other(e)))?
        .map_err(ExportError::Persistence)?;

        let path = self.target.path();
        log::debug!("Writing {} encoded bytes to {}", bytes.len(), path.display());
        let locator = self
            .storage
            .write(bytes, path)
            .await
            .map_err(|e| {
                log::error!("Failed to save composition: {}", e);
                ExportError::Persistence(e)
            })?;

        if !surface.is_current(&snapshot) {
            log::warn!(
                "Surface closed during export, discarding result for {}",
                locator.display()
            );
            return Err(ExportError::SurfaceGone);
        }

        log::info!(
            "Composition saved to {} ({}x{})",
            locator.display(),
            width,
            height
        );
        Ok(ExportResult {
            locator,
            width,
            height,
        })
    }
}
