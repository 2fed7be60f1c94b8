//! Composition surface
//!
//! Stacks the base image and the sticker. `render` is cheap and pure and is
//! meant to be called every frame; `snapshot` rasterizes on the blocking pool.
//! The surface is a cloneable handle so the presentation layer can mount and
//! unmount it while an export holds another clone.

use std::sync::Arc;

use parking_lot::RwLock;

use super::image::CompositionSnapshot;
use crate::config::{RgbColor, StickerConfig};
use crate::domain::{ImageReference, Position, Rect, Size};
use crate::error::CaptureError;
use crate::render::image::render_scene;
use crate::render::{Layer, LayerKind, Scene};
use crate::session::OverlayReader;

/// How layers are drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    pub sticker_size: Size,
    pub corner_radius: f32,
    pub background: RgbColor,
    /// Pixels per surface unit in snapshots
    pub scale: f32,
}

impl From<&StickerConfig> for SurfaceStyle {
    fn from(config: &StickerConfig) -> Self {
        Self {
            sticker_size: config.sticker_size,
            corner_radius: config.corner_radius,
            background: config.background,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Default)]
struct SurfaceLayout {
    base: Option<ImageReference>,
    /// `None` while unmounted
    viewport: Option<Size>,
    generation: u64,
}

#[derive(Clone, Debug)]
pub struct CompositionSurface {
    layout: Arc<RwLock<SurfaceLayout>>,
    overlay: OverlayReader,
    style: SurfaceStyle,
}

impl CompositionSurface {
    pub fn new(overlay: OverlayReader, style: SurfaceStyle) -> Self {
        Self {
            layout: Arc::new(RwLock::new(SurfaceLayout::default())),
            overlay,
            style,
        }
    }

    pub fn style(&self) -> SurfaceStyle {
        self.style
    }

    /// Attach the surface with the given laid-out size
    pub fn mount(&self, viewport: Size) {
        let mut layout = self.layout.write();
        layout.viewport = Some(viewport);
        layout.generation += 1;
        log::debug!("Surface mounted at {:?} (generation {})", viewport, layout.generation);
    }

    /// Update the laid-out size of a mounted surface
    pub fn resize(&self, viewport: Size) {
        let mut layout = self.layout.write();
        if layout.viewport.is_some() {
            layout.viewport = Some(viewport);
        }
    }

    /// Detach the surface; pending exports from this mount are discarded
    pub fn unmount(&self) {
        let mut layout = self.layout.write();
        layout.viewport = None;
        log::debug!("Surface unmounted (generation {})", layout.generation);
    }

    pub fn set_base(&self, base: ImageReference) {
        self.layout.write().base = Some(base);
    }

    pub fn clear_base(&self) {
        self.layout.write().base = None;
    }

    pub fn base(&self) -> Option<ImageReference> {
        self.layout.read().base.clone()
    }

    pub fn is_mounted(&self) -> bool {
        self.layout.read().viewport.is_some()
    }

    /// Current mount generation, `None` while unmounted
    pub fn generation(&self) -> Option<u64> {
        let layout = self.layout.read();
        layout.viewport.map(|_| layout.generation)
    }

    /// Whether a snapshot still belongs to the live surface
    pub fn is_current(&self, snapshot: &CompositionSnapshot) -> bool {
        self.generation() == Some(snapshot.generation())
    }

    /// Describe the current composition
    pub fn render(&self) -> Scene {
        let (base, size) = {
            let layout = self.layout.read();
            (layout.base.clone(), layout.viewport.unwrap_or_default())
        };
        let state = self.overlay.get();

        let mut layers = Vec::with_capacity(2);
        if let Some(image) = base {
            layers.push(Layer {
                kind: LayerKind::Base,
                image,
                bounds: Rect::new(Position::default(), size),
                corner_radius: 0.0,
                raised: false,
            });
        }
        if let Some((image, position)) = state.placement() {
            layers.push(Layer {
                kind: LayerKind::Sticker,
                image: image.clone(),
                bounds: Rect::new(position, self.style.sticker_size),
                corner_radius: self.style.corner_radius,
                raised: state.raised,
            });
        }

        Scene {
            size,
            background: self.style.background,
            layers,
        }
    }

    /// Rasterize the current composition
    pub async fn snapshot(&self) -> Result<CompositionSnapshot, CaptureError> {
        let (viewport, generation) = {
            let layout = self.layout.read();
            let viewport = layout.viewport.ok_or(CaptureError::NotMounted)?;
            (viewport, layout.generation)
        };
        let scale = self.style.scale;
        let pixels = Size::new(viewport.width * scale, viewport.height * scale);
        if !pixels.fits_raster() {
            log::warn!("Refusing to capture a {:?} surface", pixels);
            return Err(CaptureError::TooLarge {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let dims = pixels.dimensions().ok_or(CaptureError::ZeroSize {
            width: viewport.width,
            height: viewport.height,
        })?;

        let scene = self.render();
        let rgba = tokio::task::spawn_blocking(move || render_scene(&scene, dims, scale))
            .await
            .map_err(|e| CaptureError::Task(e.to_string()))??;

        Ok(CompositionSnapshot::new(rgba, generation))
    }
}
