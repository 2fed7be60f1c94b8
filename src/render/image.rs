//! Image rendering for scenes using tiny-skia
//!
//! These functions flatten a [`Scene`] into an RgbaImage for saving to disk.
//! Layers that extend past the surface are clipped here; positions are never
//! clamped.

use image::RgbaImage;
use tiny_skia::{
    ColorU8, FillRule, FilterQuality, Paint, PathBuilder, Pattern, Pixmap, SpreadMode, Transform,
};

use super::geometry::{self, corner};
use super::scene::{Layer, Scene};
use crate::domain::{Position, Rect, RectDimension, Size};
use crate::error::CaptureError;

/// Convert RgbaImage to Pixmap, apply drawing function, and copy back
///
/// The canvas is always opaque, so its straight and premultiplied bytes agree.
fn with_pixmap(img: &mut RgbaImage, f: impl FnOnce(&mut Pixmap)) {
    let (w, h) = (img.width(), img.height());
    let Some(size) = tiny_skia::IntSize::from_wh(w, h) else {
        return;
    };
    let Some(mut pixmap) = Pixmap::from_vec(img.as_raw().clone(), size) else {
        return;
    };

    f(&mut pixmap);

    // Copy back
    img.copy_from_slice(pixmap.data());
}

/// Build a premultiplied pixmap from a decoded layer image
fn source_pixmap(img: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(img.width(), img.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(img.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Build a rectangle path with quarter-circle corners
fn build_rounded_rect_path(bounds: &Rect, radius: f32) -> Option<tiny_skia::Path> {
    let r = geometry::clamp_radius(bounds, radius);
    if r <= 0.0 {
        let rect = tiny_skia::Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height)?;
        return Some(PathBuilder::from_rect(rect));
    }

    let k = r * corner::BEZIER_K;
    let (left, top) = (bounds.x, bounds.y);
    let (right, bottom) = (bounds.right(), bounds.bottom());

    let mut pb = PathBuilder::new();
    pb.move_to(left + r, top);

    // Top edge and top-right corner
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);

    // Right edge and bottom-right corner
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);

    // Bottom edge and bottom-left corner
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);

    // Left edge and top-left corner
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);

    pb.close();
    pb.finish()
}

/// Draw a decoded layer image stretched over `bounds` (pixel space)
pub fn draw_layer_on_image(img: &mut RgbaImage, layer_img: &RgbaImage, bounds: &Rect, radius: f32) {
    let Some((sx, sy)) = geometry::fit_scale(bounds, layer_img.width(), layer_img.height()) else {
        return;
    };
    let Some(source) = source_pixmap(layer_img) else {
        return;
    };
    let Some(path) = build_rounded_rect_path(bounds, radius) else {
        return;
    };

    with_pixmap(img, |pixmap| {
        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            source.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bicubic,
            1.0,
            Transform::from_row(sx, 0.0, 0.0, sy, bounds.x, bounds.y),
        );
        paint.anti_alias = true;
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    });
}

/// Flatten a scene into a raster image
///
/// Blocking: decodes every layer image. `scale` maps surface units to pixels.
pub fn render_scene(
    scene: &Scene,
    dims: RectDimension,
    scale: f32,
) -> Result<RgbaImage, CaptureError> {
    let mut canvas = RgbaImage::from_pixel(
        dims.width(),
        dims.height(),
        image::Rgba(scene.background.to_rgba_u8()),
    );

    let canvas_rect = Rect::new(
        Position::default(),
        Size::new(dims.width() as f32, dims.height() as f32),
    );
    for layer in ordered_layers(scene) {
        let bounds = geometry::scale_rect(&layer.bounds, scale);
        if canvas_rect.intersect(bounds).is_none() {
            log::debug!("Skipping {:?} layer outside the surface at {:?}", layer.kind, bounds);
            continue;
        }
        let decoded = layer.image.load()?;
        log::debug!(
            "Drawing {:?} layer {}x{} at {:?}",
            layer.kind,
            decoded.width(),
            decoded.height(),
            bounds
        );
        draw_layer_on_image(&mut canvas, &decoded, &bounds, layer.corner_radius * scale);
    }

    Ok(canvas)
}

/// Layers in paint order: raised layers are drawn last
fn ordered_layers(scene: &Scene) -> impl Iterator<Item = &Layer> {
    scene
        .layers
        .iter()
        .filter(|l| !l.raised)
        .chain(scene.layers.iter().filter(|l| l.raised))
}
