//! Shared geometry calculations for layer rendering

use crate::domain::Rect;

/// Rounded corner constants
pub mod corner {
    /// Quarter-circle bezier approximation constant: 4/3 * (sqrt(2) - 1)
    pub const BEZIER_K: f32 = 0.552_284_8;
}

/// Largest usable corner radius for a rectangle
#[inline]
pub fn clamp_radius(bounds: &Rect, radius: f32) -> f32 {
    let max = bounds.width.abs().min(bounds.height.abs()) * 0.5;
    radius.clamp(0.0, max)
}

/// Scale a rectangle from surface units to image pixels
#[inline]
pub fn scale_rect(bounds: &Rect, scale: f32) -> Rect {
    Rect {
        x: bounds.x * scale,
        y: bounds.y * scale,
        width: bounds.width * scale,
        height: bounds.height * scale,
    }
}

/// Scale factors that stretch a `src_w`x`src_h` image over `bounds`
#[inline]
pub fn fit_scale(bounds: &Rect, src_w: u32, src_h: u32) -> Option<(f32, f32)> {
    if src_w == 0 || src_h == 0 {
        return None;
    }
    Some((bounds.width / src_w as f32, bounds.height / src_h as f32))
}
