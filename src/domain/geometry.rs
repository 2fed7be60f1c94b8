//! Geometric types for surface coordinates and layer placement

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Largest surface area, in pixels, that will be rasterized
pub const MAX_SURFACE_PIXELS: f64 = 8192.0 * 8192.0;

/// A point in composition surface coordinates
///
/// Used both for raw pointer locations and for the overlay's top-left corner.
/// Values are unbounded: negative or beyond-the-surface positions are valid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Translate the point by the given offset
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Logical width and height of a layer or surface
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Offset from a footprint's top-left corner to its visual centre
    pub fn half(self) -> (f32, f32) {
        (self.width * 0.5, self.height * 0.5)
    }

    /// Whether the rounded area is finite and within [`MAX_SURFACE_PIXELS`]
    pub fn fits_raster(self) -> bool {
        if !self.width.is_finite() || !self.height.is_finite() {
            return false;
        }
        let w = f64::from(self.width.max(0.0).round());
        let h = f64::from(self.height.max(0.0).round());
        w * h <= MAX_SURFACE_PIXELS
    }

    /// Convert to pixel dimensions, `None` if either side rounds to zero or
    /// the area is too large to rasterize
    pub fn dimensions(self) -> Option<RectDimension> {
        if !self.fits_raster() {
            return None;
        }
        let width = NonZeroU32::new(self.width.max(0.0).round() as u32)?;
        let height = NonZeroU32::new(self.height.max(0.0).round() as u32)?;
        Some(RectDimension { width, height })
    }
}

/// Axis-aligned rectangle in surface coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(origin: Position, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    pub fn origin(&self) -> Position {
        Position::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Calculate the intersection of two rectangles
    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if left < right && top < bottom {
            Some(Rect {
                x: left,
                y: top,
                width: right - left,
                height: bottom - top,
            })
        } else {
            None
        }
    }
}

/// Non-zero pixel dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RectDimension {
    pub width: NonZeroU32,
    pub height: NonZeroU32,
}

impl RectDimension {
    /// Get the width as u32
    pub fn width(&self) -> u32 {
        self.width.get()
    }

    /// Get the height as u32
    pub fn height(&self) -> u32 {
        self.height.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_has_no_dimensions() {
        assert!(Size::new(0.0, 200.0).dimensions().is_none());
        assert!(Size::new(200.0, 0.2).dimensions().is_none());
        assert!(Size::new(-5.0, 10.0).dimensions().is_none());

        let dims = Size::new(320.0, 240.4).dimensions().unwrap();
        assert_eq!((dims.width(), dims.height()), (320, 240));
    }

    #[test]
    fn test_intersect_partially_outside() {
        let surface = Rect::new(Position::new(0.0, 0.0), Size::new(200.0, 200.0));
        let sticker = Rect::new(Position::new(-50.0, 150.0), Size::new(100.0, 100.0));

        let visible = surface.intersect(sticker).unwrap();
        assert_eq!(visible, Rect::new(Position::new(0.0, 150.0), Size::new(50.0, 50.0)));

        let gone = Rect::new(Position::new(300.0, 300.0), Size::new(10.0, 10.0));
        assert!(surface.intersect(gone).is_none());
    }

    #[test]
    fn test_oversized_surface_has_no_dimensions() {
        assert!(!Size::new(f32::INFINITY, f32::INFINITY).fits_raster());
        assert!(!Size::new(f32::NAN, 10.0).fits_raster());
        assert!(!Size::new(1e6, 1e6).fits_raster());
        assert!(Size::new(1e6, 1e6).dimensions().is_none());
        assert!(Size::new(f32::INFINITY, 10.0).dimensions().is_none());

        assert!(Size::new(8192.0, 8192.0).fits_raster());
        assert!(!Size::new(8193.0, 8192.0).fits_raster());
        // Very wide but sub-pixel tall rounds to no area at all
        assert!(Size::new(1e9, 0.4).fits_raster());
    }
}
