//! Composition capture module
//!
//! This module consolidates:
//! - The composition surface (surface.rs)
//! - Snapshot image type (image.rs)

pub mod image;
pub mod surface;

pub use image::CompositionSnapshot;
pub use surface::{CompositionSurface, SurfaceStyle};
