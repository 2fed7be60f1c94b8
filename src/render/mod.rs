//! Composition rendering module
//!
//! This module contains:
//! - The layered scene description produced every frame
//! - Geometry shared by the rasterizer
//! - Rasterization using tiny-skia (for saving to file)

pub mod geometry;
pub mod image;
pub mod scene;

pub use scene::{Layer, LayerKind, Scene};
