//! Pure domain types with minimal dependencies
//!
//! This module contains core types used throughout the crate.
//! Nothing here touches storage, permissions or the async runtime.

pub mod geometry;
pub mod overlay;

pub use geometry::*;
pub use overlay::*;
