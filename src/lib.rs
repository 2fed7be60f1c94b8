//! Place a sticker on a base image, drag it around, and flatten the
//! composition into a single image file.
//!
//! Pointer events flow through [`session::GestureTracker`] into the
//! [`session::OverlayStore`]; [`capture::CompositionSurface`] reads the store
//! to describe and rasterize the composition; [`export::ExportPipeline`]
//! authorizes, snapshots and persists it.

pub mod capture;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod export;
pub mod render;
pub mod session;
