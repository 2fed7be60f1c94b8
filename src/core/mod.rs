//! Core application module
//!
//! This module contains:
//! - The editing session tying gestures, surface and export together
//! - Asset pickers for base images and stickers

pub mod app;
pub mod picker;
