//! Interaction session
//!
//! This module contains:
//! - The overlay state store (single writer of the sticker placement)
//! - The gesture tracker feeding it from pointer events
//! - Pointer message types

pub mod gesture;
pub mod messages;
pub mod state;

pub use gesture::GestureTracker;
pub use messages::GestureMsg;
pub use state::{OverlayReader, OverlayStore};
