//! Overlay state store
//!
//! The store is the only writer of [`OverlayState`]. It is deliberately not
//! `Clone`: every mutation needs `&mut OverlayStore`. Readers such as the
//! composition surface get an [`OverlayReader`] that can only copy the state
//! out. The lock serializes writes if the store is driven from more than one
//! thread, so a selection issued after a stale position update always wins.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::{ImageReference, OverlayState, Position};

#[derive(Debug)]
pub struct OverlayStore {
    state: Arc<RwLock<OverlayState>>,
    default_position: Position,
    /// Bumped on every select/clear so in-flight drags can detect them
    epoch: u64,
}

impl OverlayStore {
    pub fn new(default_position: Position) -> Self {
        Self {
            state: Arc::new(RwLock::new(OverlayState {
                position: default_position,
                ..Default::default()
            })),
            default_position,
            epoch: 0,
        }
    }

    /// Read-only view for consumers
    pub fn reader(&self) -> OverlayReader {
        OverlayReader {
            state: Arc::clone(&self.state),
        }
    }

    /// Replace the sticker and put it back at the default position
    pub fn select_overlay(&mut self, overlay: ImageReference) {
        log::debug!("Selecting overlay {:?}", overlay);
        let mut state = self.state.write();
        state.overlay = Some(overlay);
        state.position = self.default_position;
        state.raised = false;
        self.epoch += 1;
    }

    /// Overwrite the position unconditionally
    pub fn update_position(&mut self, position: Position) {
        self.state.write().position = position;
    }

    /// Remove the sticker
    pub fn clear_overlay(&mut self) {
        let mut state = self.state.write();
        state.overlay = None;
        state.raised = false;
        self.epoch += 1;
    }

    pub fn set_raised(&mut self, raised: bool) {
        self.state.write().raised = raised;
    }

    pub fn has_overlay(&self) -> bool {
        self.state.read().overlay.is_some()
    }

    pub fn position(&self) -> Position {
        self.state.read().position
    }

    pub fn default_position(&self) -> Position {
        self.default_position
    }

    pub fn state(&self) -> OverlayState {
        self.state.read().clone()
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Shared read-only handle onto an [`OverlayStore`]
#[derive(Clone, Debug)]
pub struct OverlayReader {
    state: Arc<RwLock<OverlayState>>,
}

impl OverlayReader {
    /// Copy of the current state
    pub fn get(&self) -> OverlayState {
        self.state.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sticker(name: &str) -> ImageReference {
        ImageReference::from_path(format!("/stickers/{name}.png"))
    }

    #[test]
    fn test_select_resets_to_default_position() {
        let default = Position::new(12.0, 34.0);
        let mut store = OverlayStore::new(default);

        store.select_overlay(sticker("a"));
        store.update_position(Position::new(-500.0, 900.0));
        store.select_overlay(sticker("b"));
        assert_eq!(store.position(), default);

        store.update_position(Position::new(1.0, 1.0));
        store.select_overlay(sticker("b"));
        assert_eq!(store.position(), default);
    }

    #[test]
    fn test_selecting_replaces_overlay() {
        let mut store = OverlayStore::new(Position::default());
        store.select_overlay(sticker("a"));
        store.select_overlay(sticker("b"));
        assert_eq!(store.state().overlay, Some(sticker("b")));
    }

    #[test]
    fn test_select_then_clear_leaves_nothing() {
        let mut store = OverlayStore::new(Position::default());
        store.select_overlay(sticker("a"));
        store.set_raised(true);
        store.clear_overlay();

        let state = store.state();
        assert!(state.overlay.is_none());
        assert!(!state.raised);
        assert!(!store.has_overlay());
    }

    #[test]
    fn test_reader_sees_writes() {
        let mut store = OverlayStore::new(Position::default());
        let reader = store.reader();
        assert!(reader.get().overlay.is_none());

        store.select_overlay(sticker("a"));
        store.update_position(Position::new(7.0, 8.0));

        let seen = reader.get();
        assert_eq!(seen.overlay, Some(sticker("a")));
        assert_eq!(seen.position, Position::new(7.0, 8.0));
    }

    #[test]
    fn test_epoch_changes_on_select_and_clear_only() {
        let mut store = OverlayStore::new(Position::default());
        let e0 = store.epoch();
        store.select_overlay(sticker("a"));
        let e1 = store.epoch();
        store.update_position(Position::new(1.0, 2.0));
        store.set_raised(true);
        assert_eq!(store.epoch(), e1);
        store.clear_overlay();
        assert!(e0 < e1 && e1 < store.epoch());
    }
}
