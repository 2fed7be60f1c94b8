//! Gesture tracker
//!
//! Turns pointer start/move/end into sticker positions. Each move is a cheap
//! recompute-and-store: nothing is queued, so the last move always wins.

use crate::domain::{Position, Size};

use super::messages::GestureMsg;
use super::state::OverlayStore;

#[derive(Debug, Clone)]
pub struct GestureTracker {
    /// Sticker footprint used to centre it under the pointer
    footprint: Size,
    /// Store epoch the current drag started in; `None` when not dragging
    drag: Option<u64>,
}

impl GestureTracker {
    pub fn new(footprint: Size) -> Self {
        Self {
            footprint,
            drag: None,
        }
    }

    pub fn footprint(&self) -> Size {
        self.footprint
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Position that puts the sticker's centre under `point`
    pub fn centered(&self, point: Position) -> Position {
        let (half_w, half_h) = self.footprint.half();
        point.translate(-half_w, -half_h)
    }

    /// Begin a drag and raise the sticker
    pub fn on_gesture_start(&mut self, store: &mut OverlayStore, point: Position) {
        if !store.has_overlay() {
            log::debug!("Gesture start at {:?} ignored: no sticker selected", point);
            return;
        }
        self.drag = Some(store.epoch());
        store.set_raised(true);
    }

    /// Move the sticker so the pointer tracks its centre
    ///
    /// Returns the written position, or `None` if no drag is live.
    pub fn on_gesture_move(&mut self, store: &mut OverlayStore, point: Position) -> Option<Position> {
        let epoch = self.drag?;
        if epoch != store.epoch() || !store.has_overlay() {
            // Sticker was cleared or replaced mid-drag
            self.drag = None;
            return None;
        }
        let position = self.centered(point);
        store.update_position(position);
        Some(position)
    }

    /// Finish the drag and lower the sticker
    pub fn on_gesture_end(&mut self, store: &mut OverlayStore, _point: Position) {
        if self.drag.take().is_some() {
            store.set_raised(false);
        }
    }

    /// Abandon the drag without moving the sticker again
    pub fn cancel(&mut self, store: &mut OverlayStore) {
        if self.drag.take().is_some() {
            log::debug!("Drag cancelled");
            store.set_raised(false);
        }
    }

    /// Dispatch a pointer message
    pub fn handle(&mut self, store: &mut OverlayStore, msg: GestureMsg) {
        match msg {
            GestureMsg::Start(x, y) => self.on_gesture_start(store, Position::new(x, y)),
            GestureMsg::Move(x, y) => {
                self.on_gesture_move(store, Position::new(x, y));
            }
            GestureMsg::End(x, y) => self.on_gesture_end(store, Position::new(x, y)),
            GestureMsg::Cancel => self.cancel(store),
        }
    }
}
