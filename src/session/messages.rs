//! Message types for pointer interaction
//!
//! These are forwarded by the presentation layer and can be replayed from a
//! JSON script, e.g. `[{"start": [100, 100]}, {"move": [150, 140]}, {"end": [150, 140]}]`.

use serde::{Deserialize, Serialize};

use crate::domain::Position;

/// Pointer event on the sticker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureMsg {
    /// Pointer pressed on the sticker
    Start(f32, f32),
    /// Pointer moved while pressed
    Move(f32, f32),
    /// Pointer released
    End(f32, f32),
    /// Interaction abandoned (surface left or view changed)
    Cancel,
}

/// Parse a gesture script
pub fn parse_script(json: &str) -> serde_json::Result<Vec<GestureMsg>> {
    serde_json::from_str(json)
}

/// Build a script from a list of points: start on the first, move through
/// all of them, end on the last
pub fn drag_through(points: &[Position]) -> Vec<GestureMsg> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Vec::new();
    };
    let mut msgs = Vec::with_capacity(points.len() + 2);
    msgs.push(GestureMsg::Start(first.x, first.y));
    msgs.extend(points.iter().map(|p| GestureMsg::Move(p.x, p.y)));
    msgs.push(GestureMsg::End(last.x, last.y));
    msgs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_script() {
        let msgs =
            parse_script(r#"[{"start":[100,100]},{"move":[150,140]},{"end":[150,140]},"cancel"]"#)
                .unwrap();
        assert_eq!(
            msgs,
            vec![
                GestureMsg::Start(100.0, 100.0),
                GestureMsg::Move(150.0, 140.0),
                GestureMsg::End(150.0, 140.0),
                GestureMsg::Cancel,
            ]
        );
    }

    #[test]
    fn test_drag_through() {
        assert!(drag_through(&[]).is_empty());

        let msgs = drag_through(&[Position::new(1.0, 2.0), Position::new(3.0, 4.0)]);
        assert_eq!(
            msgs,
            vec![
                GestureMsg::Start(1.0, 2.0),
                GestureMsg::Move(1.0, 2.0),
                GestureMsg::Move(3.0, 4.0),
                GestureMsg::End(3.0, 4.0),
            ]
        );
    }
}
