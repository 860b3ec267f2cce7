//! Pointer and keyboard event types consumed by the workspace.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the engine reacts to.
///
/// Host input layers map their native key codes onto this set; everything
/// else stays host-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Shift,
    Control,
    Alt,
    Delete,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Record a key transition.
    pub fn apply(&mut self, key: Key, down: bool) {
        match key {
            Key::Shift => self.shift = down,
            Key::Control => self.ctrl = down,
            Key::Alt => self.alt = down,
            Key::Delete => {}
        }
    }

    /// True when the held modifiers call for nearest-node candidates.
    pub fn wants_candidates(&self) -> bool {
        self.shift || self.ctrl
    }
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    Scroll {
        position: Point,
        delta: Vec2,
    },
}

/// Keyboard event type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_track_key_transitions() {
        let mut modifiers = Modifiers::default();
        modifiers.apply(Key::Control, true);
        modifiers.apply(Key::Alt, true);
        assert!(modifiers.ctrl);
        assert!(modifiers.alt);
        assert!(!modifiers.shift);

        modifiers.apply(Key::Control, false);
        assert!(!modifiers.ctrl);
        assert!(modifiers.alt);
    }

    #[test]
    fn test_delete_leaves_modifiers_alone() {
        let mut modifiers = Modifiers::default();
        modifiers.apply(Key::Delete, true);
        assert_eq!(modifiers, Modifiers::default());
    }

    #[test]
    fn test_wants_candidates() {
        let mut modifiers = Modifiers::default();
        assert!(!modifiers.wants_candidates());

        modifiers.shift = true;
        assert!(modifiers.wants_candidates());

        modifiers.shift = false;
        modifiers.ctrl = true;
        assert!(modifiers.wants_candidates());

        modifiers.ctrl = false;
        modifiers.alt = true;
        assert!(!modifiers.wants_candidates());
    }
}
