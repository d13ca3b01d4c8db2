//=========================================================================
// Input Event Types
//=========================================================================
//
// Portable representation of the low-level input reported by a platform
// shim. The core never sees winit (or any other backend) types.
//
// Event Flow:
// ```text
// Platform shim (winit / headless)
//         ↓
//    InputEvent (this module)
//         ↓  crossbeam channel
//    InputSystem::process()
//         ↓
//    InputSnapshot (held / pressed / released)
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== MouseButton =========================================================

/// Physical mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,

    /// Any other button, by platform index.
    Other(u16),
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced:
/// `KeyA` is the same key on QWERTY and AZERTY layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Function Keys ----------------------------------------------------
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Modifier Keys ----------------------------------------------------
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,

    /// Fallback for keys the platform mapping does not cover.
    Unidentified,
}

//=== InputEvent ==========================================================

/// Low-level input event queued by the platform shim.
///
/// # Equality & Hashing Semantics
///
/// Discrete events compare by type + payload. `MouseMoved` events compare
/// equal regardless of coordinates so a `HashSet` keeps only the latest
/// position. Float payloads of scroll and joystick events are compared
/// bitwise.
#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    MouseButtonDown {
        button: MouseButton,
        modifiers: Modifiers,
    },

    MouseButtonUp {
        button: MouseButton,
        modifiers: Modifiers,
    },

    /// Cursor moved (screen space, pixels, top-left origin).
    MouseMoved { x: f32, y: f32 },

    /// Wheel or trackpad scroll, in lines.
    MouseScrolled { dx: f32, dy: f32 },

    JoystickConnected { id: u32 },

    JoystickDisconnected { id: u32 },

    /// Absolute axis value in `[-1, 1]`.
    JoystickAxis { id: u32, axis: usize, value: f32 },

    JoystickButton { id: u32, button: usize, pressed: bool },

    /// Unrecognized event; ignored by the input system.
    Unidentified,
}

//--- Implementation ------------------------------------------------------

impl InputEvent {
    /// Returns a new event with updated modifiers (consumes self).
    ///
    /// Has no effect on events without modifier state.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        match &mut self {
            Self::KeyDown { modifiers: m, .. }
            | Self::KeyUp { modifiers: m, .. }
            | Self::MouseButtonDown { modifiers: m, .. }
            | Self::MouseButtonUp { modifiers: m, .. } => {
                *m = modifiers;
            }
            _ => {}
        }
        self
    }

    /// Continuous events are coalesced by the platform buffer.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::MouseMoved { .. })
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (KeyDown { key: a, modifiers: ma }, KeyDown { key: b, modifiers: mb })
            | (KeyUp { key: a, modifiers: ma }, KeyUp { key: b, modifiers: mb }) => {
                a == b && ma == mb
            }
            (
                MouseButtonDown { button: a, modifiers: ma },
                MouseButtonDown { button: b, modifiers: mb },
            )
            | (
                MouseButtonUp { button: a, modifiers: ma },
                MouseButtonUp { button: b, modifiers: mb },
            ) => a == b && ma == mb,
            (MouseMoved { .. }, MouseMoved { .. }) => true,
            (MouseScrolled { dx: ax, dy: ay }, MouseScrolled { dx: bx, dy: by }) => {
                ax.to_bits() == bx.to_bits() && ay.to_bits() == by.to_bits()
            }
            (JoystickConnected { id: a }, JoystickConnected { id: b })
            | (JoystickDisconnected { id: a }, JoystickDisconnected { id: b }) => a == b,
            (
                JoystickAxis { id: a, axis: x, value: va },
                JoystickAxis { id: b, axis: y, value: vb },
            ) => a == b && x == y && va.to_bits() == vb.to_bits(),
            (
                JoystickButton { id: a, button: x, pressed: pa },
                JoystickButton { id: b, button: y, pressed: pb },
            ) => a == b && x == y && pa == pb,
            (Unidentified, Unidentified) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

/// Consistent with `PartialEq`: coordinates of `MouseMoved` are not hashed.
impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::KeyDown { key, modifiers } | Self::KeyUp { key, modifiers } => {
                key.hash(state);
                modifiers.hash(state);
            }
            Self::MouseButtonDown { button, modifiers }
            | Self::MouseButtonUp { button, modifiers } => {
                button.hash(state);
                modifiers.hash(state);
            }
            Self::MouseScrolled { dx, dy } => {
                dx.to_bits().hash(state);
                dy.to_bits().hash(state);
            }
            Self::JoystickConnected { id } | Self::JoystickDisconnected { id } => {
                id.hash(state);
            }
            Self::JoystickAxis { id, axis, value } => {
                id.hash(state);
                axis.hash(state);
                value.to_bits().hash(state);
            }
            Self::JoystickButton { id, button, pressed } => {
                id.hash(state);
                button.hash(state);
                pressed.hash(state);
            }
            Self::MouseMoved { .. } | Self::Unidentified => {}
        }
    }
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
///
/// Left/right variants are not distinguished. Ctrl covers Command on
/// macOS, Alt covers Option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Self = Self { shift: true, ctrl: false, alt: false };
    pub const CTRL: Self = Self { shift: false, ctrl: true, alt: false };
    pub const ALT: Self = Self { shift: false, ctrl: false, alt: true };
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;
    use std::collections::HashSet;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    //--- Equality ---------------------------------------------------------

    #[test]
    fn key_events_compare_by_key_and_modifiers() {
        assert_eq!(key_down(KeyCode::KeyA), key_down(KeyCode::KeyA));
        assert_ne!(key_down(KeyCode::KeyA), key_down(KeyCode::KeyB));
        assert_ne!(
            key_down(KeyCode::KeyA),
            key_down(KeyCode::KeyA).with_modifiers(Modifiers::CTRL)
        );
    }

    #[test]
    fn mouse_moved_ignores_coordinates() {
        let a = InputEvent::MouseMoved { x: 1.0, y: 2.0 };
        let b = InputEvent::MouseMoved { x: 300.0, y: 400.0 };
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn scroll_compares_deltas() {
        let a = InputEvent::MouseScrolled { dx: 0.0, dy: 1.0 };
        let b = InputEvent::MouseScrolled { dx: 0.0, dy: -1.0 };
        assert_ne!(a, b);
    }

    #[test]
    fn joystick_events_compare_payload() {
        let a = InputEvent::JoystickAxis { id: 0, axis: 1, value: 0.5 };
        let b = InputEvent::JoystickAxis { id: 0, axis: 1, value: 0.5 };
        let c = InputEvent::JoystickAxis { id: 1, axis: 1, value: 0.5 };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    //--- Hashing ----------------------------------------------------------

    #[test]
    fn hashset_keeps_latest_mouse_position() {
        let mut set = HashSet::new();
        set.insert(InputEvent::MouseMoved { x: 10.0, y: 10.0 });
        set.replace(InputEvent::MouseMoved { x: 20.0, y: 30.0 });

        assert_eq!(set.len(), 1);
        match set.iter().next() {
            Some(InputEvent::MouseMoved { x, y }) => assert_eq!((*x, *y), (20.0, 30.0)),
            other => panic!("expected MouseMoved, got {:?}", other),
        }
    }

    #[test]
    fn equal_events_hash_equal() {
        let a = key_down(KeyCode::Space).with_modifiers(Modifiers::SHIFT);
        let b = key_down(KeyCode::Space).with_modifiers(Modifiers::SHIFT);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    //--- Helpers ----------------------------------------------------------

    #[test]
    fn with_modifiers_ignores_positional_events() {
        let event = InputEvent::MouseMoved { x: 1.0, y: 1.0 }.with_modifiers(Modifiers::ALT);
        assert!(event.is_continuous());
    }
}
