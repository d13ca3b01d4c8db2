//=========================================================================
// Input Processor
//=========================================================================
//
// Translates winit window events into engine InputEvents.
//
// Architecture:
//   WinitApp::window_event → InputProcessor → InputEvent → InputBuffer
//
// ModifiersChanged updates the stamp applied to every key and button
// event that follows. Keys outside the engine's KeyCode set are dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton, MouseScrollDelta},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::event::{InputEvent, KeyCode, Modifiers, MouseButton};

/// Trackpad pixel deltas per scroll line.
const PIXELS_PER_LINE: f64 = 20.0;

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    modifiers: Modifiers,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self { modifiers: Modifiers::NONE }
    }

    pub(crate) fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = Modifiers::from(state);
    }

    /// `None` for keys with no engine mapping.
    pub(crate) fn key(&self, event: &KeyEvent) -> Option<InputEvent> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        match KeyCode::from(code) {
            KeyCode::Unidentified => None,
            key if event.state.is_pressed() => Some(InputEvent::KeyDown { key, modifiers: self.modifiers }),
            key => Some(InputEvent::KeyUp { key, modifiers: self.modifiers }),
        }
    }

    pub(crate) fn mouse_button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let button = MouseButton::from(button);
        let modifiers = self.modifiers;
        match state {
            ElementState::Pressed => InputEvent::MouseButtonDown { button, modifiers },
            ElementState::Released => InputEvent::MouseButtonUp { button, modifiers },
        }
    }

    /// Physical window coordinates, top-left origin.
    pub(crate) fn cursor(&self, x: f64, y: f64) -> InputEvent {
        InputEvent::MouseMoved { x: x as f32, y: y as f32 }
    }

    /// Wheel notches pass through; trackpad pixels are converted to lines.
    pub(crate) fn scroll(&self, delta: MouseScrollDelta) -> InputEvent {
        let (dx, dy) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x, y),
            MouseScrollDelta::PixelDelta(p) => {
                ((p.x / PIXELS_PER_LINE) as f32, (p.y / PIXELS_PER_LINE) as f32)
            }
        };
        InputEvent::MouseScrolled { dx, dy }
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

/// Keys whose winit and engine names match one to one.
macro_rules! same_name_keys {
    ($code:expr; $($name:ident)*) => {
        match $code {
            $(WinitKeyCode::$name => KeyCode::$name,)*
            _ => KeyCode::Unidentified,
        }
    };
}

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        same_name_keys!(code;
            Digit0 Digit1 Digit2 Digit3 Digit4 Digit5 Digit6 Digit7 Digit8 Digit9
            KeyA KeyB KeyC KeyD KeyE KeyF KeyG KeyH KeyI KeyJ KeyK KeyL KeyM
            KeyN KeyO KeyP KeyQ KeyR KeyS KeyT KeyU KeyV KeyW KeyX KeyY KeyZ
            F1 F2 F3 F4 F5 F6 F7 F8 F9 F10 F11 F12
            ArrowUp ArrowDown ArrowLeft ArrowRight
            ShiftLeft ShiftRight ControlLeft ControlRight AltLeft AltRight
            Space Enter Escape Tab Backspace Delete Insert Home End PageUp PageDown
        )
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            WinitMouseButton::Back => MouseButton::Back,
            WinitMouseButton::Forward => MouseButton::Forward,
            WinitMouseButton::Other(id) => MouseButton::Other(id),
        }
    }
}

//=========================================================================
// Tests
//=========================================================================
