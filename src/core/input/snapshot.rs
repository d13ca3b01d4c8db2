//=========================================================================
// Input Snapshot
//=========================================================================
//
// Per-frame input state with edge detection.
//
// Architecture:
//   InputEvent → process_events() → held sets → query
//
// Frame lifecycle: begin_frame() → process_events() → finalize_frame() → query
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use log::warn;

//=== Internal Dependencies ===============================================

use super::event::{InputEvent, KeyCode, Modifiers, MouseButton};

/// Highest axis or button index + 1 a joystick may report. Events past
/// it are dropped so a bad index cannot grow the arrays without bound.
pub const MAX_JOYSTICK_INPUTS: usize = 32;

//=== JoystickState =======================================================

/// Axis and button arrays of one connected joystick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoystickState {
    pub axes: Vec<f32>,
    pub buttons: Vec<bool>,
}

//=== InputSnapshot =======================================================

/// Held state (persists) plus pressed/released edges (cleared every frame).
#[derive(Debug, Clone)]
pub struct InputSnapshot {
    //--- Persistent State (survives frame boundary) ----------------------
    keys_held: HashSet<KeyCode>,
    buttons_held: HashSet<MouseButton>,
    mouse_position: Vec2,
    modifiers: Modifiers,
    joysticks: HashMap<u32, JoystickState>,

    //--- Frame Deltas (reset by begin_frame) -----------------------------
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    scroll_delta: Vec2,

    //--- Derived ---------------------------------------------------------
    mouse_delta: Vec2,
    last_mouse_position: Vec2,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
            buttons_held: HashSet::new(),
            mouse_position: Vec2::ZERO,
            modifiers: Modifiers::NONE,
            joysticks: HashMap::new(),
            keys_pressed: HashSet::new(),
            keys_released: HashSet::new(),
            buttons_pressed: HashSet::new(),
            buttons_released: HashSet::new(),
            scroll_delta: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
            last_mouse_position: Vec2::ZERO,
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Clears the per-frame edges. Held state is kept.
    pub(crate) fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.scroll_delta = Vec2::ZERO;
        self.last_mouse_position = self.mouse_position;
    }

    pub(crate) fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Releases everything held, e.g. when the window loses focus and the
    /// matching key-up events will never arrive.
    pub(crate) fn release_all(&mut self) {
        self.keys_released.extend(self.keys_held.drain());
        self.buttons_released.extend(self.buttons_held.drain());
        self.modifiers = Modifiers::NONE;
    }

    pub(crate) fn finalize_frame(&mut self) {
        self.mouse_delta = self.mouse_position - self.last_mouse_position;
    }

    fn process_event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::KeyDown { key, modifiers } => {
                self.modifiers = *modifiers;
                // Auto-repeat of a held key is not a new press.
                if self.keys_held.insert(*key) {
                    self.keys_pressed.insert(*key);
                }
            }

            InputEvent::KeyUp { key, modifiers } => {
                self.modifiers = *modifiers;
                if self.keys_held.remove(key) {
                    self.keys_released.insert(*key);
                }
            }

            InputEvent::MouseButtonDown { button, modifiers } => {
                self.modifiers = *modifiers;
                if self.buttons_held.insert(*button) {
                    self.buttons_pressed.insert(*button);
                }
            }

            InputEvent::MouseButtonUp { button, modifiers } => {
                self.modifiers = *modifiers;
                if self.buttons_held.remove(button) {
                    self.buttons_released.insert(*button);
                }
            }

            InputEvent::MouseMoved { x, y } => {
                self.mouse_position = Vec2::new(*x, *y);
            }

            InputEvent::MouseScrolled { dx, dy } => {
                self.scroll_delta += Vec2::new(*dx, *dy);
            }

            InputEvent::JoystickConnected { id } => {
                self.joysticks.entry(*id).or_default();
            }

            InputEvent::JoystickDisconnected { id } => {
                self.joysticks.remove(id);
            }

            InputEvent::JoystickAxis { id, axis, .. } | InputEvent::JoystickButton { id, button: axis, .. }
                if *axis >= MAX_JOYSTICK_INPUTS =>
            {
                warn!(target: "input", "Joystick {} index {} out of range, dropped", id, axis);
            }

            InputEvent::JoystickAxis { id, axis, value } => {
                let pad = self.joysticks.entry(*id).or_default();
                if pad.axes.len() <= *axis {
                    pad.axes.resize(axis + 1, 0.0);
                }
                pad.axes[*axis] = *value;
            }

            InputEvent::JoystickButton { id, button, pressed } => {
                let pad = self.joysticks.entry(*id).or_default();
                if pad.buttons.len() <= *button {
                    pad.buttons.resize(button + 1, false);
                }
                pad.buttons[*button] = *pressed;
            }

            InputEvent::Unidentified => {}
        }
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// `true` while the key is down.
    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// `true` only on the frame the key went down.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// `true` only on the frame the key went up.
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn keys_held(&self) -> impl Iterator<Item = &KeyCode> {
        self.keys_held.iter()
    }

    //=====================================================================
    // Query API - Mouse
    //=====================================================================

    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.buttons_held.contains(&button)
    }

    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// Cursor position in window pixels.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Cursor movement since the previous frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    /// Scroll accumulated during the current frame.
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll_delta
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //=====================================================================
    // Query API - Joysticks
    //=====================================================================

    pub fn joystick_connected(&self, id: u32) -> bool {
        self.joysticks.contains_key(&id)
    }

    /// Axis values of a joystick; empty if it is not connected.
    pub fn joystick_axes(&self, id: u32) -> &[f32] {
        self.joysticks
            .get(&id)
            .map(|pad| pad.axes.as_slice())
            .unwrap_or(&[])
    }

    /// Button states of a joystick; empty if it is not connected.
    pub fn joystick_buttons(&self, id: u32) -> &[bool] {
        self.joysticks
            .get(&id)
            .map(|pad| pad.buttons.as_slice())
            .unwrap_or(&[])
    }
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
