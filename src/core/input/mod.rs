//=========================================================================
// Input System
//=========================================================================
//
// Per-frame input for components.
//
// Architecture:
//   Window shim → Sender<PlatformEvent> → EventCollector → InputSnapshot
//
// The window only ever writes into the queue; `process()` is the single
// place the snapshot changes, once at the start of every frame. Clipboard
// calls go straight to the handle the window gave out in `init`.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
pub mod snapshot;

//=== Public API ==========================================================

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
pub use snapshot::{InputSnapshot, JoystickState, MAX_JOYSTICK_INPUTS};

//=== External Dependencies ===============================================

use crossbeam_channel::unbounded;
use glam::Vec2;
use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::platform_bridge::{Clipboard, EventCollector, Window};

//=== InputSystem =========================================================

/// Input facade handed to components through their context.
///
/// Queries are answered from the snapshot built by the last `process()`
/// call, so every component sees the same input during a frame.
pub struct InputSystem {
    collector: Option<EventCollector>,
    snapshot: InputSnapshot,
    clipboard: Option<Box<dyn Clipboard>>,
}

impl InputSystem {
    pub fn new() -> Self {
        Self {
            collector: None,
            snapshot: InputSnapshot::new(),
            clipboard: None,
        }
    }

    /// Connects the input queue to `window`.
    ///
    /// Calling it again replaces the previous queue.
    pub fn init(&mut self, window: &mut dyn Window) {
        let (sender, receiver) = unbounded();
        window.attach_input(sender);
        self.collector = Some(EventCollector::new(receiver));
        self.clipboard = window.clipboard();
        if self.clipboard.is_none() {
            warn!(target: "input", "Window offers no clipboard");
        }
        debug!(target: "input", "Input queue attached to window");
    }

    /// `true` once `init` connected a window.
    pub fn is_attached(&self) -> bool {
        self.collector.is_some()
    }

    /// Rebuilds the snapshot from everything queued since the last call.
    pub fn process(&mut self) {
        self.snapshot.begin_frame();

        if let Some(collector) = self.collector.as_mut() {
            collector.collect_frame();

            if collector.focus_lost() {
                trace!(target: "input", "Focus lost, releasing held input");
                self.snapshot.release_all();
            }

            for batch in collector.batches() {
                self.snapshot.process_events(batch);
            }
        }

        self.snapshot.finalize_frame();
    }

    /// Read-only view of the current frame's input.
    pub fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    //--- Keyboard ---------------------------------------------------------

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.snapshot.key_held(key)
    }

    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.snapshot.key_pressed(key)
    }

    pub fn key_released(&self, key: KeyCode) -> bool {
        self.snapshot.key_released(key)
    }

    pub fn keys_held(&self) -> impl Iterator<Item = &KeyCode> {
        self.snapshot.keys_held()
    }

    pub fn modifiers(&self) -> Modifiers {
        self.snapshot.modifiers()
    }

    //--- Mouse ------------------------------------------------------------

    pub fn mouse_held(&self, button: MouseButton) -> bool {
        self.snapshot.mouse_held(button)
    }

    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.snapshot.mouse_pressed(button)
    }

    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.snapshot.mouse_released(button)
    }

    /// Cursor position in window pixels, top-left origin.
    pub fn mouse_position(&self) -> Vec2 {
        self.snapshot.mouse_position()
    }

    pub fn mouse_delta(&self) -> Vec2 {
        self.snapshot.mouse_delta()
    }

    /// Scroll accumulated this frame, in lines.
    pub fn scroll_delta(&self) -> Vec2 {
        self.snapshot.scroll_delta()
    }

    //--- Joysticks --------------------------------------------------------

    pub fn joystick_connected(&self, id: u32) -> bool {
        self.snapshot.joystick_connected(id)
    }

    /// Axis values of joystick `id`, empty if it is not connected.
    pub fn joystick_axes(&self, id: u32) -> &[f32] {
        self.snapshot.joystick_axes(id)
    }

    pub fn joystick_buttons(&self, id: u32) -> &[bool] {
        self.snapshot.joystick_buttons(id)
    }

    //--- Clipboard --------------------------------------------------------

    /// Current clipboard text, read from the system on every call.
    pub fn clipboard(&mut self) -> Option<String> {
        self.clipboard.as_mut()?.get_text()
    }

    /// `false` without a window clipboard or when the write was refused.
    pub fn set_clipboard(&mut self, text: &str) -> bool {
        match self.clipboard.as_mut() {
            Some(clipboard) => clipboard.set_text(text),
            None => {
                debug!(target: "input", "No clipboard attached, dropping write");
                false
            }
        }
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WindowConfig;
    use crate::core::platform_bridge::PlatformEvent;
    use crate::platform::HeadlessWindow;

    fn attached() -> (InputSystem, HeadlessWindow) {
        let mut window = HeadlessWindow::new();
        window.init(&WindowConfig::default()).unwrap();
        let mut input = InputSystem::new();
        input.init(&mut window);
        (input, window)
    }

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    #[test]
    fn process_without_window_is_a_noop() {
        let mut input = InputSystem::new();
        input.process();
        assert!(!input.is_attached());
        assert!(!input.key_held(KeyCode::KeyA));
    }

    #[test]
    fn queued_input_is_visible_after_process() {
        let (mut input, mut window) = attached();
        let controller = window.controller();

        controller.inject(vec![key_down(KeyCode::KeyW)]);
        window.poll_events();

        assert!(!input.key_held(KeyCode::KeyW));
        input.process();
        assert!(input.key_held(KeyCode::KeyW));
        assert!(input.key_pressed(KeyCode::KeyW));

        input.process();
        assert!(input.key_held(KeyCode::KeyW));
        assert!(!input.key_pressed(KeyCode::KeyW));
    }

    #[test]
    fn focus_loss_releases_held_keys() {
        let (mut input, mut window) = attached();
        let controller = window.controller();

        controller.inject(vec![key_down(KeyCode::Space)]);
        window.poll_events();
        input.process();
        assert!(input.key_held(KeyCode::Space));

        controller.send(PlatformEvent::FocusChanged(false));
        window.poll_events();
        input.process();
        assert!(!input.key_held(KeyCode::Space));
        assert!(input.key_released(KeyCode::Space));
    }

    #[test]
    fn clipboard_goes_through_the_window() {
        let mut window = HeadlessWindow::new().with_clipboard("from os");
        window.init(&WindowConfig::default()).unwrap();
        let mut input = InputSystem::new();
        input.init(&mut window);

        assert_eq!(input.clipboard().as_deref(), Some("from os"));
        assert!(input.set_clipboard("hello"));
        assert_eq!(window.clipboard_text().as_deref(), Some("hello"));
        assert_eq!(input.clipboard().as_deref(), Some("hello"));
    }

    #[test]
    fn clipboard_without_window_is_empty() {
        let mut input = InputSystem::new();
        assert!(!input.set_clipboard("lost"));
        assert_eq!(input.clipboard(), None);
    }

    #[test]
    fn unknown_joystick_reports_empty_state() {
        let input = InputSystem::new();
        assert!(!input.joystick_connected(3));
        assert!(input.joystick_axes(3).is_empty());
        assert!(input.joystick_buttons(3).is_empty());
    }
}
