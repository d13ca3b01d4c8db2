//=========================================================================
// Input Buffer
//
// Collects input converted from OS events between two `poll_events`
// calls and hands it to the input queue as one batch.
//
// Responsibilities:
// - Keep discrete inputs (keys, buttons, scroll) in arrival order
// - Drop back-to-back key presses (OS key repeat)
// - Coalesce continuous inputs (cursor motion) to their latest value
//
// Notes:
// The buffer lives on the window and is emptied on every flush.
//=========================================================================

//=== Standard Library Imports ============================================
use std::collections::HashSet;

//=== Internal Modules ====================================================
use crate::core::input::event::InputEvent;

//=== InputBuffer Struct ==================================================
//
// Transient event store for one poll of the window.
//
// - `discrete`: one-shot inputs in order
// - `continuous`: last-known value per continuous input kind
//
pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    //--- Construction -----------------------------------------------------
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 64;
        const CONTINUOUS_BASE: usize = 4;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: HashSet::with_capacity(CONTINUOUS_BASE),
        }
    }

    //--- Event Handling ---------------------------------------------------

    /// Routes `event` to the discrete or continuous store.
    pub(crate) fn push(&mut self, event: InputEvent) {
        if event.is_continuous() {
            self.push_continuous(event);
        } else {
            self.push_discrete(event);
        }
    }

    /// Latest value wins (`MouseMoved` hashes without its coordinates).
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.continuous.replace(event);
    }

    /// Consecutive identical key presses (auto-repeat) are kept once.
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        let repeat = matches!(event, InputEvent::KeyDown { .. })
            && self.discrete.last() == Some(&event);
        if !repeat {
            self.discrete.push(event);
        }
    }

    //--- Drain ------------------------------------------------------------
    //
    // Returns `(discrete, continuous)` and empties the buffer, or `None`
    // when nothing was collected.
    //
    pub(crate) fn drain(&mut self) -> Option<(Vec<InputEvent>, Vec<InputEvent>)> {
        if self.is_empty() {
            return None;
        }
        let discrete = std::mem::replace(&mut self.discrete, Vec::with_capacity(64));
        let continuous = self.continuous.drain().collect();
        Some((discrete, continuous))
    }

    //--- Utilities --------------------------------------------------------
    pub(crate) fn clear(&mut self) {
        self.discrete.clear();
        self.continuous.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.discrete.len() + self.continuous.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{KeyCode, Modifiers};

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown { key, modifiers: Modifiers::NONE }
    }

    fn mouse_move(x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }

    #[test]
    fn repeated_key_presses_are_collapsed() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(key_down(KeyCode::KeyA));
        buffer.push_discrete(key_down(KeyCode::KeyA));
        buffer.push_discrete(key_down(KeyCode::KeyB));
        buffer.push_discrete(key_down(KeyCode::KeyA));
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn identical_scrolls_are_all_kept() {
        let mut buffer = InputBuffer::new();
        buffer.push(InputEvent::MouseScrolled { dx: 0.0, dy: 1.0 });
        buffer.push(InputEvent::MouseScrolled { dx: 0.0, dy: 1.0 });
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn continuous_keeps_latest_value() {
        let mut buffer = InputBuffer::new();
        buffer.push(mouse_move(10.0, 10.0));
        buffer.push(mouse_move(20.0, 30.0));

        let (discrete, continuous) = buffer.drain().unwrap();
        assert!(discrete.is_empty());
        assert_eq!(continuous.len(), 1);
        match continuous[0] {
            InputEvent::MouseMoved { x, y } => assert_eq!((x, y), (20.0, 30.0)),
            ref other => panic!("Expected MouseMoved, found {:?}", other),
        }
    }

    #[test]
    fn push_routes_by_kind() {
        let mut buffer = InputBuffer::new();
        buffer.push(key_down(KeyCode::Space));
        buffer.push(mouse_move(1.0, 1.0));
        buffer.push(InputEvent::MouseScrolled { dx: 0.0, dy: 1.0 });

        let (discrete, continuous) = buffer.drain().unwrap();
        assert_eq!(discrete.len(), 2);
        assert_eq!(continuous.len(), 1);
    }

    #[test]
    fn drain_empties_and_reports_none_when_empty() {
        let mut buffer = InputBuffer::new();
        assert!(buffer.drain().is_none());

        buffer.push(key_down(KeyCode::KeyA));
        assert!(buffer.drain().is_some());
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut buffer = InputBuffer::new();
        for i in 0..128 {
            let key = if i % 2 == 0 { KeyCode::KeyA } else { KeyCode::KeyB };
            buffer.push_discrete(key_down(key));
        }
        let capacity = buffer.discrete.capacity();

        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.discrete.capacity(), capacity);
    }
}
