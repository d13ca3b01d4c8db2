//=========================================================================
// Gamepads
//=========================================================================
//
// Polls connected gamepads through gilrs and turns their events into
// engine joystick events.
//
// Architecture:
//   WinitWindow::poll_events → Gamepads::poll → InputBuffer
//
// Axis and button indices follow gilrs' standard layout. Controls gilrs
// cannot identify are dropped.
//
//=========================================================================

//=== External Dependencies ===============================================

use gilrs::{Axis, Button, EventType, Gilrs};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::input_buffer::InputBuffer;
use crate::core::input::event::InputEvent;

//=== Gamepads ============================================================

pub(crate) struct Gamepads {
    gilrs: Gilrs,
}

impl Gamepads {
    /// `None` when the platform gamepad backend cannot start.
    pub(crate) fn open() -> Option<Self> {
        match Gilrs::new() {
            Ok(gilrs) => {
                for (id, pad) in gilrs.gamepads() {
                    info!(target: "platform", "Gamepad {} present: {}", usize::from(id), pad.name());
                }
                Some(Self { gilrs })
            }
            Err(e) => {
                warn!(target: "platform", "Gamepad support unavailable: {}", e);
                None
            }
        }
    }

    /// Moves every pending gamepad event into `buffer`.
    pub(crate) fn poll(&mut self, buffer: &mut InputBuffer) {
        while let Some(event) = self.gilrs.next_event() {
            let id = usize::from(event.id) as u32;
            match translate(id, event.event) {
                Some(input) => buffer.push(input),
                None => debug!(target: "platform", "Gamepad {} event ignored: {:?}", id, event.event),
            }
        }
    }
}

//=========================================================================
// Event Mapping
//=========================================================================

fn translate(id: u32, event: EventType) -> Option<InputEvent> {
    match event {
        EventType::Connected => Some(InputEvent::JoystickConnected { id }),
        EventType::Disconnected => Some(InputEvent::JoystickDisconnected { id }),
        EventType::ButtonPressed(button, _) => {
            button_index(button).map(|button| InputEvent::JoystickButton { id, button, pressed: true })
        }
        EventType::ButtonReleased(button, _) => {
            button_index(button).map(|button| InputEvent::JoystickButton { id, button, pressed: false })
        }
        EventType::AxisChanged(axis, value, _) => {
            axis_index(axis).map(|axis| InputEvent::JoystickAxis { id, axis, value })
        }
        _ => None,
    }
}

fn button_index(button: Button) -> Option<usize> {
    let index = match button {
        Button::South => 0,
        Button::East => 1,
        Button::North => 2,
        Button::West => 3,
        Button::C => 4,
        Button::Z => 5,
        Button::LeftTrigger => 6,
        Button::LeftTrigger2 => 7,
        Button::RightTrigger => 8,
        Button::RightTrigger2 => 9,
        Button::Select => 10,
        Button::Start => 11,
        Button::Mode => 12,
        Button::LeftThumb => 13,
        Button::RightThumb => 14,
        Button::DPadUp => 15,
        Button::DPadDown => 16,
        Button::DPadLeft => 17,
        Button::DPadRight => 18,
        _ => return None,
    };
    Some(index)
}

fn axis_index(axis: Axis) -> Option<usize> {
    let index = match axis {
        Axis::LeftStickX => 0,
        Axis::LeftStickY => 1,
        Axis::LeftZ => 2,
        Axis::RightStickX => 3,
        Axis::RightStickY => 4,
        Axis::RightZ => 5,
        Axis::DPadX => 6,
        Axis::DPadY => 7,
        _ => return None,
    };
    Some(index)
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::MAX_JOYSTICK_INPUTS;

    #[test]
    fn connection_events_keep_the_pad_id() {
        assert_eq!(translate(2, EventType::Connected), Some(InputEvent::JoystickConnected { id: 2 }));
        assert_eq!(
            translate(2, EventType::Disconnected),
            Some(InputEvent::JoystickDisconnected { id: 2 })
        );
        assert_eq!(translate(2, EventType::Dropped), None);
    }

    #[test]
    fn unknown_controls_have_no_index() {
        assert_eq!(button_index(Button::Unknown), None);
        assert_eq!(axis_index(Axis::Unknown), None);
        assert_eq!(button_index(Button::South), Some(0));
        assert_eq!(axis_index(Axis::RightStickY), Some(4));
    }

    #[test]
    fn every_index_fits_the_snapshot_arrays() {
        assert!(button_index(Button::DPadRight).is_some_and(|i| i < MAX_JOYSTICK_INPUTS));
        assert!(axis_index(Axis::DPadY).is_some_and(|i| i < MAX_JOYSTICK_INPUTS));
    }
}
