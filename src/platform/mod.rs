//=========================================================================
// Platform Subsystem
//=========================================================================
//
// `Window` implementations shipped with the engine.
//
// Architecture:
// ```text
//  WinitWindow / HeadlessWindow
//   │  poll_events()
//   ├─ InputProcessor   OS event → InputEvent (modifiers stamped)
//   ├─ Gamepads         gilrs event → joystick InputEvent (winit only)
//   ├─ InputBuffer      discrete in order, continuous coalesced
//   └─ flush ──────────> crossbeam input queue ──> InputSystem
// ```
//
// One flush per `poll_events` call is the batch boundary, so the input
// system sees whole polls, never half of one.
//
//=========================================================================

//=== Submodules ==========================================================

mod headless;
mod input_buffer;
mod input_processor;

#[cfg(any(
    target_os = "windows",
    target_os = "macos",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
mod gamepad;
#[cfg(any(
    target_os = "windows",
    target_os = "macos",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
mod winit_window;

//=== Public API ==========================================================

pub use headless::{HeadlessController, HeadlessWindow};

#[cfg(any(
    target_os = "windows",
    target_os = "macos",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
pub use winit_window::WinitWindow;
