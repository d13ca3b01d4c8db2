//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Contract between the frame loop and its external collaborators.
//
//   Window   → OS window + event pump (winit, headless)
//   Clipboard → system clipboard handle a window hands out
//   Renderer → draws the active scene for a camera
//   PlatformEvent → what a window shim pushes into the input queue
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::Sender;

//=== Internal Dependencies ===============================================

use crate::core::config::{Color, EngineConfig, WindowConfig};
use crate::core::error::EngineError;
use crate::core::input::event::InputEvent;
use crate::core::render::{CameraView, DebugDraw};
use crate::core::scene::Scene;

//=== PlatformEvent =======================================================

/// Messages queued by a window shim for the input system.
#[derive(Debug, Clone)]
pub enum PlatformEvent {
    /// Input gathered during one `poll_events` call.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// The window gained (`true`) or lost (`false`) keyboard focus.
    FocusChanged(bool),
}

//=== CursorMode ==========================================================

/// How the OS cursor behaves over the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    #[default]
    Normal,

    /// Cursor is invisible but free to leave the window.
    Hidden,

    /// Cursor is invisible and locked to the window (mouse-look).
    Locked,
}

//=== Clipboard ===========================================================

/// Text access to the system clipboard.
pub trait Clipboard {
    /// `None` when the clipboard is empty, holds no text, or is unreachable.
    fn get_text(&mut self) -> Option<String>;

    /// `false` when the platform refused the write.
    fn set_text(&mut self, text: &str) -> bool;
}

//=== Window ==============================================================

/// OS window and event pump.
///
/// Implementations must tolerate `terminate` being called more than once
/// and before `init` succeeded.
pub trait Window {
    /// Creates the OS window and its drawing surface.
    fn init(&mut self, config: &WindowConfig) -> Result<(), EngineError>;

    /// Hands the window the sending side of the input queue.
    fn attach_input(&mut self, sink: Sender<PlatformEvent>);

    /// Drains pending OS events, forwarding input to the attached queue.
    fn poll_events(&mut self);

    fn clear(&mut self, color: Color);

    /// Presents the finished frame.
    fn swap_buffers(&mut self);

    /// `true` once the user, the OS or [`Window::request_close`] asked
    /// the window to close.
    fn close_requested(&self) -> bool;

    fn request_close(&mut self);

    fn set_title(&mut self, title: &str);

    fn set_cursor_mode(&mut self, mode: CursorMode);

    /// Opens a handle to the clipboard this window shares with the OS.
    /// `None` when the platform has no clipboard.
    fn clipboard(&mut self) -> Option<Box<dyn Clipboard>>;

    /// Drawable size in pixels.
    fn size(&self) -> (u32, u32);

    fn terminate(&mut self);
}

//=== Renderer ============================================================

/// Draws the active scene once per frame.
pub trait Renderer {
    fn init(&mut self, window: &dyn Window, config: &EngineConfig) -> Result<(), EngineError>;

    /// Draws `scene`, then the `debug` lines on top.
    fn render(
        &mut self,
        camera: &CameraView,
        scene: &Scene,
        debug: &DebugDraw,
        window: &mut dyn Window,
        config: &EngineConfig,
    );

    /// Releases renderer resources. Must be idempotent.
    fn terminate(&mut self);
}
