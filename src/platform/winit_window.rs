//=========================================================================
// Winit Window
//=========================================================================
//
// Desktop window driven by winit's pump-events API, so the engine keeps
// ownership of the frame loop instead of handing it to `run_app`.
//
// Architecture:
// ```text
//  poll_events()
//    └─ EventLoop::pump_app_events(0ms, &mut WinitApp)
//         ├─ resumed        → create OS window (first pump only)
//         ├─ window_event   → InputProcessor → InputBuffer
//         └─ CloseRequested → close flag
//    └─ Gamepads::poll   → InputBuffer
//    └─ flush InputBuffer ──> input queue (PlatformEvent::Inputs)
// ```
//
// The clipboard is the system one, reached through arboard.
//
// Surface/GPU setup belongs to the Renderer; `clear` and `swap_buffers`
// only record the request and notify winit that a frame is ready.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use crossbeam_channel::Sender;
use log::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{CursorGrabMode, Fullscreen, Window as OsWindow, WindowAttributes, WindowId},
};

//=== Internal Dependencies ===============================================

use super::gamepad::Gamepads;
use super::input_buffer::InputBuffer;
use super::input_processor::InputProcessor;
use crate::core::config::{Color, WindowConfig};
use crate::core::error::EngineError;
use crate::core::platform_bridge::{Clipboard, CursorMode, PlatformEvent, Window};

/// Pumps allowed for the OS to deliver the first `resumed` during init.
const MAX_INIT_PUMPS: usize = 16;

//=== WinitApp ============================================================

/// Winit callback target; owns the OS window once it exists.
struct WinitApp {
    attributes: WindowAttributes,
    window: Option<OsWindow>,
    creation_error: Option<String>,

    buffer: InputBuffer,
    processor: InputProcessor,
    focus_changes: Vec<bool>,
    close_requested: bool,
}

impl WinitApp {
    fn new(config: &WindowConfig) -> Self {
        let mut attributes = WindowAttributes::default()
            .with_title(config.title.clone())
            .with_inner_size(LogicalSize::new(config.width, config.height));
        if config.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        Self {
            attributes,
            window: None,
            creation_error: None,
            buffer: InputBuffer::new(),
            processor: InputProcessor::new(),
            focus_changes: Vec::new(),
            close_requested: false,
        }
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (resume)");
            return;
        }

        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.creation_error = Some(e.to_string());
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close_requested = true;
            }

            WindowEvent::Focused(focused) => {
                trace!(target: "platform", "Focus changed: {}", focused);
                self.focus_changes.push(focused);
            }

            WindowEvent::ModifiersChanged(state) => {
                self.processor.set_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self.processor.cursor(position.x, position.y);
                self.buffer.push_continuous(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.processor.key(&key_event) {
                    Some(event) => self.buffer.push_discrete(event),
                    None => trace!(target: "platform", "Unmapped key ignored"),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.processor.mouse_button(button, state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let event = self.processor.scroll(delta);
                self.buffer.push_discrete(event);
            }

            _ => {}
        }
    }
}

//=== SystemClipboard =====================================================

struct SystemClipboard(arboard::Clipboard);

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        match self.0.get_text() {
            Ok(text) => Some(text),
            Err(arboard::Error::ContentNotAvailable) => None,
            Err(e) => {
                warn!(target: "platform", "Clipboard read failed: {}", e);
                None
            }
        }
    }

    fn set_text(&mut self, text: &str) -> bool {
        match self.0.set_text(text) {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "platform", "Clipboard write failed: {}", e);
                false
            }
        }
    }
}

//=== WinitWindow =========================================================

/// Desktop [`Window`] backed by winit.
///
/// Must be created and driven on the main thread.
pub struct WinitWindow {
    event_loop: Option<EventLoop<()>>,
    app: Option<WinitApp>,
    gamepads: Option<Gamepads>,
    sink: Option<Sender<PlatformEvent>>,
    clear_color: Color,
}

impl WinitWindow {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            app: None,
            gamepads: None,
            sink: None,
            clear_color: Color::default(),
        }
    }

    /// Last color passed to `clear`, for the renderer's surface pass.
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// The OS window, once `init` succeeded.
    pub fn os_window(&self) -> Option<&OsWindow> {
        self.app.as_ref().and_then(|app| app.window.as_ref())
    }

    fn pump(&mut self) {
        let (Some(event_loop), Some(app)) = (self.event_loop.as_mut(), self.app.as_mut()) else {
            return;
        };
        if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), app) {
            debug!(target: "platform", "Event loop exited with code {}", code);
            app.close_requested = true;
        }
    }

    fn poll_gamepads(&mut self) {
        if let (Some(gamepads), Some(app)) = (self.gamepads.as_mut(), self.app.as_mut()) {
            gamepads.poll(&mut app.buffer);
        }
    }

    fn flush(&mut self) {
        let Some(app) = self.app.as_mut() else {
            return;
        };
        let Some(sink) = self.sink.as_ref() else {
            app.buffer.clear();
            app.focus_changes.clear();
            return;
        };

        for focused in app.focus_changes.drain(..) {
            let _ = sink.send(PlatformEvent::FocusChanged(focused));
        }
        if let Some((discrete, continuous)) = app.buffer.drain() {
            let count = discrete.len() + continuous.len();
            if sink.send(PlatformEvent::Inputs { discrete, continuous }).is_err() {
                warn!(target: "platform", "Input queue disconnected, dropping {} events", count);
            }
        }
    }
}

impl Default for WinitWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl Window for WinitWindow {
    fn init(&mut self, config: &WindowConfig) -> Result<(), EngineError> {
        let event_loop = EventLoop::new().map_err(|e| EngineError::EventLoop(e.to_string()))?;
        self.event_loop = Some(event_loop);
        self.app = Some(WinitApp::new(config));

        for _ in 0..MAX_INIT_PUMPS {
            self.pump();
            let Some(app) = self.app.as_mut() else {
                break;
            };
            if let Some(reason) = app.creation_error.take() {
                return Err(EngineError::WindowCreation(reason));
            }
            if app.window.is_some() {
                if !config.vsync {
                    debug!(target: "platform", "vsync off requested; left to the renderer");
                }
                self.gamepads = Gamepads::open();
                return Ok(());
            }
        }
        Err(EngineError::WindowCreation(
            "the OS never resumed the application".to_string(),
        ))
    }

    fn attach_input(&mut self, sink: Sender<PlatformEvent>) {
        self.sink = Some(sink);
    }

    fn poll_events(&mut self) {
        self.pump();
        self.poll_gamepads();
        self.flush();
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = color;
    }

    fn swap_buffers(&mut self) {
        if let Some(window) = self.os_window() {
            window.pre_present_notify();
            window.request_redraw();
        }
    }

    fn close_requested(&self) -> bool {
        self.app.as_ref().map_or(true, |app| app.close_requested)
    }

    fn request_close(&mut self) {
        if let Some(app) = self.app.as_mut() {
            app.close_requested = true;
        }
    }

    fn set_title(&mut self, title: &str) {
        if let Some(window) = self.os_window() {
            window.set_title(title);
        }
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        let Some(window) = self.os_window() else {
            return;
        };
        window.set_cursor_visible(mode == CursorMode::Normal);

        let grab = match mode {
            CursorMode::Locked => window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined)),
            _ => window.set_cursor_grab(CursorGrabMode::None),
        };
        if let Err(e) = grab {
            warn!(target: "platform", "Cursor mode {:?} not supported: {}", mode, e);
        }
    }

    fn clipboard(&mut self) -> Option<Box<dyn Clipboard>> {
        match arboard::Clipboard::new() {
            Ok(clipboard) => Some(Box::new(SystemClipboard(clipboard))),
            Err(e) => {
                warn!(target: "platform", "System clipboard unavailable: {}", e);
                None
            }
        }
    }

    fn size(&self) -> (u32, u32) {
        self.os_window()
            .map(|window| {
                let size = window.inner_size();
                (size.width, size.height)
            })
            .unwrap_or((0, 0))
    }

    fn terminate(&mut self) {
        if let Some(mut app) = self.app.take() {
            if app.window.take().is_some() {
                info!(target: "platform", "Window destroyed");
            }
            app.buffer.clear();
        }
        self.event_loop = None;
        self.gamepads = None;
        self.sink = None;
    }
}
