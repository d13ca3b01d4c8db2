//=========================================================================
// Headless Window
//=========================================================================
//
// Window with no OS surface. Input and close requests are scripted
// through a `HeadlessController`, which stays usable after the window
// has been handed to the engine.
//
// Architecture:
//   HeadlessController ──(control channel)──> HeadlessWindow
//                                               │ poll_events()
//                                               └──> input queue
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use super::input_buffer::InputBuffer;
use crate::core::config::{Color, WindowConfig};
use crate::core::error::EngineError;
use crate::core::input::event::InputEvent;
use crate::core::platform_bridge::{Clipboard, CursorMode, PlatformEvent, Window};

//=== Control Messages ====================================================

enum Control {
    Forward(PlatformEvent),
    Input(InputEvent),
    Close,
}

//=== HeadlessController ==================================================

/// Scripts a [`HeadlessWindow`] from outside the frame loop.
#[derive(Clone)]
pub struct HeadlessController {
    sender: Sender<Control>,
}

impl HeadlessController {
    /// Queues input as if the OS had reported it; delivered on the next
    /// `poll_events`.
    pub fn inject(&self, events: Vec<InputEvent>) {
        for event in events {
            let _ = self.sender.send(Control::Input(event));
        }
    }

    /// Queues a raw platform message (e.g. a focus change).
    pub fn send(&self, event: PlatformEvent) {
        let _ = self.sender.send(Control::Forward(event));
    }

    /// Asks the window to close, as the user clicking the close button would.
    pub fn request_close(&self) {
        let _ = self.sender.send(Control::Close);
    }
}

//=== SharedClipboard =====================================================

/// In-memory clipboard. Every handle reads and writes the same text.
#[derive(Clone, Default)]
struct SharedClipboard(Rc<RefCell<Option<String>>>);

impl Clipboard for SharedClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.0.borrow().clone()
    }

    fn set_text(&mut self, text: &str) -> bool {
        *self.0.borrow_mut() = Some(text.to_string());
        true
    }
}

//=== HeadlessWindow ======================================================

pub struct HeadlessWindow {
    control_tx: Sender<Control>,
    control_rx: Receiver<Control>,
    sink: Option<Sender<PlatformEvent>>,
    buffer: InputBuffer,

    title: String,
    size: (u32, u32),
    cursor_mode: CursorMode,
    last_clear: Option<Color>,
    clipboard: SharedClipboard,

    close_after: Option<u64>,
    close_requested: bool,
    fail_init: Option<String>,
    initialized: bool,
    terminated: bool,

    polls: u64,
    presented: u64,
}

impl HeadlessWindow {
    pub fn new() -> Self {
        let (control_tx, control_rx) = unbounded();
        Self {
            control_tx,
            control_rx,
            sink: None,
            buffer: InputBuffer::new(),
            title: String::new(),
            size: (0, 0),
            cursor_mode: CursorMode::Normal,
            last_clear: None,
            clipboard: SharedClipboard::default(),
            close_after: None,
            close_requested: false,
            fail_init: None,
            initialized: false,
            terminated: false,
            polls: 0,
            presented: 0,
        }
    }

    /// Requests close once `frames` frames have been presented.
    pub fn close_after(mut self, frames: u64) -> Self {
        self.close_after = Some(frames);
        self.close_requested = frames == 0;
        self
    }

    /// Starts with `text` on the clipboard.
    pub fn with_clipboard(mut self, text: impl Into<String>) -> Self {
        *self.clipboard.0.borrow_mut() = Some(text.into());
        self
    }

    /// A window whose `init` fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_init: Some(reason.into()),
            ..Self::new()
        }
    }

    pub fn controller(&self) -> HeadlessController {
        HeadlessController {
            sender: self.control_tx.clone(),
        }
    }

    //--- Inspection -------------------------------------------------------

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.cursor_mode
    }

    pub fn last_clear(&self) -> Option<Color> {
        self.last_clear
    }

    pub fn clipboard_text(&self) -> Option<String> {
        self.clipboard.0.borrow().clone()
    }

    /// Number of `poll_events` calls.
    pub fn polls(&self) -> u64 {
        self.polls
    }

    /// Number of `swap_buffers` calls.
    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    //--- Internals --------------------------------------------------------

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            trace!(target: "platform", "Flushing {} injected events", self.buffer.len());
        }
        let Some((discrete, continuous)) = self.buffer.drain() else {
            return;
        };
        self.forward(PlatformEvent::Inputs { discrete, continuous });
    }

    fn forward(&mut self, event: PlatformEvent) {
        match &self.sink {
            Some(sink) => {
                if sink.send(event).is_err() {
                    warn!(target: "platform", "Input queue disconnected, dropping event");
                }
            }
            None => debug!(target: "platform", "No input queue attached, dropping event"),
        }
    }
}

impl Default for HeadlessWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl Window for HeadlessWindow {
    fn init(&mut self, config: &WindowConfig) -> Result<(), EngineError> {
        if let Some(reason) = &self.fail_init {
            return Err(EngineError::WindowCreation(reason.clone()));
        }
        self.title = config.title.clone();
        self.size = (config.width, config.height);
        self.initialized = true;
        info!(target: "platform", "Headless window '{}' ({}x{})", self.title, config.width, config.height);
        Ok(())
    }

    fn attach_input(&mut self, sink: Sender<PlatformEvent>) {
        self.sink = Some(sink);
    }

    fn poll_events(&mut self) {
        self.polls += 1;

        while let Ok(message) = self.control_rx.try_recv() {
            match message {
                Control::Input(event) => self.buffer.push(event),
                Control::Forward(event) => {
                    // Keep ordering relative to input gathered so far.
                    self.flush();
                    self.forward(event);
                }
                Control::Close => {
                    info!(target: "platform", "Headless window close requested");
                    self.close_requested = true;
                }
            }
        }
        self.flush();
    }

    fn clear(&mut self, color: Color) {
        self.last_clear = Some(color);
    }

    fn swap_buffers(&mut self) {
        self.presented += 1;
        if self.close_after.is_some_and(|limit| self.presented >= limit) {
            self.close_requested = true;
        }
    }

    fn close_requested(&self) -> bool {
        self.close_requested
    }

    fn request_close(&mut self) {
        self.close_requested = true;
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.cursor_mode = mode;
    }

    fn clipboard(&mut self) -> Option<Box<dyn Clipboard>> {
        Some(Box::new(self.clipboard.clone()))
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn terminate(&mut self) {
        if self.initialized {
            debug!(target: "platform", "Headless window closed after {} frames", self.presented);
        }
        self.initialized = false;
        self.terminated = true;
        self.sink = None;
        self.buffer.clear();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::event::{KeyCode, Modifiers};

    fn attached() -> (HeadlessWindow, Receiver<PlatformEvent>) {
        let mut window = HeadlessWindow::new();
        window.init(&WindowConfig::default()).unwrap();
        let (tx, rx) = unbounded();
        window.attach_input(tx);
        (window, rx)
    }

    #[test]
    fn init_takes_size_and_title_from_config() {
        let (window, _rx) = attached();
        assert_eq!(window.size(), (800, 600));
        assert_eq!(window.title(), WindowConfig::default().title);
        assert!(window.is_initialized());
    }

    #[test]
    fn failing_window_reports_creation_error() {
        let mut window = HeadlessWindow::failing("no display");
        let err = window.init(&WindowConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::WindowCreation(reason) if reason == "no display"));
        window.terminate();
    }

    #[test]
    fn injected_input_arrives_as_one_batch_per_poll() {
        let (mut window, rx) = attached();
        let controller = window.controller();

        controller.inject(vec![
            InputEvent::KeyDown { key: KeyCode::KeyA, modifiers: Modifiers::NONE },
            InputEvent::MouseMoved { x: 1.0, y: 1.0 },
            InputEvent::MouseMoved { x: 5.0, y: 6.0 },
        ]);
        assert!(rx.try_recv().is_err());

        window.poll_events();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                assert_eq!(discrete.len(), 1);
                assert_eq!(continuous.len(), 1);
            }
            other => panic!("Expected Inputs, got {:?}", other),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn close_after_counts_presented_frames() {
        let mut window = HeadlessWindow::new().close_after(2);
        window.init(&WindowConfig::default()).unwrap();

        window.swap_buffers();
        assert!(!window.close_requested());
        window.swap_buffers();
        assert!(window.close_requested());
    }

    #[test]
    fn controller_close_applies_on_poll() {
        let (mut window, _rx) = attached();
        window.controller().request_close();
        assert!(!window.close_requested());

        window.poll_events();
        assert!(window.close_requested());
    }

    #[test]
    fn clipboard_handles_share_the_window_text() {
        let mut window = HeadlessWindow::new().with_clipboard("seed");
        let mut first = window.clipboard().unwrap();
        let mut second = window.clipboard().unwrap();

        assert_eq!(first.get_text().as_deref(), Some("seed"));
        assert!(second.set_text("copied"));
        assert_eq!(first.get_text().as_deref(), Some("copied"));
        assert_eq!(window.clipboard_text().as_deref(), Some("copied"));
    }

    #[test]
    fn terminate_is_idempotent() {
        let (mut window, _rx) = attached();
        window.terminate();
        window.terminate();
        assert!(window.is_terminated());
        assert!(!window.is_initialized());
    }
}
