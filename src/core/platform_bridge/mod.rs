//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the frame loop and the platform collaborators
// (window, renderer), plus the core-side end of the input queue.
//
// Components:
// - `interface`: Window / Renderer / Clipboard traits and the queued event type
// - `event_collector`: drains the queue once per frame
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub mod interface;

//=== Public API ==========================================================

pub(crate) use event_collector::EventCollector;
pub use interface::{Clipboard, CursorMode, PlatformEvent, Renderer, Window};
