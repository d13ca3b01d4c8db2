//=========================================================================
// Rendering
//=========================================================================
//
// Camera model and the renderer implementations shipped with the engine.
//
// Components:
// - `camera`: Camera component + CameraView handed to renderers
// - `shader`: shader source loading
// - `capture`: CaptureRenderer, records what each frame would draw
// - `debug`: per-tick debug line overlay
//
// GPU backends implement `platform_bridge::Renderer` outside the core.
//
//=========================================================================

//=== Module Declarations =================================================

mod camera;
mod capture;
mod debug;
mod shader;

//=== Public API ==========================================================

pub use camera::{Camera, CameraView, Projection};
pub use capture::{CaptureRenderer, DrawItem, FrameCapture};
pub use debug::{DebugDraw, DebugLine, MAX_DEBUG_LINES};
pub use shader::{ShaderProgram, ShaderStage};
