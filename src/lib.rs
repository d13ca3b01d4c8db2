//=========================================================================
// Kestrel Engine - Library Root
//
// Single-threaded engine loop: window + input, a scene of entities with
// scripted components, 2D rigid-body physics and a pluggable renderer.
//
// Typical usage:
// ```no_run
// use kestrel_engine::prelude::*;
// use kestrel_engine::platform::WinitWindow;
//
// let mut engine = EngineBuilder::new()
//     .with_title("game")
//     .build(WinitWindow::new(), CaptureRenderer::new());
// engine.run_or_exit(Scene::new("main"));
// engine.terminate();
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds every engine system (scene, physics, input, render, ...).
// `platform` provides the `Window` implementations (winit, headless).
//
pub mod core;
pub mod logging;
pub mod platform;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
mod engine;

//--- Public Exports ------------------------------------------------------
pub use engine::{Engine, EngineBuilder, EngineState};
