//=========================================================================
// Core Systems
//=========================================================================
//
// Everything the engine runs that does not talk to the OS directly.
//
// Modules:
// - `config`: EngineConfig and its parts
// - `error`: EngineError / GeometryError
// - `globals`: GlobalContext shared with component hooks
// - `input`: per-frame input state fed by the platform bridge
// - `physics`: rapier2d world and physics components
// - `platform_bridge`: Window / Renderer traits and event plumbing
// - `render`: cameras, shaders, capture renderer
// - `scene`: entities, components, lifecycle dispatch
// - `time`: frame timing
//
//=========================================================================

pub mod config;
pub mod error;
pub mod globals;
pub mod input;
pub mod physics;
pub mod platform_bridge;
pub mod render;
pub mod scene;
pub mod time;
