//=========================================================================
// Global Engine State
//=========================================================================
//
// Engine-wide systems shared with every component hook.
//
// Architecture:
//   Engine owns GlobalContext { input, physics, time, debug, window commands }
//   Scene::call_loop lends it to each hook through ComponentContext
//
//=========================================================================

//=== Module Declarations =================================================

mod global_context;

//=== Public API ==========================================================

pub use global_context::{GlobalContext, WindowCommand};
