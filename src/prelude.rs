//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use kestrel_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine core
pub use crate::engine::{Engine, EngineBuilder, EngineState};
pub use crate::core::config::{Color, EngineConfig, TickPolicy, WindowConfig};
pub use crate::core::error::{EngineError, GeometryError};

// Global systems and context
pub use crate::core::globals::{GlobalContext, WindowCommand};
pub use crate::core::time::Time;

// Input system
pub use crate::core::input::{InputSystem, KeyCode, Modifiers, MouseButton};

// Scene system
pub use crate::core::scene::{
    CallState, Component, ComponentContext, ComponentHandle, EntityId, Scene, Stage, Transform,
};

// Physics
pub use crate::core::physics::{
    BodyType, BoxCollider2D, CircleCollider2D, Collider2D, ColliderMaterial, EdgeCollider2D,
    HingeJoint2D, PhysicsWorld, PolygonCollider2D, Rigidbody2D,
};

// Rendering and platform
pub use crate::core::platform_bridge::{CursorMode, Renderer, Window};
pub use crate::core::render::{Camera, CaptureRenderer, DebugDraw, DebugLine};

// Math
pub use glam::{Quat, Vec2, Vec3};
