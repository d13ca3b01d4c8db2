//=========================================================================
// Error Types
//=========================================================================
//
// Engine-level error taxonomy.
//
//   EngineError   → fatal init failures, lifecycle misuse, resource reads
//   GeometryError → rejected collider geometry (non-fatal, logged)
//
// Logic errors (duplicate component, destroyed entity, missing fixture)
// are not errors here: those calls return `None`/`false` and log a warning.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== EngineError =========================================================

/// Errors raised by the engine lifecycle and its collaborators.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The window or its graphics context could not be created.
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    /// The platform event loop could not be created or driven.
    #[error("event loop error: {0}")]
    EventLoop(String),

    /// The renderer failed to initialize against the window.
    #[error("renderer initialization failed: {0}")]
    Renderer(String),

    /// `Engine::init` was called on an engine that already left `Uninitialized`.
    #[error("engine already initialized")]
    AlreadyInitialized,

    /// A frame operation was requested before `Engine::init`.
    #[error("engine not initialized")]
    NotInitialized,

    /// A shader source file could not be read.
    #[error("failed to read shader source {path:?}: {source}")]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

//=== GeometryError =======================================================

/// Rejected collider geometry.
///
/// Geometry errors never abort the frame. The collider keeps whatever
/// fixture it had before the failed assignment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("a polygon collider needs between 3 and 8 vertices, got {0}")]
    PolygonVertexCount(usize),

    #[error("an edge collider needs between 2 and 8 vertices, got {0}")]
    EdgeVertexCount(usize),

    #[error("polygon vertices do not form a convex area")]
    DegeneratePolygon,

    #[error("box size must be positive, got {0}x{1}")]
    InvalidSize(f32, f32),

    #[error("circle radius must be positive, got {0}")]
    InvalidRadius(f32),

    #[error("collider is not attached to a rigidbody")]
    Detached,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_error_messages_carry_the_count() {
        let err = GeometryError::PolygonVertexCount(9);
        assert!(err.to_string().contains('9'));

        let err = GeometryError::EdgeVertexCount(0);
        assert!(err.to_string().contains('0'));
    }

    #[test]
    fn shader_read_error_exposes_source() {
        use std::error::Error as _;

        let err = EngineError::ShaderRead {
            path: PathBuf::from("missing.vert"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("missing.vert"));
    }
}
