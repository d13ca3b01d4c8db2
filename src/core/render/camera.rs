//=========================================================================
// Camera
//=========================================================================
//
// Camera component and the view the renderer draws from.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Mat4, Quat, Vec3};

//=== Internal Dependencies ===============================================

use crate::core::scene::{Component, Transform};

//=== Projection ==========================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// `size` is the half-height of the view volume in world units.
    Orthographic { size: f32, near: f32, far: f32 },

    /// `fov_y` in radians.
    Perspective { fov_y: f32, near: f32, far: f32 },
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        match *self {
            Self::Orthographic { size, near, far } => {
                let half_w = size * aspect;
                Mat4::orthographic_rh(-half_w, half_w, -size, size, near, far)
            }
            Self::Perspective { fov_y, near, far } => Mat4::perspective_rh(fov_y, aspect, near, far),
        }
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self::Orthographic {
            size: 5.0,
            near: -100.0,
            far: 100.0,
        }
    }
}

//=== Camera ==============================================================

/// Marks an entity as a viewpoint. The first primary camera in dispatch
/// order is the one rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub projection: Projection,
    pub primary: bool,
}

impl Camera {
    pub fn orthographic(size: f32) -> Self {
        Self {
            projection: Projection::Orthographic {
                size,
                near: -100.0,
                far: 100.0,
            },
            primary: true,
        }
    }

    pub fn perspective(fov_y: f32) -> Self {
        Self {
            projection: Projection::Perspective {
                fov_y,
                near: 0.1,
                far: 1000.0,
            },
            primary: true,
        }
    }

    /// View of this camera placed at `transform`.
    pub fn view(&self, transform: &Transform) -> CameraView {
        CameraView {
            position: transform.position,
            rotation: transform.rotation,
            projection: self.projection,
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: Projection::default(),
            primary: true,
        }
    }
}

impl Component for Camera {}

//=== CameraView ==========================================================

/// Snapshot of the active camera handed to `Renderer::render`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub rotation: Quat,
    pub projection: Projection,
}

impl CameraView {
    /// World → view transform.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection.matrix(aspect) * self.view_matrix()
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            projection: Projection::default(),
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
