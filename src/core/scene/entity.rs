//=========================================================================
// Entity
//=========================================================================
//
// Named transform plus the ordered list of components it owns.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Quat, Vec2, Vec3};

//=== Internal Dependencies ===============================================

use super::ComponentId;

//=== Transform ===========================================================

/// Position, rotation and scale of an entity.
///
/// 2D code uses the xy plane; rotation about z is the 2D angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn from_xy(x: f32, y: f32) -> Self {
        Self::from_position(Vec3::new(x, y, 0.0))
    }

    pub fn position_2d(&self) -> Vec2 {
        self.position.truncate()
    }

    /// Sets x and y, keeping z.
    pub fn set_position_2d(&mut self, position: Vec2) {
        self.position.x = position.x;
        self.position.y = position.y;
    }

    /// Rotation about the z axis, in radians within `(-π, π]`.
    pub fn rotation_2d(&self) -> f32 {
        let angle = 2.0 * self.rotation.z.atan2(self.rotation.w);
        wrap_angle(angle)
    }

    /// Replaces the rotation with `angle` radians about z.
    pub fn set_rotation_2d(&mut self, angle: f32) {
        self.rotation = Quat::from_rotation_z(angle);
    }

    /// Adds `angle` radians of rotation about z.
    pub fn rotate_z(&mut self, angle: f32) {
        self.rotation = Quat::from_rotation_z(angle) * self.rotation;
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = angle % TAU;
    if a <= -PI {
        a += TAU;
    } else if a > PI {
        a -= TAU;
    }
    a
}

//=== Entity ==============================================================

/// Scene object: a transform and the components attached to it.
///
/// Owned by exactly one scene and addressed by [`super::EntityId`].
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub transform: Transform,
    pub(crate) components: Vec<ComponentId>,
    pub(crate) destroyed: bool,
}

impl Entity {
    pub(crate) fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            components: Vec::new(),
            destroyed: false,
        }
    }

    /// Component ids in attachment order, including tombstoned ones not
    /// yet released.
    pub fn components(&self) -> &[ComponentId] {
        &self.components
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn rotation_2d_round_trips_through_quat() {
        let mut transform = Transform::default();
        transform.set_rotation_2d(FRAC_PI_2);
        assert!((transform.rotation_2d() - FRAC_PI_2).abs() < 1e-5);

        transform.set_rotation_2d(-2.5);
        assert!((transform.rotation_2d() + 2.5).abs() < 1e-5);
    }

    #[test]
    fn rotate_z_accumulates() {
        let mut transform = Transform::default();
        transform.rotate_z(0.25);
        transform.rotate_z(0.25);
        assert!((transform.rotation_2d() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn set_position_2d_keeps_depth() {
        let mut transform = Transform::from_position(Vec3::new(1.0, 2.0, 7.0));
        transform.set_position_2d(Vec2::new(-3.0, 4.0));
        assert_eq!(transform.position, Vec3::new(-3.0, 4.0, 7.0));
        assert_eq!(transform.position_2d(), Vec2::new(-3.0, 4.0));
    }
}
