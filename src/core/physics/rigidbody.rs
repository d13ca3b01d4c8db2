//=========================================================================
// Rigidbody2D
//=========================================================================
//
// Component that owns one physics body and mirrors it onto its entity.
//
// Sync direction:
//   body → entity   after every physics step (fixed_tick)
//   entity → body   only on an explicit push_transform
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::{debug, warn};
use rapier2d::prelude::*;

//=== Internal Dependencies ===============================================

use super::collider;
use super::joint::HingeJoint2D;
use super::world::{BodyType, PhysicsWorld};
use crate::core::scene::{AsAny, Component, ComponentContext, Stage, Transform};

//=== Rigidbody2D =========================================================

/// A simulated 2D body.
///
/// Settings made before the component is attached are applied when the
/// body is created; afterwards the setters talk to the body directly.
#[derive(Debug, Clone)]
pub struct Rigidbody2D {
    handle: Option<RigidBodyHandle>,
    body_type: BodyType,
    gravity_scale: f32,
    fixed_rotation: bool,
}

impl Rigidbody2D {
    pub fn new(body_type: BodyType) -> Self {
        Self {
            handle: None,
            body_type,
            gravity_scale: 1.0,
            fixed_rotation: false,
        }
    }

    pub fn dynamic() -> Self {
        Self::new(BodyType::Dynamic)
    }

    pub fn kinematic() -> Self {
        Self::new(BodyType::Kinematic)
    }

    pub fn with_gravity_scale(mut self, scale: f32) -> Self {
        self.gravity_scale = scale;
        self
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    /// Physics body handle; `None` before attachment and after destroy.
    pub fn handle(&self) -> Option<RigidBodyHandle> {
        self.handle
    }

    fn body<'w>(&self, physics: &'w PhysicsWorld) -> Option<&'w RigidBody> {
        physics.body(self.handle?)
    }

    fn body_mut<'w>(&self, physics: &'w mut PhysicsWorld) -> Option<&'w mut RigidBody> {
        physics.body_mut(self.handle?)
    }

    //--- Body Type --------------------------------------------------------

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn set_body_type(&mut self, physics: &mut PhysicsWorld, body_type: BodyType) {
        self.body_type = body_type;
        if let Some(body) = self.body_mut(physics) {
            body.set_body_type(body_type.to_rapier(), true);
        }
    }

    //--- Motion -----------------------------------------------------------

    pub fn velocity(&self, physics: &PhysicsWorld) -> Vec2 {
        self.body(physics)
            .map(|body| Vec2::new(body.linvel().x, body.linvel().y))
            .unwrap_or(Vec2::ZERO)
    }

    pub fn set_velocity(&self, physics: &mut PhysicsWorld, velocity: Vec2) {
        if let Some(body) = self.body_mut(physics) {
            body.set_linvel(vector![velocity.x, velocity.y], true);
        }
    }

    /// Radians per second, counter-clockwise.
    pub fn angular_velocity(&self, physics: &PhysicsWorld) -> f32 {
        self.body(physics).map(|body| body.angvel()).unwrap_or(0.0)
    }

    pub fn set_angular_velocity(&self, physics: &mut PhysicsWorld, velocity: f32) {
        if let Some(body) = self.body_mut(physics) {
            body.set_angvel(velocity, true);
        }
    }

    pub fn apply_impulse(&self, physics: &mut PhysicsWorld, impulse: Vec2) {
        if let Some(body) = self.body_mut(physics) {
            body.apply_impulse(vector![impulse.x, impulse.y], true);
        }
    }

    /// Adds a force applied over the following steps until reset.
    pub fn apply_force(&self, physics: &mut PhysicsWorld, force: Vec2) {
        if let Some(body) = self.body_mut(physics) {
            body.add_force(vector![force.x, force.y], true);
        }
    }

    pub fn apply_torque_impulse(&self, physics: &mut PhysicsWorld, torque: f32) {
        if let Some(body) = self.body_mut(physics) {
            body.apply_torque_impulse(torque, true);
        }
    }

    //--- Properties -------------------------------------------------------

    pub fn gravity_scale(&self) -> f32 {
        self.gravity_scale
    }

    pub fn set_gravity_scale(&mut self, physics: &mut PhysicsWorld, scale: f32) {
        self.gravity_scale = scale;
        if let Some(body) = self.body_mut(physics) {
            body.set_gravity_scale(scale, true);
        }
    }

    pub fn fixed_rotation(&self) -> bool {
        self.fixed_rotation
    }

    pub fn set_fixed_rotation(&mut self, physics: &mut PhysicsWorld, fixed: bool) {
        self.fixed_rotation = fixed;
        if let Some(body) = self.body_mut(physics) {
            body.lock_rotations(fixed, true);
        }
    }

    /// Mass from the attached colliders, as of the last step.
    pub fn mass(&self, physics: &PhysicsWorld) -> f32 {
        self.body(physics).map(|body| body.mass()).unwrap_or(0.0)
    }

    /// Number of colliders (fixtures) attached to the body.
    pub fn fixture_count(&self, physics: &PhysicsWorld) -> usize {
        self.handle
            .map(|handle| physics.fixture_count(handle))
            .unwrap_or(0)
    }

    //--- Transform Sync ---------------------------------------------------

    /// Writes `transform` (xy + rotation about z) into the body.
    pub fn push_transform(&self, physics: &mut PhysicsWorld, transform: &Transform) -> bool {
        match self.handle {
            Some(handle) => physics.set_body_pose(
                handle,
                transform.position_2d(),
                transform.rotation_2d(),
            ),
            None => false,
        }
    }

    /// Writes the body pose into `transform`, keeping z and scale.
    pub fn pull_transform(&self, physics: &PhysicsWorld, transform: &mut Transform) -> bool {
        let Some((position, angle)) = self.handle.and_then(|h| physics.body_pose(h)) else {
            return false;
        };
        transform.set_position_2d(position);
        transform.set_rotation_2d(angle);
        true
    }
}

impl Default for Rigidbody2D {
    fn default() -> Self {
        Self::new(BodyType::Static)
    }
}

impl Component for Rigidbody2D {
    fn on_attach(&mut self, ctx: &mut ComponentContext) {
        let transform = ctx.transform().copied().unwrap_or_default();
        let physics = ctx.physics_mut();

        let handle = physics.create_body(
            self.body_type,
            transform.position_2d(),
            transform.rotation_2d(),
        );
        if let Some(body) = physics.body_mut(handle) {
            body.set_gravity_scale(self.gravity_scale, false);
            body.lock_rotations(self.fixed_rotation, false);
        }
        self.handle = Some(handle);
    }

    fn fixed_tick(&mut self, ctx: &mut ComponentContext) {
        let Some(handle) = self.handle else {
            return;
        };
        let Some((position, angle)) = ctx.physics().body_pose(handle) else {
            warn!(target: "physics", "Rigidbody2D lost its body {:?}", handle);
            self.handle = None;
            return;
        };
        if let Some(transform) = ctx.transform_mut() {
            transform.set_position_2d(position);
            transform.set_rotation_2d(angle);
        }
    }

    fn destroy(&mut self, ctx: &mut ComponentContext) {
        if let Some(handle) = self.handle.take() {
            ctx.physics_mut().remove_body(handle);
            retire_dependents(ctx, handle);
        }
    }

    fn stage(&self) -> Stage {
        Stage::Physics
    }
}

//=== Dependents ==========================================================

/// Colliders and hinges bound to a removed body drop their handles and are
/// marked for release, so they go in the same Destroy pass.
fn retire_dependents(ctx: &mut ComponentContext, body: RigidBodyHandle) {
    let mut retired = Vec::new();
    ctx.visit_components_mut(|id, component| {
        let any = component.as_any_mut();
        let bound = if any.is::<HingeJoint2D>() {
            any.downcast_mut::<HingeJoint2D>()
                .is_some_and(|hinge| hinge.detach_from(body))
        } else {
            collider::fixture_of(any).is_some_and(|fixture| fixture.detach_from(body))
        };
        if bound {
            retired.push(id);
        }
    });
    for id in retired {
        if ctx.destroy_component(id) {
            debug!(target: "physics", "Retiring {:?}, its body {:?} was removed", id, body);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
