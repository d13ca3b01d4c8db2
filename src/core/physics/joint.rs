//=========================================================================
// HingeJoint2D
//=========================================================================
//
// Revolute joint between the entity's Rigidbody2D and either another
// body or the world's static ground body.
//
// Joint angle convention: angle(B) - angle(A) - reference, where A is the
// owner's body and the reference is the relative angle at creation.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::{debug, warn};
use rapier2d::prelude::*;

//=== Internal Dependencies ===============================================

use super::rigidbody::Rigidbody2D;
use super::world::PhysicsWorld;
use crate::core::scene::{Component, ComponentContext};

/// Velocity-tracking gain of the hinge motor.
const MOTOR_DAMPING: f32 = 1.0e3;

//=== HingeJoint2D ========================================================

/// Pins the owner's body to a connected body (or the ground) at the
/// owner's origin, leaving rotation free.
///
/// Limit and motor settings are cached and re-applied whenever the joint
/// is rebuilt (e.g. after `set_connected_body`).
#[derive(Debug, Clone)]
pub struct HingeJoint2D {
    handle: Option<ImpulseJointHandle>,
    body: Option<RigidBodyHandle>,
    connected: Option<RigidBodyHandle>,

    limit_enabled: bool,
    lower_limit: f32,
    upper_limit: f32,

    motor_enabled: bool,
    motor_speed: f32,
    max_motor_torque: f32,
}

impl HingeJoint2D {
    pub fn new() -> Self {
        Self {
            handle: None,
            body: None,
            connected: None,
            limit_enabled: false,
            lower_limit: 0.0,
            upper_limit: 0.0,
            motor_enabled: false,
            motor_speed: 0.0,
            max_motor_torque: 0.0,
        }
    }

    /// Hinge to `body` instead of the ground.
    pub fn connected_to(mut self, body: RigidBodyHandle) -> Self {
        self.connected = Some(body);
        self
    }

    pub fn with_limits(mut self, lower: f32, upper: f32) -> Self {
        self.limit_enabled = true;
        self.lower_limit = lower;
        self.upper_limit = upper;
        self
    }

    pub fn with_motor(mut self, speed: f32, max_torque: f32) -> Self {
        self.motor_enabled = true;
        self.motor_speed = speed;
        self.max_motor_torque = max_torque;
        self
    }

    pub fn handle(&self) -> Option<ImpulseJointHandle> {
        self.handle
    }

    //--- Connection -------------------------------------------------------

    /// Connected body, `None` when hinged to the ground.
    pub fn connected_body(&self) -> Option<RigidBodyHandle> {
        self.connected
    }

    /// Rebuilds the joint against `body` (or the ground for `None`).
    pub fn set_connected_body(&mut self, physics: &mut PhysicsWorld, body: Option<RigidBodyHandle>) {
        self.connected = body;
        if self.body.is_some() {
            self.rebuild(physics);
        }
    }

    //--- Derived State ----------------------------------------------------

    /// World position of the anchor on the owner's body.
    pub fn anchor_a(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        let joint = physics.joint(self.handle?)?;
        let body = physics.body(joint.body1)?;
        let p = body.position() * joint.data.local_anchor1();
        Some(Vec2::new(p.x, p.y))
    }

    /// World position of the anchor on the connected body.
    pub fn anchor_b(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        let joint = physics.joint(self.handle?)?;
        let body = physics.body(joint.body2)?;
        let p = body.position() * joint.data.local_anchor2();
        Some(Vec2::new(p.x, p.y))
    }

    /// Relative angle of the bodies when the joint was created.
    pub fn reference_angle(&self, physics: &PhysicsWorld) -> Option<f32> {
        let joint = physics.joint(self.handle?)?;
        Some(joint.data.local_frame1.rotation.angle() - joint.data.local_frame2.rotation.angle())
    }

    /// Current rotation of B relative to A, minus the reference angle.
    pub fn joint_angle(&self, physics: &PhysicsWorld) -> Option<f32> {
        let joint = physics.joint(self.handle?)?;
        let a = physics.body(joint.body1)?.rotation().angle();
        let b = physics.body(joint.body2)?.rotation().angle();
        let reference = self.reference_angle(physics)?;
        Some(b - a - reference)
    }

    /// Angular speed of B relative to A, radians per second.
    pub fn joint_speed(&self, physics: &PhysicsWorld) -> Option<f32> {
        let joint = physics.joint(self.handle?)?;
        let a = physics.body(joint.body1)?.angvel();
        let b = physics.body(joint.body2)?.angvel();
        Some(b - a)
    }

    //--- Limits -----------------------------------------------------------

    pub fn limit_enabled(&self) -> bool {
        self.limit_enabled
    }

    pub fn set_limit_enabled(&mut self, physics: &mut PhysicsWorld, enabled: bool) {
        self.limit_enabled = enabled;
        self.apply_limits(physics);
    }

    pub fn lower_limit(&self) -> f32 {
        self.lower_limit
    }

    pub fn upper_limit(&self) -> f32 {
        self.upper_limit
    }

    pub fn set_lower_limit(&mut self, physics: &mut PhysicsWorld, lower: f32) {
        self.lower_limit = lower;
        self.apply_limits(physics);
    }

    pub fn set_upper_limit(&mut self, physics: &mut PhysicsWorld, upper: f32) {
        self.upper_limit = upper;
        self.apply_limits(physics);
    }

    pub fn set_limits(&mut self, physics: &mut PhysicsWorld, lower: f32, upper: f32) {
        self.lower_limit = lower;
        self.upper_limit = upper;
        self.apply_limits(physics);
    }

    //--- Motor ------------------------------------------------------------

    pub fn motor_enabled(&self) -> bool {
        self.motor_enabled
    }

    pub fn set_motor_enabled(&mut self, physics: &mut PhysicsWorld, enabled: bool) {
        self.motor_enabled = enabled;
        self.apply_motor(physics);
    }

    /// Target angular speed, radians per second.
    pub fn motor_speed(&self) -> f32 {
        self.motor_speed
    }

    pub fn set_motor_speed(&mut self, physics: &mut PhysicsWorld, speed: f32) {
        self.motor_speed = speed;
        self.apply_motor(physics);
    }

    pub fn max_motor_torque(&self) -> f32 {
        self.max_motor_torque
    }

    pub fn set_max_motor_torque(&mut self, physics: &mut PhysicsWorld, torque: f32) {
        self.max_motor_torque = torque;
        self.apply_motor(physics);
    }

    //--- Internals --------------------------------------------------------

    fn rebuild(&mut self, physics: &mut PhysicsWorld) {
        if let Some(old) = self.handle.take() {
            physics.remove_joint(old);
        }
        let Some(body) = self.body else {
            return;
        };
        let other = self.connected.unwrap_or_else(|| physics.ground());
        self.handle = physics.create_hinge(body, other);
        if self.handle.is_none() {
            warn!(target: "physics", "HingeJoint2D could not join {:?} and {:?}", body, other);
            return;
        }
        self.apply_limits(physics);
        self.apply_motor(physics);
    }

    fn apply_limits(&self, physics: &mut PhysicsWorld) {
        let Some(joint) = self.handle.and_then(|h| physics.joint_mut(h)) else {
            return;
        };
        if self.limit_enabled {
            joint
                .data
                .set_limits(JointAxis::AngX, [self.lower_limit, self.upper_limit]);
        } else {
            joint.data.limit_axes.remove(JointAxesMask::ANG_X);
        }
    }

    fn apply_motor(&self, physics: &mut PhysicsWorld) {
        let Some(joint) = self.handle.and_then(|h| physics.joint_mut(h)) else {
            return;
        };
        if self.motor_enabled {
            joint
                .data
                .set_motor_velocity(JointAxis::AngX, self.motor_speed, MOTOR_DAMPING)
                .set_motor_max_force(JointAxis::AngX, self.max_motor_torque);
        } else {
            joint.data.motor_axes.remove(JointAxesMask::ANG_X);
        }
    }
}

impl Default for HingeJoint2D {
    fn default() -> Self {
        Self::new()
    }
}

impl HingeJoint2D {
    /// Forgets the joint if `body` is one of its endpoints.
    pub(super) fn detach_from(&mut self, body: RigidBodyHandle) -> bool {
        if self.body != Some(body) && self.connected != Some(body) {
            return false;
        }
        self.handle = None;
        true
    }
}

impl Component for HingeJoint2D {
    fn on_attach(&mut self, ctx: &mut ComponentContext) {
        if !ctx.has_component::<Rigidbody2D>() {
            debug!(target: "physics", "Auto-creating Rigidbody2D for HingeJoint2D");
            ctx.add_component(Rigidbody2D::default());
        }
        self.body = ctx.get_component::<Rigidbody2D>().and_then(Rigidbody2D::handle);
        self.rebuild(ctx.physics_mut());
    }

    fn tick(&mut self, ctx: &mut ComponentContext) {
        let Some(handle) = self.handle else {
            return;
        };
        if !ctx.physics().contains_joint(handle) {
            // An endpoint body was removed, which took the joint with it.
            debug!(target: "physics", "Hinge {:?} lost an endpoint, destroying", handle);
            self.handle = None;
            ctx.destroy_self();
        }
    }

    fn destroy(&mut self, ctx: &mut ComponentContext) {
        if let Some(handle) = self.handle.take() {
            ctx.physics_mut().remove_joint(handle);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
