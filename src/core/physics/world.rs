//=========================================================================
// Physics World
//=========================================================================
//
// Owner of the rapier2d simulation state.
//
// Architecture:
//   Rigidbody2D / Collider / HingeJoint2D components
//         ↓ handles
//   PhysicsWorld (body, collider and joint sets + pipeline)
//         ↓ step()
//   Rigidbody2D::fixed_tick mirrors bodies back onto entities
//
// Every body, collider and joint is created and removed through this
// type. Joints attached to a body are removed before the body itself.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::{debug, trace, warn};
use rapier2d::prelude::*;

//=== Internal Dependencies ===============================================

use crate::core::config::PhysicsConfig;
use crate::core::time::StepClock;

//=== BodyType ============================================================

/// Simulation behavior of a rigidbody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyType {
    /// Never moves; infinite mass.
    #[default]
    Static,

    /// Moved by forces, gravity and contacts.
    Dynamic,

    /// Moved only by user-set velocities or positions.
    Kinematic,
}

impl BodyType {
    pub(crate) fn to_rapier(self) -> RigidBodyType {
        match self {
            Self::Static => RigidBodyType::Fixed,
            Self::Dynamic => RigidBodyType::Dynamic,
            Self::Kinematic => RigidBodyType::KinematicPositionBased,
        }
    }
}

//=== PhysicsWorld ========================================================

/// 2D physics simulation stepped at a fixed timestep.
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    /// Anchor for joints that have no connected body.
    ground: RigidBodyHandle,

    clock: StepClock,
    steps: u64,
}

impl PhysicsWorld {
    pub fn new(config: &PhysicsConfig) -> Self {
        let mut bodies = RigidBodySet::new();
        let ground = bodies.insert(RigidBodyBuilder::fixed().build());

        let params = IntegrationParameters {
            dt: config.timestep,
            ..IntegrationParameters::default()
        };

        Self {
            gravity: vector![config.gravity.x, config.gravity.y],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies,
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            ground,
            clock: StepClock::new(config.timestep, config.max_substeps),
            steps: 0,
        }
    }

    //--- Simulation -------------------------------------------------------

    /// Advances the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.steps += 1;
        trace!(target: "physics", "Step {} ({} bodies)", self.steps, self.body_count());
    }

    /// Feeds `delta` seconds of frame time and returns how many fixed
    /// steps are due. The caller runs them.
    pub(crate) fn pending_steps(&mut self, delta: f32) -> u32 {
        self.clock.advance(delta)
    }

    pub fn timestep(&self) -> f32 {
        self.params.dt
    }

    /// Number of steps run since creation.
    pub fn step_count(&self) -> u64 {
        self.steps
    }

    pub fn gravity(&self) -> Vec2 {
        Vec2::new(self.gravity.x, self.gravity.y)
    }

    pub fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = vector![gravity.x, gravity.y];
    }

    //--- Bodies -----------------------------------------------------------

    /// Inserts a body at `position` with `angle` radians of rotation.
    pub fn create_body(&mut self, body_type: BodyType, position: Vec2, angle: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::new(body_type.to_rapier())
            .translation(vector![position.x, position.y])
            .rotation(angle)
            .build();
        let handle = self.bodies.insert(body);
        debug!(target: "physics", "Created {:?} body {:?}", body_type, handle);
        handle
    }

    /// Removes a body with its colliders, after removing every joint
    /// attached to it. Returns `false` if the body does not exist.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> bool {
        if handle == self.ground {
            warn!(target: "physics", "Refusing to remove the ground body");
            return false;
        }
        if !self.bodies.contains(handle) {
            return false;
        }

        for joint in self.attached_joints(handle) {
            self.impulse_joints.remove(joint, true);
            debug!(target: "physics", "Removed joint {:?} attached to {:?}", joint, handle);
        }

        let removed = self
            .bodies
            .remove(
                handle,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some();
        debug!(target: "physics", "Removed body {:?}", handle);
        removed
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    /// Position and rotation (radians) of a body.
    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<(Vec2, f32)> {
        self.bodies.get(handle).map(|body| {
            let t = body.translation();
            (Vec2::new(t.x, t.y), body.rotation().angle())
        })
    }

    /// Teleports a body. Returns `false` if it does not exist.
    pub fn set_body_pose(&mut self, handle: RigidBodyHandle, position: Vec2, angle: f32) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                body.set_position(Isometry::new(vector![position.x, position.y], angle), true);
                true
            }
            None => false,
        }
    }

    /// Static body used as the far side of unconnected joints.
    pub fn ground(&self) -> RigidBodyHandle {
        self.ground
    }

    /// Number of user bodies (the ground body is not counted).
    pub fn body_count(&self) -> usize {
        self.bodies.len().saturating_sub(1)
    }

    //--- Colliders --------------------------------------------------------

    /// Attaches `collider` to `body`. Returns `None` if the body is gone.
    pub fn attach_collider(&mut self, collider: Collider, body: RigidBodyHandle) -> Option<ColliderHandle> {
        if !self.bodies.contains(body) {
            warn!(target: "physics", "Cannot attach collider: body {:?} does not exist", body);
            return None;
        }
        let handle = self
            .colliders
            .insert_with_parent(collider, body, &mut self.bodies);
        trace!(target: "physics", "Attached collider {:?} to {:?}", handle, body);
        Some(handle)
    }

    pub fn remove_collider(&mut self, handle: ColliderHandle) -> bool {
        self.colliders
            .remove(handle, &mut self.islands, &mut self.bodies, true)
            .is_some()
    }

    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    pub fn collider_mut(&mut self, handle: ColliderHandle) -> Option<&mut Collider> {
        self.colliders.get_mut(handle)
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Number of colliders attached to `body`.
    pub fn fixture_count(&self, body: RigidBodyHandle) -> usize {
        self.bodies
            .get(body)
            .map(|body| body.colliders().len())
            .unwrap_or(0)
    }

    //--- Joints -----------------------------------------------------------

    /// Creates a revolute joint pinning `body_a` to `body_b` at the
    /// current origin of `body_a`.
    ///
    /// The current relative rotation becomes the reference angle, so the
    /// joint angle starts at zero.
    pub fn create_hinge(
        &mut self,
        body_a: RigidBodyHandle,
        body_b: RigidBodyHandle,
    ) -> Option<ImpulseJointHandle> {
        if body_a == body_b {
            warn!(target: "physics", "Cannot hinge body {:?} to itself", body_a);
            return None;
        }
        let pose_a = *self.bodies.get(body_a)?.position();
        let pose_b = *self.bodies.get(body_b)?.position();

        // Anchor B is anchor A (origin of body A) expressed in B's frame.
        let anchor_b = pose_b.inverse_transform_point(&Point::from(pose_a.translation.vector));
        let reference = pose_b.rotation.angle() - pose_a.rotation.angle();

        let joint = GenericJointBuilder::new(JointAxesMask::LOCKED_REVOLUTE_AXES)
            .local_frame1(Isometry::identity())
            .local_frame2(Isometry::new(anchor_b.coords, -reference))
            .build();

        let handle = self.impulse_joints.insert(body_a, body_b, joint, true);
        debug!(target: "physics", "Created hinge {:?} between {:?} and {:?}", handle, body_a, body_b);
        Some(handle)
    }

    pub fn remove_joint(&mut self, handle: ImpulseJointHandle) -> bool {
        self.impulse_joints.remove(handle, true).is_some()
    }

    pub fn joint(&self, handle: ImpulseJointHandle) -> Option<&ImpulseJoint> {
        self.impulse_joints.get(handle)
    }

    /// Mutable joint access. Both endpoint bodies are woken up so the
    /// change takes effect on the next step.
    pub fn joint_mut(&mut self, handle: ImpulseJointHandle) -> Option<&mut ImpulseJoint> {
        let (body1, body2) = {
            let joint = self.impulse_joints.get(handle)?;
            (joint.body1, joint.body2)
        };
        for body in [body1, body2] {
            if let Some(body) = self.bodies.get_mut(body) {
                body.wake_up(true);
            }
        }
        self.impulse_joints.get_mut(handle)
    }

    pub fn contains_joint(&self, handle: ImpulseJointHandle) -> bool {
        self.impulse_joints.get(handle).is_some()
    }

    /// Handles of every joint touching `body`.
    pub fn attached_joints(&self, body: RigidBodyHandle) -> Vec<ImpulseJointHandle> {
        self.impulse_joints
            .attached_joints(body)
            .map(|(_, _, handle, _)| handle)
            .collect()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(&PhysicsConfig::default())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(&PhysicsConfig::default())
    }

    #[test]
    fn dynamic_body_falls_under_gravity() {
        let mut world = world();
        let body = world.create_body(BodyType::Dynamic, Vec2::new(0.0, 10.0), 0.0);
        world
            .attach_collider(ColliderBuilder::ball(0.5).build(), body)
            .unwrap();

        for _ in 0..10 {
            world.step();
        }

        let (position, _) = world.body_pose(body).unwrap();
        assert!(position.y < 10.0);
        assert_eq!(world.step_count(), 10);
    }

    #[test]
    fn static_body_stays_put() {
        let mut world = world();
        let body = world.create_body(BodyType::Static, Vec2::new(1.0, 2.0), 0.5);
        world.step();

        let (position, angle) = world.body_pose(body).unwrap();
        assert_eq!(position, Vec2::new(1.0, 2.0));
        assert!((angle - 0.5).abs() < 1e-5);
    }

    #[test]
    fn removing_body_removes_its_joints_and_colliders() {
        let mut world = world();
        let a = world.create_body(BodyType::Dynamic, Vec2::ZERO, 0.0);
        let b = world.create_body(BodyType::Dynamic, Vec2::new(1.0, 0.0), 0.0);
        world.attach_collider(ColliderBuilder::cuboid(0.5, 0.5).build(), a);
        let joint = world.create_hinge(a, b).unwrap();
        assert_eq!(world.joint_count(), 1);
        assert_eq!(world.fixture_count(a), 1);

        assert!(world.remove_body(a));

        assert!(!world.contains_joint(joint));
        assert_eq!(world.collider_count(), 0);
        assert_eq!(world.body_count(), 1);
        assert!(!world.remove_body(a));
    }

    #[test]
    fn ground_body_cannot_be_removed() {
        let mut world = world();
        assert!(!world.remove_body(world.ground()));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn hinge_requires_two_distinct_bodies() {
        let mut world = world();
        let a = world.create_body(BodyType::Dynamic, Vec2::ZERO, 0.0);
        assert!(world.create_hinge(a, a).is_none());
        assert!(world.create_hinge(a, world.ground()).is_some());
    }

    #[test]
    fn pending_steps_follow_the_timestep() {
        let mut world = PhysicsWorld::new(&PhysicsConfig {
            timestep: 0.5,
            max_substeps: 4,
            ..PhysicsConfig::default()
        });
        assert_eq!(world.pending_steps(0.25), 0);
        assert_eq!(world.pending_steps(0.25), 1);
        assert_eq!(world.pending_steps(1.0), 2);
    }

    #[test]
    fn set_body_pose_teleports() {
        let mut world = world();
        let body = world.create_body(BodyType::Kinematic, Vec2::ZERO, 0.0);
        assert!(world.set_body_pose(body, Vec2::new(3.0, 4.0), 1.0));

        let (position, angle) = world.body_pose(body).unwrap();
        assert_eq!(position, Vec2::new(3.0, 4.0));
        assert!((angle - 1.0).abs() < 1e-5);
    }
}
