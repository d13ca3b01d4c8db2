//=========================================================================
// Physics
//=========================================================================
//
// 2D rigid-body simulation and the components that bind entities to it.
//
// Architecture:
//   PhysicsWorld (rapier2d sets + pipeline, fixed timestep)
//     ├─ Rigidbody2D     one body per entity, mirrored after each step
//     ├─ *Collider2D     fixtures on the entity's body
//     └─ HingeJoint2D    revolute joint to another body or the ground
//
// Teardown order: joints go before the bodies they reference. The world
// enforces this itself when a body is removed.
//
//=========================================================================

//=== Module Declarations =================================================

mod collider;
mod joint;
mod rigidbody;
mod world;

//=== Public API ==========================================================

pub use collider::{
    BoxCollider2D, CircleCollider2D, Collider2D, ColliderFixture, ColliderMaterial,
    EdgeCollider2D, PolygonCollider2D, MAX_POLYGON_VERTICES,
};
pub use joint::HingeJoint2D;
pub use rigidbody::Rigidbody2D;
pub use world::{BodyType, PhysicsWorld};

pub use rapier2d::prelude::{ColliderHandle, ImpulseJointHandle, RigidBodyHandle};
