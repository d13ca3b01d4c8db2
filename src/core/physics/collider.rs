//=========================================================================
// 2D Colliders
//=========================================================================
//
// Collision geometry attached to the Rigidbody2D on the same entity.
//
// Architecture:
//   Box / Circle / Polygon / Edge collider component
//         ↓ owns
//   ColliderFixture (one rapier collider + cached material)
//         ↓ attached to
//   Rigidbody2D body (auto-created on attach when missing)
//
// Geometry is validated before anything touches the world. A rejected
// assignment is logged, returned as `GeometryError`, and leaves the
// previous fixture in place. A successful one replaces it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;

use glam::Vec2;
use log::{debug, error, warn};
use rapier2d::prelude::*;

//=== Internal Dependencies ===============================================

use super::rigidbody::Rigidbody2D;
use super::world::PhysicsWorld;
use crate::core::error::GeometryError;
use crate::core::scene::{Component, ComponentContext};

/// Most vertices a polygon or edge chain may have.
pub const MAX_POLYGON_VERTICES: usize = 8;

//=== ColliderMaterial ====================================================

/// Surface properties applied to every fixture a collider creates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderMaterial {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Triggers report overlaps but produce no contact response.
    pub is_trigger: bool,
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.2,
            restitution: 0.0,
            is_trigger: false,
        }
    }
}

//=== ColliderFixture =====================================================

/// The one physics collider a collider component currently owns.
#[derive(Debug, Clone, Default)]
pub struct ColliderFixture {
    handle: Option<ColliderHandle>,
    body: Option<RigidBodyHandle>,
    material: ColliderMaterial,
    last_error: Option<GeometryError>,
}

impl ColliderFixture {
    fn with_material(material: ColliderMaterial) -> Self {
        Self {
            material,
            ..Self::default()
        }
    }

    pub fn handle(&self) -> Option<ColliderHandle> {
        self.handle
    }

    /// Body the fixture is (or will be) attached to.
    pub fn body(&self) -> Option<RigidBodyHandle> {
        self.body
    }

    pub fn material(&self) -> ColliderMaterial {
        self.material
    }

    /// Most recent rejected geometry, cleared by the next success.
    pub fn last_error(&self) -> Option<&GeometryError> {
        self.last_error.as_ref()
    }

    /// Finds the entity's Rigidbody2D, creating a static one if needed.
    fn bind(&mut self, ctx: &mut ComponentContext) {
        if !ctx.has_component::<Rigidbody2D>() {
            debug!(target: "physics", "Auto-creating Rigidbody2D for collider");
            ctx.add_component(Rigidbody2D::default());
        }
        self.body = ctx.get_component::<Rigidbody2D>().and_then(Rigidbody2D::handle);
        if self.body.is_none() {
            warn!(target: "physics", "Collider could not find a body to attach to");
        }
    }

    /// Swaps the current fixture for one built from `shape`.
    fn replace(
        &mut self,
        physics: &mut PhysicsWorld,
        shape: Result<ColliderBuilder, GeometryError>,
    ) -> Result<(), GeometryError> {
        let result = self.try_replace(physics, shape);
        match &result {
            Ok(()) => self.last_error = None,
            Err(err) => {
                error!(target: "physics", "Collider geometry rejected: {}", err);
                self.last_error = Some(err.clone());
            }
        }
        result
    }

    fn try_replace(
        &mut self,
        physics: &mut PhysicsWorld,
        shape: Result<ColliderBuilder, GeometryError>,
    ) -> Result<(), GeometryError> {
        let builder = shape?;
        let body = self
            .body
            .filter(|&body| physics.contains_body(body))
            .ok_or(GeometryError::Detached)?;

        let collider = builder
            .density(self.material.density)
            .friction(self.material.friction)
            .restitution(self.material.restitution)
            .sensor(self.material.is_trigger)
            .build();

        if let Some(old) = self.handle.take() {
            physics.remove_collider(old);
        }
        self.handle = physics.attach_collider(collider, body);
        Ok(())
    }

    fn release(&mut self, physics: &mut PhysicsWorld) {
        if let Some(handle) = self.handle.take() {
            // Already gone if the body was removed first.
            physics.remove_collider(handle);
        }
    }

    /// `false` once the body the fixture was bound to has been removed.
    fn body_alive(&self, physics: &PhysicsWorld) -> bool {
        self.body.is_some_and(|body| physics.contains_body(body))
    }

    /// Destroys the owning collider once its body is gone.
    fn follow_body(&mut self, ctx: &mut ComponentContext) {
        if self.body.is_some() && !self.body_alive(ctx.physics()) {
            debug!(target: "physics", "Collider body {:?} is gone, destroying collider", self.body);
            self.handle = None;
            self.body = None;
            ctx.destroy_self();
        }
    }

    /// Forgets the fixture if it is attached to `body`, which is going away.
    pub(super) fn detach_from(&mut self, body: RigidBodyHandle) -> bool {
        if self.body != Some(body) {
            return false;
        }
        self.handle = None;
        self.body = None;
        true
    }

    fn live<'w>(&self, physics: &'w PhysicsWorld) -> Option<&'w Collider> {
        physics.collider(self.handle?)
    }

    fn live_mut<'w>(&self, physics: &'w mut PhysicsWorld) -> Option<&'w mut Collider> {
        physics.collider_mut(self.handle?)
    }
}

//=== Collider2D ==========================================================

/// Material access shared by every collider component.
///
/// Getters read the live fixture and return `None` when there is none.
/// Setters always update the cached material, which is applied to the
/// live fixture now and to every fixture created later.
pub trait Collider2D {
    fn fixture(&self) -> &ColliderFixture;

    fn fixture_mut(&mut self) -> &mut ColliderFixture;

    fn collider_handle(&self) -> Option<ColliderHandle> {
        self.fixture().handle()
    }

    fn last_error(&self) -> Option<&GeometryError> {
        self.fixture().last_error()
    }

    fn density(&self, physics: &PhysicsWorld) -> Option<f32> {
        self.fixture().live(physics).map(|c| c.density())
    }

    fn set_density(&mut self, physics: &mut PhysicsWorld, density: f32) {
        let fixture = self.fixture_mut();
        fixture.material.density = density;
        if let Some(collider) = fixture.live_mut(physics) {
            collider.set_density(density);
        }
    }

    fn friction(&self, physics: &PhysicsWorld) -> Option<f32> {
        self.fixture().live(physics).map(|c| c.friction())
    }

    fn set_friction(&mut self, physics: &mut PhysicsWorld, friction: f32) {
        let fixture = self.fixture_mut();
        fixture.material.friction = friction;
        if let Some(collider) = fixture.live_mut(physics) {
            collider.set_friction(friction);
        }
    }

    fn is_trigger(&self, physics: &PhysicsWorld) -> Option<bool> {
        self.fixture().live(physics).map(|c| c.is_sensor())
    }

    fn set_trigger(&mut self, physics: &mut PhysicsWorld, trigger: bool) {
        let fixture = self.fixture_mut();
        fixture.material.is_trigger = trigger;
        if let Some(collider) = fixture.live_mut(physics) {
            collider.set_sensor(trigger);
        }
    }
}

//--- Shared Component Plumbing -------------------------------------------

macro_rules! impl_collider2d {
    ($($ty:ty),+) => {
        $(
            impl Collider2D for $ty {
                fn fixture(&self) -> &ColliderFixture {
                    &self.fixture
                }

                fn fixture_mut(&mut self) -> &mut ColliderFixture {
                    &mut self.fixture
                }
            }
        )+
    };
}

impl_collider2d!(BoxCollider2D, CircleCollider2D, PolygonCollider2D, EdgeCollider2D);

/// The fixture of whichever collider component `component` is.
pub(super) fn fixture_of(component: &mut dyn Any) -> Option<&mut ColliderFixture> {
    macro_rules! try_collider {
        ($($ty:ty),+) => {
            $(
                if component.is::<$ty>() {
                    return component.downcast_mut::<$ty>().map(Collider2D::fixture_mut);
                }
            )+
        };
    }
    try_collider!(BoxCollider2D, CircleCollider2D, PolygonCollider2D, EdgeCollider2D);
    None
}

//=== BoxCollider2D =======================================================

/// Axis-aligned box (in body space) of `size`, centered on `offset`.
#[derive(Debug, Clone)]
pub struct BoxCollider2D {
    size: Vec2,
    offset: Vec2,
    fixture: ColliderFixture,
}

impl BoxCollider2D {
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            offset: Vec2::ZERO,
            fixture: ColliderFixture::default(),
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_material(mut self, material: ColliderMaterial) -> Self {
        self.fixture = ColliderFixture::with_material(material);
        self
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn set_size(&mut self, physics: &mut PhysicsWorld, size: Vec2) -> Result<(), GeometryError> {
        let shape = Self::shape(size, self.offset);
        self.fixture.replace(physics, shape)?;
        self.size = size;
        Ok(())
    }

    fn shape(size: Vec2, offset: Vec2) -> Result<ColliderBuilder, GeometryError> {
        if !(size.x > 0.0 && size.y > 0.0) {
            return Err(GeometryError::InvalidSize(size.x, size.y));
        }
        Ok(ColliderBuilder::cuboid(size.x * 0.5, size.y * 0.5)
            .translation(vector![offset.x, offset.y]))
    }

    fn build_shape(&self) -> Result<ColliderBuilder, GeometryError> {
        Self::shape(self.size, self.offset)
    }
}

impl Default for BoxCollider2D {
    fn default() -> Self {
        Self::new(Vec2::ONE)
    }
}

impl Component for BoxCollider2D {
    fn on_attach(&mut self, ctx: &mut ComponentContext) {
        self.fixture.bind(ctx);
        let shape = self.build_shape();
        // Rejections are logged and kept as `last_error`.
        let _ = self.fixture.replace(ctx.physics_mut(), shape);
    }

    fn tick(&mut self, ctx: &mut ComponentContext) {
        self.fixture.follow_body(ctx);
    }

    fn destroy(&mut self, ctx: &mut ComponentContext) {
        self.fixture.release(ctx.physics_mut());
    }
}

//=== CircleCollider2D ====================================================

#[derive(Debug, Clone)]
pub struct CircleCollider2D {
    radius: f32,
    offset: Vec2,
    fixture: ColliderFixture,
}

impl CircleCollider2D {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            offset: Vec2::ZERO,
            fixture: ColliderFixture::default(),
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_material(mut self, material: ColliderMaterial) -> Self {
        self.fixture = ColliderFixture::with_material(material);
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_radius(&mut self, physics: &mut PhysicsWorld, radius: f32) -> Result<(), GeometryError> {
        let shape = Self::shape(radius, self.offset);
        self.fixture.replace(physics, shape)?;
        self.radius = radius;
        Ok(())
    }

    fn shape(radius: f32, offset: Vec2) -> Result<ColliderBuilder, GeometryError> {
        if !(radius > 0.0) {
            return Err(GeometryError::InvalidRadius(radius));
        }
        Ok(ColliderBuilder::ball(radius).translation(vector![offset.x, offset.y]))
    }

    fn build_shape(&self) -> Result<ColliderBuilder, GeometryError> {
        Self::shape(self.radius, self.offset)
    }
}

impl Default for CircleCollider2D {
    fn default() -> Self {
        Self::new(0.5)
    }
}

impl Component for CircleCollider2D {
    fn on_attach(&mut self, ctx: &mut ComponentContext) {
        self.fixture.bind(ctx);
        let shape = self.build_shape();
        let _ = self.fixture.replace(ctx.physics_mut(), shape);
    }

    fn tick(&mut self, ctx: &mut ComponentContext) {
        self.fixture.follow_body(ctx);
    }

    fn destroy(&mut self, ctx: &mut ComponentContext) {
        self.fixture.release(ctx.physics_mut());
    }
}

//=== PolygonCollider2D ===================================================

/// Convex polygon of 3 to 8 vertices in body space.
#[derive(Debug, Clone)]
pub struct PolygonCollider2D {
    /// Geometry of the live fixture; empty until one was accepted.
    points: Vec<Vec2>,
    /// Geometry requested at construction, applied on attach.
    requested: Vec<Vec2>,
    fixture: ColliderFixture,
}

impl PolygonCollider2D {
    pub fn new(points: impl Into<Vec<Vec2>>) -> Self {
        Self {
            points: Vec::new(),
            requested: points.into(),
            fixture: ColliderFixture::default(),
        }
    }

    pub fn with_material(mut self, material: ColliderMaterial) -> Self {
        self.fixture = ColliderFixture::with_material(material);
        self
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Replaces the polygon. Rejects fewer than 3 or more than 8 vertices
    /// and vertex sets without a convex area.
    pub fn set_points(&mut self, physics: &mut PhysicsWorld, points: &[Vec2]) -> Result<(), GeometryError> {
        self.fixture.replace(physics, Self::shape(points))?;
        self.points = points.to_vec();
        Ok(())
    }

    fn shape(points: &[Vec2]) -> Result<ColliderBuilder, GeometryError> {
        let n = points.len();
        if !(3..=MAX_POLYGON_VERTICES).contains(&n) {
            return Err(GeometryError::PolygonVertexCount(n));
        }
        ColliderBuilder::convex_hull(&to_points(points)).ok_or(GeometryError::DegeneratePolygon)
    }
}

impl Default for PolygonCollider2D {
    /// Unit square.
    fn default() -> Self {
        Self::new(vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, 0.5),
        ])
    }
}

impl Component for PolygonCollider2D {
    fn on_attach(&mut self, ctx: &mut ComponentContext) {
        self.fixture.bind(ctx);
        let requested = std::mem::take(&mut self.requested);
        if self.set_points(ctx.physics_mut(), &requested).is_err() {
            warn!(target: "physics", "PolygonCollider2D attached without a fixture");
        }
    }

    fn tick(&mut self, ctx: &mut ComponentContext) {
        self.fixture.follow_body(ctx);
    }

    fn destroy(&mut self, ctx: &mut ComponentContext) {
        self.fixture.release(ctx.physics_mut());
    }
}

//=== EdgeCollider2D ======================================================

/// Two-sided segment (2 points) or closed loop (3 to 8 points).
#[derive(Debug, Clone)]
pub struct EdgeCollider2D {
    points: Vec<Vec2>,
    requested: Vec<Vec2>,
    fixture: ColliderFixture,
}

impl EdgeCollider2D {
    pub fn new(points: impl Into<Vec<Vec2>>) -> Self {
        Self {
            points: Vec::new(),
            requested: points.into(),
            fixture: ColliderFixture::default(),
        }
    }

    pub fn with_material(mut self, material: ColliderMaterial) -> Self {
        self.fixture = ColliderFixture::with_material(material);
        self
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// `true` if the live fixture is a closed loop rather than a segment.
    pub fn is_loop(&self) -> bool {
        self.points.len() > 2
    }

    /// Replaces the edge geometry.
    ///
    /// - more than 8 points: rejected
    /// - 3 to 8 points: one closed loop
    /// - 2 points: one two-sided segment
    /// - fewer: rejected
    pub fn set_points(&mut self, physics: &mut PhysicsWorld, points: &[Vec2]) -> Result<(), GeometryError> {
        self.fixture.replace(physics, Self::shape(points))?;
        self.points = points.to_vec();
        Ok(())
    }

    fn shape(points: &[Vec2]) -> Result<ColliderBuilder, GeometryError> {
        let n = points.len();
        match n {
            n if n > MAX_POLYGON_VERTICES => Err(GeometryError::EdgeVertexCount(n)),
            n if n > 2 => {
                let indices = (0..n as u32).map(|i| [i, (i + 1) % n as u32]).collect();
                Ok(ColliderBuilder::polyline(to_points(points), Some(indices)))
            }
            2 => Ok(ColliderBuilder::segment(
                point![points[0].x, points[0].y],
                point![points[1].x, points[1].y],
            )),
            n => Err(GeometryError::EdgeVertexCount(n)),
        }
    }
}

impl Component for EdgeCollider2D {
    fn on_attach(&mut self, ctx: &mut ComponentContext) {
        self.fixture.bind(ctx);
        let requested = std::mem::take(&mut self.requested);
        if self.set_points(ctx.physics_mut(), &requested).is_err() {
            warn!(target: "physics", "EdgeCollider2D attached without a fixture");
        }
    }

    fn tick(&mut self, ctx: &mut ComponentContext) {
        self.fixture.follow_body(ctx);
    }

    fn destroy(&mut self, ctx: &mut ComponentContext) {
        self.fixture.release(ctx.physics_mut());
    }
}

//--- Helpers -------------------------------------------------------------

fn to_points(points: &[Vec2]) -> Vec<Point<Real>> {
    points.iter().map(|p| point![p.x, p.y]).collect()
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::globals::GlobalContext;
    use crate::core::physics::BodyType;
    use crate::core::scene::{CallState, Scene};

    fn regular(n: usize) -> Vec<Vec2> {
        (0..n)
            .map(|i| {
                let a = i as f32 / n as f32 * std::f32::consts::TAU;
                Vec2::new(a.cos(), a.sin())
            })
            .collect()
    }

    fn setup() -> (Scene, GlobalContext) {
        (Scene::new("colliders"), GlobalContext::default())
    }

    //--- Auto Rigidbody ---------------------------------------------------

    #[test]
    fn collider_auto_creates_one_rigidbody() {
        let (mut scene, mut globals) = setup();
        let e = scene.spawn("e");

        scene.add_component(e, BoxCollider2D::default(), &mut globals).unwrap();
        scene.add_component(e, CircleCollider2D::default(), &mut globals).unwrap();

        let rb = scene.get_component::<Rigidbody2D>(e).unwrap();
        assert_eq!(rb.body_type(), BodyType::Static);
        assert_eq!(globals.physics.body_count(), 1);
        assert_eq!(rb.fixture_count(&globals.physics), 2);
    }

    #[test]
    fn collider_uses_existing_rigidbody() {
        let (mut scene, mut globals) = setup();
        let e = scene.spawn("e");
        scene.add_component(e, Rigidbody2D::dynamic(), &mut globals).unwrap();
        scene.add_component(e, CircleCollider2D::new(1.0), &mut globals).unwrap();

        let rb = scene.get_component::<Rigidbody2D>(e).unwrap();
        assert_eq!(rb.body_type(), BodyType::Dynamic);
        assert_eq!(globals.physics.body_count(), 1);
    }

    //--- Polygon ----------------------------------------------------------

    #[test]
    fn polygon_vertex_count_bounds() {
        let (mut scene, mut globals) = setup();
        let e = scene.spawn("e");
        let handle = scene
            .add_component(e, PolygonCollider2D::new(regular(3)), &mut globals)
            .unwrap();
        let body = scene.get_component::<Rigidbody2D>(e).and_then(Rigidbody2D::handle).unwrap();
        assert_eq!(globals.physics.fixture_count(body), 1);

        let poly = scene.component_mut(handle).unwrap();
        for n in [2, 9] {
            let err = poly.set_points(&mut globals.physics, &regular(n)).unwrap_err();
            assert_eq!(err, GeometryError::PolygonVertexCount(n));
            assert_eq!(globals.physics.fixture_count(body), 1);
            assert_eq!(poly.points().len(), 3);
        }

        poly.set_points(&mut globals.physics, &regular(8)).unwrap();
        assert_eq!(poly.points().len(), 8);
        assert_eq!(globals.physics.fixture_count(body), 1);
        assert!(poly.last_error().is_none());
    }

    #[test]
    fn collinear_polygon_is_degenerate() {
        let mut physics = PhysicsWorld::default();
        let mut poly = PolygonCollider2D::default();
        let line = [Vec2::ZERO, Vec2::X, Vec2::new(2.0, 0.0)];
        // Unattached colliders still validate geometry first.
        assert_eq!(
            poly.set_points(&mut physics, &line),
            Err(GeometryError::DegeneratePolygon)
        );
    }

    #[test]
    fn nine_vertex_polygon_leaves_body_without_fixture() {
        let (mut scene, mut globals) = setup();
        let e = scene.spawn("e");

        let handle = scene
            .add_component(e, PolygonCollider2D::new(regular(9)), &mut globals)
            .unwrap();

        let poly = scene.component(handle).unwrap();
        assert_eq!(poly.last_error(), Some(&GeometryError::PolygonVertexCount(9)));
        assert!(poly.collider_handle().is_none());
        let rb = scene.get_component::<Rigidbody2D>(e).unwrap();
        assert_eq!(rb.fixture_count(&globals.physics), 0);
    }

    //--- Edge -------------------------------------------------------------

    #[test]
    fn edge_point_count_policy() {
        let (mut scene, mut globals) = setup();
        let e = scene.spawn("e");
        let handle = scene
            .add_component(e, EdgeCollider2D::new(Vec::<Vec2>::new()), &mut globals)
            .unwrap();
        let body = scene.get_component::<Rigidbody2D>(e).and_then(Rigidbody2D::handle).unwrap();

        // n = 0 was rejected on attach.
        assert_eq!(globals.physics.fixture_count(body), 0);
        let edge = scene.component_mut(handle).unwrap();
        assert_eq!(edge.last_error(), Some(&GeometryError::EdgeVertexCount(0)));

        edge.set_points(&mut globals.physics, &regular(2)).unwrap();
        let collider = globals.physics.collider(edge.collider_handle().unwrap()).unwrap();
        assert!(collider.shape().as_segment().is_some());
        assert!(!edge.is_loop());

        edge.set_points(&mut globals.physics, &regular(5)).unwrap();
        let collider = globals.physics.collider(edge.collider_handle().unwrap()).unwrap();
        let polyline = collider.shape().as_polyline().unwrap();
        assert_eq!(polyline.num_segments(), 5);
        assert!(edge.is_loop());
        assert_eq!(globals.physics.fixture_count(body), 1);

        let err = edge.set_points(&mut globals.physics, &regular(9)).unwrap_err();
        assert_eq!(err, GeometryError::EdgeVertexCount(9));
        assert_eq!(edge.points().len(), 5);
        assert_eq!(globals.physics.fixture_count(body), 1);

        let err = edge.set_points(&mut globals.physics, &regular(1)).unwrap_err();
        assert_eq!(err, GeometryError::EdgeVertexCount(1));
    }

    //--- Material ---------------------------------------------------------

    #[test]
    fn material_getters_need_a_fixture() {
        let mut physics = PhysicsWorld::default();
        let mut edge = EdgeCollider2D::new(Vec::<Vec2>::new());
        assert!(edge.density(&physics).is_none());
        assert!(edge.is_trigger(&physics).is_none());

        edge.set_friction(&mut physics, 0.9);
        assert!(edge.friction(&physics).is_none());
        assert_eq!(edge.fixture().material().friction, 0.9);
    }

    #[test]
    fn material_setters_apply_to_live_fixture() {
        let (mut scene, mut globals) = setup();
        let e = scene.spawn("e");
        let handle = scene.add_component(e, BoxCollider2D::default(), &mut globals).unwrap();

        let collider = scene.component_mut(handle).unwrap();
        collider.set_density(&mut globals.physics, 3.0);
        collider.set_trigger(&mut globals.physics, true);

        assert_eq!(collider.density(&globals.physics), Some(3.0));
        assert_eq!(collider.is_trigger(&globals.physics), Some(true));
    }

    #[test]
    fn invalid_box_size_is_rejected() {
        let (mut scene, mut globals) = setup();
        let e = scene.spawn("e");
        let handle = scene.add_component(e, BoxCollider2D::default(), &mut globals).unwrap();

        let collider = scene.component_mut(handle).unwrap();
        let before = collider.collider_handle();
        assert_eq!(
            collider.set_size(&mut globals.physics, Vec2::new(0.0, 1.0)),
            Err(GeometryError::InvalidSize(0.0, 1.0))
        );
        assert_eq!(collider.collider_handle(), before);
        assert_eq!(collider.size(), Vec2::ONE);
    }

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn collider_destroys_itself_when_body_goes() {
        let (mut scene, mut globals) = setup();
        let e = scene.spawn("e");
        scene.add_component(e, CircleCollider2D::default(), &mut globals).unwrap();
        scene.call_loop(CallState::Init, &mut globals);

        let body = scene
            .get_component::<Rigidbody2D>(e)
            .and_then(Rigidbody2D::handle)
            .unwrap();
        globals.physics.remove_body(body);
        scene.call_loop(CallState::Tick, &mut globals);
        scene.call_loop(CallState::Destroy, &mut globals);

        assert!(scene.get_component::<CircleCollider2D>(e).is_none());
        assert_eq!(globals.physics.collider_count(), 0);
    }
}
