//=========================================================================
// Component
//=========================================================================
//
// Behavior attached to an entity.
//
// Lifecycle (driven by Scene::call_loop):
//   on_attach → init → { tick, fixed_tick }* → destroy
//
// Hooks receive a `ComponentContext` giving access to the owning scene,
// the engine-wide systems and the ids of the running component.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

//=== Internal Dependencies ===============================================

use super::context::ComponentContext;
use super::{ComponentId, EntityId};

//=== Stage ===============================================================

/// Where a component sits in the per-frame dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    /// Gameplay scripts. Ticked first.
    #[default]
    Script,

    /// Physics-driven components. Ticked after scripts, fixed-ticked
    /// before them.
    Physics,
}

//=== CallState ===========================================================

/// Dispatch pass selector for [`crate::core::scene::Scene::call_loop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallState {
    Init,
    Tick,
    FixedTick,
    Destroy,
}

//=== AsAny ===============================================================

/// Downcasting support for `dyn Component`.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== Component ===========================================================

/// A unit of behavior owned by one entity.
///
/// All hooks default to no-ops; implement only what the component needs.
/// Hooks may add or destroy entities and components through the context;
/// structural changes never affect the pass that is currently running
/// except as documented on `Scene::call_loop`.
///
/// # Example
///
/// ```
/// use kestrel_engine::prelude::*;
///
/// #[derive(Default)]
/// struct Spinner {
///     speed: f32,
/// }
///
/// impl Component for Spinner {
///     fn tick(&mut self, ctx: &mut ComponentContext) {
///         let dt = ctx.time().delta();
///         if let Some(transform) = ctx.transform_mut() {
///             transform.rotate_z(self.speed * dt);
///         }
///     }
/// }
/// ```
pub trait Component: AsAny {
    /// Runs immediately when the component is added, before `add_component`
    /// returns.
    fn on_attach(&mut self, _ctx: &mut ComponentContext) {}

    /// Runs once, in the first Init or Tick pass after attachment.
    fn init(&mut self, _ctx: &mut ComponentContext) {}

    /// Runs once per logic tick.
    fn tick(&mut self, _ctx: &mut ComponentContext) {}

    /// Runs after every physics step.
    fn fixed_tick(&mut self, _ctx: &mut ComponentContext) {}

    /// Runs once in the Destroy pass that releases the component.
    fn destroy(&mut self, _ctx: &mut ComponentContext) {}

    fn stage(&self) -> Stage {
        Stage::Script
    }

    /// Name used in logs.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

//=== ComponentHandle =====================================================

/// Typed, non-owning reference to a component.
///
/// Resolving a handle after the component was released yields `None`.
pub struct ComponentHandle<T> {
    id: ComponentId,
    entity: EntityId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Component> ComponentHandle<T> {
    pub(crate) fn new(id: ComponentId, entity: EntityId) -> Self {
        Self {
            id,
            entity,
            _marker: PhantomData,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Entity that owns the component.
    pub fn entity(&self) -> EntityId {
        self.entity
    }
}

impl<T> Clone for ComponentHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ComponentHandle<T> {}

impl<T> PartialEq for ComponentHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for ComponentHandle<T> {}

impl<T> fmt::Debug for ComponentHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("id", &self.id)
            .field("entity", &self.entity)
            .finish()
    }
}

//=== ComponentSlot =======================================================

/// Arena entry holding a component and its lifecycle flags.
pub(crate) struct ComponentSlot {
    pub(crate) entity: EntityId,
    pub(crate) type_id: TypeId,
    pub(crate) type_name: &'static str,
    pub(crate) stage: Stage,

    /// `None` only while one of the component's own hooks is running.
    pub(crate) instance: Option<Box<dyn Component>>,

    pub(crate) initialized: bool,
    pub(crate) destroyed: bool,

    /// Set once the destroy hook has run; the slot is compacted next.
    pub(crate) released: bool,
}

impl ComponentSlot {
    pub(crate) fn new(entity: EntityId, instance: Box<dyn Component>) -> Self {
        let component: &dyn Component = &*instance;
        Self {
            entity,
            type_id: component.as_any().type_id(),
            type_name: component.type_name(),
            stage: component.stage(),
            instance: Some(instance),
            initialized: false,
            destroyed: false,
            released: false,
        }
    }
}
