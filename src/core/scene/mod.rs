//=========================================================================
// Scene System
//=========================================================================
//
// Owns entities and their components, and fans lifecycle hooks out to
// them in a deterministic order.
//
// Architecture:
//   Scene
//     ├─ entities:   SlotMap<EntityId, Entity>        (+ insertion order)
//     └─ components: SlotMap<ComponentId, ComponentSlot>
//
// Flow (per frame, driven by the engine):
//   call_loop(Tick) → [physics step → call_loop(FixedTick)]* → call_loop(Destroy)
//
// Structural edits made from hooks never invalidate a running pass:
// passes iterate over an id snapshot, destruction only sets tombstones,
// and slots are compacted at the end of the Destroy pass.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod component;
pub mod context;
pub mod entity;

//=== Public API ==========================================================

pub use component::{AsAny, CallState, Component, ComponentHandle, Stage};
pub use context::ComponentContext;
pub use entity::{Entity, Transform};

//=== External Dependencies ===============================================

use std::any::TypeId;

use log::{debug, trace, warn};
use slotmap::{new_key_type, SlotMap};

//=== Internal Dependencies ===============================================

use crate::core::globals::GlobalContext;
use crate::core::render::{Camera, CameraView};
use component::ComponentSlot;

/// Upper bound on cascading Init rounds (components adding components
/// from `init`) before the pass gives up for this frame.
const MAX_CASCADE_ROUNDS: usize = 64;

new_key_type! {
    /// Stable id of an entity within its scene.
    pub struct EntityId;

    /// Stable id of a component within its scene.
    pub struct ComponentId;
}

//=== Hook ================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hook {
    Attach,
    Init,
    Tick,
    FixedTick,
    Destroy,
}

//=== Scene ===============================================================

/// The live set of entities being simulated and rendered.
///
/// # Dispatch order
///
/// Entities are visited in insertion order and components in attachment
/// order, except that [`Stage::Physics`] components tick after every
/// [`Stage::Script`] component (and fixed-tick before them).
///
/// # Example
///
/// ```
/// use kestrel_engine::prelude::*;
///
/// struct Counter(u32);
///
/// impl Component for Counter {
///     fn tick(&mut self, _ctx: &mut ComponentContext) {
///         self.0 += 1;
///     }
/// }
///
/// let mut globals = GlobalContext::default();
/// let mut scene = Scene::new("demo");
/// let player = scene.spawn("player");
/// let counter = scene.add_component(player, Counter(0), &mut globals).unwrap();
///
/// scene.call_loop(CallState::Init, &mut globals);
/// scene.call_loop(CallState::Tick, &mut globals);
/// assert_eq!(scene.component(counter).map(|c| c.0), Some(1));
/// ```
pub struct Scene {
    name: String,
    entities: SlotMap<EntityId, Entity>,
    entity_order: Vec<EntityId>,
    components: SlotMap<ComponentId, ComponentSlot>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: SlotMap::with_key(),
            entity_order: Vec::new(),
            components: SlotMap::with_key(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    //=====================================================================
    // Entities
    //=====================================================================

    /// Creates an entity with an identity transform.
    pub fn spawn(&mut self, name: impl Into<String>) -> EntityId {
        self.spawn_with(name, Transform::IDENTITY)
    }

    pub fn spawn_with(&mut self, name: impl Into<String>, transform: Transform) -> EntityId {
        let entity = Entity::new(name, transform);
        trace!(target: "scene", "Spawning entity '{}'", entity.name);
        let id = self.entities.insert(entity);
        self.entity_order.push(id);
        id
    }

    /// Entity by id, including entities marked for destruction.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// `true` if the entity exists and is not marked for destruction.
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.get(id).is_some_and(|e| !e.destroyed)
    }

    /// Live entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entity_order.iter().filter_map(move |&id| {
            self.entities
                .get(id)
                .filter(|e| !e.destroyed)
                .map(|e| (id, e))
        })
    }

    /// First live entity called `name`.
    pub fn find_entity(&self, name: &str) -> Option<EntityId> {
        self.entities()
            .find(|(_, entity)| entity.name == name)
            .map(|(id, _)| id)
    }

    pub fn entity_count(&self) -> usize {
        self.entities().count()
    }

    pub fn transform(&self, id: EntityId) -> Option<&Transform> {
        self.entities.get(id).map(|e| &e.transform)
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Option<&mut Transform> {
        self.entities.get_mut(id).map(|e| &mut e.transform)
    }

    /// Marks an entity and all of its components for release in the next
    /// Destroy pass. Returns `false` if it was already gone.
    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(id) {
            Some(entity) if !entity.destroyed => {
                entity.destroyed = true;
                debug!(target: "scene", "Entity '{}' marked for destruction", entity.name);
                true
            }
            _ => false,
        }
    }

    //=====================================================================
    // Components
    //=====================================================================

    /// Attaches `value` to `entity` and runs its `on_attach` hook.
    ///
    /// Returns `None` if the entity is missing or marked for destruction,
    /// or if it already has a live component of type `T`.
    pub fn add_component<T: Component>(
        &mut self,
        entity: EntityId,
        value: T,
        globals: &mut GlobalContext,
    ) -> Option<ComponentHandle<T>> {
        let type_name = std::any::type_name::<T>();

        let Some(owner) = self.entities.get(entity) else {
            warn!(target: "scene", "Cannot add {}: entity does not exist", type_name);
            return None;
        };
        if owner.destroyed {
            warn!(
                target: "scene",
                "Cannot add {}: entity '{}' is being destroyed", type_name, owner.name
            );
            return None;
        }
        if self.find_slot(entity, TypeId::of::<T>()).is_some() {
            warn!(
                target: "scene",
                "Entity '{}' already has a {}", owner.name, type_name
            );
            return None;
        }

        let id = self
            .components
            .insert(ComponentSlot::new(entity, Box::new(value)));
        if let Some(owner) = self.entities.get_mut(entity) {
            owner.components.push(id);
            debug!(target: "scene", "Attached {} to '{}'", type_name, owner.name);
        }

        self.run_hook(id, Hook::Attach, globals);
        Some(ComponentHandle::new(id, entity))
    }

    /// First live `T` on `entity`.
    ///
    /// Returns `None` for components marked for destruction and for the
    /// component whose hook is currently running.
    pub fn get_component<T: Component>(&self, entity: EntityId) -> Option<&T> {
        let id = self.find_slot(entity, TypeId::of::<T>())?;
        self.downcast_ref(id)
    }

    pub fn get_component_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        let id = self.find_slot(entity, TypeId::of::<T>())?;
        self.downcast_mut(id)
    }

    pub fn has_component<T: Component>(&self, entity: EntityId) -> bool {
        self.find_slot(entity, TypeId::of::<T>()).is_some()
    }

    /// Resolves a handle. `None` once the component has been released.
    pub fn component<T: Component>(&self, handle: ComponentHandle<T>) -> Option<&T> {
        self.downcast_ref(handle.id())
    }

    pub fn component_mut<T: Component>(&mut self, handle: ComponentHandle<T>) -> Option<&mut T> {
        self.downcast_mut(handle.id())
    }

    /// `true` while the component exists and is not marked for release.
    pub fn is_component_alive(&self, id: ComponentId) -> bool {
        self.components
            .get(id)
            .is_some_and(|slot| !slot.destroyed && self.is_alive(slot.entity))
    }

    /// Marks a component for release in the next Destroy pass.
    pub fn destroy_component(&mut self, id: ComponentId) -> bool {
        match self.components.get_mut(id) {
            Some(slot) if !slot.destroyed => {
                slot.destroyed = true;
                debug!(target: "scene", "{} marked for destruction", slot.type_name);
                true
            }
            _ => false,
        }
    }

    /// Visits every component instance, tombstoned ones included. The
    /// component whose hook is running is not visited.
    pub(crate) fn visit_components_mut(&mut self, mut visit: impl FnMut(ComponentId, &mut dyn Component)) {
        for (id, slot) in self.components.iter_mut() {
            if let Some(instance) = slot.instance.as_deref_mut() {
                visit(id, instance);
            }
        }
    }

    /// Number of components not yet released, tombstoned ones included.
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    //=====================================================================
    // Dispatch
    //=====================================================================

    /// Runs one lifecycle pass over the scene.
    ///
    /// - `Init`: every live, uninitialized component, once. Components
    ///   added during the pass are initialized before it returns.
    /// - `Tick`: initializes components added since the last pass, then
    ///   ticks every component live at the start of the pass (scripts
    ///   first, physics second). Components added during the pass tick
    ///   from the next pass on.
    /// - `FixedTick`: like `Tick`, physics stage first. Physics-stage
    ///   components take part as soon as they are attached.
    /// - `Destroy`: runs `destroy` on everything marked for release
    ///   (reverse attachment order within an entity) and compacts.
    pub fn call_loop(&mut self, state: CallState, globals: &mut GlobalContext) {
        match state {
            CallState::Init => self.init_pending(globals),
            CallState::Tick => {
                self.init_pending(globals);
                let snapshot = self.staged_snapshot(&[Stage::Script, Stage::Physics]);
                self.dispatch(&snapshot, Hook::Tick, globals);
            }
            CallState::FixedTick => {
                // A physics component owns simulation state from on_attach,
                // so it syncs after every step even before its first Init.
                let mut snapshot = self.ordered(|slot| slot.stage == Stage::Physics);
                snapshot.extend(self.ordered(|slot| slot.initialized && slot.stage == Stage::Script));
                self.dispatch(&snapshot, Hook::FixedTick, globals);
            }
            CallState::Destroy => self.destroy_pending(globals),
        }
    }

    /// Marks everything for destruction and runs the Destroy pass until
    /// the scene is empty.
    pub fn teardown(&mut self, globals: &mut GlobalContext) {
        debug!(target: "scene", "Tearing down scene '{}'", self.name);
        for _ in 0..MAX_CASCADE_ROUNDS {
            if self.entities.is_empty() {
                break;
            }
            for entity in self.entities.values_mut() {
                entity.destroyed = true;
            }
            self.destroy_pending(globals);
        }
        if !self.entities.is_empty() {
            warn!(
                target: "scene",
                "Scene '{}' still holds {} entities after teardown",
                self.name,
                self.entities.len()
            );
        }
    }

    /// View of the first primary [`Camera`] in dispatch order, or the
    /// default view if the scene has none.
    pub fn active_camera(&self) -> CameraView {
        for (entity_id, entity) in self.entities() {
            for &id in &entity.components {
                let Some(slot) = self.components.get(id) else {
                    continue;
                };
                if slot.destroyed {
                    continue;
                }
                let camera = slot
                    .instance
                    .as_deref()
                    .and_then(|c| c.as_any().downcast_ref::<Camera>());
                if let Some(camera) = camera.filter(|c| c.primary) {
                    trace!(target: "scene", "Active camera on {:?}", entity_id);
                    return camera.view(&entity.transform);
                }
            }
        }
        CameraView::default()
    }

    //--- Passes -----------------------------------------------------------

    fn init_pending(&mut self, globals: &mut GlobalContext) {
        for _ in 0..MAX_CASCADE_ROUNDS {
            let batch = self.ordered(|slot| !slot.initialized);
            if batch.is_empty() {
                return;
            }
            for id in batch {
                let due = self.is_component_alive(id)
                    && self.components.get(id).is_some_and(|slot| !slot.initialized);
                if due {
                    if let Some(slot) = self.components.get_mut(id) {
                        slot.initialized = true;
                    }
                    self.run_hook(id, Hook::Init, globals);
                }
            }
        }
        warn!(
            target: "scene",
            "Init cascade in '{}' exceeded {} rounds; remaining components init next pass",
            self.name, MAX_CASCADE_ROUNDS
        );
    }

    fn staged_snapshot(&self, stages: &[Stage]) -> Vec<ComponentId> {
        let mut snapshot = Vec::with_capacity(self.components.len());
        for &stage in stages {
            snapshot.extend(self.ordered(|slot| slot.initialized && slot.stage == stage));
        }
        snapshot
    }

    fn dispatch(&mut self, snapshot: &[ComponentId], hook: Hook, globals: &mut GlobalContext) {
        for &id in snapshot {
            // Everything in the snapshot was live when the pass began, so
            // a tombstone set mid-pass does not skip it.
            self.run_hook(id, hook, globals);
        }
    }

    fn destroy_pending(&mut self, globals: &mut GlobalContext) {
        let mut released = 0usize;

        for _ in 0..MAX_CASCADE_ROUNDS {
            let doomed = self.doomed();
            if doomed.is_empty() {
                break;
            }
            for id in doomed {
                if let Some(slot) = self.components.get_mut(id) {
                    slot.destroyed = true;
                    slot.released = true;
                }
                self.run_hook(id, Hook::Destroy, globals);
                released += 1;
            }
        }

        self.compact();

        if released > 0 {
            debug!(target: "scene", "Released {} components from '{}'", released, self.name);
        }
    }

    /// Components awaiting their destroy hook: entity order, reverse
    /// attachment order within each entity.
    fn doomed(&self) -> Vec<ComponentId> {
        let mut doomed = Vec::new();
        for &entity_id in &self.entity_order {
            let Some(entity) = self.entities.get(entity_id) else {
                continue;
            };
            for &id in entity.components.iter().rev() {
                let Some(slot) = self.components.get(id) else {
                    continue;
                };
                if !slot.released && (slot.destroyed || entity.destroyed) {
                    doomed.push(id);
                }
            }
        }
        doomed
    }

    fn compact(&mut self) {
        self.components.retain(|_, slot| !slot.released);

        let components = &self.components;
        for entity in self.entities.values_mut() {
            entity.components.retain(|id| components.contains_key(*id));
        }

        let before = self.entities.len();
        self.entities
            .retain(|_, entity| !(entity.destroyed && entity.components.is_empty()));
        if self.entities.len() != before {
            let entities = &self.entities;
            self.entity_order.retain(|id| entities.contains_key(*id));
        }
    }

    //--- Helpers ----------------------------------------------------------

    /// Component ids of live entities in dispatch order, filtered.
    fn ordered(&self, filter: impl Fn(&ComponentSlot) -> bool) -> Vec<ComponentId> {
        let mut ids = Vec::new();
        for &entity_id in &self.entity_order {
            let Some(entity) = self.entities.get(entity_id) else {
                continue;
            };
            if entity.destroyed {
                continue;
            }
            for &id in &entity.components {
                if let Some(slot) = self.components.get(id) {
                    if !slot.destroyed && filter(slot) {
                        ids.push(id);
                    }
                }
            }
        }
        ids
    }

    fn find_slot(&self, entity: EntityId, type_id: TypeId) -> Option<ComponentId> {
        let entity = self.entities.get(entity)?;
        entity.components.iter().copied().find(|&id| {
            self.components
                .get(id)
                .is_some_and(|slot| slot.type_id == type_id && !slot.destroyed)
        })
    }

    fn downcast_ref<T: Component>(&self, id: ComponentId) -> Option<&T> {
        self.components
            .get(id)?
            .instance
            .as_deref()?
            .as_any()
            .downcast_ref::<T>()
    }

    fn downcast_mut<T: Component>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.components
            .get_mut(id)?
            .instance
            .as_deref_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Checks the component out of its slot, runs `hook` and puts it back.
    fn run_hook(&mut self, id: ComponentId, hook: Hook, globals: &mut GlobalContext) {
        let (entity, mut instance) = match self.components.get_mut(id) {
            Some(slot) => match slot.instance.take() {
                Some(instance) => (slot.entity, instance),
                None => return,
            },
            None => return,
        };

        {
            let mut ctx = ComponentContext::new(self, globals, entity, id);
            match hook {
                Hook::Attach => instance.on_attach(&mut ctx),
                Hook::Init => instance.init(&mut ctx),
                Hook::Tick => instance.tick(&mut ctx),
                Hook::FixedTick => instance.fixed_tick(&mut ctx),
                Hook::Destroy => instance.destroy(&mut ctx),
            }
        }

        if let Some(slot) = self.components.get_mut(id) {
            slot.instance = Some(instance);
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("entities", &self.entities.len())
            .field("components", &self.components.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
