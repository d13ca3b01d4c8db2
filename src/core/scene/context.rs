//=========================================================================
// Component Context
//=========================================================================
//
// What a component hook can reach: the owning scene, the engine-wide
// systems and its own ids.
//
//   Scene::call_loop ─┬─ &mut Scene
//                     ├─ &mut GlobalContext (input, physics, time, commands)
//                     └─ (EntityId, ComponentId) of the running hook
//
// While a hook runs its own component is checked out of the scene, so
// looking it up by type from inside its hooks yields `None`.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::component::{Component, ComponentHandle};
use super::entity::{Entity, Transform};
use super::{ComponentId, EntityId, Scene};
use crate::core::config::Color;
use crate::core::globals::{GlobalContext, WindowCommand};
use crate::core::input::InputSystem;
use crate::core::physics::{PhysicsWorld, Rigidbody2D};
use crate::core::platform_bridge::CursorMode;
use crate::core::time::Time;

//=== ComponentContext ====================================================

/// Capabilities handed to every component hook.
pub struct ComponentContext<'a> {
    scene: &'a mut Scene,
    globals: &'a mut GlobalContext,
    entity: EntityId,
    component: ComponentId,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(
        scene: &'a mut Scene,
        globals: &'a mut GlobalContext,
        entity: EntityId,
        component: ComponentId,
    ) -> Self {
        Self {
            scene,
            globals,
            entity,
            component,
        }
    }

    //--- Identity ---------------------------------------------------------

    /// Entity that owns the running component.
    pub fn entity_id(&self) -> EntityId {
        self.entity
    }

    /// Id of the running component.
    pub fn component_id(&self) -> ComponentId {
        self.component
    }

    pub fn entity(&self) -> Option<&Entity> {
        self.scene.entity(self.entity)
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.scene.transform(self.entity)
    }

    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.scene.transform_mut(self.entity)
    }

    //--- Systems ----------------------------------------------------------

    pub fn input(&self) -> &InputSystem {
        &self.globals.input
    }

    pub fn input_mut(&mut self) -> &mut InputSystem {
        &mut self.globals.input
    }

    pub fn time(&self) -> &Time {
        &self.globals.time
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.globals.physics
    }

    pub fn physics_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.globals.physics
    }

    pub fn scene(&self) -> &Scene {
        &*self.scene
    }

    pub fn globals(&self) -> &GlobalContext {
        &*self.globals
    }

    //--- Components -------------------------------------------------------

    /// Adds `value` to the running component's entity.
    pub fn add_component<T: Component>(&mut self, value: T) -> Option<ComponentHandle<T>> {
        self.scene.add_component(self.entity, value, self.globals)
    }

    /// Adds `value` to another entity.
    pub fn add_component_to<T: Component>(
        &mut self,
        entity: EntityId,
        value: T,
    ) -> Option<ComponentHandle<T>> {
        self.scene.add_component(entity, value, self.globals)
    }

    /// First live `T` on the running component's entity.
    pub fn get_component<T: Component>(&self) -> Option<&T> {
        self.scene.get_component::<T>(self.entity)
    }

    pub fn get_component_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.scene.get_component_mut::<T>(self.entity)
    }

    pub fn has_component<T: Component>(&self) -> bool {
        self.scene.has_component::<T>(self.entity)
    }

    pub fn component<T: Component>(&self, handle: ComponentHandle<T>) -> Option<&T> {
        self.scene.component(handle)
    }

    pub fn component_mut<T: Component>(&mut self, handle: ComponentHandle<T>) -> Option<&mut T> {
        self.scene.component_mut(handle)
    }

    /// `T` on this entity together with the physics world, for calls like
    /// `Rigidbody2D::apply_impulse` that need both.
    pub fn component_and_physics_mut<T: Component>(
        &mut self,
    ) -> Option<(&mut T, &mut PhysicsWorld)> {
        let component = self.scene.get_component_mut::<T>(self.entity)?;
        Some((component, &mut self.globals.physics))
    }

    /// Same as [`Self::component_and_physics_mut`] for any entity's
    /// component.
    pub fn handle_and_physics_mut<T: Component>(
        &mut self,
        handle: ComponentHandle<T>,
    ) -> Option<(&mut T, &mut PhysicsWorld)> {
        let component = self.scene.component_mut(handle)?;
        Some((component, &mut self.globals.physics))
    }

    //--- Structure --------------------------------------------------------

    /// Creates an entity. It takes part in dispatch from the next pass.
    pub fn spawn(&mut self, name: impl Into<String>) -> EntityId {
        self.scene.spawn(name)
    }

    pub fn spawn_with(&mut self, name: impl Into<String>, transform: Transform) -> EntityId {
        self.scene.spawn_with(name, transform)
    }

    /// Marks a component for release in the next Destroy pass.
    pub fn destroy_component(&mut self, id: ComponentId) -> bool {
        self.scene.destroy_component(id)
    }

    pub(crate) fn visit_components_mut(&mut self, visit: impl FnMut(ComponentId, &mut dyn Component)) {
        self.scene.visit_components_mut(visit);
    }

    /// Marks the running component for release.
    pub fn destroy_self(&mut self) -> bool {
        self.scene.destroy_component(self.component)
    }

    pub fn destroy_entity(&mut self, id: EntityId) -> bool {
        self.scene.destroy_entity(id)
    }

    /// Marks the running component's entity (and every component on it)
    /// for release.
    pub fn destroy_owner(&mut self) -> bool {
        self.scene.destroy_entity(self.entity)
    }

    //--- Physics Sync -----------------------------------------------------

    /// Writes this entity's transform into its Rigidbody2D's body.
    ///
    /// Without this, direct transform edits are overwritten by the next
    /// physics step. Returns `false` if the entity has no live body.
    pub fn push_transform_to_physics(&mut self) -> bool {
        let Some(transform) = self.scene.transform(self.entity).copied() else {
            return false;
        };
        let Some(handle) = self
            .scene
            .get_component::<Rigidbody2D>(self.entity)
            .and_then(Rigidbody2D::handle)
        else {
            return false;
        };
        self.globals.physics.set_body_pose(
            handle,
            transform.position_2d(),
            transform.rotation_2d(),
        )
    }

    //--- Window -----------------------------------------------------------

    /// Asks the engine to close the window after this tick.
    pub fn request_exit(&mut self) {
        self.globals.push_command(WindowCommand::Close);
    }

    pub fn set_window_title(&mut self, title: impl Into<String>) {
        self.globals.push_command(WindowCommand::SetTitle(title.into()));
    }

    pub fn set_cursor_mode(&mut self, mode: CursorMode) {
        self.globals.push_command(WindowCommand::SetCursorMode(mode));
    }

    //--- Debug Draw -------------------------------------------------------

    /// World-space line drawn over the scene until the next tick.
    pub fn draw_line(&mut self, start: Vec2, end: Vec2, color: Color) {
        self.globals.debug.line(start, end, color);
    }

    pub fn draw_ray(&mut self, origin: Vec2, direction: Vec2, color: Color) {
        self.globals.debug.ray(origin, direction, color);
    }
}
