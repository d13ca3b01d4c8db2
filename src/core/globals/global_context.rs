//=========================================================================
// Global Context
//=========================================================================
//
// Shared systems handed to components during dispatch.
//
// Contains:
// - input: per-frame input snapshot
// - physics: the 2D simulation
// - time: frame clock
// - debug: line overlay for the renderer, refilled every tick
// - commands: window requests applied by the engine after the tick
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::config::EngineConfig;
use crate::core::input::InputSystem;
use crate::core::physics::PhysicsWorld;
use crate::core::platform_bridge::CursorMode;
use crate::core::render::DebugDraw;
use crate::core::time::Time;

//=== WindowCommand =======================================================

/// Window request queued by a component.
///
/// Components never touch the window directly; the engine drains the
/// queue at the end of the tick.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowCommand {
    Close,
    SetTitle(String),
    SetCursorMode(CursorMode),
}

//=== GlobalContext =======================================================

/// Engine-wide systems accessible to scenes and components.
///
/// Scenes receive `&mut GlobalContext` in every dispatch pass. Components
/// reach it through their `ComponentContext`.
pub struct GlobalContext {
    /// Input queried by components. Refreshed once at the start of a frame.
    pub input: InputSystem,

    /// Physics simulation. Stepped by the engine between Tick and Destroy.
    pub physics: PhysicsWorld,

    pub time: Time,

    /// Debug lines queued during the current tick.
    pub debug: DebugDraw,

    pub(crate) commands: Vec<WindowCommand>,
}

impl GlobalContext {
    /// Creates the systems described by `config`.
    pub fn new(config: &EngineConfig) -> Self {
        let time = match config.fixed_delta {
            Some(delta) => Time::fixed(delta),
            None => Time::new(),
        };

        Self {
            input: InputSystem::new(),
            physics: PhysicsWorld::new(&config.physics),
            time,
            debug: DebugDraw::new(),
            commands: Vec::new(),
        }
    }

    /// Queues a window request for the end of the tick.
    pub fn push_command(&mut self, command: WindowCommand) {
        self.commands.push(command);
    }

    /// Commands queued since the last drain, oldest first.
    pub fn pending_commands(&self) -> &[WindowCommand] {
        &self.commands
    }

    pub(crate) fn drain_commands(&mut self) -> Vec<WindowCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl Default for GlobalContext {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}
