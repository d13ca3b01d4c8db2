//=========================================================================
// Engine Configuration
//=========================================================================
//
// Plain configuration records consumed by the engine and its
// collaborators. Built through `EngineBuilder`; every field has a
// usable default.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use glam::Vec2;

//=== Color ===============================================================

/// Linear RGBA color used for frame clears.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Dark teal used when no clear color is configured.
    pub const SLATE: Self = Self::rgba(0.2, 0.3, 0.3, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::SLATE
    }
}

//=== WindowConfig ========================================================

/// Options recognized by every `Window` implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Kestrel Engine".to_string(),
            width: 800,
            height: 600,
            vsync: true,
            fullscreen: false,
        }
    }
}

//=== TickPolicy ==========================================================

/// Decides whether a frame runs a logic tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickPolicy {
    /// One logic tick per rendered frame.
    EveryFrame,

    /// Frames render but the scene never ticks.
    Paused,

    /// At most one logic tick per frame, paced to the given ticks per second.
    FixedRate(f64),
}

impl Default for TickPolicy {
    fn default() -> Self {
        Self::EveryFrame
    }
}

//=== PhysicsConfig =======================================================

/// Parameters for the 2D rigid-body simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// World gravity in units per second squared.
    pub gravity: Vec2,

    /// Simulated seconds per physics step.
    pub timestep: f32,

    /// Upper bound on steps taken during one logic tick.
    pub max_substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            timestep: 1.0 / 60.0,
            max_substeps: 4,
        }
    }
}

//=== ShaderPaths =========================================================

/// Vertex/fragment source locations loaded by the renderer at init.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

//=== EngineConfig ========================================================

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    pub clear_color: Color,
    pub tick_policy: TickPolicy,
    pub physics: PhysicsConfig,

    /// When set, every frame advances time by exactly this many seconds
    /// instead of reading the wall clock.
    pub fixed_delta: Option<f32>,

    pub shaders: Option<ShaderPaths>,
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = EngineConfig::default();
        assert_eq!(config.window.width, 800);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.tick_policy, TickPolicy::EveryFrame);
        assert_eq!(config.clear_color, Color::SLATE);
        assert!(config.physics.timestep > 0.0);
        assert!(config.fixed_delta.is_none());
    }
}
