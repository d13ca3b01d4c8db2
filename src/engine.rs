//=========================================================================
// Kestrel Engine
//
// Main entry point and frame-loop state machine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build(window, renderer)──>  Engine
//         │                                          │
//         ├─ with_title() / with_size()              ├─ init(scene)
//         ├─ with_tick_policy() / with_tps()         ├─ { start_frame(); end_frame(); }*
//         └─ with_gravity() / with_shaders() ...     └─ terminate()
// ```
//
// Frame order (start_frame):
//   time → input.process → window.poll_events → window.clear
//   → renderer.render → [tick] → window commands
//
// Rendering happens before the tick, so what is on screen lags the
// logic by one frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::{debug, error, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::config::{Color, EngineConfig, ShaderPaths, TickPolicy};
use crate::core::error::EngineError;
use crate::core::globals::{GlobalContext, WindowCommand};
use crate::core::platform_bridge::{Renderer, Window};
use crate::core::scene::{CallState, Scene};
use crate::core::time::TickClock;

//=== EngineState =========================================================

/// Lifecycle of an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,

    /// `init` succeeded; no frame has started yet.
    Initialized,

    /// At least one frame has started.
    Running,

    /// `terminate` ran. The engine cannot be restarted.
    Terminated,
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Window**: "Kestrel Engine", 800x600, vsync on, windowed
/// - **Tick policy**: one tick per frame
/// - **Physics**: gravity (0, -9.81), 60 Hz steps, at most 4 per tick
///
/// # Examples
///
/// ```no_run
/// use kestrel_engine::prelude::*;
/// use kestrel_engine::platform::HeadlessWindow;
///
/// let mut engine = EngineBuilder::new()
///     .with_title("demo")
///     .with_tps(120.0)
///     .build(HeadlessWindow::new().close_after(10), CaptureRenderer::new());
///
/// engine.run(Scene::new("main")).unwrap();
/// engine.terminate();
/// ```
#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self { config }
    }

    //--- Window -----------------------------------------------------------

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.window.title = title.into();
        self
    }

    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        assert!(
            width > 0 && height > 0,
            "Window size must be positive, got {}x{}",
            width,
            height
        );
        self.config.window.width = width;
        self.config.window.height = height;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.config.window.vsync = vsync;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.config.window.fullscreen = fullscreen;
        self
    }

    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.config.clear_color = color;
        self
    }

    //--- Timing -----------------------------------------------------------

    pub fn with_tick_policy(mut self, policy: TickPolicy) -> Self {
        if let TickPolicy::FixedRate(tps) = policy {
            assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        }
        self.config.tick_policy = policy;
        self
    }

    /// Paces logic ticks to `tps` per second.
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(self, tps: f64) -> Self {
        self.with_tick_policy(TickPolicy::FixedRate(tps))
    }

    /// Every frame advances time by exactly `delta` seconds.
    ///
    /// # Panics
    ///
    /// Panics if `delta <= 0.0`.
    pub fn with_fixed_delta(mut self, delta: f32) -> Self {
        assert!(delta > 0.0, "Fixed delta must be positive, got {}", delta);
        self.config.fixed_delta = Some(delta);
        self
    }

    //--- Physics ----------------------------------------------------------

    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.config.physics.gravity = gravity;
        self
    }

    /// # Panics
    ///
    /// Panics if `timestep <= 0.0`.
    pub fn with_physics_timestep(mut self, timestep: f32) -> Self {
        assert!(timestep > 0.0, "Physics timestep must be positive, got {}", timestep);
        self.config.physics.timestep = timestep;
        self
    }

    /// # Panics
    ///
    /// Panics if `steps == 0`.
    pub fn with_max_substeps(mut self, steps: u32) -> Self {
        assert!(steps > 0, "Max substeps must be positive");
        self.config.physics.max_substeps = steps;
        self
    }

    //--- Rendering --------------------------------------------------------

    pub fn with_shaders(
        mut self,
        vertex: impl Into<std::path::PathBuf>,
        fragment: impl Into<std::path::PathBuf>,
    ) -> Self {
        self.config.shaders = Some(ShaderPaths {
            vertex: vertex.into(),
            fragment: fragment.into(),
        });
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Builds an engine around `window` and `renderer`. Nothing is created
    /// until [`Engine::init`].
    pub fn build<W: Window, R: Renderer>(self, window: W, renderer: R) -> Engine<W, R> {
        info!(
            target: "engine",
            "Building engine ('{}', {}x{}, {:?})",
            self.config.window.title,
            self.config.window.width,
            self.config.window.height,
            self.config.tick_policy
        );

        Engine {
            globals: GlobalContext::new(&self.config),
            tick_clock: TickClock::new(self.config.tick_policy),
            config: self.config,
            window,
            renderer,
            scene: None,
            state: EngineState::Uninitialized,
        }
    }
}

//=== Engine ==============================================================

/// Kestrel engine runtime.
///
/// Owns the window, the renderer, the engine-wide systems and the active
/// scene, and drives them one frame at a time on the calling thread.
///
/// # Architecture
///
/// ```text
/// Engine (frame thread)
///   ├─► Window    (poll, clear, swap)  ──input queue──┐
///   ├─► Renderer  (draws active scene)                │
///   ├─► GlobalContext { input ◄───────────────────────┘, physics, time }
///   └─► Scene     (Tick → [step → FixedTick]* → Destroy)
/// ```
pub struct Engine<W: Window, R: Renderer> {
    config: EngineConfig,
    window: W,
    renderer: R,
    globals: GlobalContext,
    scene: Option<Scene>,
    tick_clock: TickClock,
    state: EngineState,
}

impl<W: Window, R: Renderer> Engine<W, R> {
    //--- Initialization ---------------------------------------------------

    /// Creates the window, renderer and input queue, binds `scene` and runs
    /// its Init dispatch.
    ///
    /// # Errors
    ///
    /// [`EngineError::AlreadyInitialized`] on any call after the first,
    /// or the window/renderer creation failure.
    pub fn init(&mut self, scene: Scene) -> Result<(), EngineError> {
        if self.state != EngineState::Uninitialized {
            warn!(target: "engine", "init called in state {:?}", self.state);
            return Err(EngineError::AlreadyInitialized);
        }

        info!(target: "engine", "Initializing engine");

        if let Err(e) = self.window.init(&self.config.window) {
            error!(target: "engine", "Window creation failed: {}", e);
            return Err(e);
        }
        if let Err(e) = self.renderer.init(&self.window, &self.config) {
            error!(target: "engine", "Renderer creation failed: {}", e);
            return Err(e);
        }
        self.globals.input.init(&mut self.window);
        self.globals.time.reset();

        self.state = EngineState::Initialized;
        self.bind_scene(scene);

        info!(target: "engine", "Engine initialization complete");
        Ok(())
    }

    //--- Frame Loop -------------------------------------------------------

    /// `true` between a successful `init` and the window asking to close.
    pub fn is_open(&self) -> bool {
        self.is_live() && !self.window.close_requested()
    }

    /// Runs the first half of a frame: input, render, then the logic tick.
    pub fn start_frame(&mut self) -> Result<(), EngineError> {
        if !self.is_live() {
            return Err(EngineError::NotInitialized);
        }
        self.state = EngineState::Running;

        //--- 1. Time ------------------------------------------------------
        self.globals.time.update();

        //--- 2. Input -----------------------------------------------------
        self.globals.input.process();

        //--- 3. OS events -------------------------------------------------
        self.window.poll_events();

        //--- 4-5. Draw last tick's state ----------------------------------
        self.window.clear(self.config.clear_color);
        if let Some(scene) = self.scene.as_ref() {
            let camera = scene.active_camera();
            self.renderer.render(
                &camera,
                scene,
                &self.globals.debug,
                &mut self.window,
                &self.config,
            );
        }

        //--- 6. Logic tick ------------------------------------------------
        if let Some(delta) = self.tick_clock.advance(self.globals.time.delta()) {
            self.tick(delta);
        }

        Ok(())
    }

    /// Presents the frame.
    pub fn end_frame(&mut self) -> Result<(), EngineError> {
        if !self.is_live() {
            return Err(EngineError::NotInitialized);
        }
        self.window.swap_buffers();
        Ok(())
    }

    /// `init`, then frames until the window closes. Call
    /// [`Engine::terminate`] afterwards.
    pub fn run(&mut self, scene: Scene) -> Result<(), EngineError> {
        self.init(scene)?;

        info!(target: "engine", "Entering frame loop");
        while self.is_open() {
            self.start_frame()?;
            self.end_frame()?;
        }
        info!(target: "engine", "Frame loop exited after {} frames", self.globals.time.frame());
        Ok(())
    }

    /// [`Engine::run`] for binaries: a fatal error is logged, the engine is
    /// torn down and the process exits with status 1.
    pub fn run_or_exit(&mut self, scene: Scene) {
        if let Err(e) = self.run(scene) {
            error!(target: "engine", "Fatal: {}", e);
            self.terminate();
            std::process::exit(1);
        }
    }

    /// Tears down the active scene, then the renderer and the window.
    ///
    /// Idempotent, and safe after a failed `init`.
    pub fn terminate(&mut self) {
        if self.state == EngineState::Terminated {
            return;
        }
        info!(target: "engine", "Terminating engine");

        if let Some(scene) = self.scene.as_mut() {
            scene.teardown(&mut self.globals);
        }
        self.renderer.terminate();
        self.window.terminate();

        self.state = EngineState::Terminated;
        info!(target: "engine", "Engine shutdown complete");
    }

    //--- Scenes -----------------------------------------------------------

    /// Replaces the active scene: the old one is torn down, the new one is
    /// initialized. Returns the old scene.
    pub fn load_scene(&mut self, scene: Scene) -> Result<Option<Scene>, EngineError> {
        if !self.is_live() {
            return Err(EngineError::NotInitialized);
        }

        let mut previous = self.scene.take();
        if let Some(old) = previous.as_mut() {
            info!(target: "engine", "Unloading scene '{}'", old.name());
            old.teardown(&mut self.globals);
        }
        self.bind_scene(scene);
        Ok(previous)
    }

    /// Removes the scene from the engine (e.g. to inspect it after
    /// `terminate`).
    pub fn take_scene(&mut self) -> Option<Scene> {
        self.scene.take()
    }

    //--- Accessors --------------------------------------------------------

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    pub fn globals(&self) -> &GlobalContext {
        &self.globals
    }

    pub fn globals_mut(&mut self) -> &mut GlobalContext {
        &mut self.globals
    }

    /// Scene and systems together, for setting a scene up between frames.
    pub fn scene_and_globals_mut(&mut self) -> Option<(&mut Scene, &mut GlobalContext)> {
        let scene = self.scene.as_mut()?;
        Some((scene, &mut self.globals))
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Switches tick pacing at runtime.
    pub fn set_tick_policy(&mut self, policy: TickPolicy) {
        self.config.tick_policy = policy;
        self.tick_clock.set_policy(policy);
    }

    pub fn tick_policy(&self) -> TickPolicy {
        self.tick_clock.policy()
    }

    //--- Internal Helpers -------------------------------------------------

    fn is_live(&self) -> bool {
        matches!(self.state, EngineState::Initialized | EngineState::Running)
    }

    fn bind_scene(&mut self, mut scene: Scene) {
        info!(target: "engine", "Loading scene '{}'", scene.name());
        scene.call_loop(CallState::Init, &mut self.globals);
        self.scene = Some(scene);
    }

    /// Tick → physics sub-steps with FixedTick → Destroy → window commands.
    fn tick(&mut self, delta: f32) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };

        self.globals.debug.clear();
        scene.call_loop(CallState::Tick, &mut self.globals);

        let steps = self.globals.physics.pending_steps(delta);
        for _ in 0..steps {
            self.globals.physics.step();
            scene.call_loop(CallState::FixedTick, &mut self.globals);
        }
        trace!(target: "engine", "Tick ({:.4}s, {} physics steps)", delta, steps);

        scene.call_loop(CallState::Destroy, &mut self.globals);

        self.apply_window_commands();
    }

    fn apply_window_commands(&mut self) {
        for command in self.globals.drain_commands() {
            debug!(target: "engine", "Window command: {:?}", command);
            match command {
                WindowCommand::Close => self.window.request_close(),
                WindowCommand::SetTitle(title) => self.window.set_title(&title),
                WindowCommand::SetCursorMode(mode) => self.window.set_cursor_mode(mode),
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::CaptureRenderer;
    use crate::platform::HeadlessWindow;

    fn engine(frames: u64) -> Engine<HeadlessWindow, CaptureRenderer> {
        EngineBuilder::new()
            .with_fixed_delta(1.0 / 60.0)
            .build(HeadlessWindow::new().close_after(frames), CaptureRenderer::new())
    }

    //=====================================================================
    // EngineBuilder Tests
    //=====================================================================

    #[test]
    fn builder_defaults() {
        let builder = EngineBuilder::new();
        assert_eq!(builder.config(), &EngineConfig::default());
    }

    #[test]
    fn builder_with_tps() {
        let builder = EngineBuilder::new().with_tps(120.0);
        assert_eq!(builder.config().tick_policy, TickPolicy::FixedRate(120.0));
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        EngineBuilder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "Window size must be positive")]
    fn builder_with_size_panics_on_zero() {
        EngineBuilder::new().with_size(0, 600);
    }

    #[test]
    #[should_panic(expected = "Max substeps must be positive")]
    fn builder_with_max_substeps_panics_on_zero() {
        EngineBuilder::new().with_max_substeps(0);
    }

    #[test]
    fn builder_collects_settings() {
        let builder = EngineBuilder::new()
            .with_title("t")
            .with_size(320, 200)
            .with_vsync(false)
            .with_gravity(Vec2::ZERO)
            .with_physics_timestep(0.01)
            .with_shaders("a.vert", "a.frag");
        let config = builder.config();
        assert_eq!(config.window.title, "t");
        assert_eq!((config.window.width, config.window.height), (320, 200));
        assert!(!config.window.vsync);
        assert_eq!(config.physics.gravity, Vec2::ZERO);
        assert_eq!(config.physics.timestep, 0.01);
        assert!(config.shaders.is_some());
    }

    //=====================================================================
    // Engine Lifecycle Tests
    //=====================================================================

    #[test]
    fn frame_calls_before_init_fail() {
        let mut engine = engine(1);
        assert!(!engine.is_open());
        assert!(matches!(engine.start_frame(), Err(EngineError::NotInitialized)));
        assert!(matches!(engine.end_frame(), Err(EngineError::NotInitialized)));
    }

    #[test]
    fn second_init_is_rejected() {
        let mut engine = engine(1);
        engine.init(Scene::new("a")).unwrap();
        assert_eq!(engine.state(), EngineState::Initialized);
        assert!(matches!(
            engine.init(Scene::new("b")),
            Err(EngineError::AlreadyInitialized)
        ));
        assert_eq!(engine.scene().unwrap().name(), "a");
    }

    #[test]
    fn start_frame_clears_with_configured_color() {
        let mut engine = EngineBuilder::new()
            .with_clear_color(Color::WHITE)
            .build(HeadlessWindow::new(), CaptureRenderer::new());
        engine.init(Scene::new("s")).unwrap();
        engine.start_frame().unwrap();

        assert_eq!(engine.window().last_clear(), Some(Color::WHITE));
        assert_eq!(engine.window().polls(), 1);
        assert_eq!(engine.state(), EngineState::Running);
    }

    #[test]
    fn paused_policy_renders_without_ticking() {
        let mut engine = engine(3);
        engine.set_tick_policy(TickPolicy::Paused);
        engine.run(Scene::new("s")).unwrap();

        assert_eq!(engine.renderer().frames_rendered(), 3);
        assert_eq!(engine.globals().physics.step_count(), 0);
    }

    #[test]
    fn terminate_is_idempotent() {
        let mut engine = engine(1);
        engine.run(Scene::new("s")).unwrap();
        engine.terminate();
        engine.terminate();

        assert_eq!(engine.state(), EngineState::Terminated);
        assert!(engine.window().is_terminated());
        assert!(!engine.renderer().is_initialized());
        assert!(!engine.is_open());
    }

    #[test]
    fn terminate_after_failed_init_is_safe() {
        let mut engine = EngineBuilder::new()
            .build(HeadlessWindow::failing("no display"), CaptureRenderer::new());
        assert!(matches!(
            engine.init(Scene::new("s")),
            Err(EngineError::WindowCreation(_))
        ));
        engine.terminate();
        assert_eq!(engine.state(), EngineState::Terminated);
    }
}
