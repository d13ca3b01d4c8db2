//=========================================================================
// Capture Renderer
//=========================================================================
//
// Renderer that records a draw list per frame instead of touching a GPU.
// Used by headless runs and by tests that check what was on screen.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;

use log::{info, trace};

//=== Internal Dependencies ===============================================

use super::{CameraView, DebugLine, DebugDraw, ShaderProgram};
use crate::core::config::EngineConfig;
use crate::core::error::EngineError;
use crate::core::platform_bridge::{Renderer, Window};
use crate::core::scene::{EntityId, Scene, Transform};

const DEFAULT_HISTORY: usize = 256;

//=== DrawItem ============================================================

/// One entity as it was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub entity: EntityId,
    pub name: String,
    pub transform: Transform,
}

//=== FrameCapture ========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FrameCapture {
    /// Zero-based index of the rendered frame.
    pub index: u64,
    pub camera: CameraView,
    pub viewport: (u32, u32),
    pub draws: Vec<DrawItem>,
    /// Debug overlay, in queue order.
    pub debug_lines: Vec<DebugLine>,
}

impl FrameCapture {
    /// Draw item for the entity called `name`.
    pub fn find(&self, name: &str) -> Option<&DrawItem> {
        self.draws.iter().find(|item| item.name == name)
    }
}

//=== CaptureRenderer =====================================================

/// Keeps the most recent frames' draw lists.
pub struct CaptureRenderer {
    frames: VecDeque<FrameCapture>,
    history: usize,
    rendered: u64,
    shader: Option<ShaderProgram>,
    fail_init: Option<String>,
    initialized: bool,
}

impl CaptureRenderer {
    pub fn new() -> Self {
        Self {
            frames: VecDeque::new(),
            history: DEFAULT_HISTORY,
            rendered: 0,
            shader: None,
            fail_init: None,
            initialized: false,
        }
    }

    /// Keeps at most `frames` captures.
    pub fn with_history(mut self, frames: usize) -> Self {
        assert!(frames > 0, "history must keep at least one frame");
        self.history = frames;
        self
    }

    /// A renderer whose `init` fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            fail_init: Some(reason.into()),
            ..Self::new()
        }
    }

    pub fn frames(&self) -> impl Iterator<Item = &FrameCapture> {
        self.frames.iter()
    }

    pub fn last_frame(&self) -> Option<&FrameCapture> {
        self.frames.back()
    }

    /// Total frames rendered since `init`.
    pub fn frames_rendered(&self) -> u64 {
        self.rendered
    }

    pub fn shader(&self) -> Option<&ShaderProgram> {
        self.shader.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl Default for CaptureRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for CaptureRenderer {
    fn init(&mut self, window: &dyn Window, config: &EngineConfig) -> Result<(), EngineError> {
        if let Some(reason) = &self.fail_init {
            return Err(EngineError::Renderer(reason.clone()));
        }
        if let Some(paths) = &config.shaders {
            self.shader = Some(ShaderProgram::load(&paths.vertex, &paths.fragment));
        }
        self.initialized = true;
        let (width, height) = window.size();
        info!(target: "render", "Capture renderer ready ({}x{})", width, height);
        Ok(())
    }

    fn render(
        &mut self,
        camera: &CameraView,
        scene: &Scene,
        debug: &DebugDraw,
        window: &mut dyn Window,
        _config: &EngineConfig,
    ) {
        let draws = scene
            .entities()
            .map(|(id, entity)| DrawItem {
                entity: id,
                name: entity.name.clone(),
                transform: entity.transform,
            })
            .collect::<Vec<_>>();

        trace!(
            target: "render",
            "Frame {}: {} draw items, {} debug lines",
            self.rendered,
            draws.len(),
            debug.lines().len()
        );

        if self.frames.len() == self.history {
            self.frames.pop_front();
        }
        self.frames.push_back(FrameCapture {
            index: self.rendered,
            camera: *camera,
            viewport: window.size(),
            draws,
            debug_lines: debug.lines().to_vec(),
        });
        self.rendered += 1;
    }

    fn terminate(&mut self) {
        if self.initialized {
            info!(target: "render", "Capture renderer released after {} frames", self.rendered);
        }
        self.initialized = false;
        self.shader = None;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::WindowConfig;
    use crate::platform::HeadlessWindow;

    fn window() -> HeadlessWindow {
        let mut window = HeadlessWindow::new();
        window.init(&WindowConfig::default()).unwrap();
        window
    }

    #[test]
    fn records_live_entities_in_order() {
        let mut window = window();
        let config = EngineConfig::default();
        let mut renderer = CaptureRenderer::new();
        renderer.init(&window, &config).unwrap();

        let mut scene = Scene::new("s");
        scene.spawn_with("a", Transform::from_xy(1.0, 0.0));
        let b = scene.spawn("b");
        scene.spawn("c");
        scene.destroy_entity(b);

        renderer.render(&CameraView::default(), &scene, &DebugDraw::new(), &mut window, &config);

        let frame = renderer.last_frame().unwrap();
        let names: Vec<_> = frame.draws.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
        assert_eq!(frame.find("a").unwrap().transform.position.x, 1.0);
        assert_eq!(frame.viewport, (800, 600));
    }

    #[test]
    fn history_is_bounded() {
        let mut window = window();
        let config = EngineConfig::default();
        let mut renderer = CaptureRenderer::new().with_history(2);
        renderer.init(&window, &config).unwrap();
        let scene = Scene::new("s");

        for _ in 0..5 {
            renderer.render(&CameraView::default(), &scene, &DebugDraw::new(), &mut window, &config);
        }

        assert_eq!(renderer.frames().count(), 2);
        assert_eq!(renderer.frames_rendered(), 5);
        assert_eq!(renderer.last_frame().unwrap().index, 4);
    }

    #[test]
    fn debug_lines_are_recorded_with_the_frame() {
        let mut window = window();
        let config = EngineConfig::default();
        let mut renderer = CaptureRenderer::new();
        renderer.init(&window, &config).unwrap();

        let mut debug = DebugDraw::new();
        debug.line(glam::Vec2::ZERO, glam::Vec2::X, crate::core::config::Color::WHITE);
        renderer.render(&CameraView::default(), &Scene::new("s"), &debug, &mut window, &config);
        renderer.render(&CameraView::default(), &Scene::new("s"), &DebugDraw::new(), &mut window, &config);

        let frames: Vec<_> = renderer.frames().map(|f| f.debug_lines.len()).collect();
        assert_eq!(frames, vec![1, 0]);
    }

    #[test]
    fn failing_renderer_reports_error() {
        let window = window();
        let mut renderer = CaptureRenderer::failing("no gpu");
        let err = renderer.init(&window, &EngineConfig::default()).unwrap_err();
        assert!(matches!(err, EngineError::Renderer(reason) if reason == "no gpu"));
        renderer.terminate();
        renderer.terminate();
    }
}
