//=========================================================================
// Frame Loop Integration Tests
//=========================================================================
//
// Drives the whole engine through HeadlessWindow + CaptureRenderer:
// loop termination, frame ordering, dispatch edits from hooks, window
// commands, scene switching and init failures.
//
//=========================================================================

use std::cell::RefCell;
use std::rc::Rc;

use kestrel_engine::core::input::InputEvent;
use kestrel_engine::platform::HeadlessWindow;
use kestrel_engine::prelude::*;

//=== Helpers =============================================================

type Log = Rc<RefCell<Vec<String>>>;

fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.borrow().clone()
}

fn headless(frames: u64) -> Engine<HeadlessWindow, CaptureRenderer> {
    EngineBuilder::new()
        .with_fixed_delta(1.0 / 60.0)
        .with_gravity(Vec2::ZERO)
        .build(HeadlessWindow::new().close_after(frames), CaptureRenderer::new())
}

/// Records every hook it receives under its label.
struct Recorder {
    label: &'static str,
    log: Log,
}

impl Recorder {
    fn new(label: &'static str, log: &Log) -> Self {
        Self { label, log: log.clone() }
    }

    fn push(&self, hook: &str) {
        self.log.borrow_mut().push(format!("{}:{}", self.label, hook));
    }
}

impl Component for Recorder {
    fn init(&mut self, _ctx: &mut ComponentContext) {
        self.push("init");
    }

    fn tick(&mut self, _ctx: &mut ComponentContext) {
        self.push("tick");
    }

    fn destroy(&mut self, _ctx: &mut ComponentContext) {
        self.push("destroy");
    }
}

/// Moves its entity one unit along x per tick.
struct Mover;

impl Component for Mover {
    fn tick(&mut self, ctx: &mut ComponentContext) {
        if let Some(transform) = ctx.transform_mut() {
            transform.translate(Vec3::X);
        }
    }
}

//=========================================================================
// Loop Termination
//=========================================================================

#[test]
fn is_open_after_init_and_loop_stops_exactly_at_close() {
    let mut engine = headless(3);
    assert!(!engine.is_open());

    engine.init(Scene::new("main")).unwrap();
    assert!(engine.is_open());

    while engine.is_open() {
        engine.start_frame().unwrap();
        engine.end_frame().unwrap();
    }

    assert_eq!(engine.window().frames_presented(), 3);
    assert_eq!(engine.window().polls(), 3);
    assert_eq!(engine.renderer().frames_rendered(), 3);
    assert!(!engine.is_open());
}

#[test]
fn close_from_controller_ends_run_after_current_frame() {
    let log = new_log();
    let mut engine = EngineBuilder::new()
        .with_fixed_delta(1.0 / 60.0)
        .build(HeadlessWindow::new(), CaptureRenderer::new());
    let controller = engine.window().controller();

    let mut scene = Scene::new("main");
    let e = scene.spawn("e");
    scene.add_component(e, Recorder::new("a", &log), engine.globals_mut());

    engine.init(scene).unwrap();
    engine.start_frame().unwrap();
    engine.end_frame().unwrap();

    controller.request_close();
    assert!(engine.is_open());
    engine.start_frame().unwrap();
    engine.end_frame().unwrap();
    assert!(!engine.is_open());

    let ticks = entries(&log).iter().filter(|e| *e == "a:tick").count();
    assert_eq!(ticks, 2);
}

//=========================================================================
// Frame Ordering
//=========================================================================

#[test]
fn render_runs_before_tick() {
    let mut engine = headless(3);
    let mut scene = Scene::new("main");
    let e = scene.spawn("mover");
    scene.add_component(e, Mover, engine.globals_mut());

    engine.run(scene).unwrap();

    let drawn: Vec<f32> = engine
        .renderer()
        .frames()
        .map(|frame| frame.find("mover").unwrap().transform.position.x)
        .collect();
    assert_eq!(drawn, vec![0.0, 1.0, 2.0]);

    let scene = engine.scene().unwrap();
    assert_eq!(scene.transform(e).unwrap().position.x, 3.0);
}

#[test]
fn input_reaches_scripts_one_frame_after_poll() {
    struct SpaceWatcher(Log);

    impl Component for SpaceWatcher {
        fn tick(&mut self, ctx: &mut ComponentContext) {
            let pressed = ctx.input().key_pressed(KeyCode::Space);
            self.0.borrow_mut().push(pressed.to_string());
        }
    }

    let log = new_log();
    let mut engine = headless(3);
    let controller = engine.window().controller();

    let mut scene = Scene::new("main");
    let e = scene.spawn("watcher");
    scene.add_component(e, SpaceWatcher(log.clone()), engine.globals_mut());

    controller.inject(vec![InputEvent::KeyDown {
        key: KeyCode::Space,
        modifiers: Modifiers::NONE,
    }]);
    engine.run(scene).unwrap();

    assert_eq!(entries(&log), vec!["false", "true", "false"]);
}

#[test]
fn paused_policy_still_renders() {
    let log = new_log();
    let mut engine = EngineBuilder::new()
        .with_fixed_delta(1.0 / 60.0)
        .with_tick_policy(TickPolicy::Paused)
        .build(HeadlessWindow::new().close_after(4), CaptureRenderer::new());

    let mut scene = Scene::new("main");
    let e = scene.spawn("e");
    scene.add_component(e, Recorder::new("a", &log), engine.globals_mut());
    engine.run(scene).unwrap();

    assert_eq!(engine.renderer().frames_rendered(), 4);
    assert_eq!(entries(&log), vec!["a:init"]);
}

//=========================================================================
// Dispatch Edits From Hooks
//=========================================================================

/// Second recorder type, so an entity can carry both.
struct LateRecorder(Recorder);

impl Component for LateRecorder {
    fn init(&mut self, _ctx: &mut ComponentContext) {
        self.0.push("init");
    }

    fn tick(&mut self, _ctx: &mut ComponentContext) {
        self.0.push("tick");
    }
}

/// On its first tick: destroys `victim`, adds a late recorder to `target`.
struct Editor {
    victim: Option<ComponentHandle<Recorder>>,
    target: EntityId,
    log: Log,
    done: bool,
}

impl Component for Editor {
    fn tick(&mut self, ctx: &mut ComponentContext) {
        if self.done {
            return;
        }
        self.done = true;
        if let Some(victim) = self.victim.take() {
            ctx.destroy_component(victim.id());
        }
        ctx.add_component_to(self.target, LateRecorder(Recorder::new("late", &self.log)));
    }
}

#[test]
fn edits_during_tick_keep_the_running_pass_intact() {
    let log = new_log();
    let mut engine = headless(2);
    let mut scene = Scene::new("main");
    let globals = engine.globals_mut();

    let editor_entity = scene.spawn("editor");
    let victim_entity = scene.spawn("victim");
    let target = scene.spawn("target");

    let victim = scene.add_component(victim_entity, Recorder::new("victim", &log), globals);
    scene.add_component(
        editor_entity,
        Editor { victim, target, log: log.clone(), done: false },
        globals,
    );
    scene.add_component(target, Recorder::new("target", &log), globals);

    engine.run(scene).unwrap();

    assert_eq!(
        entries(&log),
        vec![
            // Init
            "victim:init",
            "target:init",
            // Frame 1: victim was live at pass start, so it still ticks.
            "victim:tick",
            "target:tick",
            "victim:destroy",
            // Frame 2: the late component is initialized, then ticks.
            "late:init",
            "target:tick",
            "late:tick",
        ]
    );
}

#[test]
fn component_added_during_init_is_initialized_in_same_pass() {
    struct Spawner(Log);

    impl Component for Spawner {
        fn init(&mut self, ctx: &mut ComponentContext) {
            self.0.borrow_mut().push("spawner:init".to_string());
            ctx.add_component(Recorder::new("child", &self.0));
        }
    }

    let log = new_log();
    let mut engine = headless(1);
    let mut scene = Scene::new("main");
    let e = scene.spawn("e");
    scene.add_component(e, Spawner(log.clone()), engine.globals_mut());

    engine.init(scene).unwrap();
    assert_eq!(entries(&log), vec!["spawner:init", "child:init"]);
}

#[test]
fn destroying_entity_from_tick_releases_it_in_same_frame() {
    struct SelfDestruct;

    impl Component for SelfDestruct {
        fn tick(&mut self, ctx: &mut ComponentContext) {
            ctx.destroy_owner();
        }
    }

    let log = new_log();
    let mut engine = headless(1);
    let mut scene = Scene::new("main");
    let e = scene.spawn("doomed");
    scene.add_component(e, Recorder::new("r", &log), engine.globals_mut());
    scene.add_component(e, SelfDestruct, engine.globals_mut());

    engine.run(scene).unwrap();

    let scene = engine.scene().unwrap();
    assert!(!scene.is_alive(e));
    assert_eq!(scene.entity_count(), 0);
    assert_eq!(entries(&log), vec!["r:init", "r:tick", "r:destroy"]);
}

//=========================================================================
// Window Commands
//=========================================================================

#[test]
fn scripts_drive_the_window_through_commands() {
    struct Quitter {
        ticks: u32,
    }

    impl Component for Quitter {
        fn tick(&mut self, ctx: &mut ComponentContext) {
            self.ticks += 1;
            if self.ticks == 2 {
                ctx.set_window_title("bye");
                ctx.set_cursor_mode(CursorMode::Hidden);
                ctx.request_exit();
            }
        }
    }

    let mut engine = headless(100);
    let mut scene = Scene::new("main");
    let e = scene.spawn("e");
    scene.add_component(e, Quitter { ticks: 0 }, engine.globals_mut());

    engine.run(scene).unwrap();

    let window = engine.window();
    assert_eq!(window.frames_presented(), 2);
    assert_eq!(window.title(), "bye");
    assert_eq!(window.cursor_mode(), CursorMode::Hidden);
    assert!(engine.globals().pending_commands().is_empty());
}

#[test]
fn scripts_reach_the_window_clipboard() {
    struct Copier;

    impl Component for Copier {
        fn init(&mut self, ctx: &mut ComponentContext) {
            let pasted = ctx.input_mut().clipboard().unwrap_or_default();
            assert!(ctx.input_mut().set_clipboard(&format!("{}!", pasted)));
        }
    }

    let mut engine = EngineBuilder::new().build(
        HeadlessWindow::new().with_clipboard("hi").close_after(1),
        CaptureRenderer::new(),
    );
    let mut scene = Scene::new("main");
    let e = scene.spawn("e");
    scene.add_component(e, Copier, engine.globals_mut());

    engine.run(scene).unwrap();

    assert_eq!(engine.window().clipboard_text().as_deref(), Some("hi!"));
}

//=========================================================================
// Debug Draw
//=========================================================================

#[test]
fn debug_lines_show_until_the_next_tick() {
    struct Marker {
        ticks: u32,
    }

    impl Component for Marker {
        fn tick(&mut self, ctx: &mut ComponentContext) {
            self.ticks += 1;
            if self.ticks == 1 {
                let origin = ctx.transform().map(Transform::position_2d).unwrap_or_default();
                ctx.draw_ray(origin, Vec2::Y, Color::WHITE);
                ctx.draw_line(Vec2::ZERO, origin, Color::BLACK);
            }
        }
    }

    let mut engine = headless(3);
    let mut scene = Scene::new("main");
    let e = scene.spawn_with("e", Transform::from_xy(2.0, 1.0));
    scene.add_component(e, Marker { ticks: 0 }, engine.globals_mut());

    engine.run(scene).unwrap();

    // Render runs before the tick, so a tick's lines appear one frame later.
    let counts: Vec<_> = engine.renderer().frames().map(|f| f.debug_lines.len()).collect();
    assert_eq!(counts, vec![0, 2, 0]);

    let frame = engine.renderer().frames().nth(1).unwrap();
    assert_eq!(
        frame.debug_lines[0],
        DebugLine {
            start: Vec2::new(2.0, 1.0),
            end: Vec2::new(2.0, 2.0),
            color: Color::WHITE,
        }
    );
}

//=========================================================================
// Scenes & Lifecycle
//=========================================================================

#[test]
fn load_scene_tears_down_the_old_scene() {
    let log = new_log();
    let mut engine = headless(10);

    let mut first = Scene::new("first");
    let e = first.spawn("e");
    first.add_component(e, Recorder::new("old", &log), engine.globals_mut());
    first.add_component(e, Rigidbody2D::dynamic(), engine.globals_mut());
    engine.init(first).unwrap();
    engine.start_frame().unwrap();
    engine.end_frame().unwrap();

    let mut second = Scene::new("second");
    let e2 = second.spawn("e2");
    second.add_component(e2, Recorder::new("new", &log), engine.globals_mut());

    let old = engine.load_scene(second).unwrap().unwrap();

    assert_eq!(old.name(), "first");
    assert_eq!(old.entity_count(), 0);
    assert_eq!(engine.globals().physics.body_count(), 0);
    assert_eq!(engine.scene().unwrap().name(), "second");
    assert_eq!(
        entries(&log),
        vec!["old:init", "old:tick", "old:destroy", "new:init"]
    );
}

#[test]
fn terminate_runs_destroy_hooks_and_keeps_scene_for_inspection() {
    let log = new_log();
    let mut engine = headless(1);
    let mut scene = Scene::new("main");
    let e = scene.spawn("e");
    scene.add_component(e, Recorder::new("a", &log), engine.globals_mut());

    engine.run(scene).unwrap();
    engine.terminate();
    engine.terminate();

    assert_eq!(engine.state(), EngineState::Terminated);
    assert_eq!(entries(&log), vec!["a:init", "a:tick", "a:destroy"]);

    let scene = engine.take_scene().unwrap();
    assert_eq!(scene.entity_count(), 0);
    assert!(engine.take_scene().is_none());
}

#[test]
fn renderer_failure_is_reported_and_terminate_is_safe() {
    let mut engine = EngineBuilder::new().build(
        HeadlessWindow::new().close_after(5),
        CaptureRenderer::failing("no context"),
    );

    let err = engine.run(Scene::new("main")).unwrap_err();
    assert!(matches!(err, EngineError::Renderer(_)));
    assert!(!engine.is_open());
    assert_eq!(engine.renderer().frames_rendered(), 0);

    engine.terminate();
    assert!(engine.window().is_terminated());
}

#[test]
fn camera_view_follows_primary_camera() {
    let mut engine = headless(1);
    let mut scene = Scene::new("main");
    let cam = scene.spawn_with("camera", Transform::from_xy(3.0, -2.0));
    scene.add_component(cam, Camera::orthographic(10.0), engine.globals_mut());

    engine.run(scene).unwrap();

    let frame = engine.renderer().last_frame().unwrap();
    assert_eq!(frame.camera.position, Vec3::new(3.0, -2.0, 0.0));
    assert_eq!(frame.viewport, (800, 600));
}
