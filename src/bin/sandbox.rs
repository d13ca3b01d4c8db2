//=========================================================================
// Sandbox
//
// Small interactive scene: a walled floor, a row of falling crates and
// a motor-driven paddle swinging between two limits.
//
// Controls:
//   Space   kick every crate upwards
//   M       toggle mouse lock
//   R       reload the scene
//   Escape  quit
//
// Set RUST_LOG (e.g. RUST_LOG=debug,physics=trace) for more output.
//=========================================================================

use kestrel_engine::logging::{init_logging, LoggingConfig};
use kestrel_engine::prelude::*;

//=== Scripts =============================================================

/// Kicks its entity's rigidbody when Space is pressed.
struct Crate {
    kick: f32,
}

impl Component for Crate {
    fn tick(&mut self, ctx: &mut ComponentContext) {
        if !ctx.input().key_pressed(KeyCode::Space) {
            return;
        }
        if let Some((body, physics)) = ctx.component_and_physics_mut::<Rigidbody2D>() {
            body.apply_impulse(physics, Vec2::new(0.0, self.kick));
        }
    }
}

/// Global keys and the window title.
#[derive(Default)]
struct Director {
    cursor_locked: bool,
    since_title: f32,
}

impl Component for Director {
    fn init(&mut self, ctx: &mut ComponentContext) {
        log::info!(target: "sandbox", "Scene '{}' ready", ctx.scene().name());
    }

    fn tick(&mut self, ctx: &mut ComponentContext) {
        if ctx.input().key_pressed(KeyCode::Escape) {
            ctx.request_exit();
        }

        if ctx.input().key_pressed(KeyCode::KeyM) {
            self.cursor_locked = !self.cursor_locked;
            let mode = if self.cursor_locked {
                CursorMode::Locked
            } else {
                CursorMode::Normal
            };
            ctx.set_cursor_mode(mode);
        }

        if ctx.input().key_pressed(KeyCode::KeyR) {
            for name in ["crate-0", "crate-1", "crate-2", "crate-3", "crate-4"] {
                if let Some(id) = ctx.scene().find_entity(name) {
                    ctx.destroy_entity(id);
                }
            }
            spawn_crates(ctx);
        }

        self.since_title += ctx.time().delta();
        if self.since_title >= 1.0 {
            self.since_title = 0.0;
            let title = format!(
                "Kestrel Sandbox - {:.0}s, {} bodies",
                ctx.time().elapsed(),
                ctx.physics().body_count()
            );
            ctx.set_window_title(title);
        }
    }
}

//=== Scene Setup =========================================================

fn spawn_crates(ctx: &mut ComponentContext) {
    for i in 0..5 {
        let x = -2.0 + i as f32;
        let y = 3.0 + 1.2 * i as f32;
        let id = ctx.spawn_with(format!("crate-{}", i), Transform::from_xy(x, y));
        ctx.add_component_to(id, Rigidbody2D::dynamic());
        ctx.add_component_to(id, BoxCollider2D::new(Vec2::splat(0.9)));
        ctx.add_component_to(id, Crate { kick: 4.0 });
    }
}

/// Spawns the first crates during Init, then removes itself.
struct Bootstrap;

impl Component for Bootstrap {
    fn init(&mut self, ctx: &mut ComponentContext) {
        spawn_crates(ctx);
        ctx.destroy_self();
    }
}

fn build_scene(globals: &mut GlobalContext) -> Scene {
    let mut scene = Scene::new("sandbox");

    let camera = scene.spawn_with("camera", Transform::from_xy(0.0, 2.0));
    scene.add_component(camera, Camera::orthographic(8.0), globals);

    let director = scene.spawn("director");
    scene.add_component(director, Director::default(), globals);
    scene.add_component(director, Bootstrap, globals);

    let floor = scene.spawn_with("floor", Transform::from_xy(0.0, -1.0));
    scene.add_component(floor, Rigidbody2D::default(), globals);
    scene.add_component(floor, BoxCollider2D::new(Vec2::new(20.0, 1.0)), globals);

    let walls = scene.spawn("walls");
    let outline = EdgeCollider2D::new(vec![
        Vec2::new(-10.0, -0.5),
        Vec2::new(-10.0, 12.0),
        Vec2::new(10.0, 12.0),
        Vec2::new(10.0, -0.5),
    ]);
    scene.add_component(walls, outline, globals);

    let ball = scene.spawn_with("ball", Transform::from_xy(4.5, 9.0));
    scene.add_component(ball, Rigidbody2D::dynamic(), globals);
    scene.add_component(ball, CircleCollider2D::new(0.4), globals);

    let paddle = scene.spawn_with("paddle", Transform::from_xy(4.0, 6.0));
    scene.add_component(paddle, Rigidbody2D::dynamic(), globals);
    scene.add_component(paddle, BoxCollider2D::new(Vec2::new(3.0, 0.3)), globals);
    scene.add_component(
        paddle,
        HingeJoint2D::new().with_motor(1.5, 50.0).with_limits(-1.0, 1.0),
        globals,
    );

    scene
}

//=== Entry Point =========================================================

#[cfg(any(
    target_os = "windows",
    target_os = "macos",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
))]
fn main() {
    use kestrel_engine::platform::WinitWindow;

    init_logging(LoggingConfig::default());

    let mut engine = EngineBuilder::new()
        .with_title("Kestrel Sandbox")
        .with_size(1280, 720)
        .build(WinitWindow::new(), CaptureRenderer::new().with_history(1));

    let scene = build_scene(engine.globals_mut());
    engine.run_or_exit(scene);
    engine.terminate();
}

#[cfg(not(any(
    target_os = "windows",
    target_os = "macos",
    target_os = "linux",
    target_os = "dragonfly",
    target_os = "freebsd",
    target_os = "netbsd",
    target_os = "openbsd"
)))]
fn main() {
    use kestrel_engine::platform::HeadlessWindow;

    init_logging(LoggingConfig::default());

    let mut engine = EngineBuilder::new()
        .with_fixed_delta(1.0 / 60.0)
        .build(HeadlessWindow::new().close_after(600), CaptureRenderer::new());

    let scene = build_scene(engine.globals_mut());
    engine.run_or_exit(scene);
    engine.terminate();
}
