//! Windowed application loop.
//!
//! [`run`] opens a window, composes the beach scene every frame into a [`DrawList`] and
//! renders it with the [`MeshPass`]. Keyboard and mouse input drive the animation clock
//! and the view angles:
//!
//! | Input              | Effect                                  |
//! |--------------------|-----------------------------------------|
//! | Space              | start or stop the animation             |
//! | R                  | rewind to t = 0                         |
//! | 0                  | reset the view angles                   |
//! | 1–9                | view presets, laid out like a keypad    |
//! | Arrows             | tilt (up/down) and turn (left/right)    |
//! | PageUp / PageDown  | roll                                    |
//! | Left drag          | rotate the view and stop the animation  |

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::clock::SceneClock;
use crate::drag_controller::DragController;
use crate::error::{Error, Result};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::mesh_pass::MeshPass;
use crate::painter::{DrawList, Painter};
use crate::scene::BeachScene;
use crate::view::{ViewAngles, ViewPreset};

/// Degrees per second the arrow and page keys turn the view.
const KEY_TURN_RATE: f32 = 90.0;

/// Longest frame delta a held key may turn for. Frames after an idle wait see the whole
/// gap as their delta.
const MAX_TURN_DT: f32 = 1.0 / 30.0;

/// Configuration for the app window and the animation's starting state.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Root of the per-material texture folders.
    pub textures: Option<PathBuf>,
    /// Start with the animation stopped.
    pub paused: bool,
    /// Initial animation time in seconds.
    pub start_time: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Beachside".to_string(),
            width: 1024,
            height: 768,
            textures: None,
            paused: false,
            start_time: 0.0,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn textures(mut self, dir: impl Into<PathBuf>) -> Self {
        self.textures = Some(dir.into());
        self
    }

    pub fn paused(mut self, paused: bool) -> Self {
        self.paused = paused;
        self
    }

    pub fn start_time(mut self, seconds: f32) -> Self {
        self.start_time = seconds;
        self
    }

    fn clock(&self) -> SceneClock {
        let mut clock = SceneClock::new().starting_at(self.start_time);
        clock.set_running(!self.paused);
        clock
    }
}

/// Open a window and play the beach scene until it is closed.
///
/// # Example
/// ```no_run
/// use beachside::AppConfig;
///
/// beachside::run(
///     AppConfig::new()
///         .title("Beach")
///         .size(1280, 720)
///         .textures("assets/textures"),
/// )?;
/// # Ok::<(), beachside::Error>(())
/// ```
pub fn run(config: AppConfig) -> Result<()> {
    let scene = BeachScene::new()?;
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = BeachApp {
        config,
        scene: Some(scene),
        running: None,
        error: None,
    };
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct BeachApp {
    config: AppConfig,
    scene: Option<BeachScene<DrawList>>,
    running: Option<Running>,
    error: Option<Error>,
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    mesh_pass: MeshPass,
    scene: BeachScene<DrawList>,
    painter: Painter<DrawList>,
    clock: SceneClock,
    input: Input,
    drag: DragController,
    view: ViewAngles,
    title: String,
    last_frame: Instant,
    fps: FpsCounter,
}

impl BeachApp {
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let Some(scene) = self.scene.take() else {
            return Ok(());
        };
        let config = &self.config;

        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(window_attrs)?);

        let gpu = GpuContext::new(window.clone())?;
        let mesh_pass = MeshPass::new(&gpu, config.textures.as_deref());
        let clock = config.clock();
        log::info!(
            "starting at t={:.2}s ({})",
            clock.elapsed(),
            if clock.is_running() { "playing" } else { "paused" }
        );

        window.request_redraw();
        self.running = Some(Running {
            window,
            gpu,
            mesh_pass,
            scene,
            painter: Painter::new(DrawList::new()),
            clock,
            input: Input::new(),
            drag: DragController::new(),
            view: ViewAngles::ZERO,
            title: config.title.clone(),
            last_frame: Instant::now(),
            fps: FpsCounter::new(),
        });
        Ok(())
    }
}

impl ApplicationHandler for BeachApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.running.is_some() {
            return;
        }
        if let Err(err) = self.start(event_loop) {
            log::error!("{err}");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(app) = self.running.as_mut() else {
            return;
        };

        if app.input.handle_event(&event) {
            app.window.request_redraw();
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                app.gpu.resize(size.width, size.height);
                app.window.request_redraw();
            }
            WindowEvent::RedrawRequested => {
                app.frame();
            }
            _ => {}
        }
    }
}

impl Running {
    fn frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.handle_input(dt);
        self.clock.tick(dt);
        self.input.begin_frame();

        let time = self.clock.frame_time();
        self.painter.renderer_mut().clear();
        let camera = self.scene.compose(&mut self.painter, time, self.view);

        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("surface lost; reconfiguring");
                self.gpu.reconfigure();
                self.window.request_redraw();
                return;
            }
            Err(err) => {
                log::warn!("skipping frame: {err}");
                self.window.request_redraw();
                return;
            }
        };
        let target = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Beach Encoder"),
            });
        self.mesh_pass.render(
            &self.gpu,
            &mut encoder,
            &target,
            &camera,
            time.elapsed,
            self.painter.renderer().commands(),
        );
        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();

        if let Some(fps) = self.fps.frame(now) {
            self.window
                .set_title(&format!("{} | {fps:.0} fps | t={:.1}", self.title, time.cycle));
        }

        if self.clock.is_running() {
            self.window.request_redraw();
        }
    }

    fn handle_input(&mut self, dt: f32) {
        let input = &self.input;

        if input.key_pressed(KeyCode::Space) {
            let running = self.clock.toggle();
            log::debug!("animation {}", if running { "resumed" } else { "paused" });
        }
        if input.key_pressed(KeyCode::KeyR) {
            self.clock.reset();
        }
        match input.digit_pressed() {
            Some(0) => self.view = ViewAngles::ZERO,
            Some(digit) => {
                if let Some(preset) = ViewPreset::from_digit(digit) {
                    log::debug!("view preset {preset:?}");
                    self.view = preset.into();
                }
            }
            None => {}
        }

        let turn = key_turn(input, dt);
        let turning = turn != Vec3::ZERO;
        if turning {
            self.view.nudge(turn.x, turn.y, turn.z);
        }

        if self.drag.update(input, &mut self.view) {
            self.clock.set_running(false);
        }

        // Keep redrawing while a key is held so the turn stays smooth.
        if turning {
            self.window.request_redraw();
        }
    }
}

/// Degrees to turn the view about `(x, y, z)` for the keys held over `dt` seconds.
///
/// Up/Down tilt `x`, Left/Right turn `y`, PageUp/PageDown roll `z`.
fn key_turn(input: &Input, dt: f32) -> Vec3 {
    let step = KEY_TURN_RATE * dt.clamp(0.0, MAX_TURN_DT);
    let axis = |negative: KeyCode, positive: KeyCode| {
        (input.key_down(positive) as i8 - input.key_down(negative) as i8) as f32 * step
    };
    Vec3::new(
        axis(KeyCode::ArrowDown, KeyCode::ArrowUp),
        axis(KeyCode::ArrowLeft, KeyCode::ArrowRight),
        axis(KeyCode::PageDown, KeyCode::PageUp),
    )
}

/// Frames per second over roughly one-second intervals.
struct FpsCounter {
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: 0,
            since: Instant::now(),
        }
    }

    /// Count a frame. Returns the rate once a second has passed.
    fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let seconds = now.duration_since(self.since).as_secs_f32();
        if seconds < 1.0 {
            return None;
        }
        let fps = self.frames as f32 / seconds;
        self.frames = 0;
        self.since = now;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use winit::event::ElementState;

    #[test]
    fn config_builder() {
        let config = AppConfig::new()
            .title("Test")
            .size(640, 480)
            .textures("tex")
            .paused(true)
            .start_time(12.5);
        assert_eq!(config.title, "Test");
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.textures.as_deref(), Some(std::path::Path::new("tex")));

        let clock = config.clock();
        assert!(!clock.is_running());
        assert_eq!(clock.elapsed(), 12.5);
    }

    #[test]
    fn default_config_plays_from_zero() {
        let clock = AppConfig::default().clock();
        assert!(clock.is_running());
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn held_keys_turn_at_a_fixed_rate() {
        let mut input = Input::new();
        input.key_event(KeyCode::ArrowRight, ElementState::Pressed);
        input.key_event(KeyCode::PageDown, ElementState::Pressed);

        let turn = key_turn(&input, 0.01);
        assert!(turn.abs_diff_eq(Vec3::new(0.0, 0.9, -0.9), 1e-5));
        assert_eq!(key_turn(&Input::new(), 0.01), Vec3::ZERO);
    }

    #[test]
    fn first_press_after_idle_turns_one_frame_step() {
        let mut input = Input::new();
        input.key_event(KeyCode::ArrowLeft, ElementState::Pressed);

        // Ten seconds paused with no redraws, then a tap.
        let turn = key_turn(&input, 10.0);
        assert!((turn.y + KEY_TURN_RATE * MAX_TURN_DT).abs() < 1e-4);

        let mut view = ViewAngles::ZERO;
        view.nudge(turn.x, turn.y, turn.z);
        assert!(view.y > -5.0 && view.y < 0.0, "{view:?}");
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut input = Input::new();
        input.key_event(KeyCode::ArrowUp, ElementState::Pressed);
        input.key_event(KeyCode::ArrowDown, ElementState::Pressed);
        assert_eq!(key_turn(&input, 0.02).x, 0.0);
    }

    #[test]
    fn fps_reports_once_per_second() {
        let start = Instant::now();
        let mut fps = FpsCounter {
            frames: 0,
            since: start,
        };
        assert_eq!(fps.frame(start + Duration::from_millis(500)), None);
        let rate = fps.frame(start + Duration::from_secs(1)).unwrap();
        assert!((rate - 2.0).abs() < 1e-3);
        assert_eq!(fps.frame(start + Duration::from_millis(1500)), None);
    }
}
