//! Window creation and event handling via winit.
//!
//! [`App`] implements winit's [`ApplicationHandler`]: it owns the window,
//! the GPU context and the [`Scene`], and feeds input, panel commands and
//! timing into each frame. [`ViewerState`] holds everything that does not
//! need a GPU.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use jovian_config::Config;
use jovian_panel::{
    CommandEffect, CommandReceiver, CommandSender, PanelCommand, PanelServer, PanelSnapshot,
    SharedSnapshot, apply_command, command_channel, publish, shared_snapshot,
};
use jovian_render::{Camera, RenderContext, SurfaceError, init_render_context_blocking};
use jovian_shading::{FrameInputs, ShaderParams, randomize, seeded_rng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::error::AppError;
use crate::frame_stats::FrameStats;
use crate::input::{scroll_lines, shortcut};
use crate::orbit::OrbitControls;
use crate::scene::Scene;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Camera with the configured projection, placed by `orbit`.
pub fn initial_camera(config: &Config, orbit: &OrbitControls) -> Camera {
    let mut camera = Camera {
        fov_y: config.camera.fov_y_degrees.to_radians(),
        near: config.camera.near,
        far: config.camera.far,
        ..Default::default()
    };
    camera.set_aspect_ratio(config.window.width as f32, config.window.height as f32);
    orbit.apply(&mut camera);
    camera
}

/// Parameters, camera and panel plumbing. Owned by the render thread.
pub struct ViewerState {
    pub params: ShaderParams,
    pub camera: Camera,
    pub orbit: OrbitControls,
    pub stats: FrameStats,
    rng: ChaCha8Rng,
    commands: CommandReceiver,
    sender: CommandSender,
    snapshot: SharedSnapshot,
    mouse: [f32; 2],
    start: Instant,
}

impl ViewerState {
    pub fn new(config: &Config) -> Self {
        let mut params = ShaderParams::default();
        let mut rng = seeded_rng(config.randomize.seed);
        if config.randomize.on_start {
            let report = randomize(&mut params, &mut rng);
            info!(
                changed = report.changed,
                scheme = %report.color_scheme,
                "Randomized parameters at startup"
            );
        }

        let orbit = OrbitControls::new(&config.camera);
        let camera = initial_camera(config, &orbit);
        let (sender, commands) = command_channel();
        let snapshot = shared_snapshot(&params);

        Self {
            params,
            camera,
            orbit,
            stats: FrameStats::new(if config.debug.log_frame_stats {
                config.debug.stats_interval_secs
            } else {
                0.0
            }),
            rng,
            commands,
            sender,
            snapshot,
            mouse: [0.0, 0.0],
            start: Instant::now(),
        }
    }

    /// Sender for the panel server and keyboard shortcuts.
    pub fn command_sender(&self) -> CommandSender {
        self.sender.clone()
    }

    pub fn snapshot(&self) -> SharedSnapshot {
        Arc::clone(&self.snapshot)
    }

    pub fn uptime(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn set_mouse(&mut self, position: Vec2) {
        self.mouse = position.to_array();
        self.orbit.cursor_moved(position);
    }

    /// Apply every queued command. Returns `true` when one asked to quit.
    pub fn drain_commands(&mut self) -> bool {
        let mut quit = false;
        while let Ok(command) = self.commands.try_recv() {
            match apply_command(&mut self.params, &mut self.rng, command) {
                Ok(CommandEffect::ParamSet { param, value }) => {
                    debug!(param = param.key(), value, "Parameter set");
                }
                Ok(CommandEffect::SchemeSet(scheme)) => {
                    info!(scheme = %scheme, "Color scheme changed");
                }
                Ok(CommandEffect::Randomized(report)) => {
                    info!(
                        changed = report.changed,
                        scheme = %report.color_scheme,
                        "Parameters randomized"
                    );
                }
                Ok(CommandEffect::Quit) => quit = true,
                Err(e) => warn!("Rejected {command:?}: {e}"),
            }
        }
        quit
    }

    /// Advance the orbit and build this frame's shader inputs.
    pub fn begin_frame(&mut self, width: u32, height: u32) -> FrameInputs {
        self.orbit.update();
        self.orbit.apply(&mut self.camera);
        FrameInputs {
            time: self.uptime() as f32,
            resolution: [width as f32, height as f32],
            mouse: self.mouse,
        }
    }

    /// Record the frame time and republish the panel snapshot.
    pub fn end_frame(&mut self, dt: f64) {
        let log_due = self.stats.record(dt);
        let uptime = self.uptime();
        publish(
            &self.snapshot,
            PanelSnapshot::capture(&self.params, self.stats.timing(uptime)),
        );
        if log_due {
            info!(
                fps = self.stats.fps(),
                frame_ms = self.stats.frame_time_ms(),
                frames = self.stats.frame_count(),
                "Frame stats"
            );
        }
    }
}

/// Winit application: window, GPU and scene on top of [`ViewerState`].
pub struct App {
    config: Config,
    state: ViewerState,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    scene: Option<Scene>,
    panel: Option<PanelServer>,
    last_frame: Instant,
    fatal: Option<AppError>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let state = ViewerState::new(&config);
        Self {
            config,
            state,
            window: None,
            gpu: None,
            scene: None,
            panel: None,
            last_frame: Instant::now(),
            fatal: None,
        }
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);
        let gpu = init_render_context_blocking(window.clone(), self.config.window.vsync)?;
        let scene = Scene::new(&gpu, &self.config)?;

        let (width, height) = gpu.size();
        self.state
            .camera
            .set_aspect_ratio(width as f32, height as f32);
        info!("Window ready: {width}x{height}");

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.scene = Some(scene);
        Ok(())
    }

    fn start_panel(&mut self) {
        if !self.config.panel.enabled {
            info!("Tweak panel disabled");
            return;
        }
        let mut panel = PanelServer::new(self.config.panel.address.clone(), self.config.panel.port);
        match panel.start(self.state.snapshot(), self.state.command_sender()) {
            Ok(()) => self.panel = Some(panel),
            Err(e) => warn!("Tweak panel unavailable: {e}"),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        error!("{err}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn resize(&mut self, width: u32, height: u32) {
        let (Some(gpu), Some(scene)) = (&mut self.gpu, &mut self.scene) else {
            return;
        };
        gpu.resize(width, height);
        scene.resize(gpu);
        let (width, height) = gpu.size();
        self.state
            .camera
            .set_aspect_ratio(width as f32, height as f32);
        debug!("Resized to {width}x{height}");
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.drain_commands() {
            info!("Quit requested");
            event_loop.exit();
            return;
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        let (Some(gpu), Some(scene)) = (&self.gpu, &mut self.scene) else {
            return;
        };
        let (width, height) = gpu.size();
        let frame = self.state.begin_frame(width, height);

        let rendered = scene.render(gpu, &self.state.camera, &self.state.params, frame, dt as f32);
        if let Err(e) = check_frame(rendered) {
            self.fail(event_loop, e);
            return;
        }
        self.state.end_frame(dt);
    }
}

/// Classify a frame's surface result. A timeout only skips the frame; lost
/// surfaces and out-of-memory end the viewer.
pub fn check_frame(result: Result<(), SurfaceError>) -> Result<(), AppError> {
    match result {
        Ok(()) => Ok(()),
        Err(SurfaceError::Timeout) => {
            debug!("Surface timeout, skipping frame");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init_graphics(event_loop) {
            self.fail(event_loop, e);
            return;
        }
        self.start_panel();
        self.last_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(command) = shortcut(event.physical_key, event.state, event.repeat) {
                    send_command(&self.state, command);
                }
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self
                .state
                .orbit
                .set_dragging(state == ElementState::Pressed),
            WindowEvent::CursorMoved { position, .. } => {
                self.state
                    .set_mouse(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => self.state.orbit.zoom(scroll_lines(delta)),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(mut panel) = self.panel.take() {
            panel.stop();
        }
        info!(
            frames = self.state.stats.frame_count(),
            uptime_secs = self.state.uptime(),
            "Viewer exiting"
        );
    }
}

/// Creates an event loop and runs the viewer until the window closes.
#[instrument(skip_all)]
pub fn run(config: Config) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Queue a command on the same path the panel uses.
pub fn send_command(state: &ViewerState, command: PanelCommand) {
    let _ = state.command_sender().send(command);
}

#[cfg(test)]
mod tests {
    use super::*;
    use jovian_shading::{ColorScheme, ParamId};

    fn seeded_config(seed: u64) -> Config {
        let mut config = Config::default();
        config.randomize.seed = Some(seed);
        config
    }

    #[test]
    fn test_starts_from_defaults() {
        let state = ViewerState::new(&Config::default());
        assert_eq!(state.params, ShaderParams::default());
    }

    #[test]
    fn test_randomize_on_start_is_seeded() {
        let mut config = seeded_config(7);
        config.randomize.on_start = true;
        let a = ViewerState::new(&config);
        let b = ViewerState::new(&config);
        assert_eq!(a.params, b.params);
        assert_ne!(a.params, ShaderParams::default());
    }

    #[test]
    fn test_drain_applies_panel_commands() {
        let mut state = ViewerState::new(&seeded_config(1));
        send_command(
            &state,
            PanelCommand::SetParam {
                param: ParamId::Scale,
                value: 1.0e6,
            },
        );
        send_command(&state, PanelCommand::SetScheme(ColorScheme::ALL[2]));

        assert!(!state.drain_commands());
        let max = jovian_shading::ControlDescriptor::for_param(ParamId::Scale).max;
        assert_eq!(state.params.get(ParamId::Scale), max);
        assert_eq!(state.params.color_scheme(), ColorScheme::ALL[2]);
    }

    #[test]
    fn test_drain_reports_quit() {
        let mut state = ViewerState::new(&Config::default());
        send_command(&state, PanelCommand::NextScheme);
        send_command(&state, PanelCommand::Quit);
        assert!(state.drain_commands());
        assert_eq!(state.params.color_scheme(), ColorScheme::default().next());
    }

    #[test]
    fn test_rejected_command_keeps_value() {
        let mut state = ViewerState::new(&Config::default());
        send_command(
            &state,
            PanelCommand::SetParam {
                param: ParamId::Hue,
                value: f32::NAN,
            },
        );
        assert!(!state.drain_commands());
        assert_eq!(
            state.params.get(ParamId::Hue),
            ParamId::Hue.default_value()
        );
    }

    #[test]
    fn test_end_frame_publishes_snapshot() {
        let mut state = ViewerState::new(&Config::default());
        state.params.set(ParamId::Scale, 3.5);
        state.end_frame(0.016);

        let snapshot = state.snapshot();
        let published = snapshot.lock().unwrap();
        assert_eq!(published.params["scale"], 3.5);
        assert_eq!(published.timing.frame_count, 1);
    }

    #[test]
    fn test_begin_frame_inputs() {
        let mut state = ViewerState::new(&Config::default());
        state.set_mouse(Vec2::new(12.0, 34.0));
        let frame = state.begin_frame(800, 600);
        assert_eq!(frame.resolution, [800.0, 600.0]);
        assert_eq!(frame.mouse, [12.0, 34.0]);
        assert!(frame.time >= 0.0);
    }

    #[test]
    fn test_timeout_skips_frame() {
        assert!(check_frame(Ok(())).is_ok());
        assert!(check_frame(Err(SurfaceError::Timeout)).is_ok());
    }

    #[test]
    fn test_lost_surface_is_fatal() {
        for err in [SurfaceError::Lost, SurfaceError::OutOfMemory] {
            match check_frame(Err(err)) {
                Err(AppError::Surface(inner)) => assert_eq!(inner, err),
                other => panic!("expected fatal surface error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_initial_camera_uses_config() {
        let config = Config::default();
        let orbit = OrbitControls::new(&config.camera);
        let camera = initial_camera(&config, &orbit);
        assert!((camera.fov_y - config.camera.fov_y_degrees.to_radians()).abs() < 1e-6);
        assert_eq!(camera.position, orbit.eye());
    }
}
