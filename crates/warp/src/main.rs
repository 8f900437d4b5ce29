//! ZeroPrompt Warp: an endless field of procedurally generated prompts.

mod config;
mod events;
mod hud;
mod recovery;

use anyhow::{Context, Result};
use engine_core::Time;
use field::Session;
use input::{InputState, KeyBindings};
use procgen::{format_count, Profile, Variant};
use renderer::HeadlessBackend;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use config::WarpConfig;

/// Seconds between window-title refreshes.
const TITLE_INTERVAL: f32 = 0.25;

/// Vocabulary for this run: the configured file, or the embedded profile for the variant.
fn load_profile(config: &WarpConfig) -> Result<Arc<Profile>> {
    let profile = match &config.profile_path {
        Some(path) => Profile::load(path).with_context(|| format!("loading profile {}", path.display()))?,
        None => match config.field.variant {
            Variant::Elastic => Profile::builtin().context("embedded default profile")?,
            Variant::Classic => Profile::classic().context("embedded classic profile")?,
        },
    };
    let stats = profile.stats();
    log::info!(
        "Profile {:?}: {} templates, {} pools, {} combinations",
        stats.name,
        stats.templates,
        stats.pools,
        format_count(stats.combinations)
    );
    Ok(Arc::new(profile))
}

/// Everything alive while the window is open.
pub(crate) struct WarpHost {
    window: Arc<Window>,
    config: WarpConfig,
    session: Session<HeadlessBackend>,
    input: InputState,
    bindings: KeyBindings,
    time: Time,
    show_hud: bool,
    running: bool,
    since_title: f32,
}

impl WarpHost {
    fn new(window: Arc<Window>, config: WarpConfig) -> Result<Self> {
        let profile = load_profile(&config)?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let mut session = Session::new(HeadlessBackend::new(), &config.field, profile, seed);
        let size = window.inner_size();
        session.set_aspect(size.width, size.height);
        session.start().context("starting the warp field")?;

        let mut host = Self {
            window,
            show_hud: config.show_hud,
            config,
            session,
            input: InputState::new(),
            bindings: KeyBindings::default(),
            time: Time::new(),
            running: true,
            since_title: 0.0,
        };
        host.refresh_title();
        Ok(host)
    }

    /// One display refresh: apply input, advance the field, update the title.
    fn frame(&mut self) {
        self.time.update();
        self.apply_actions();
        if !self.running {
            return;
        }

        let dt = self
            .config
            .frame_rate_independent
            .then(|| self.time.delta_seconds());
        if let Err(e) = self.session.tick(dt) {
            self.running = recovery::keep_running_after(&mut self.session, e);
            self.window.request_redraw();
            return;
        }
        if let Some(e) = self.session.take_error() {
            log::warn!("Field fault: {}", e);
        }

        self.since_title += self.time.delta_seconds();
        if self.since_title >= TITLE_INTERVAL {
            self.refresh_title();
        }
        self.window.request_redraw();
    }

    fn refresh_title(&mut self) {
        self.since_title = 0.0;
        let stats = self.session.stats();
        let title = hud::window_title(&self.config.title, stats.as_ref(), self.time.fps(), self.show_hud);
        self.window.set_title(&title);
    }

    fn shutdown(&mut self) {
        let backend = self.session.backend();
        log::debug!(
            "Shutting down after {} frames in {:.1}s: {} surfaces created, {} released, {} frames submitted",
            self.time.frame_count(),
            self.time.elapsed_seconds(),
            backend.surfaces_created(),
            backend.surfaces_released(),
            backend.frames()
        );
        self.session.shutdown();
    }
}

/// Application handler for winit.
struct App {
    host: Option<WarpHost>,
}

impl App {
    fn new() -> Self {
        Self { host: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.host.is_none() {
            let config = WarpConfig::load();
            if !WarpConfig::file_exists() {
                config.save();
            }
            let window_attrs = Window::default_attributes()
                .with_title(config.title.clone())
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match WarpHost::new(window.clone(), config) {
                Ok(host) => {
                    self.host = Some(host);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize warp field: {:#}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(host) = &mut self.host {
            if host.handle_window_event(event) || !host.running {
                host.shutdown();
                event_loop.exit();
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(host) = &self.host {
            host.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("ZeroPrompt Warp");
    println!("  1 - Slower    2 - Reset speed    3 - Faster    5 - Reverse");
    println!("  S - New seed  H - Toggle HUD     Esc - Quit");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}
