//! Molecules
//!
//! Animated 2D molecules bouncing inside a canvas under a simplified
//! Van der Waals style pair force.

use anyhow::{Context, Result};
use molecule_renderer::{draw_molecules, molecule_color, Canvas, MoleculeRenderer};
use molecule_simulation::{
    FrameScheduler, FrameStatus, ParticleSystem, SimulationConfig, StopHandle,
};
use std::collections::VecDeque;
use std::env::VarError;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

/// Environment variable holding an optional u64 spawn seed
const SEED_VAR: &str = "MOLECULES_SEED";

fn load_config() -> Result<SimulationConfig> {
    let config = SimulationConfig::default();

    match parse_seed(std::env::var(SEED_VAR))? {
        Some(seed) => {
            log::info!("Using seed {} from {}", seed, SEED_VAR);
            Ok(config.with_seed(seed))
        }
        None => Ok(config),
    }
}

/// Only an unset variable means "no seed"; anything else must parse.
fn parse_seed(var: Result<String, VarError>) -> Result<Option<u64>> {
    let raw = match var {
        Ok(raw) => raw,
        Err(VarError::NotPresent) => return Ok(None),
        Err(e @ VarError::NotUnicode(_)) => {
            return Err(e).with_context(|| format!("failed to read {SEED_VAR}"));
        }
    };

    let seed = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("{SEED_VAR} must be an unsigned integer, got {raw:?}"))?;
    Ok(Some(seed))
}

/// The simulation bounds follow the drawing surface.
fn fit_to_canvas<C: Canvas + ?Sized>(config: SimulationConfig, canvas: &C) -> SimulationConfig {
    let (width, height) = canvas.size();
    config.with_canvas(width, height)
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    system: ParticleSystem,
    scheduler: FrameScheduler,
    renderer: MoleculeRenderer,

    frame_times: VecDeque<f32>,
    last_frame_time: Instant,
}

impl GpuState {
    async fn new(window: Arc<Window>, sim_config: SimulationConfig) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible GPU adapter")?;

        log::info!("✓ Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to open GPU device")?;

        // Configure surface
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        // Vsync paces the animation at the display refresh rate
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer =
            MoleculeRenderer::new(&device, config.format, sim_config.width, sim_config.height);
        log::info!("✓ Renderer initialized");

        let system = ParticleSystem::new(fit_to_canvas(sim_config, &renderer))?;

        Ok(Self {
            surface,
            device,
            queue,
            config,
            system,
            scheduler: FrameScheduler::new(),
            renderer,
            frame_times: VecDeque::with_capacity(100),
            last_frame_time: Instant::now(),
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn stop_handle(&self) -> StopHandle {
        self.scheduler.stop_handle()
    }

    /// Tick once, draw once. Returns the averaged FPS, or `None` once the
    /// scheduler has been stopped.
    fn render(&mut self) -> Result<Option<f32>, wgpu::SurfaceError> {
        let now = Instant::now();
        let frame_time = (now - self.last_frame_time).as_secs_f32() * 1000.0;
        self.last_frame_time = now;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > 100 {
            self.frame_times.pop_front();
        }
        let avg_frame_time = self.frame_times.iter().sum::<f32>() / self.frame_times.len() as f32;

        let Self {
            surface,
            device,
            queue,
            system,
            scheduler,
            renderer,
            ..
        } = self;

        // A surface that cannot be acquired skips the frame without ticking
        let status = scheduler.frame_with_target(
            system,
            || surface.get_current_texture(),
            ParticleSystem::tick,
            |system, output| {
                let view = output
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());

                draw_molecules(&mut *renderer, system.molecules(), molecule_color());
                renderer.render(device, queue, &view);

                output.present();
                Ok(())
            },
        )?;

        if status == FrameStatus::Stopped {
            return Ok(None);
        }

        if scheduler.frames() % 600 == 0 {
            log::debug!(
                "tick {}: kinetic energy {:.3}",
                system.ticks(),
                system.kinetic_energy()
            );
        }

        Ok(Some(1000.0 / avg_frame_time))
    }
}

struct App {
    sim_config: SimulationConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    stop: Option<StopHandle>,
}

impl App {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Molecules")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.sim_config.width,
                self.sim_config.height,
            ))
            .with_resizable(false);

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );

        let gpu_state = pollster::block_on(GpuState::new(window.clone(), self.sim_config.clone()))?;

        self.stop = Some(gpu_state.stop_handle());
        self.gpu_state = Some(gpu_state);
        self.window = Some(window);
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                log::error!("Startup failed: {e:#}");
                event_loop.exit();
                return;
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(stop) = &self.stop {
                    stop.stop();
                }
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::RedrawRequested => {
                let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
                    return;
                };

                match gpu_state.render() {
                    Ok(Some(fps)) => {
                        window.set_title(&format!(
                            "Molecules - {:.0} FPS - {} molecules",
                            fps,
                            gpu_state.system.len()
                        ));
                        window.request_redraw();
                    }
                    Ok(None) => event_loop.exit(),
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        gpu_state.resize(window.inner_size());
                        window.request_redraw();
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Surface out of memory, exiting");
                        event_loop.exit();
                    }
                    Err(e) => {
                        log::warn!("Render error: {:?}", e);
                        window.request_redraw();
                    }
                }
            }

            _ => {}
        }
    }
}

fn main() -> Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting molecule animation...");

    let sim_config = load_config()?;
    sim_config.validate()?;

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App {
        sim_config,
        window: None,
        gpu_state: None,
        stop: None,
    };

    event_loop.run_app(&mut app)?;
    Ok(())
}
