use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::audio::{AudioDevice, CpalDevice, NullDevice};
use crate::core::{AppControl, DriverConfig, EventQueue, FrameDriver, FrameStats, Game, PlatformEvent};
use crate::device::{Gpu, GpuInit};
use crate::render::GpuPresenter;
use crate::time::SystemTicks;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub gpu: GpuInit,
    pub driver: DriverConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "gfs".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            gpu: GpuInit::default(),
            driver: DriverConfig::default(),
        }
    }
}

type WindowedDriver<G> = FrameDriver<G, Box<dyn AudioDevice>, SystemTicks>;

/// Entry point for the windowed platform loop.
pub struct Runtime;

impl Runtime {
    /// Opens the audio device and a window, then runs `game` once per redraw
    /// until the window closes or Escape is pressed.
    pub fn run<G>(config: RuntimeConfig, game: G) -> Result<FrameStats>
    where
        G: Game,
    {
        let device = open_audio(&config.driver);
        let driver = FrameDriver::new(config.driver.clone(), game, device, SystemTicks::new())
            .context("failed to start the frame driver")?;

        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, driver);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(state.driver.shutdown())
    }
}

/// The default output device, or a [`NullDevice`] when none opens.
fn open_audio(config: &DriverConfig) -> Box<dyn AudioDevice> {
    match CpalDevice::open(&config.audio) {
        Ok(device) => Box::new(device),
        Err(e) => {
            log::warn!("{e}; continuing without sound");
            let format = config.audio.requested_format();
            Box::new(NullDevice::new(format, config.audio.capacity_bytes(format)))
        }
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    presenter: GpuPresenter<'this>,
}

struct AppState<G>
where
    G: Game,
{
    config: RuntimeConfig,
    driver: WindowedDriver<G>,
    events: EventQueue,

    window: Option<WindowEntry>,
    exit_requested: bool,
}

impl<G> AppState<G>
where
    G: Game,
{
    fn new(config: RuntimeConfig, driver: WindowedDriver<G>) -> Self {
        Self {
            config,
            driver,
            events: EventQueue::new(),
            window: None,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.config.gpu.clone();

        let entry = WindowEntryTryBuilder {
            window,
            presenter_builder: |w| {
                pollster::block_on(Gpu::new(w, gpu_init)).map(GpuPresenter::new)
            },
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        self.window = Some(entry);
        Ok(id)
    }
}

impl<G> ApplicationHandler for AppState<G>
where
    G: Game,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create window: {e:#}");
            self.request_exit();
            event_loop.exit();
            return;
        }

        // Audio and the frame clock start only now that the window is up.
        self.driver.begin();

        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        // Continuous redraw; FIFO presentation paces the loop.
        event_loop.set_control_flow(ControlFlow::Wait);
        if let Some(entry) = &self.window {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if let Some(ev) = translate_event(&event) {
            self.events.push(ev);
        }

        match &event {
            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.window.as_mut() {
                    entry.with_presenter_mut(|p| p.resize(*new_size));
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.window.as_mut() {
                    let new_size = entry.with_window(|w| w.inner_size());
                    entry.with_presenter_mut(|p| p.resize(new_size));
                    self.events.push(PlatformEvent::Resize {
                        width: new_size.width,
                        height: new_size.height,
                    });
                }
            }

            WindowEvent::CloseRequested => {
                // The stop frame still runs; exit follows from its report.
                if let Some(entry) = &self.window {
                    entry.with_window(|w| w.request_redraw());
                }
            }

            WindowEvent::RedrawRequested => {
                // Split borrows to avoid `self` capture inside `ouroboros` closures.
                let (driver, events) = (&mut self.driver, &mut self.events);
                let Some(entry) = self.window.as_mut() else {
                    return;
                };

                let report = entry.with_presenter_mut(|p| driver.step(events, p));
                if report.control == AppControl::Exit {
                    self.request_exit();
                }
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.driver.shutdown();
        // Presenter goes before the window it borrows.
        self.window = None;
    }
}

/// Maps the window events the frame loop cares about.
fn translate_event(event: &WindowEvent) -> Option<PlatformEvent> {
    match event {
        WindowEvent::Resized(size) => Some(PlatformEvent::Resize {
            width: size.width,
            height: size.height,
        }),
        WindowEvent::CloseRequested => Some(PlatformEvent::Stop),
        WindowEvent::KeyboardInput { event, .. }
            if event.state == ElementState::Pressed
                && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
        {
            Some(PlatformEvent::Stop)
        }
        _ => None,
    }
}
