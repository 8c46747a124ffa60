//! Native window host: winit event loop, redraw scheduling and GPU presentation.

use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::StarfieldConfig;
use crate::error::{Result, StarwarpError};
use crate::frame_loop::{Animation, FrameHandle, FrameScheduler};
use crate::gpu::GpuState;
use crate::input::InputOutcome;
use crate::surface::LineBatch;

/// Frame scheduling through the window's redraw requests.
///
/// A redraw request cannot be withdrawn once made, so cancelling is a no-op
/// here; [`Animation::tick`] ignores redraws it did not ask for.
pub struct WindowScheduler {
    window: Arc<Window>,
    next_id: u64,
}

impl WindowScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window, next_id: 0 }
    }
}

impl FrameScheduler for WindowScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next_id += 1;
        self.window.request_redraw();
        FrameHandle(self.next_id)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        log::trace!("dropping redraw {:?}", handle);
    }
}

struct App {
    config: StarfieldConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    animation: Option<Animation<WindowScheduler>>,
    batch: LineBatch,
    error: Option<StarwarpError>,
}

impl App {
    fn new(config: StarfieldConfig) -> Self {
        Self {
            config,
            window: None,
            gpu_state: None,
            animation: None,
            batch: LineBatch::default(),
            error: None,
        }
    }

    fn start_animation(&mut self, window: Arc<Window>) -> Result<()> {
        let gpu_state = match pollster::block_on(GpuState::new(window.clone())) {
            Ok(state) => state,
            Err(e) => {
                // No drawing surface: leave the window up without animation.
                log::warn!("rendering disabled: {}", e);
                return Ok(());
            }
        };

        let pixel_ratio = window.scale_factor() as f32;
        let logical = window.inner_size().to_logical::<f32>(window.scale_factor());
        let mut animation = Animation::new(
            &self.config,
            Vec2::new(logical.width, logical.height),
            pixel_ratio,
            WindowScheduler::new(window),
        )?;
        let size = animation.surface_size();
        self.batch.resize(size.x, size.y);
        animation.run();

        self.gpu_state = Some(gpu_state);
        self.animation = Some(animation);
        Ok(())
    }

    fn teardown(&mut self) {
        if let Some(animation) = &mut self.animation {
            animation.teardown();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let [width, height] = self.config.window_size;
        let window_attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.error = Some(e.into());
                event_loop.exit();
                return;
            }
        };
        log::info!("window created ({}x{} logical)", width, height);

        self.window = Some(window.clone());
        if let Err(e) = self.start_animation(window) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let now = Instant::now();
        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                let (Some(animation), Some(gpu_state)) = (&mut self.animation, &mut self.gpu_state)
                else {
                    return;
                };
                if !animation.tick(&mut self.batch, now) {
                    return;
                }
                match gpu_state.render(self.batch.instances()) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                        gpu_state.resize(winit::dpi::PhysicalSize {
                            width: gpu_state.config.width,
                            height: gpu_state.config.height,
                        })
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("GPU out of memory, exiting");
                        animation.teardown();
                        event_loop.exit();
                    }
                    Err(e) => log::warn!("render error: {:?}", e),
                }
            }
            event => {
                let Some(animation) = &mut self.animation else {
                    return;
                };
                if let InputOutcome::Resized(size) = animation.handle_event(&event, now) {
                    self.batch.resize(size.x, size.y);
                    if let (WindowEvent::Resized(physical), Some(gpu_state)) =
                        (&event, &mut self.gpu_state)
                    {
                        gpu_state.resize(*physical);
                    }
                }
            }
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(animation) = &mut self.animation else {
            event_loop.set_control_flow(ControlFlow::Wait);
            return;
        };
        animation.poll_timers(Instant::now());
        match animation.next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

/// Open a window and run the starfield until it is closed.
pub fn run(config: StarfieldConfig) -> Result<()> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
