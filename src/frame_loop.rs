//! The per-frame driver: one simulation step and one draw per display refresh.
//!
//! [`Animation`] does not own a clock or a window. The host supplies a
//! [`FrameScheduler`] (in the binary, the winit window's redraw request) and
//! calls [`Animation::tick`] when the requested frame arrives. Each tick
//! re-arms the next frame, so the loop keeps going until [`Animation::teardown`].

use std::time::Instant;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;
use winit::event::WindowEvent;

use crate::config::StarfieldConfig;
use crate::error::Result;
use crate::input::{InputAdapter, InputOutcome, PointerKind};
use crate::particle::star_count;
use crate::renderer::Renderer;
use crate::simulator::Simulator;
use crate::surface::Surface;
use crate::time::FrameStats;

/// Identifies one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host primitive that calls back once per display refresh.
pub trait FrameScheduler {
    /// Ask for one callback on the next refresh.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request that has not fired yet.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Built but not started.
    Idle,
    Running,
    /// Torn down. Ticks and events are ignored from here on.
    Detached,
}

/// A running starfield: simulator, renderer and input, driven by a scheduler.
pub struct Animation<S: FrameScheduler, R: Rng = SmallRng> {
    simulator: Simulator<R>,
    renderer: Renderer<R>,
    input: InputAdapter,
    scheduler: S,
    pending: Option<FrameHandle>,
    state: LoopState,
    stats: Option<FrameStats>,
}

impl<S: FrameScheduler> Animation<S, SmallRng> {
    /// Build from config for a viewport of `logical_size` at `pixel_ratio`.
    ///
    /// Fails if the config does not validate.
    pub fn new(
        config: &StarfieldConfig,
        logical_size: Vec2,
        pixel_ratio: f32,
        scheduler: S,
    ) -> Result<Self> {
        let mut input = InputAdapter::from_config(config, pixel_ratio);
        let size = input.resize(logical_size.x, logical_size.y, pixel_ratio);
        let count = star_count(logical_size.x, logical_size.y, config.density_divisor);
        let simulator = Simulator::from_config(config, count, size.x, size.y)?;
        let renderer = Renderer::from_config(config, pixel_ratio);
        log::info!(
            "starfield: {} stars on {}x{} device pixels",
            count,
            size.x,
            size.y
        );
        Ok(Self::with_parts(simulator, renderer, input, scheduler))
    }
}

impl<S: FrameScheduler, R: Rng> Animation<S, R> {
    /// Assemble from pre-built parts. The input adapter's surface size is
    /// the size stepped against.
    pub fn with_parts(
        simulator: Simulator<R>,
        renderer: Renderer<R>,
        input: InputAdapter,
        scheduler: S,
    ) -> Self {
        Self {
            simulator,
            renderer,
            input,
            scheduler,
            pending: None,
            state: LoopState::Idle,
            stats: None,
        }
    }

    /// Start the loop by requesting the first frame.
    pub fn run(&mut self) {
        if self.state != LoopState::Idle {
            return;
        }
        self.state = LoopState::Running;
        self.pending = Some(self.scheduler.request_frame());
    }

    /// Perform one frame if one is pending, then request the next.
    ///
    /// Returns `false` without doing anything when the loop is not running
    /// or no frame was requested.
    pub fn tick<T: Surface + ?Sized>(&mut self, surface: &mut T, now: Instant) -> bool {
        if self.state != LoopState::Running || self.pending.take().is_none() {
            return false;
        }

        self.input.poll_timers(self.simulator.velocity_mut(), now);

        let size = self.input.surface_size();
        self.simulator.step(size.x, size.y);
        self.renderer
            .draw(surface, self.simulator.stars(), self.simulator.velocity());

        let stats = self.stats.get_or_insert_with(|| FrameStats::new(now));
        if let Some(fps) = stats.record(now) {
            log::debug!("frame {}: {:.1} fps", stats.frame(), fps);
        }

        self.pending = Some(self.scheduler.request_frame());
        true
    }

    /// Cancel the pending frame and the scroll timer and stop reacting to
    /// input. Calling it again does nothing.
    pub fn teardown(&mut self) {
        if self.state == LoopState::Detached {
            return;
        }
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.input.cancel_timers();
        self.state = LoopState::Detached;
        log::info!("starfield torn down");
    }

    // ========== Input forwarding ==========

    /// Route a window event to the input adapter.
    pub fn handle_event(&mut self, event: &WindowEvent, now: Instant) -> InputOutcome {
        if self.state == LoopState::Detached {
            return InputOutcome::Ignored;
        }
        let outcome = self
            .input
            .handle_event(event, self.simulator.velocity_mut(), now);
        match outcome {
            InputOutcome::Rescaled(ratio) => self.renderer.set_pixel_ratio(ratio),
            InputOutcome::Burst => log::trace!("scroll burst"),
            _ => {}
        }
        outcome
    }

    pub fn pointer_moved(&mut self, kind: PointerKind, x: f32, y: f32) {
        if self.state != LoopState::Detached {
            self.input
                .pointer_moved(self.simulator.velocity_mut(), kind, x, y);
        }
    }

    pub fn pointer_left(&mut self) {
        if self.state != LoopState::Detached {
            self.input.pointer_left();
        }
    }

    pub fn scrolled(&mut self, now: Instant) {
        if self.state != LoopState::Detached {
            self.input.scrolled(self.simulator.velocity_mut(), now);
        }
    }

    /// Resize to a logical size at a pixel ratio. Returns the device size.
    pub fn resize(&mut self, logical_width: f32, logical_height: f32, pixel_ratio: f32) -> Vec2 {
        self.renderer.set_pixel_ratio(pixel_ratio);
        self.input.resize(logical_width, logical_height, pixel_ratio)
    }

    /// Adopt a new device pixel ratio for input scaling and stroke widths.
    pub fn rescale(&mut self, pixel_ratio: f32) -> InputOutcome {
        let outcome = self.input.rescale(pixel_ratio);
        if let InputOutcome::Rescaled(ratio) = outcome {
            self.renderer.set_pixel_ratio(ratio);
        }
        outcome
    }

    /// Fire the scroll timer if due. Hosts call this between frames.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        self.state != LoopState::Detached
            && self.input.poll_timers(self.simulator.velocity_mut(), now)
    }

    /// When the host must wake up next for a timer.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.state {
            LoopState::Detached => None,
            _ => self.input.next_deadline(),
        }
    }

    // ========== Accessors ==========

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn simulator(&self) -> &Simulator<R> {
        &self.simulator
    }

    pub fn renderer(&self) -> &Renderer<R> {
        &self.renderer
    }

    pub fn input(&self) -> &InputAdapter {
        &self.input
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn surface_size(&self) -> Vec2 {
        self.input.surface_size()
    }
}

impl<S: FrameScheduler, R: Rng> Drop for Animation<S, R> {
    fn drop(&mut self) {
        self.teardown();
    }
}
