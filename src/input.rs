//! Translating window input into velocity-field stimuli.
//!
//! The adapter never touches the current velocity. Pointer and touch drags
//! add to the drift target, scroll ticks raise the depth-rate target for a
//! short burst, and resizes update the surface size. The simulator smooths
//! everything else.
//!
//! # Usage
//!
//! ```ignore
//! let mut input = InputAdapter::from_config(&config, window.scale_factor() as f32);
//! // in window_event:
//! match input.handle_event(&event, sim.velocity_mut(), Instant::now()) {
//!     InputOutcome::Resized(size) => gpu.resize(size),
//!     _ => {}
//! }
//! // once per loop iteration:
//! input.poll_timers(sim.velocity_mut(), Instant::now());
//! ```

use std::time::{Duration, Instant};

use glam::Vec2;
use winit::event::{Touch, TouchPhase, WindowEvent};

use crate::config::StarfieldConfig;
use crate::time::Debounce;
use crate::velocity::VelocityField;

/// What kind of pointer produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerKind {
    /// Mouse steering is inverted: the view turns toward the cursor.
    #[default]
    Mouse,
    /// Touch drags the field along with the finger.
    Touch,
}

impl PointerKind {
    #[inline]
    fn sign(self) -> f32 {
        match self {
            PointerKind::Mouse => -1.0,
            PointerKind::Touch => 1.0,
        }
    }
}

/// What an event did, for the host to react to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputOutcome {
    /// Not an input the starfield consumes.
    Ignored,
    /// Pointer position recorded, drift target possibly nudged.
    Steered,
    /// Pointer state cleared.
    Released,
    /// Scroll burst started or extended.
    Burst,
    /// Surface is now this many device pixels.
    Resized(Vec2),
    /// Device pixel ratio changed.
    Rescaled(f32),
}

/// Turns pointer, touch, scroll and resize events into velocity targets.
#[derive(Debug)]
pub struct InputAdapter {
    /// Last pointer position in logical pixels.
    pointer: Option<Vec2>,
    kind: PointerKind,
    /// The touch that drives the pointer while several fingers are down.
    active_touch: Option<u64>,
    pixel_ratio: f32,
    pointer_divisor: f32,
    base_z: f32,
    burst_factor: f32,
    scroll_quiet: Debounce,
    surface_size: Vec2,
}

impl InputAdapter {
    pub fn new(
        base_z: f32,
        burst_factor: f32,
        scroll_quiet: Duration,
        pointer_divisor: f32,
        pixel_ratio: f32,
    ) -> Self {
        Self {
            pointer: None,
            kind: PointerKind::Mouse,
            active_touch: None,
            pixel_ratio,
            pointer_divisor,
            base_z,
            burst_factor,
            scroll_quiet: Debounce::new(scroll_quiet),
            surface_size: Vec2::ZERO,
        }
    }

    pub fn from_config(config: &StarfieldConfig, pixel_ratio: f32) -> Self {
        Self::new(
            config.base_depth_rate,
            config.scroll_burst_factor,
            config.scroll_quiet(),
            config.pointer_divisor,
            pixel_ratio,
        )
    }

    // ========== Stimuli ==========

    /// Record a pointer position in logical pixels and steer by the delta
    /// from the previous one.
    pub fn pointer_moved(&mut self, velocity: &mut VelocityField, kind: PointerKind, x: f32, y: f32) {
        self.kind = kind;
        let p = Vec2::new(x, y);
        if let Some(last) = self.pointer {
            let scale = kind.sign() / (self.pointer_divisor * self.pixel_ratio);
            velocity.push((p - last) * scale);
        }
        self.pointer = Some(p);
    }

    /// Forget the pointer so the next move only sets a new baseline.
    pub fn pointer_left(&mut self) {
        self.pointer = None;
        self.active_touch = None;
    }

    /// Start or extend a depth burst.
    pub fn scrolled(&mut self, velocity: &mut VelocityField, now: Instant) {
        velocity.target_z = self.base_z * self.burst_factor;
        self.scroll_quiet.schedule(now);
    }

    /// End the burst once the scroll has been quiet long enough.
    ///
    /// Returns `true` when the burst ended on this call.
    pub fn poll_timers(&mut self, velocity: &mut VelocityField, now: Instant) -> bool {
        if self.scroll_quiet.poll(now) {
            velocity.target_z = self.base_z;
            log::debug!("scroll burst ended");
            true
        } else {
            false
        }
    }

    /// Drop any pending burst reset. Used on teardown.
    pub fn cancel_timers(&mut self) {
        self.scroll_quiet.cancel();
    }

    /// Next instant the host must wake up for, if a timer is armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scroll_quiet.deadline()
    }

    /// Recompute the surface size in device pixels from a logical size.
    ///
    /// Stars are left where they are; any now outside the new bounds get
    /// recycled by the next step. An empty size (a minimized window) keeps
    /// the previous surface so stars are not all recycled into the origin.
    pub fn resize(&mut self, logical_width: f32, logical_height: f32, pixel_ratio: f32) -> Vec2 {
        if !(logical_width > 0.0 && logical_height > 0.0) {
            return self.surface_size;
        }
        self.pixel_ratio = pixel_ratio;
        self.surface_size = Vec2::new(logical_width, logical_height) * pixel_ratio;
        self.surface_size
    }

    /// Adopt a new device pixel ratio. The matching resize follows from the
    /// host with the new physical size.
    pub fn rescale(&mut self, pixel_ratio: f32) -> InputOutcome {
        if !(pixel_ratio > 0.0) {
            return InputOutcome::Ignored;
        }
        self.pixel_ratio = pixel_ratio;
        InputOutcome::Rescaled(pixel_ratio)
    }

    // ========== Queries ==========

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn pointer_kind(&self) -> PointerKind {
        self.kind
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn surface_size(&self) -> Vec2 {
        self.surface_size
    }

    pub fn is_bursting(&self) -> bool {
        self.scroll_quiet.is_armed()
    }

    // ========== Window events ==========

    /// Process a winit window event.
    pub fn handle_event(
        &mut self,
        event: &WindowEvent,
        velocity: &mut VelocityField,
        now: Instant,
    ) -> InputOutcome {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let p = self.to_logical(position.x, position.y);
                self.pointer_moved(velocity, PointerKind::Mouse, p.x, p.y);
                InputOutcome::Steered
            }

            WindowEvent::CursorLeft { .. } => {
                self.pointer_left();
                InputOutcome::Released
            }

            WindowEvent::Touch(touch) => self.handle_touch(touch, velocity),

            WindowEvent::MouseWheel { .. } => {
                self.scrolled(velocity, now);
                InputOutcome::Burst
            }

            WindowEvent::Resized(size) if size.width == 0 || size.height == 0 => {
                log::debug!("ignoring empty resize");
                InputOutcome::Ignored
            }

            WindowEvent::Resized(size) => {
                let ratio = self.pixel_ratio;
                let logical = Vec2::new(size.width as f32, size.height as f32) / ratio;
                let device = self.resize(logical.x, logical.y, ratio);
                log::debug!("surface resized to {}x{}", device.x, device.y);
                InputOutcome::Resized(device)
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.rescale(*scale_factor as f32)
            }

            _ => InputOutcome::Ignored,
        }
    }

    fn handle_touch(&mut self, touch: &Touch, velocity: &mut VelocityField) -> InputOutcome {
        let p = self.to_logical(touch.location.x, touch.location.y);
        match touch.phase {
            TouchPhase::Started => {
                if self.active_touch.is_some() {
                    return InputOutcome::Ignored;
                }
                self.active_touch = Some(touch.id);
                self.pointer = None;
                self.pointer_moved(velocity, PointerKind::Touch, p.x, p.y);
                InputOutcome::Steered
            }
            TouchPhase::Moved => {
                if self.active_touch != Some(touch.id) {
                    return InputOutcome::Ignored;
                }
                self.pointer_moved(velocity, PointerKind::Touch, p.x, p.y);
                InputOutcome::Steered
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if self.active_touch != Some(touch.id) {
                    return InputOutcome::Ignored;
                }
                self.pointer_left();
                InputOutcome::Released
            }
        }
    }

    fn to_logical(&self, x: f64, y: f64) -> Vec2 {
        Vec2::new(x as f32, y as f32) / self.pixel_ratio
    }
}
