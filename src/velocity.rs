//! The shared drift/depth velocity that every star follows.
//!
//! Input never writes the current velocity directly. It moves targets
//! (`target` for drift, `target_z` for depth rate) and [`VelocityField::integrate`]
//! chases them once per step, so motion stays smooth however bursty the
//! input is.

use glam::Vec2;

/// Smoothing constants for [`VelocityField::integrate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    /// Multiplier applied to the drift target each step.
    pub target_decay: f32,
    /// Fraction of the gap to the drift target closed each step.
    pub drift: f32,
    /// Fraction of the gap to the depth-rate target closed each step.
    pub depth: f32,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            target_decay: 0.96,
            drift: 0.8,
            depth: 0.1,
        }
    }
}

/// Drift velocity plus depth-growth rate, shared by all stars.
///
/// `z` stays strictly positive as long as `target_z` does, since each step
/// moves it a fraction in `(0, 1]` of the way toward a positive target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityField {
    /// Current smoothed drift, pixels per step at depth 1.
    pub drift: Vec2,
    /// Drift target, decays toward zero.
    pub target: Vec2,
    /// Current depth-growth rate.
    pub z: f32,
    /// Depth-growth target.
    pub target_z: f32,
}

impl VelocityField {
    /// A field at rest with the given baseline depth rate.
    pub fn new(base_z: f32) -> Self {
        Self {
            drift: Vec2::ZERO,
            target: Vec2::ZERO,
            z: base_z,
            target_z: base_z,
        }
    }

    /// Add a pointer impulse to the drift target.
    #[inline]
    pub fn push(&mut self, impulse: Vec2) {
        self.target += impulse;
    }

    /// Advance targets and current values by one step.
    pub fn integrate(&mut self, smoothing: &Smoothing) {
        self.target *= smoothing.target_decay;
        self.drift += (self.target - self.drift) * smoothing.drift;
        self.z += (self.target_z - self.z) * smoothing.depth;
    }
}
