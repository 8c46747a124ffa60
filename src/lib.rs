//! # starwarp
//!
//! An interactive warp-speed starfield. Stars stream outward from a vanishing
//! point, the whole field steers with inertia when you drag the pointer, and
//! every scroll tick kicks off a short burst of acceleration.
//!
//! ## Quick Start
//!
//! ```ignore
//! use starwarp::prelude::*;
//!
//! fn main() -> starwarp::Result<()> {
//!     starwarp::run(StarfieldConfig::default().with_title("warp"))
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Velocity field
//!
//! All stars share one [`VelocityField`]: a 2D drift and a depth-growth rate.
//! Input only ever moves the field's targets; the [`Simulator`] chases them
//! with exponential smoothing every step, so drags coast to a stop and
//! scroll bursts ease in and out.
//!
//! ### Stars and recycling
//!
//! Each [`Star`] drifts by the shared velocity scaled by its own depth, is
//! pushed away from the surface center in proportion to the depth rate, and
//! grows deeper every step. A star leaving the surface (plus an overflow band)
//! is recycled in place by the [`RecycleRule`]: it re-enters from the edge the
//! flow comes from, or anywhere at low depth if the field is still.
//!
//! ### Drawing
//!
//! The [`Renderer`] clears a [`Surface`] and strokes each star as a short
//! round-capped line along the drift, with a per-frame random alpha. The
//! native host records strokes into a [`LineBatch`] and draws them with wgpu.
//!
//! ### Driving it yourself
//!
//! [`Animation`] ties the pieces to any [`FrameScheduler`]. Build it with
//! [`Animation::new`], which validates the config, call [`Animation::run`] once, [`Animation::tick`] whenever the requested frame
//! arrives, and [`Animation::teardown`] when done.

pub mod config;
mod error;
pub mod frame_loop;
mod gpu;
pub mod input;
pub mod particle;
pub mod recycle;
pub mod renderer;
pub mod simulator;
pub mod surface;
pub mod time;
pub mod velocity;
mod window;

pub use config::StarfieldConfig;
pub use error::{GpuError, Result, StarwarpError};
pub use frame_loop::{Animation, FrameHandle, FrameScheduler, LoopState};
pub use glam::Vec2;
pub use input::{InputAdapter, InputOutcome, PointerKind};
pub use particle::Star;
pub use recycle::{RecycleRule, SpawnEdge};
pub use renderer::Renderer;
pub use simulator::Simulator;
pub use surface::{LineBatch, LineCap, LineInstance, Surface};
pub use velocity::{Smoothing, VelocityField};
pub use window::{run, WindowScheduler};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use starwarp::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::StarfieldConfig;
    pub use crate::frame_loop::{Animation, FrameHandle, FrameScheduler};
    pub use crate::input::{InputAdapter, PointerKind};
    pub use crate::particle::Star;
    pub use crate::renderer::Renderer;
    pub use crate::simulator::Simulator;
    pub use crate::surface::{LineBatch, LineCap, Surface};
    pub use crate::velocity::VelocityField;
    pub use crate::Vec2;
}
