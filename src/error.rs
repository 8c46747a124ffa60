//! Error types for starwarp.
//!
//! Only the outer shell is fallible: window and event-loop creation, GPU
//! setup, and configuration loading. The simulation and renderer never fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during GPU initialization.
///
/// These never reach the user as a hard failure. The window host logs them
/// and keeps running without animation.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported no usable texture format.
    #[error("surface has no supported texture format")]
    NoSurfaceFormat,
}

/// Errors that can occur when loading configuration or running the window.
#[derive(Debug, Error)]
pub enum StarwarpError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// Config file could not be read.
    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid JSON for [`StarfieldConfig`](crate::StarfieldConfig).
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),
    /// A config value is outside its allowed range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, StarwarpError>;
