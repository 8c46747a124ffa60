//! Tunable constants for the starfield.
//!
//! Every value has a default matching the look of the reference animation, so
//! an empty JSON object (or no file at all) gives the stock starfield.
//!
//! ```ignore
//! let config = StarfieldConfig::default()
//!     .with_star_size(2.0)
//!     .with_scroll_burst(80.0, Duration::from_millis(30))
//!     .with_seed(7);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StarwarpError};

/// Configuration for the simulation, renderer, input mapping and window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Stroke color of every star (RGB, 0.0-1.0).
    pub star_color: [f32; 3],
    /// Base line width in logical pixels, scaled by depth and pixel ratio.
    pub star_size: f32,
    /// Lower bound of the depth given to freshly spawned stars.
    pub min_scale: f32,
    /// How far outside the surface a star may drift before it is recycled.
    pub overflow_threshold: f32,
    /// Resting depth-growth rate. Must be positive.
    pub base_depth_rate: f32,
    /// Multiplier applied to the resting depth rate while scrolling.
    pub scroll_burst_factor: f32,
    /// Quiet period after the last scroll before the burst ends, in ms.
    pub scroll_quiet_ms: u64,
    /// Per-step decay of the drift target.
    pub target_decay: f32,
    /// Per-step smoothing factor of drift toward its target.
    pub drift_smoothing: f32,
    /// Per-step smoothing factor of depth rate toward its target.
    pub depth_smoothing: f32,
    /// Pointer deltas are divided by `pointer_divisor * pixel_ratio`.
    pub pointer_divisor: f32,
    /// One star per this many logical pixels of `width + height`.
    pub density_divisor: f32,
    /// Window title.
    pub title: String,
    /// Initial window size in logical pixels.
    pub window_size: [u32; 2],
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_color: [1.0, 1.0, 1.0],
            star_size: 3.0,
            min_scale: 0.2,
            overflow_threshold: 50.0,
            base_depth_rate: 0.0005,
            scroll_burst_factor: 50.0,
            scroll_quiet_ms: 10,
            target_decay: 0.96,
            drift_smoothing: 0.8,
            depth_smoothing: 0.1,
            pointer_divisor: 8.0,
            density_divisor: 8.0,
            title: "starwarp".to_string(),
            window_size: [1280, 720],
            seed: None,
        }
    }
}

impl StarfieldConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| StarwarpError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> Result<()> {
        fn invalid(msg: impl Into<String>) -> Result<()> {
            Err(StarwarpError::InvalidConfig(msg.into()))
        }

        if !(self.base_depth_rate > 0.0) {
            return invalid(format!(
                "base_depth_rate must be positive, got {}",
                self.base_depth_rate
            ));
        }
        if !(self.scroll_burst_factor > 0.0) {
            return invalid("scroll_burst_factor must be positive");
        }
        if !(0.0..1.0).contains(&self.min_scale) {
            return invalid(format!("min_scale must be in [0, 1), got {}", self.min_scale));
        }
        for (name, value) in [
            ("target_decay", self.target_decay),
            ("drift_smoothing", self.drift_smoothing),
            ("depth_smoothing", self.depth_smoothing),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return invalid(format!("{name} must be in (0, 1], got {value}"));
            }
        }
        if !(self.pointer_divisor > 0.0) || !(self.density_divisor > 0.0) {
            return invalid("pointer_divisor and density_divisor must be positive");
        }
        if self.overflow_threshold < 0.0 {
            return invalid("overflow_threshold must not be negative");
        }
        if self.star_size < 0.0 {
            return invalid("star_size must not be negative");
        }
        Ok(())
    }

    /// Scroll quiet period as a [`Duration`].
    pub fn scroll_quiet(&self) -> Duration {
        Duration::from_millis(self.scroll_quiet_ms)
    }

    /// Set the star stroke color.
    pub fn with_star_color(mut self, rgb: [f32; 3]) -> Self {
        self.star_color = rgb;
        self
    }

    /// Set the base line width.
    pub fn with_star_size(mut self, size: f32) -> Self {
        self.star_size = size;
        self
    }

    /// Set the recycle overflow threshold.
    pub fn with_overflow_threshold(mut self, threshold: f32) -> Self {
        self.overflow_threshold = threshold;
        self
    }

    /// Set the resting depth-growth rate.
    pub fn with_base_depth_rate(mut self, rate: f32) -> Self {
        self.base_depth_rate = rate;
        self
    }

    /// Set the scroll burst multiplier and its quiet period.
    pub fn with_scroll_burst(mut self, factor: f32, quiet: Duration) -> Self {
        self.scroll_burst_factor = factor;
        self.scroll_quiet_ms = quiet.as_millis() as u64;
        self
    }

    /// Set the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the initial window size in logical pixels.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_size = [width, height];
        self
    }

    /// Fix the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
