//! Drawing the star set onto a [`Surface`].

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::StarfieldConfig;
use crate::particle::Star;
use crate::surface::{LineCap, Surface};
use crate::velocity::VelocityField;

/// Trail components shorter than this are replaced by [`MIN_TAIL`].
const TAIL_EPSILON: f32 = 0.1;
/// Tail length used when drift is negligible, so still stars stay visible.
pub const MIN_TAIL: f32 = 0.5;

/// Draws each star as a short stroke along the current drift.
///
/// Nothing accumulates between frames: the surface is cleared first and the
/// trail is the stroke itself.
pub struct Renderer<R: Rng = SmallRng> {
    star_size: f32,
    color: [f32; 3],
    pixel_ratio: f32,
    rng: R,
}

impl Renderer<SmallRng> {
    pub fn from_config(config: &StarfieldConfig, pixel_ratio: f32) -> Self {
        let rng = match config.seed {
            // Offset so the twinkle stream differs from the simulator's.
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(1)),
            None => SmallRng::from_entropy(),
        };
        Self::with_rng(config, pixel_ratio, rng)
    }
}

impl<R: Rng> Renderer<R> {
    pub fn with_rng(config: &StarfieldConfig, pixel_ratio: f32, rng: R) -> Self {
        Self {
            star_size: config.star_size,
            color: config.star_color,
            pixel_ratio,
            rng,
        }
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.pixel_ratio = pixel_ratio;
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Clear the surface and stroke every star.
    pub fn draw<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
        stars: &[Star],
        velocity: &VelocityField,
    ) {
        let size = surface.size();
        surface.clear_rect(0.0, 0.0, size.x, size.y);

        let tail_x = tail(velocity.drift.x);
        let tail_y = tail(velocity.drift.y);

        for star in stars {
            surface.begin_path();
            surface.set_line_cap(LineCap::Round);
            surface.set_line_width(self.star_size * star.z * self.pixel_ratio);
            // Twinkle: re-rolled every frame, never smoothed.
            surface.set_global_alpha(0.5 + 0.5 * self.rng.gen::<f32>());
            surface.set_stroke_color(self.color);
            surface.move_to(star.position.x, star.position.y);
            surface.line_to(star.position.x + tail_x, star.position.y + tail_y);
            surface.stroke();
        }
    }
}

/// Trail offset along one axis for a drift component.
#[inline]
pub fn tail(drift: f32) -> f32 {
    let t = drift * 2.0;
    if t.abs() < TAIL_EPSILON {
        MIN_TAIL
    } else {
        t
    }
}
